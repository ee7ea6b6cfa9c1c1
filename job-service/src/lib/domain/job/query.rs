//! Turns loose listing parameters into one fully resolved job search.
//!
//! Filters are alternatives, not a conjunction: the first non-empty one of
//! `search`, `location`, `job_type` (in that order) is used and the rest are
//! ignored. Every filter is implicitly restricted to `ACTIVE` postings.
//! Out-of-range paging is clamped and unknown sort input falls back to
//! defaults, so only an unparseable job type code can make a query invalid.

use std::str::FromStr;

use crate::domain::job::errors::JobValidationError;
use crate::domain::job::models::JobStatus;
use crate::domain::job::models::JobType;

/// Paging bounds applied by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl PageLimits {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    /// Bounds with `max_size >= 1` and `default_size` inside `[1, max_size]`.
    pub fn new(default_size: u32, max_size: u32) -> Self {
        let max_size = max_size.max(1);
        Self {
            default_size: default_size.clamp(1, max_size),
            max_size,
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, Self::MAX_SIZE)
    }
}

/// Raw, independently optional listing parameters as received.
#[derive(Debug, Clone, Default)]
pub struct JobQueryParams {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// Which postings match. Each variant is additionally scoped to
/// [`JobQuery::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    /// Title contains the text, case-insensitively.
    TitleContains(String),
    /// Location contains the text, case-insensitively.
    LocationContains(String),
    JobType(JobType),
    /// No extra restriction.
    All,
}

/// Allow-listed sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    PostedAt,
    Title,
    Location,
    Views,
    Applications,
    Deadline,
    MinSalary,
    MaxSalary,
}

impl SortField {
    /// Storage column for this key.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::PostedAt => "posted_at",
            SortField::Title => "title",
            SortField::Location => "location",
            SortField::Views => "views",
            SortField::Applications => "applications",
            SortField::Deadline => "deadline",
            SortField::MinSalary => "min_salary",
            SortField::MaxSalary => "max_salary",
        }
    }
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postedAt" | "posted_at" => Ok(SortField::PostedAt),
            "title" => Ok(SortField::Title),
            "location" => Ok(SortField::Location),
            "views" => Ok(SortField::Views),
            "applications" => Ok(SortField::Applications),
            "deadline" => Ok(SortField::Deadline),
            "minSalary" | "min_salary" => Ok(SortField::MinSalary),
            "maxSalary" | "max_salary" => Ok(SortField::MaxSalary),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `asc` in any case is ascending; anything else is descending.
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: SortField::PostedAt,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub index: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.index) * u64::from(self.size)
    }
}

/// Fully resolved query descriptor handed to the job store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub filter: JobFilter,
    pub status: JobStatus,
    pub sort: Sort,
    pub page: PageRequest,
}

impl JobQueryParams {
    /// Resolve the parameters into a query descriptor.
    ///
    /// # Errors
    /// * `UnknownJobType` - The selected `job_type` filter is not a job type code
    pub fn build(self, limits: &PageLimits) -> Result<JobQuery, JobValidationError> {
        let filter = if let Some(search) = non_blank(self.search) {
            JobFilter::TitleContains(search)
        } else if let Some(location) = non_blank(self.location) {
            JobFilter::LocationContains(location)
        } else if let Some(code) = non_blank(self.job_type) {
            JobFilter::JobType(code.parse()?)
        } else {
            JobFilter::All
        };

        let sort = Sort {
            field: self
                .sort_by
                .as_deref()
                .and_then(|field| field.trim().parse().ok())
                .unwrap_or(SortField::PostedAt),
            direction: self
                .sort_dir
                .as_deref()
                .map_or(SortDirection::Desc, SortDirection::parse_lenient),
        };

        let page = PageRequest {
            index: clamp_to_u32(self.page.unwrap_or(0), 0, u32::MAX),
            size: self.size.map_or(limits.default_size, |size| {
                clamp_to_u32(size, 1, limits.max_size)
            }),
        };

        Ok(JobQuery {
            filter,
            status: JobStatus::Active,
            sort,
            page,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clamp_to_u32(value: i64, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(i64::from(min), i64::from(max));
    u32::try_from(clamped).unwrap_or(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(params: JobQueryParams) -> JobQuery {
        params.build(&PageLimits::default()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let query = build(JobQueryParams::default());

        assert_eq!(query.filter, JobFilter::All);
        assert_eq!(query.status, JobStatus::Active);
        assert_eq!(query.sort, Sort::default());
        assert_eq!(query.page, PageRequest { index: 0, size: 10 });
    }

    #[test]
    fn test_search_wins_over_location() {
        let query = build(JobQueryParams {
            search: Some("cook".to_string()),
            location: Some("Delhi".to_string()),
            ..Default::default()
        });

        assert_eq!(query.filter, JobFilter::TitleContains("cook".to_string()));
    }

    #[test]
    fn test_location_wins_over_job_type() {
        let query = build(JobQueryParams {
            location: Some("Delhi".to_string()),
            job_type: Some("NOT_A_TYPE".to_string()),
            ..Default::default()
        });

        // The ignored job type is never parsed, so it cannot fail the query
        assert_eq!(
            query.filter,
            JobFilter::LocationContains("Delhi".to_string())
        );
    }

    #[test]
    fn test_blank_filters_fall_through() {
        let query = build(JobQueryParams {
            search: Some("".to_string()),
            location: Some("   ".to_string()),
            job_type: Some("CONTRACT".to_string()),
            ..Default::default()
        });

        assert_eq!(query.filter, JobFilter::JobType(JobType::Contract));
    }

    #[test]
    fn test_unknown_job_type_rejected() {
        let result = JobQueryParams {
            job_type: Some("GIG".to_string()),
            ..Default::default()
        }
        .build(&PageLimits::default());

        assert_eq!(
            result,
            Err(JobValidationError::UnknownJobType("GIG".to_string()))
        );
    }

    #[test]
    fn test_size_clamped_to_max() {
        let query = build(JobQueryParams {
            size: Some(10_000),
            ..Default::default()
        });
        assert_eq!(query.page.size, 100);
    }

    #[test]
    fn test_size_and_page_clamped_low() {
        let query = build(JobQueryParams {
            page: Some(-3),
            size: Some(0),
            ..Default::default()
        });
        assert_eq!(query.page, PageRequest { index: 0, size: 1 });

        let query = build(JobQueryParams {
            size: Some(-50),
            ..Default::default()
        });
        assert_eq!(query.page.size, 1);
    }

    #[test]
    fn test_custom_limits() {
        let limits = PageLimits::new(5, 20);
        let query = JobQueryParams::default().build(&limits).unwrap();
        assert_eq!(query.page.size, 5);

        let query = JobQueryParams {
            size: Some(21),
            ..Default::default()
        }
        .build(&limits)
        .unwrap();
        assert_eq!(query.page.size, 20);
    }

    #[test]
    fn test_page_limits_are_sane() {
        assert_eq!(
            PageLimits::new(500, 0),
            PageLimits {
                default_size: 1,
                max_size: 1
            }
        );
        assert_eq!(PageLimits::new(0, 50).default_size, 1);
    }

    #[test]
    fn test_sort_allow_list() {
        let query = build(JobQueryParams {
            sort_by: Some("views".to_string()),
            sort_dir: Some("ASC".to_string()),
            ..Default::default()
        });
        assert_eq!(
            query.sort,
            Sort {
                field: SortField::Views,
                direction: SortDirection::Asc
            }
        );

        let query = build(JobQueryParams {
            sort_by: Some("title; DROP TABLE jobs".to_string()),
            sort_dir: Some("sideways".to_string()),
            ..Default::default()
        });
        assert_eq!(query.sort, Sort::default());
    }

    #[test]
    fn test_sort_aliases() {
        assert_eq!("postedAt".parse(), Ok(SortField::PostedAt));
        assert_eq!("min_salary".parse(), Ok(SortField::MinSalary));
        assert_eq!(SortField::MaxSalary.column(), "max_salary");
    }

    #[test]
    fn test_offset() {
        let page = PageRequest { index: 3, size: 25 };
        assert_eq!(page.offset(), 75);
    }
}
