use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::job::errors::JobIdError;
use crate::domain::job::errors::JobValidationError;
use crate::domain::user::models::UserId;

/// Job posting aggregate.
///
/// `employer_id` refers to the owning account by id only; the posting
/// never embeds or owns the employer record.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub employer_id: UserId,
    pub details: JobDetails,
    pub status: JobStatus,
    pub views: i64,
    pub applications: i64,
    pub posted_at: DateTime<Utc>,
}

/// Job unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a job ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, JobIdError> {
        Uuid::parse_str(s)
            .map(JobId)
            .map_err(|e| JobIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Contract type of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Temporary,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "FULL_TIME",
            JobType::PartTime => "PART_TIME",
            JobType::Contract => "CONTRACT",
            JobType::Temporary => "TEMPORARY",
        }
    }
}

impl FromStr for JobType {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FULL_TIME" => Ok(JobType::FullTime),
            "PART_TIME" => Ok(JobType::PartTime),
            "CONTRACT" => Ok(JobType::Contract),
            "TEMPORARY" => Ok(JobType::Temporary),
            other => Err(JobValidationError::UnknownJobType(other.to_string())),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmploymentType {
    OnSite,
    Remote,
    Hybrid,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::OnSite => "ON_SITE",
            EmploymentType::Remote => "REMOTE",
            EmploymentType::Hybrid => "HYBRID",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON_SITE" => Ok(EmploymentType::OnSite),
            "REMOTE" => Ok(EmploymentType::Remote),
            "HYBRID" => Ok(EmploymentType::Hybrid),
            other => Err(JobValidationError::UnknownEmploymentType(other.to_string())),
        }
    }
}

/// Lifecycle state of a posting.
///
/// Only `ACTIVE` postings are listed. Transitions are one-way:
/// `ACTIVE -> INACTIVE` or `ACTIVE -> CLOSED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Active,
    Inactive,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "ACTIVE",
            JobStatus::Inactive => "INACTIVE",
            JobStatus::Closed => "CLOSED",
        }
    }

    /// Whether a posting in this state may move to `next`.
    ///
    /// Staying in the same state is always permitted.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        *self == next
            || matches!(
                (self, next),
                (JobStatus::Active, JobStatus::Inactive) | (JobStatus::Active, JobStatus::Closed)
            )
    }
}

impl FromStr for JobStatus {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(JobStatus::Active),
            "INACTIVE" => Ok(JobStatus::Inactive),
            "CLOSED" => Ok(JobStatus::Closed),
            other => Err(JobValidationError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offered pay band.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRange {
    min: f64,
    max: f64,
    currency: Option<String>,
}

impl SalaryRange {
    const MAX_CURRENCY_LENGTH: usize = 8;

    /// # Errors
    /// * `NegativeSalary` - Either bound is below zero (or not a number)
    /// * `InvertedSalaryRange` - `min > max`
    /// * `TooLong` - Currency code exceeds its limit
    pub fn new(min: f64, max: f64, currency: Option<String>) -> Result<Self, JobValidationError> {
        if !(min >= 0.0 && max >= 0.0) {
            return Err(JobValidationError::NegativeSalary);
        }
        if min > max {
            return Err(JobValidationError::InvertedSalaryRange { min, max });
        }

        let currency = currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());
        if let Some(code) = &currency {
            within("currency", code, Self::MAX_CURRENCY_LENGTH)?;
        }

        Ok(Self { min, max, currency })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

/// Employer-editable content of a posting.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDetails {
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: SalaryRange,
    pub job_type: JobType,
    pub employment_type: Option<EmploymentType>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub benefits: Vec<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

impl JobDetails {
    const MAX_TITLE_LENGTH: usize = 120;
    const MAX_LOCATION_LENGTH: usize = 120;
    const MAX_CONTACT_EMAIL_LENGTH: usize = 255;
    const MAX_CONTACT_PHONE_LENGTH: usize = 32;

    /// Check the free-text fields, trimming them in place.
    ///
    /// # Errors
    /// * `Blank` - Title, description, or location is empty
    /// * `TooLong` - A bounded field exceeds its limit
    /// * `InvalidContactEmail` - Contact email is not RFC 5322
    pub fn validated(mut self) -> Result<Self, JobValidationError> {
        self.title = required("title", self.title, Some(Self::MAX_TITLE_LENGTH))?;
        self.description = required("description", self.description, None)?;
        self.location = required("location", self.location, Some(Self::MAX_LOCATION_LENGTH))?;

        self.skills = tidy_list(self.skills);
        self.benefits = tidy_list(self.benefits);
        self.experience = optional(self.experience);
        self.education = optional(self.education);
        self.contact_phone = optional(self.contact_phone);
        self.contact_email = optional(self.contact_email);

        if let Some(phone) = &self.contact_phone {
            within("contactPhone", phone, Self::MAX_CONTACT_PHONE_LENGTH)?;
        }
        if let Some(email) = &self.contact_email {
            within("contactEmail", email, Self::MAX_CONTACT_EMAIL_LENGTH)?;
            email_address::EmailAddress::from_str(email)
                .map_err(|e| JobValidationError::InvalidContactEmail(e.to_string()))?;
        }

        Ok(self)
    }
}

fn required(
    field: &'static str,
    value: String,
    max: Option<usize>,
) -> Result<String, JobValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(JobValidationError::Blank { field });
    }

    if let Some(max) = max {
        within(field, trimmed, max)?;
    }
    Ok(trimmed.to_string())
}

fn within(field: &'static str, value: &str, max: usize) -> Result<(), JobValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(JobValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn tidy_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Command to publish a new posting.
///
/// The owner is not part of the command: it is always the acting employer.
#[derive(Debug, Clone)]
pub struct CreateJobCommand {
    pub details: JobDetails,
}

/// Command to replace a posting's content and optionally move its status.
#[derive(Debug, Clone)]
pub struct UpdateJobCommand {
    pub details: JobDetails,
    pub status: Option<JobStatus>,
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal valid details for tests.
    pub fn details(title: &str, location: &str, job_type: JobType) -> JobDetails {
        JobDetails {
            title: title.to_string(),
            description: format!("{} wanted", title),
            location: location.to_string(),
            salary: SalaryRange::new(15000.0, 25000.0, Some("INR".to_string())).unwrap(),
            job_type,
            employment_type: Some(EmploymentType::OnSite),
            skills: vec!["cooking".to_string()],
            experience: None,
            education: None,
            benefits: Vec::new(),
            contact_email: None,
            contact_phone: None,
            deadline: None,
        }
    }

    pub fn job(employer_id: UserId, details: JobDetails) -> Job {
        Job {
            id: JobId::new(),
            employer_id,
            details,
            status: JobStatus::Active,
            views: 0,
            applications: 0,
            posted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::details;
    use super::*;

    #[test]
    fn test_status_transitions() {
        use JobStatus::*;

        assert!(Active.can_transition_to(Inactive));
        assert!(Active.can_transition_to(Closed));
        assert!(Active.can_transition_to(Active));
        assert!(Inactive.can_transition_to(Inactive));

        assert!(!Inactive.can_transition_to(Active));
        assert!(!Closed.can_transition_to(Active));
        assert!(!Inactive.can_transition_to(Closed));
        assert!(!Closed.can_transition_to(Inactive));
    }

    #[test]
    fn test_enum_codes() {
        assert_eq!("PART_TIME".parse::<JobType>(), Ok(JobType::PartTime));
        assert_eq!(
            "part_time".parse::<JobType>(),
            Err(JobValidationError::UnknownJobType("part_time".to_string()))
        );
        assert_eq!("HYBRID".parse::<EmploymentType>(), Ok(EmploymentType::Hybrid));
        assert_eq!("CLOSED".parse::<JobStatus>(), Ok(JobStatus::Closed));
        assert_eq!(JobType::Temporary.to_string(), "TEMPORARY");
    }

    #[test]
    fn test_salary_range() {
        let range = SalaryRange::new(100.0, 200.0, Some(" inr ".to_string())).unwrap();
        assert_eq!(range.currency(), Some("INR"));

        assert_eq!(
            SalaryRange::new(-1.0, 200.0, None),
            Err(JobValidationError::NegativeSalary)
        );
        assert_eq!(
            SalaryRange::new(f64::NAN, 200.0, None),
            Err(JobValidationError::NegativeSalary)
        );
        assert_eq!(
            SalaryRange::new(300.0, 200.0, None),
            Err(JobValidationError::InvertedSalaryRange {
                min: 300.0,
                max: 200.0
            })
        );
    }

    #[test]
    fn test_details_validation_trims() {
        let mut raw = details("  Cook  ", " Delhi ", JobType::FullTime);
        raw.skills = vec![" tandoor ".to_string(), "   ".to_string()];
        raw.experience = Some("  ".to_string());

        let clean = raw.validated().unwrap();
        assert_eq!(clean.title, "Cook");
        assert_eq!(clean.location, "Delhi");
        assert_eq!(clean.skills, vec!["tandoor".to_string()]);
        assert_eq!(clean.experience, None);
    }

    #[test]
    fn test_details_validation_rejects() {
        let blank = details(" ", "Delhi", JobType::FullTime);
        assert_eq!(
            blank.validated(),
            Err(JobValidationError::Blank { field: "title" })
        );

        let long = details(&"x".repeat(121), "Delhi", JobType::FullTime);
        assert!(matches!(
            long.validated(),
            Err(JobValidationError::TooLong { field: "title", .. })
        ));

        let mut bad_email = details("Cook", "Delhi", JobType::FullTime);
        bad_email.contact_email = Some("nope".to_string());
        assert!(matches!(
            bad_email.validated(),
            Err(JobValidationError::InvalidContactEmail(_))
        ));
    }

    #[test]
    fn test_details_validation_bounds_contact_fields() {
        let mut long_phone = details("Cook", "Delhi", JobType::FullTime);
        long_phone.contact_phone = Some("9".repeat(33));
        assert_eq!(
            long_phone.validated(),
            Err(JobValidationError::TooLong {
                field: "contactPhone",
                max: 32,
                actual: 33
            })
        );

        let mut long_email = details("Cook", "Delhi", JobType::FullTime);
        long_email.contact_email = Some(format!("{}@example.com", "a".repeat(250)));
        assert!(matches!(
            long_email.validated(),
            Err(JobValidationError::TooLong {
                field: "contactEmail",
                max: 255,
                ..
            })
        ));

        let mut at_limit = details("Cook", "Delhi", JobType::FullTime);
        at_limit.contact_phone = Some(format!("  {}  ", "9".repeat(32)));
        assert_eq!(
            at_limit.validated().unwrap().contact_phone,
            Some("9".repeat(32))
        );
    }

    #[test]
    fn test_salary_currency_bounded() {
        assert_eq!(
            SalaryRange::new(100.0, 200.0, Some("RUPEESXYZ".to_string())),
            Err(JobValidationError::TooLong {
                field: "currency",
                max: 8,
                actual: 9
            })
        );
        assert!(SalaryRange::new(100.0, 200.0, Some(" usdollar ".to_string())).is_ok());
    }

    #[test]
    fn test_page_totals() {
        let page = Page {
            content: vec![1, 2, 3],
            page: 0,
            size: 3,
            total_elements: 7,
        };
        assert_eq!(page.total_pages(), 3);

        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.content, vec![10, 20, 30]);
        assert_eq!(mapped.total_elements, 7);
    }
}
