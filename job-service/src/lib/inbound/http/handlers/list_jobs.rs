use std::num::IntErrorKind;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::de;
use serde::Deserialize;
use serde::Deserializer;

use super::ApiError;
use super::ApiSuccess;
use super::JobData;
use super::PageData;
use crate::domain::job::ports::JobServicePort;
use crate::domain::job::query::JobQueryParams;
use crate::inbound::http::router::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsQuery {
    search: Option<String>,
    location: Option<String>,
    job_type: Option<String>,
    #[serde(default, deserialize_with = "saturating_number")]
    page: Option<i64>,
    #[serde(default, deserialize_with = "saturating_number")]
    size: Option<i64>,
    sort_by: Option<String>,
    sort_dir: Option<String>,
}

/// Parse a paging number, pinning out-of-range values to the nearest bound
/// so they get clamped like any other oversized request.
fn saturating_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match raw.trim().parse::<i64>() {
        Ok(n) => Ok(Some(n)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(Some(i64::MAX)),
            IntErrorKind::NegOverflow => Ok(Some(i64::MIN)),
            _ => Err(de::Error::custom(format!("invalid number: {}", raw))),
        },
    }
}

impl From<ListJobsQuery> for JobQueryParams {
    fn from(query: ListJobsQuery) -> Self {
        JobQueryParams {
            search: query.search,
            location: query.location,
            job_type: query.job_type,
            page: query.page,
            size: query.size,
            sort_by: query.sort_by,
            sort_dir: query.sort_dir,
        }
    }
}

pub async fn list_jobs(
    State(state): State<AppState>,
    query: Result<Query<ListJobsQuery>, QueryRejection>,
) -> Result<ApiSuccess<PageData<JobData>>, ApiError> {
    let Query(params) = query?;

    state
        .job_service
        .list_jobs(params.into())
        .await
        .map_err(ApiError::from)
        .map(|page| ApiSuccess::new(StatusCode::OK, page.into()))
}
