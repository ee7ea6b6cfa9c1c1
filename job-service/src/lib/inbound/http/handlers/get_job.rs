use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::JobData;
use crate::domain::job::models::JobId;
use crate::domain::job::ports::JobServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<ApiSuccess<JobData>, ApiError> {
    let job_id = JobId::from_string(&job_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .job_service
        .get_job(&job_id)
        .await
        .map_err(ApiError::from)
        .map(|ref job| ApiSuccess::new(StatusCode::OK, job.into()))
}
