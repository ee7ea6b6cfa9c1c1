use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::authorization::Actor;
use crate::domain::job::models::JobId;
use crate::domain::job::ports::JobServicePort;
use crate::inbound::http::router::AppState;

pub async fn delete_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(job_id): Path<String>,
) -> Result<ApiSuccess<DeleteJobResponseData>, ApiError> {
    let job_id = JobId::from_string(&job_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .job_service
        .delete_job(&actor, &job_id)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        DeleteJobResponseData {
            id: job_id.to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteJobResponseData {
    pub id: String,
}
