use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::JobData;
use super::JobDetailsRequest;
use crate::domain::authorization::Actor;
use crate::domain::job::errors::JobError;
use crate::domain::job::models::JobId;
use crate::domain::job::models::UpdateJobCommand;
use crate::domain::job::ports::JobServicePort;
use crate::inbound::http::router::AppState;

pub async fn update_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(job_id): Path<String>,
    payload: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> Result<ApiSuccess<JobData>, ApiError> {
    let job_id = JobId::from_string(&job_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let Json(body) = payload?;

    state
        .job_service
        .update_job(&actor, &job_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref job| ApiSuccess::new(StatusCode::OK, job.into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateJobRequest {
    #[serde(flatten)]
    details: JobDetailsRequest,
    status: Option<String>,
}

impl UpdateJobRequest {
    fn try_into_command(self) -> Result<UpdateJobCommand, JobError> {
        Ok(UpdateJobCommand {
            details: self.details.try_into_details()?,
            status: self.status.map(|s| s.parse()).transpose()?,
        })
    }
}
