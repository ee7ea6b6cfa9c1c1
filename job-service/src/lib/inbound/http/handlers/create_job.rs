use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::ApiError;
use super::ApiSuccess;
use super::JobData;
use super::JobDetailsRequest;
use crate::domain::authorization::Actor;
use crate::domain::job::models::CreateJobCommand;
use crate::domain::job::ports::JobServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<JobDetailsRequest>, JsonRejection>,
) -> Result<ApiSuccess<JobData>, ApiError> {
    let Json(body) = payload?;
    let command = CreateJobCommand {
        details: body.try_into_details()?,
    };

    state
        .job_service
        .create_job(&actor, command)
        .await
        .map_err(ApiError::from)
        .map(|ref job| ApiSuccess::new(StatusCode::CREATED, job.into()))
}
