use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let Json(body) = payload?;

    state
        .user_service
        .login(LoginCommand {
            username: body.username,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

/// Returned by both login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseData {
    pub token: String,
    pub token_type: String,
    pub expires_at: i64,
    pub user: UserData,
}

impl From<&AuthSession> for AuthResponseData {
    fn from(session: &AuthSession) -> Self {
        Self {
            token: session.token.clone(),
            token_type: "Bearer".to_string(),
            expires_at: session.expires_at,
            user: (&session.user).into(),
        }
    }
}
