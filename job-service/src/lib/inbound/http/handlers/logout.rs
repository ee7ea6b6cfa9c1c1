use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

/// Sessions are stateless bearer tokens, so logging out is only an
/// acknowledgement; the client discards its token.
pub async fn logout() -> ApiSuccess<LogoutResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData {
            message: "Logged out".to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
