use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use http::header;

use crate::config::RoleSource;
use crate::domain::authorization::Actor;
use crate::domain::user::models::Role;
use crate::domain::user::models::SessionIdentity;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Middleware that resolves the caller and adds an [`Actor`] to request
/// extensions.
///
/// A request without an `Authorization` header continues as
/// [`Actor::Anonymous`] and the authorization policy decides. A header that
/// is present but unusable ends the request with 401.
pub async fn identify(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let actor = match extract_token_from_header(&req)? {
        Some(token) => Actor::from(resolve_identity(&state, &token).await?),
        None => Actor::Anonymous,
    };

    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}

async fn resolve_identity(state: &AppState, token: &str) -> Result<SessionIdentity, ApiError> {
    let claims = state.authenticator.validate_token(token).map_err(|e| {
        let kind = match e {
            JwtError::TokenExpired => "expired",
            _ => "malformed",
        };
        tracing::warn!(kind, error = %e, "Token validation failed");
        ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user id");
        ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
    })?;

    match state.role_source {
        RoleSource::Token => {
            let role = claims.role.parse::<Role>().map_err(|e| {
                tracing::warn!(error = %e, "Token carries an unknown role");
                ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
            })?;
            Ok(SessionIdentity { user_id, role })
        }
        RoleSource::Live => match state.user_service.get_user(&user_id).await {
            Ok(user) if user.active => Ok(SessionIdentity {
                user_id,
                role: user.role,
            }),
            Ok(_) => {
                tracing::warn!(%user_id, "Token belongs to an inactive account");
                Err(ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))
            }
            Err(UserError::NotFound(_)) => {
                tracing::warn!(%user_id, "Token belongs to an unknown account");
                Err(ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))
            }
            Err(e) => Err(ApiError::from(e)),
        },
    }
}

fn extract_token_from_header(req: &Request) -> Result<Option<String>, ApiError> {
    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )),
    }
}
