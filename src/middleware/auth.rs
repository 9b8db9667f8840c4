use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::UserIdentity;
use crate::error::ApiError;

/// Authenticated caller, attached to the request by [`auth_middleware`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserIdentity,
}

/// Bearer token gate for protected routes. Every rejection produces the same
/// 401 body; the specific reason is only logged.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = state
        .verifier
        .verify_header(request.headers().get(AUTHORIZATION))
        .map_err(|e| {
            tracing::debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
            ApiError::unauthenticated()
        })?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}
