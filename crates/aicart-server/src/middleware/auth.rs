use crate::error::ApiError;
use crate::state::AppState;
use aicart_token::SessionClaims;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// A session whose token signature, expiry and claims have been checked.
#[derive(Clone, Debug)]
pub struct VerifiedSession(pub SessionClaims);

/// Axum middleware requiring a valid bearer token.
///
/// On success the claims are stored in the request extensions as a
/// [`VerifiedSession`].
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers()).ok_or(ApiError::Unauthorized)?;

    let claims = state.access().validate_session(&token).map_err(|e| {
        tracing::debug!(error = %e, "rejected session token");
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(VerifiedSession(claims));
    Ok(next.run(req).await)
}

/// Axum middleware requiring an admin session. Must run after
/// [`require_session`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let session = req
        .extensions()
        .get::<VerifiedSession>()
        .ok_or(ApiError::Unauthorized)?;

    if !session.0.is_admin() {
        tracing::info!(subject = %session.0.subject, "admin route refused for non-admin session");
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}
