use crate::error::ApiError;
use crate::middleware::auth::VerifiedSession;
use crate::state::AppState;
use aicart_access::AccessGrant;
use aicart_core::Role;
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub subject: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| ApiError::MalformedRequest(rejection.body_text()))
}

pub async fn login_admin(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AccessGrant>, ApiError> {
    let req = body(payload)?;
    let grant = state.access().login_admin(&req.email, &req.password).await?;
    Ok(Json(grant))
}

pub async fn login_user(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AccessGrant>, ApiError> {
    let req = body(payload)?;
    let grant = state.access().login_user(&req.email, &req.password).await?;
    Ok(Json(grant))
}

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccessGrant>), ApiError> {
    let req = body(payload)?;
    let grant = state
        .access()
        .signup_user(&req.email, &req.password, req.name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

pub async fn me(
    Extension(VerifiedSession(claims)): Extension<VerifiedSession>,
) -> Json<SessionResponse> {
    Json(SessionResponse {
        subject: claims.subject,
        role: claims.role,
        expires_at: Some(claims.expires_at),
    })
}

pub async fn admin_session(
    Extension(VerifiedSession(claims)): Extension<VerifiedSession>,
) -> Json<SessionResponse> {
    Json(SessionResponse {
        subject: claims.subject,
        role: claims.role,
        expires_at: None,
    })
}

pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": "aicart-server",
        "store_mode": state.access().mode(),
    }))
}
