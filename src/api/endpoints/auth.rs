//! Login and logout endpoints.
//!
//! - `POST /login`: verify credentials, set the session cookie
//! - `POST /logout`: revoke the session, clear the cookie

use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::middleware::auth::{cookie_value, SESSION_COOKIE};
use crate::api::types::{ApiContext, DoctorContext};
use crate::auth::{self, SESSION_TTL_SECS};
use crate::db::repository;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub doctor_id: i64,
    pub username: String,
    pub name: String,
    pub specialization: Option<String>,
}

/// `POST /login`: authenticate a doctor and start a session.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let conn = ctx.state.open_db()?;
    let doctor = repository::find_doctor_by_username(&conn, body.username.trim())?
        .ok_or(ApiError::InvalidCredentials)?;

    // PBKDF2 at 600k iterations takes long enough to stall the async
    // worker, so verification runs on the blocking pool.
    let stored = doctor.password_hash.clone();
    let password = body.password;
    let verified = tokio::task::spawn_blocking(move || auth::verify_password(&password, &stored))
        .await
        .map_err(|e| ApiError::Internal(format!("verification task: {e}")))?;
    if !verified {
        tracing::warn!(username = %doctor.username, "failed login attempt");
        return Err(ApiError::InvalidCredentials);
    }

    let token = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.establish(doctor.id, &doctor.username, &doctor.name)
    };

    tracing::info!(username = %doctor.username, "doctor logged in");

    let body = LoginResponse {
        doctor_id: doctor.id,
        username: doctor.username,
        name: doctor.name,
        specialization: doctor.specialization,
    };
    let mut response = Json(body).into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, session_cookie(&token, SESSION_TTL_SECS));
    Ok(response)
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// `POST /logout`: end the current session.
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
    req: axum::http::Request<axum::body::Body>,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|header| cookie_value(header, SESSION_COOKIE))
        .map(str::to_string);

    if let Some(token) = token {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.revoke(&token);
    }

    tracing::info!(username = %doctor.username, "doctor logged out");

    let mut response = Json(LogoutResponse { logged_out: true }).into_response();
    // Max-Age=0 tells the client to drop the cookie immediately.
    response
        .headers_mut()
        .insert(header::SET_COOKIE, session_cookie("", 0));
    Ok(response)
}

fn session_cookie(token: &str, max_age: u64) -> HeaderValue {
    let cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    HeaderValue::from_str(&cookie)
        .unwrap_or_else(|_| HeaderValue::from_static("session=; Path=/; HttpOnly; Max-Age=0"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only() {
        let value = session_cookie("tok123", 3600);
        let s = value.to_str().unwrap();
        assert!(s.starts_with("session=tok123;"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("SameSite=Lax"));
        assert!(s.contains("Max-Age=3600"));
    }

    #[test]
    fn clearing_cookie_has_zero_max_age() {
        let value = session_cookie("", 0);
        assert!(value.to_str().unwrap().contains("Max-Age=0"));
    }
}
