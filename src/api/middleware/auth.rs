//! Session cookie authentication middleware.
//!
//! Extracts the `session` cookie, validates it against the session store
//! (sliding the expiry forward), and injects `DoctorContext` into request
//! extensions for downstream handlers.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DoctorContext};

pub const SESSION_COOKIE: &str = "session";

/// Require a logged-in doctor.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
/// On success: injects `DoctorContext` for the handler.
pub async fn require_login(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_login_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_login_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|header| cookie_value(header, SESSION_COOKIE))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let session = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.validate(&token).ok_or(ApiError::Unauthorized)?
    }; // MutexGuard dropped here, before any .await

    req.extensions_mut().insert(DoctorContext {
        doctor_id: session.doctor_id,
        username: session.username,
        name: session.name,
    });

    Ok(next.run(req).await)
}

/// Pull a named cookie out of a `Cookie` header value.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_finds_session() {
        assert_eq!(cookie_value("session=abc123", "session"), Some("abc123"));
        assert_eq!(
            cookie_value("theme=dark; session=abc123; lang=en", "session"),
            Some("abc123")
        );
    }

    #[test]
    fn cookie_value_misses_cleanly() {
        assert_eq!(cookie_value("theme=dark", "session"), None);
        assert_eq!(cookie_value("", "session"), None);
        // A cookie whose name merely contains "session" must not match.
        assert_eq!(cookie_value("oldsession=abc", "session"), None);
    }
}
