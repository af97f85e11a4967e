//! HTTP handlers
//!
//! The login/logout/session endpoints. Every credential failure surfaces as
//! one generic message; the response never distinguishes an unknown
//! identifier from a wrong secret, and store trouble reads as "try again".

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthServerError};
use crate::middleware::logging;
use crate::server::core::AppState;

pub const SESSION_COOKIE: &str = "rax_auth_session";

const GENERIC_DENIED: &str = "invalid identifier or secret";
const GENERIC_UNAUTHENTICATED: &str = "not authenticated";
const GENERIC_RETRY: &str = "something went wrong, please try again";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub identifier: String,
    pub secret: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

#[derive(Serialize)]
struct SessionBody {
    subject_id: String,
}

/// POST /login: verify the form credentials, issue a session on success,
/// and redirect with the session cookie set.
pub async fn login(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    logging::log_login_attempt(&form.identifier);

    match state.verifier.verify(&form.identifier, &form.secret).await {
        Ok(true) => match state.sessions.issue(&form.identifier).await {
            Ok(token) => {
                logging::log_login_success(&form.identifier, &token);
                (
                    StatusCode::SEE_OTHER,
                    [
                        (header::SET_COOKIE, session_cookie(&token, state.session_ttl_secs)),
                        (header::LOCATION, state.login_redirect.clone()),
                    ],
                )
                    .into_response()
            }
            Err(e) => {
                error!("Session issuance failed: {}", e);
                retry_response()
            }
        },
        Ok(false) => {
            logging::log_login_failure(&form.identifier, "verification failed");
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody { error: GENERIC_DENIED }),
            )
                .into_response()
        }
        Err(AuthServerError::Auth(AuthError::InvalidInput(reason))) => {
            logging::log_login_failure(&form.identifier, &reason);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody { error: GENERIC_RETRY }),
            )
                .into_response()
        }
        Err(e) => {
            logging::log_login_failure(&form.identifier, "internal error");
            error!("Login error: {}", e);
            retry_response()
        }
    }
}

/// POST /logout: revoke the cookie's session (idempotent) and clear the cookie
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        match state.sessions.revoke(&token).await {
            Ok(()) => logging::log_logout(&token),
            Err(e) => {
                error!("Logout error: {}", e);
                return retry_response();
            }
        }
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_cookie())],
    )
        .into_response()
}

/// GET /session: authenticated-or-not for the surrounding web layer
pub async fn session_info(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let Some(token) = session_token(&headers) else {
        return unauthenticated_response();
    };

    match state.sessions.validate(&token).await {
        Ok(Some(subject_id)) => (StatusCode::OK, Json(SessionBody { subject_id })).into_response(),
        Ok(None) => unauthenticated_response(),
        Err(e) => {
            error!("Session validation error: {}", e);
            retry_response()
        }
    }
}

/// GET /healthz: liveness probe
pub async fn healthz() -> &'static str {
    "ok"
}

/// Extract the session token from the Cookie header
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

fn session_cookie(token: &str, ttl_secs: u64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        SESSION_COOKIE, token, ttl_secs
    )
}

fn clear_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", SESSION_COOKIE)
}

fn unauthenticated_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody { error: GENERIC_UNAUTHENTICATED }),
    )
        .into_response()
}

fn retry_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorBody { error: GENERIC_RETRY }),
    )
        .into_response()
}
