//! Axum route handlers for signup, login, and session management.

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect},
    Form, Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::session::SessionToken;
use crate::auth::validation::{LoginForm, SignupForm};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AuthSuccess {
    pub success: bool,
    pub redirect: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

const HOME: &str = "/";
const FORM_FIELD: &str = "form";
const FORM_UNREADABLE: &str = "Form data could not be read.";

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /signup
///
/// Form fields: fullName, email, password, confirmPassword, terms.
/// On success the new user is signed in immediately.
pub async fn handle_signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<SignupForm>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(form) = form.map_err(form_rejected)?;
    let new_user = form.validate().map_err(AppError::FieldErrors)?;

    let record = match state.credentials.register(new_user).await {
        Ok(record) => record,
        Err(e) => {
            warn!("Signup rejected: {e}");
            return Err(e);
        }
    };
    info!("Registered user {}", record.email);

    start_session(&state, &headers, &record.email).await
}

/// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(form) = form.map_err(form_rejected)?;
    let credentials = form.validate().map_err(AppError::FieldErrors)?;

    let record = match state
        .credentials
        .verify(&credentials.email, &credentials.password)
        .await
    {
        Ok(record) => record,
        Err(e) => {
            warn!("Login failed for {}", credentials.email);
            return Err(e);
        }
    };
    info!("User {} signed in", record.email);

    start_session(&state, &headers, &record.email).await
}

/// GET /logout
///
/// Ends the session named by the cookie, if any, and redirects home.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = session_token(&headers, &state.config.session_cookie) {
        state.sessions.end(&token).await;
        info!("Session ended");
    }

    let cleared = session_cookie(&state.config.session_cookie, "", Some(0))?;
    Ok(([(header::SET_COOKIE, cleared)], Redirect::to(HOME)))
}

/// GET /check_session
pub async fn handle_check_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionStatus> {
    let session = match session_token(&headers, &state.config.session_cookie) {
        Some(token) => state.sessions.get(&token).await,
        None => None,
    };

    Json(SessionStatus {
        is_logged_in: session.is_some(),
        email: session.map(|s| s.email),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Cookie helpers
// ────────────────────────────────────────────────────────────────────────────

/// Retires any session the client already holds, then begins a fresh one.
async fn start_session(
    state: &AppState,
    headers: &HeaderMap,
    email: &str,
) -> Result<impl IntoResponse, AppError> {
    if let Some(previous) = session_token(headers, &state.config.session_cookie) {
        state.sessions.end(&previous).await;
    }

    let token = state.sessions.begin(email).await;
    let cookie = session_cookie(
        &state.config.session_cookie,
        &token.to_string(),
        Some(state.config.session_ttl_secs),
    )?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AuthSuccess {
            success: true,
            redirect: HOME,
        }),
    ))
}

/// An unreadable form body is reported in the same shape as a field error.
fn form_rejected(rejection: FormRejection) -> AppError {
    warn!("Form rejected: {}", rejection.body_text());
    AppError::field(FORM_FIELD, FORM_UNREADABLE)
}

fn session_cookie(
    name: &str,
    value: &str,
    max_age: Option<u32>,
) -> Result<HeaderValue, AppError> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax");
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(e.into()))
}

fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<SessionToken> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| value.parse().ok())
}
