use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use portfolio_auth_types::cookie::clear_session_cookie;
use portfolio_auth_types::session::AdminSession;

use crate::error::AuthServiceError;
use crate::state::AppState;

// ── GET /api/admin/session ────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub success: bool,
    pub email: String,
    pub expires_at: u64,
}

pub async fn get_session(
    State(state): State<AppState>,
    session: Result<AdminSession, StatusCode>,
) -> Result<Json<SessionResponse>, AuthServiceError> {
    let session = session.map_err(|_| AuthServiceError::InvalidSession)?;
    // Tokens issued for a previously configured admin address no longer count.
    if session.email != state.admin_email {
        return Err(AuthServiceError::InvalidSession);
    }
    Ok(Json(SessionResponse {
        success: true,
        email: session.email,
        expires_at: session.expires_at,
    }))
}

// ── DELETE /api/admin/session ─────────────────────────────────────────────────

pub async fn delete_session(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    (StatusCode::NO_CONTENT, jar)
}
