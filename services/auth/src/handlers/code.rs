use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use portfolio_auth_types::cookie::set_session_cookie;

use crate::domain::repository::Clock;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::code::{RequestCodeInput, RequestCodeUseCase};
use crate::usecase::session::issue_session_token;
use crate::usecase::verify::{VerifyCodeInput, VerifyCodeUseCase};

// Missing fields deserialize as "". A body that is not usable JSON (wrong
// content type, bad syntax, wrong field types) is read as an empty request.
// Either way the request fails through the normal checks and gets the JSON
// error envelope.

fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable request body, treating as empty");
            T::default()
        }
    }
}

/// Accept the code as a JSON string or a bare number.
fn code_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(u64),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(code) => code,
        Code::Number(code) => code.to_string(),
    })
}

// ── POST /api/send-code ───────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SendCodeRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct SendCodeResponse {
    pub success: bool,
    pub message: &'static str,
}

pub async fn send_code(
    State(state): State<AppState>,
    body: Result<Json<SendCodeRequest>, JsonRejection>,
) -> Result<Json<SendCodeResponse>, AuthServiceError> {
    let body = body_or_default(body);
    let usecase = RequestCodeUseCase {
        codes: state.code_store(),
        mailer: state.mailer(),
        clock: state.clock(),
        locks: state.locks.clone(),
        admin_email: state.admin_email.clone(),
        mail_timeout: state.mail_timeout,
    };
    usecase.execute(RequestCodeInput { email: body.email }).await?;
    Ok(Json(SendCodeResponse {
        success: true,
        message: "Verification code sent",
    }))
}

// ── POST /api/verify-code ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "code_string")]
    pub code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub message: &'static str,
    /// Admin session JWT, also set as the session cookie.
    pub token: String,
    pub expires_at: u64,
}

pub async fn verify_code(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<VerifyCodeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let body = body_or_default(body);
    let usecase = VerifyCodeUseCase {
        codes: state.code_store(),
        clock: state.clock(),
        locks: state.locks.clone(),
    };
    let out = usecase
        .execute(VerifyCodeInput {
            email: body.email,
            code: body.code,
        })
        .await?;

    let session = issue_session_token(
        &out.identity,
        state.session_secret.expose(),
        state.clock().now(),
    )?;
    let jar = set_session_cookie(jar, session.token.clone(), state.cookie_domain.clone());

    Ok((
        StatusCode::OK,
        jar,
        Json(VerifyCodeResponse {
            success: true,
            message: "Code verified successfully",
            token: session.token,
            expires_at: session.expires_at,
        }),
    ))
}
