use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use portfolio_auth_types::cookie::SESSION_TOKEN_EXP;
use portfolio_auth_types::token::{ADMIN_ROLE, SessionClaims};

use crate::error::AuthServiceError;

#[derive(Debug)]
pub struct AdminSessionToken {
    pub token: String,
    /// Seconds since UNIX epoch.
    pub expires_at: u64,
}

/// Sign an admin session JWT for `email`, valid for `SESSION_TOKEN_EXP` seconds
/// from `now`. Only call after a successful code verification.
pub fn issue_session_token(
    email: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<AdminSessionToken, AuthServiceError> {
    let issued_at = u64::try_from(now.timestamp()).map_err(|e| {
        AuthServiceError::Internal(anyhow::Error::new(e).context("clock before UNIX epoch"))
    })?;
    let exp = issued_at + SESSION_TOKEN_EXP;
    let claims = SessionClaims {
        sub: email.to_owned(),
        role: ADMIN_ROLE.to_owned(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok(AdminSessionToken {
        token,
        expires_at: exp,
    })
}
