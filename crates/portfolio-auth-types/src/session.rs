//! `AdminSession` extractor.

use std::fmt;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::extract::cookie::CookieJar;
use http::header::AUTHORIZATION;
use http::request::Parts;
use http::{HeaderMap, StatusCode};

use crate::cookie::ADMIN_SESSION_COOKIE;
use crate::token::validate_session_token;

/// HMAC secret used to sign and validate session tokens.
///
/// Pulled out of the service state via [`FromRef`].
#[derive(Clone)]
pub struct SessionSecret(Arc<str>);

impl SessionSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(***)")
    }
}

/// A validated admin session.
///
/// The token is read from the `portfolio_admin_session` cookie, falling back to
/// `Authorization: Bearer <token>`. Returns 401 when neither is present or the
/// token does not validate.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub email: String,
    pub expires_at: u64,
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(ADMIN_SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_owned());
        }
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    SessionSecret: FromRef<S>,
{
    type Rejection = StatusCode;

    // Values are pulled out synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = SessionSecret::from_ref(state);
        let token = session_token(&parts.headers);

        async move {
            let token = token.ok_or(StatusCode::UNAUTHORIZED)?;
            let info = validate_session_token(&token, secret.expose()).map_err(|e| {
                tracing::debug!(error = %e, "rejected admin session");
                StatusCode::UNAUTHORIZED
            })?;
            Ok(Self {
                email: info.email,
                expires_at: info.expires_at,
            })
        }
    }
}
