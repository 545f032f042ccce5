use std::time::Duration;

use anyhow::Context as _;
use axum::extract::FromRef;
use axum::http::HeaderValue;

use portfolio_auth_types::session::SessionSecret;
use portfolio_core::middleware::parse_origins;

use crate::config::AuthConfig;
use crate::infra::clock::SystemClock;
use crate::infra::locks::IdentityLocks;
use crate::infra::mail::MailerBackend;
use crate::infra::store::CodeStoreBackend;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub codes: CodeStoreBackend,
    pub mailer: MailerBackend,
    pub locks: IdentityLocks,
    pub admin_email: String,
    pub mail_timeout: Duration,
    pub session_secret: SessionSecret,
    pub cookie_domain: String,
    pub cors_origins: Vec<HeaderValue>,
}

impl AppState {
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        Ok(Self {
            codes: CodeStoreBackend::from_redis_url(config.redis_url.as_deref())?,
            mailer: MailerBackend::from_settings(
                config.mail_api_url.as_deref(),
                config.mail_api_key.as_deref(),
                &config.mail_from,
            ),
            locks: IdentityLocks::new(),
            admin_email: config.admin_email.clone(),
            mail_timeout: Duration::from_secs(config.mail_timeout_secs),
            session_secret: SessionSecret::new(config.jwt_secret.as_str()),
            cookie_domain: config.cookie_domain.clone(),
            cors_origins: parse_origins(&config.cors_origins).context("invalid CORS_ORIGINS")?,
        })
    }

    pub fn code_store(&self) -> CodeStoreBackend {
        self.codes.clone()
    }

    pub fn mailer(&self) -> MailerBackend {
        self.mailer.clone()
    }

    pub fn clock(&self) -> SystemClock {
        SystemClock
    }
}

impl FromRef<AppState> for SessionSecret {
    fn from_ref(state: &AppState) -> Self {
        state.session_secret.clone()
    }
}
