use serde::Deserialize;

use portfolio_core::config::Config;

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// The single administrator email allowed to request a code. Env var: `ADMIN_EMAIL`.
    pub admin_email: String,
    /// HMAC secret for signing admin session tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port to listen on (default 5000). Env var: `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Session cookie domain attribute (default "localhost").
    #[serde(default = "default_cookie_domain")]
    pub cookie_domain: String,
    /// Comma separated browser origins allowed by CORS.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Redis URL for a shared code store. In-memory store when unset.
    pub redis_url: Option<String>,
    /// Transactional-mail HTTP endpoint. Codes are only logged when unset.
    pub mail_api_url: Option<String>,
    /// Bearer key for `mail_api_url`.
    pub mail_api_key: Option<String>,
    /// Sender address for verification emails.
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    /// Upper bound on one mail dispatch, in seconds (default 10).
    #[serde(default = "default_mail_timeout_secs")]
    pub mail_timeout_secs: u64,
}

impl Config for AuthConfig {}

fn default_port() -> u16 {
    5000
}

fn default_cookie_domain() -> String {
    "localhost".to_owned()
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_owned()]
}

fn default_mail_from() -> String {
    "no-reply@localhost".to_owned()
}

fn default_mail_timeout_secs() -> u64 {
    10
}
