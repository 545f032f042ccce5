//! Mail transport adapters.
//!
//! `HttpMailer` posts each message as JSON to a transactional-mail HTTP API.
//! `LogMailer` is the local-dev fallback used when no API is configured: it
//! logs the message (including the code) and reports success.

use anyhow::Context as _;
use serde::Serialize;
use tracing::info;

use crate::domain::repository::Mailer;
use crate::domain::types::MailMessage;
use crate::error::AuthServiceError;

#[derive(Serialize)]
struct MailApiRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            from,
        }
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthServiceError> {
        let body = MailApiRequest {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request
            .send()
            .await
            .context("mail api request")
            .and_then(|resp| resp.error_for_status().context("mail api response"))
            .map_err(AuthServiceError::DeliveryFailed)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthServiceError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            html = %message.html,
            "mail delivery stub"
        );
        Ok(())
    }
}

/// Mail transport selected at startup.
#[derive(Clone)]
pub enum MailerBackend {
    Http(HttpMailer),
    Log(LogMailer),
}

impl MailerBackend {
    pub fn from_settings(api_url: Option<&str>, api_key: Option<&str>, from: &str) -> Self {
        match api_url.filter(|u| !u.trim().is_empty()) {
            Some(url) => Self::Http(HttpMailer::new(
                url.to_owned(),
                api_key.map(str::to_owned),
                from.to_owned(),
            )),
            None => Self::Log(LogMailer),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Log(_) => "log",
        }
    }
}

impl Mailer for MailerBackend {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthServiceError> {
        match self {
            Self::Http(mailer) => mailer.send(message).await,
            Self::Log(mailer) => mailer.send(message).await,
        }
    }
}
