use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::RngExt;
use tracing::{info, warn};

use crate::domain::repository::{Clock, CodeStore, Mailer};
use crate::domain::types::{CODE_MAX, CODE_MIN, CODE_TTL_SECS, MailMessage, VerificationRecord};
use crate::error::AuthServiceError;
use crate::infra::locks::IdentityLocks;

pub const CODE_EMAIL_SUBJECT: &str = "Admin Panel Login Verification Code";

/// Uniform draw over `CODE_MIN..=CODE_MAX`, so always six digits.
pub fn generate_code() -> String {
    rand::rng().random_range(CODE_MIN..=CODE_MAX).to_string()
}

pub fn code_email(to: &str, code: &str) -> MailMessage {
    let minutes = CODE_TTL_SECS / 60;
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333;">Admin Panel Login Verification</h2>
  <p style="color: #666; font-size: 16px;">Your verification code is:</p>
  <div style="background-color: #f5f5f5; padding: 20px; border-radius: 5px; text-align: center; margin: 20px 0;">
    <h1 style="color: #333; letter-spacing: 5px; font-size: 32px;">{code}</h1>
  </div>
  <p style="color: #666; font-size: 14px;">This code will expire in {minutes} minutes.</p>
  <p style="color: #666; font-size: 14px;">If you didn't request this code, please ignore this email.</p>
</div>"#
    );
    MailMessage {
        to: to.to_owned(),
        subject: CODE_EMAIL_SUBJECT.to_owned(),
        html,
    }
}

pub struct RequestCodeInput {
    pub email: String,
}

#[derive(Debug)]
pub struct RequestCodeOutput {
    pub expires_at: DateTime<Utc>,
}

pub struct RequestCodeUseCase<S, M, C>
where
    S: CodeStore,
    M: Mailer,
    C: Clock,
{
    pub codes: S,
    pub mailer: M,
    pub clock: C,
    pub locks: IdentityLocks,
    /// The only identity allowed to receive a code.
    pub admin_email: String,
    /// Upper bound on a single mail dispatch.
    pub mail_timeout: Duration,
}

impl<S, M, C> RequestCodeUseCase<S, M, C>
where
    S: CodeStore,
    M: Mailer,
    C: Clock,
{
    pub async fn execute(
        &self,
        input: RequestCodeInput,
    ) -> Result<RequestCodeOutput, AuthServiceError> {
        // 1. Allow-list of one, checked before anything is generated or stored
        if input.email != self.admin_email {
            return Err(AuthServiceError::UnauthorizedIdentity);
        }

        // 2. Generate + overwrite under the identity lock. A concurrent request
        //    for the same identity wins if it writes last.
        let record = {
            let _guard = self.locks.lock(&input.email).await;
            let record = VerificationRecord::issue(input.email, generate_code(), self.clock.now());
            self.codes.set(&record).await?;
            record
        };
        info!(
            identity = %record.identity,
            expires_at = %record.expires_at,
            "verification code issued"
        );

        // 3. Deliver. The record stays issued even if delivery fails.
        let message = code_email(&record.identity, &record.code);
        let sent = tokio::time::timeout(self.mail_timeout, self.mailer.send(&message)).await;
        let delivered = match sent {
            Ok(Ok(())) => Ok(()),
            Ok(Err(AuthServiceError::DeliveryFailed(e))) => Err(e),
            Ok(Err(other)) => Err(anyhow::Error::new(other)),
            Err(_) => Err(anyhow::anyhow!(
                "mail delivery timed out after {:?}",
                self.mail_timeout
            )),
        };
        if let Err(e) = delivered {
            warn!(identity = %record.identity, error = %e, "verification code not delivered");
            return Err(AuthServiceError::DeliveryFailed(e));
        }

        Ok(RequestCodeOutput {
            expires_at: record.expires_at,
        })
    }
}
