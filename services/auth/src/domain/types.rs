use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One-time verification code issued to an identity (email address).
///
/// Created by the issuer, read and destroyed by the verifier; never mutated
/// in place. At most one record exists per identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub identity: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Build a record that expires [`CODE_TTL_SECS`] after `now`.
    pub fn issue(identity: String, code: String, now: DateTime<Utc>) -> Self {
        Self {
            identity,
            code,
            expires_at: now + Duration::seconds(CODE_TTL_SECS),
        }
    }

    /// A record is still valid at exactly `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Outgoing email handed to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Verification code time-to-live in seconds (5 minutes).
pub const CODE_TTL_SECS: i64 = 300;

/// Verification code length in ASCII digits.
pub const CODE_LEN: usize = 6;

/// Inclusive bounds of the uniform code draw.
pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;
