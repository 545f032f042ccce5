#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use crate::domain::types::{MailMessage, VerificationRecord};
use crate::error::AuthServiceError;

/// Keyed storage for verification records (identity → at most one record).
///
/// Each call is atomic on its own. The caller's per-identity lock only covers
/// one process, so single use across replicas rests on [`CodeStore::consume`].
pub trait CodeStore: Send + Sync {
    async fn get(&self, identity: &str) -> Result<Option<VerificationRecord>, AuthServiceError>;

    /// Insert the record, replacing any previous record for the same identity.
    async fn set(&self, record: &VerificationRecord) -> Result<(), AuthServiceError>;

    /// Remove the record for `identity`. Removing a missing record is not an error.
    async fn delete(&self, identity: &str) -> Result<(), AuthServiceError>;

    /// Remove the record for `identity` only if it still holds `code`, as one
    /// atomic step. Returns `false` when the record is gone or holds another code.
    async fn consume(&self, identity: &str, code: &str) -> Result<bool, AuthServiceError>;
}

/// Port to the email transport.
pub trait Mailer: Send + Sync {
    /// Deliver a message. Transport failures are reported as
    /// [`AuthServiceError::DeliveryFailed`].
    async fn send(&self, message: &MailMessage) -> Result<(), AuthServiceError>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
