use tracing::{debug, info, warn};

use crate::domain::repository::{Clock, CodeStore};
use crate::error::AuthServiceError;
use crate::infra::locks::IdentityLocks;

pub struct VerifyCodeInput {
    pub email: String,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    /// Identity the consumed code was issued for.
    pub identity: String,
}

pub struct VerifyCodeUseCase<S, C>
where
    S: CodeStore,
    C: Clock,
{
    pub codes: S,
    pub clock: C,
    pub locks: IdentityLocks,
}

impl<S, C> VerifyCodeUseCase<S, C>
where
    S: CodeStore,
    C: Clock,
{
    /// Checks run in a fixed order: existence, expiry, equality.
    ///
    /// - no record → `CodeNotFound`
    /// - expired → record purged, `CodeExpired` (even if the code matches)
    /// - mismatch → record kept, `CodeMismatch` (retries are unlimited)
    /// - match → record consumed atomically; losing a race to another
    ///   consumer reports `CodeNotFound`
    pub async fn execute(
        &self,
        input: VerifyCodeInput,
    ) -> Result<VerifyCodeOutput, AuthServiceError> {
        let _guard = self.locks.lock(&input.email).await;

        let Some(record) = self.codes.get(&input.email).await? else {
            debug!(identity = %input.email, "no verification code on record");
            return Err(AuthServiceError::CodeNotFound);
        };

        if record.is_expired_at(self.clock.now()) {
            self.codes.delete(&record.identity).await?;
            info!(identity = %record.identity, "expired verification code purged");
            return Err(AuthServiceError::CodeExpired);
        }

        if record.code != input.code {
            warn!(identity = %record.identity, "verification code mismatch");
            return Err(AuthServiceError::CodeMismatch);
        }

        // Another replica may have consumed or replaced the record since the read.
        if !self.codes.consume(&record.identity, &record.code).await? {
            return match self.codes.get(&record.identity).await? {
                None => {
                    warn!(identity = %record.identity, "verification code already consumed");
                    Err(AuthServiceError::CodeNotFound)
                }
                Some(_) => {
                    warn!(identity = %record.identity, "verification code replaced during check");
                    Err(AuthServiceError::CodeMismatch)
                }
            };
        }
        info!(identity = %record.identity, "verification code consumed");

        Ok(VerifyCodeOutput {
            identity: record.identity,
        })
    }
}
