use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::repository::CodeStore;
use crate::domain::types::VerificationRecord;
use crate::error::AuthServiceError;

/// Process-local code store. Empty at start, lost on restart.
///
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryCodeStore {
    records: Arc<Mutex<HashMap<String, VerificationRecord>>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, VerificationRecord>>, AuthServiceError> {
        self.records
            .lock()
            .map_err(|_| AuthServiceError::Internal(anyhow::anyhow!("code store lock poisoned")))
    }
}

impl CodeStore for MemoryCodeStore {
    async fn get(&self, identity: &str) -> Result<Option<VerificationRecord>, AuthServiceError> {
        Ok(self.records()?.get(identity).cloned())
    }

    async fn set(&self, record: &VerificationRecord) -> Result<(), AuthServiceError> {
        self.records()?.insert(record.identity.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, identity: &str) -> Result<(), AuthServiceError> {
        self.records()?.remove(identity);
        Ok(())
    }

    async fn consume(&self, identity: &str, code: &str) -> Result<bool, AuthServiceError> {
        let mut records = self.records()?;
        if records.get(identity).is_some_and(|r| r.code == code) {
            records.remove(identity);
            return Ok(true);
        }
        Ok(false)
    }
}
