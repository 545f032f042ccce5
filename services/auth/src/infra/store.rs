use anyhow::Context as _;

use crate::domain::repository::CodeStore;
use crate::domain::types::VerificationRecord;
use crate::error::AuthServiceError;
use crate::infra::cache::RedisCodeStore;
use crate::infra::memory::MemoryCodeStore;

/// Code store selected at startup: Redis when `REDIS_URL` is set, otherwise
/// the in-memory map.
#[derive(Clone)]
pub enum CodeStoreBackend {
    Memory(MemoryCodeStore),
    Redis(RedisCodeStore),
}

impl CodeStoreBackend {
    pub fn from_redis_url(redis_url: Option<&str>) -> anyhow::Result<Self> {
        let Some(url) = redis_url.filter(|u| !u.trim().is_empty()) else {
            return Ok(Self::Memory(MemoryCodeStore::new()));
        };
        let pool = deadpool_redis::Config::from_url(url)
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .context("failed to create Redis pool")?;
        Ok(Self::Redis(RedisCodeStore { pool }))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Redis(_) => "redis",
        }
    }

    /// Readiness probe: the in-memory store is always reachable.
    pub async fn ping(&self) -> Result<(), AuthServiceError> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Redis(store) => store.ping().await,
        }
    }
}

impl CodeStore for CodeStoreBackend {
    async fn get(&self, identity: &str) -> Result<Option<VerificationRecord>, AuthServiceError> {
        match self {
            Self::Memory(store) => store.get(identity).await,
            Self::Redis(store) => store.get(identity).await,
        }
    }

    async fn set(&self, record: &VerificationRecord) -> Result<(), AuthServiceError> {
        match self {
            Self::Memory(store) => store.set(record).await,
            Self::Redis(store) => store.set(record).await,
        }
    }

    async fn delete(&self, identity: &str) -> Result<(), AuthServiceError> {
        match self {
            Self::Memory(store) => store.delete(identity).await,
            Self::Redis(store) => store.delete(identity).await,
        }
    }

    async fn consume(&self, identity: &str, code: &str) -> Result<bool, AuthServiceError> {
        match self {
            Self::Memory(store) => store.consume(identity, code).await,
            Self::Redis(store) => store.consume(identity, code).await,
        }
    }
}
