use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::{self, AsyncCommands};

use crate::domain::repository::CodeStore;
use crate::domain::types::{CODE_TTL_SECS, VerificationRecord};
use crate::error::AuthServiceError;

/// Seconds a record outlives its code in Redis, so an expired code is still
/// found and reported as expired instead of missing.
const RECORD_GRACE_SECS: u64 = 3600;

/// Key lifetime. Records are written at issue time, so the code's own TTL plus
/// the grace covers them without consulting any clock.
const RECORD_TTL_SECS: u64 = CODE_TTL_SECS.unsigned_abs() + RECORD_GRACE_SECS;

/// Deletes the record only if its `code` field equals ARGV[1]. Returns 1 when
/// deleted, 0 otherwise.
const CONSUME_SCRIPT: &str = r#"
local value = redis.call('GET', KEYS[1])
if not value then
  return 0
end
if cjson.decode(value).code == ARGV[1] then
  return redis.call('DEL', KEYS[1])
end
return 0
"#;

/// Redis-backed code store, shared between service replicas.
///
/// Single use holds across replicas because [`CodeStore::consume`] compares and
/// deletes inside one server-side script.
#[derive(Clone)]
pub struct RedisCodeStore {
    pub pool: Pool,
}

fn code_key(identity: &str) -> String {
    format!("otp_code:{identity}")
}

impl RedisCodeStore {
    pub async fn ping(&self) -> Result<(), AuthServiceError> {
        let mut conn = self.pool.get().await.context("redis pool get")?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("redis ping")?;
        Ok(())
    }
}

impl CodeStore for RedisCodeStore {
    async fn get(&self, identity: &str) -> Result<Option<VerificationRecord>, AuthServiceError> {
        let mut conn = self.pool.get().await.context("redis pool get")?;
        let value: Option<String> = conn
            .get(code_key(identity))
            .await
            .context("get verification record")?;
        value
            .map(|json| serde_json::from_str(&json).context("decode verification record"))
            .transpose()
            .map_err(AuthServiceError::Internal)
    }

    async fn set(&self, record: &VerificationRecord) -> Result<(), AuthServiceError> {
        let json = serde_json::to_string(record).context("encode verification record")?;
        let mut conn = self.pool.get().await.context("redis pool get")?;
        let (): () = conn
            .set_ex(code_key(&record.identity), json, RECORD_TTL_SECS)
            .await
            .context("set verification record")?;
        Ok(())
    }

    async fn delete(&self, identity: &str) -> Result<(), AuthServiceError> {
        let mut conn = self.pool.get().await.context("redis pool get")?;
        let _: i64 = conn
            .del(code_key(identity))
            .await
            .context("delete verification record")?;
        Ok(())
    }

    async fn consume(&self, identity: &str, code: &str) -> Result<bool, AuthServiceError> {
        let mut conn = self.pool.get().await.context("redis pool get")?;
        let deleted: i64 = redis::cmd("EVAL")
            .arg(CONSUME_SCRIPT)
            .arg(1)
            .arg(code_key(identity))
            .arg(code)
            .query_async(&mut conn)
            .await
            .context("consume verification record")?;
        Ok(deleted == 1)
    }
}
