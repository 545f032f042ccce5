//! Per-identity critical sections.
//!
//! The issuer's overwrite and the verifier's lookup-check-delete must not
//! interleave for the same identity. Operations on different identities never
//! wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slots = HashMap<String, Arc<AsyncMutex<()>>>;

#[derive(Clone, Default)]
pub struct IdentityLocks {
    slots: Arc<Mutex<Slots>>,
}

impl IdentityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `identity`. Released when the guard drops.
    pub async fn lock(&self, identity: &str) -> IdentityGuard {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(identity.to_owned()).or_default())
        };
        let guard = slot.lock_owned().await;
        IdentityGuard {
            guard: Some(guard),
            slots: Arc::clone(&self.slots),
            identity: identity.to_owned(),
        }
    }

    /// Number of identities with a live slot (held or awaited).
    pub fn active(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct IdentityGuard {
    guard: Option<OwnedMutexGuard<()>>,
    slots: Arc<Mutex<Slots>>,
    identity: String,
}

impl Drop for IdentityGuard {
    fn drop(&mut self) {
        // Holding the map lock here means no other task can clone the slot
        // between the count check and the removal.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        drop(self.guard.take());
        if slots
            .get(&self.identity)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&self.identity);
        }
    }
}
