//! Per-agent session registry and advisory locking.
//!
//! The unit of mutual exclusion is one agent's session: `process` holds
//! the agent's lock for the whole cycle, `simulate` holds it only long
//! enough to copy. Sessions for different agents share nothing mutable,
//! so cycles for different agents run fully concurrently.
//!
//! There is no process-wide singleton here: the store is owned and
//! injected by the orchestrating service, and the core never deletes an
//! entry (agent lifecycle belongs to the service).

use std::collections::HashMap;
use std::sync::Arc;

use keel_core::GovernanceSession;
use tokio::sync::{Mutex, RwLock};

/// One registry slot. `None` until the session is loaded or created under
/// the agent's lock.
#[derive(Debug, Default)]
pub struct SessionSlot {
    /// The live session, if materialized.
    pub session: Option<GovernanceSession>,
}

/// Registry of per-agent session slots.
///
/// The outer `RwLock` guards only the map shape; each slot carries its own
/// `Mutex`, which is the advisory per-agent lock.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, Arc<Mutex<SessionSlot>>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for an agent, creating an empty one on first
    /// contact.
    pub async fn slot(&self, agent_id: &str) -> Arc<Mutex<SessionSlot>> {
        // Fast path: the slot already exists.
        if let Some(slot) = self.inner.read().await.get(agent_id) {
            return Arc::clone(slot);
        }
        let mut map = self.inner.write().await;
        Arc::clone(
            map.entry(agent_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(SessionSlot::default()))),
        )
    }

    /// Number of registered agents.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Returns `true` when no agent has been seen.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
