//! Application store inspected by the store panel. Every change is broadcast as a snapshot.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
struct StoreState {
    first_name: String,
    last_name: String,
}

/// Store state plus the derived full name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Clone)]
pub struct DevStore {
    state: Arc<RwLock<StoreState>>,
    events: broadcast::Sender<StoreSnapshot>,
}

impl Default for DevStore {
    fn default() -> Self {
        DevStore::new("Jane", "Smith")
    }
}

impl DevStore {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        DevStore {
            state: Arc::new(RwLock::new(StoreState {
                first_name: first_name.into(),
                last_name: last_name.into(),
            })),
            events,
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        StoreSnapshot {
            full_name: format!("{} {}", state.first_name, state.last_name),
            first_name: state.first_name,
            last_name: state.last_name,
        }
    }

    /// Apply `patch` and notify subscribers. Unchanged state emits nothing.
    pub fn update(&self, patch: StorePatch) -> StoreSnapshot {
        let changed = {
            let mut state = match self.state.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let before = state.clone();
            if let Some(first) = patch.first_name {
                state.first_name = first;
            }
            if let Some(last) = patch.last_name {
                state.last_name = last;
            }
            *state != before
        };
        let snapshot = self.snapshot();
        if changed {
            // No subscribers is fine.
            let _ = self.events.send(snapshot.clone());
            tracing::debug!(full_name = %snapshot.full_name, "store state changed");
        }
        snapshot
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreSnapshot> {
        self.events.subscribe()
    }
}
