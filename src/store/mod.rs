mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use chrono::Utc;
use log::{error, info, warn};
use thiserror::Error;

use crate::models::FoodPoll;

/// Namespace literal every persisted key starts with; the `v1` token is the
/// only schema marker the records carry.
pub const KEY_NAMESPACE: &str = "foodpoll.v1";

/// Failure reported by a key-value backend. The poll store swallows these;
/// they exist so backends have something honest to return.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Local key-value storage seam. Injected into [`PollStore`] so the core
/// runs against whatever the host device provides and tests run against
/// [`MemoryStore`].
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Storage key for one poll.
pub fn storage_key(group_id: &str, item_id: &str) -> String {
    format!("{}:{}:{}", KEY_NAMESPACE, group_id, item_id)
}

/// Durable mapping from `(group_id, item_id)` to a poll record. Records are
/// written whole on every change; concurrent writers are last-write-wins
/// with no coordination.
pub struct PollStore<S> {
    backend: S,
}

impl<S: KvStore> PollStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    // Direct access to the backing store.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Loads the poll for `(group_id, item_id)`, creating and persisting the
    /// built-in default on first sight. A record that fails to parse is
    /// discarded and replaced the same way. A failing backend is served an
    /// in-memory default without persisting anything. Never errors out to
    /// the caller.
    pub fn load(&self, group_id: &str, item_id: &str) -> FoodPoll {
        let key = storage_key(group_id, item_id);

        let raw = match self.backend.get(&key) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Poll read failed at {}: {}; serving an unsaved default", key, e);
                return FoodPoll::new(Utc::now());
            }
        };

        match raw {
            None => {
                info!("No poll at {}, seeding the default", key);
                let poll = FoodPoll::new(Utc::now());
                self.save(group_id, item_id, &poll);
                poll
            }
            Some(raw) => match serde_json::from_str::<FoodPoll>(&raw) {
                Ok(poll) => poll,
                Err(e) => {
                    warn!("Discarding corrupted poll at {}: {}", key, e);
                    let poll = FoodPoll::new(Utc::now());
                    self.save(group_id, item_id, &poll);
                    poll
                }
            },
        }
    }

    /// Serializes and writes the whole record, replacing any prior value.
    /// Backend failures are logged and swallowed.
    pub fn save(&self, group_id: &str, item_id: &str, poll: &FoodPoll) {
        let key = storage_key(group_id, item_id);
        let raw = match serde_json::to_string(poll) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Poll at {} did not serialize: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.backend.set(&key, &raw) {
            error!("Poll write failed at {}: {}", key, e);
        }
    }
}
