//! Core of a group food-ordering poll: members of a group propose options
//! for a shared order, vote on them, and the winning option is fixed either
//! by a manual approval or automatically once the deadline passes.
//!
//! Polls persist whole in a local key-value store, keyed by group and item.
//! Everything here is synchronous; the hosting UI owns rendering and the
//! timer that drives [`tasks::recheck_poll`].
//!
//! ```
//! use chrono::Utc;
//! use food_poll::{MemoryStore, PollStore};
//!
//! let polls = PollStore::new(MemoryStore::new());
//! let mut poll = polls.load("team-7", "friday-lunch");
//!
//! let choice = poll.options[0].id.clone();
//! assert!(poll.cast_vote("ana", &choice, Utc::now()));
//! polls.save("team-7", "friday-lunch", &poll);
//!
//! assert_eq!(food_poll::voting::compute_winner(&poll), Some(choice.as_str()));
//! ```

pub mod models;
pub mod store;
pub mod tasks;
pub mod utils;
pub mod voting;

pub use models::{FoodOption, FoodPoll, MealType, PollStatus};
pub use store::{FileStore, KvStore, MemoryStore, PollStore, StoreError};
