use chrono::{DateTime, Utc};
use log::info;

use crate::models::{FoodPoll, PollStatus};
use crate::store::{KvStore, PollStore};
use crate::voting::compute_winner;

// Shared commit path for the deadline recheck and the manual approve
// action. Returns None when the menu is empty and there is nothing to pick.
fn commit_winner(poll: &mut FoodPoll) -> Option<String> {
    let winner = compute_winner(poll)?.to_string();
    poll.approved_option_id = Some(winner.clone());
    Some(winner)
}

/// One pass of the deadline check the host timer drives. Reloads the poll
/// and, if it has expired without an approval, commits the current winner
/// and saves. Returns the approved option id when a transition happened.
///
/// An expired poll with an empty menu has no winner to commit and stays
/// unapproved.
pub fn recheck_poll<S: KvStore>(
    store: &PollStore<S>,
    group_id: &str,
    item_id: &str,
    now: DateTime<Utc>,
) -> Option<String> {
    let mut poll = store.load(group_id, item_id);
    if poll.status(now) != PollStatus::ExpiredUnapproved {
        return None;
    }

    let winner = commit_winner(&mut poll)?;
    store.save(group_id, item_id, &poll);
    info!(
        "Poll {}/{} expired, approved option {}",
        group_id, item_id, winner
    );
    Some(winner)
}

/// Manual approval, available any time before the poll is approved. Commits
/// whichever option currently leads, deadline or no deadline. Returns the
/// approved option id when a transition happened.
pub fn approve_poll<S: KvStore>(
    store: &PollStore<S>,
    group_id: &str,
    item_id: &str,
    now: DateTime<Utc>,
) -> Option<String> {
    let mut poll = store.load(group_id, item_id);
    if poll.status(now) == PollStatus::Approved {
        return None;
    }

    let winner = commit_winner(&mut poll)?;
    store.save(group_id, item_id, &poll);
    info!(
        "Poll {}/{} manually approved, option {}",
        group_id, item_id, winner
    );
    Some(winner)
}
