use crate::models::FoodPoll;

// Per-option result row, in menu order, for rendering a results view.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteCount {
    pub option_id: String,
    pub label: String,
    pub votes: usize,
}

/// Number of ballots currently pointing at `option_id`.
pub fn count_votes(poll: &FoodPoll, option_id: &str) -> usize {
    poll.votes
        .values()
        .filter(|choice| choice.as_str() == option_id)
        .count()
}

/// Plurality winner: the option with the strictly highest ballot count,
/// scanning the menu in stored order so ties keep the earliest-listed
/// option. `None` only when the poll has no options at all.
pub fn compute_winner(poll: &FoodPoll) -> Option<&str> {
    let mut winner: Option<(&str, usize)> = None;
    for option in &poll.options {
        let count = count_votes(poll, &option.id);
        match winner {
            Some((_, best)) if count <= best => {}
            _ => winner = Some((option.id.as_str(), count)),
        }
    }
    winner.map(|(id, _)| id)
}

/// Ballot counts for every option, in menu order.
pub fn tally(poll: &FoodPoll) -> Vec<VoteCount> {
    poll.options
        .iter()
        .map(|option| VoteCount {
            option_id: option.id.clone(),
            label: option.label.clone(),
            votes: count_votes(poll, &option.id),
        })
        .collect()
}

/// Distinct users who have a recorded vote.
pub fn voter_count(poll: &FoodPoll) -> usize {
    poll.votes.len()
}
