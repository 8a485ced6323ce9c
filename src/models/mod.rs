use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a freshly created poll stays open.
pub const DEFAULT_POLL_DURATION_MINUTES: i64 = 30;

/// Menu a brand-new poll is seeded with.
pub const DEFAULT_OPTION_LABELS: [&str; 3] = ["Pizza", "Sushi", "Burgers"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    #[default]
    Lunch,
    Dinner,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodOption {
    pub id: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

/// Poll record persisted whole per (group, item) key.
///
/// Every field carries its own deserialization default so records written by
/// older widget builds keep loading; a field of the wrong type still fails
/// the parse and is handled by the store's recovery path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPoll {
    #[serde(default)]
    pub meal_type: MealType,
    #[serde(default = "default_closes_at")]
    pub closes_at: DateTime<Utc>,
    #[serde(default)]
    pub options: Vec<FoodOption>,
    /// One vote per user, keyed by user id; last write wins.
    #[serde(default)]
    pub votes: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_option_id: Option<String>,
}

/// Poll state derived from `approved_option_id` and the deadline, never
/// stored. Recomputed against the caller's clock on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Open,
    ExpiredUnapproved,
    Approved,
}

fn default_closes_at() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(DEFAULT_POLL_DURATION_MINUTES)
}

impl FoodOption {
    pub fn new(label: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            created_at: now,
        }
    }
}

impl FoodPoll {
    /// The built-in default poll: lunch, the sample menu, deadline thirty
    /// minutes out.
    pub fn new(now: DateTime<Utc>) -> Self {
        let options = DEFAULT_OPTION_LABELS
            .iter()
            .map(|label| FoodOption::new(*label, now))
            .collect();

        Self {
            meal_type: MealType::Lunch,
            closes_at: now + Duration::minutes(DEFAULT_POLL_DURATION_MINUTES),
            options,
            votes: HashMap::new(),
            approved_option_id: None,
        }
    }

    pub fn status(&self, now: DateTime<Utc>) -> PollStatus {
        if self.approved_option_id.is_some() {
            PollStatus::Approved
        } else if now >= self.closes_at {
            PollStatus::ExpiredUnapproved
        } else {
            PollStatus::Open
        }
    }

    /// True once the poll is approved or past its deadline. Every mutation
    /// below checks this and becomes a no-op when it holds.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.status(now) != PollStatus::Open
    }

    pub fn option(&self, option_id: &str) -> Option<&FoodOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    /// Records `user_id`'s vote, replacing any earlier one. Rejected when
    /// the poll is locked or the option does not exist.
    pub fn cast_vote(&mut self, user_id: &str, option_id: &str, now: DateTime<Utc>) -> bool {
        if self.is_locked(now) || self.option(option_id).is_none() {
            return false;
        }
        self.votes.insert(user_id.to_string(), option_id.to_string());
        true
    }

    /// Appends a new option and returns its id. Rejected when the poll is
    /// locked or the trimmed label is empty.
    pub fn add_option(&mut self, label: &str, now: DateTime<Utc>) -> Option<String> {
        if self.is_locked(now) {
            return None;
        }
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let option = FoodOption::new(label, now);
        let id = option.id.clone();
        self.options.push(option);
        Some(id)
    }

    /// Removes an option together with every vote pointing at it.
    pub fn remove_option(&mut self, option_id: &str, now: DateTime<Utc>) -> bool {
        if self.is_locked(now) {
            return false;
        }
        let before = self.options.len();
        self.options.retain(|option| option.id != option_id);
        if self.options.len() == before {
            return false;
        }
        self.votes.retain(|_, choice| choice != option_id);
        true
    }

    pub fn set_meal_type(&mut self, meal_type: MealType, now: DateTime<Utc>) -> bool {
        if self.is_locked(now) {
            return false;
        }
        self.meal_type = meal_type;
        true
    }

    pub fn set_closes_at(&mut self, closes_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.is_locked(now) {
            return false;
        }
        self.closes_at = closes_at;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_poll_shape() {
        let now = Utc::now();
        let poll = FoodPoll::new(now);

        assert_eq!(poll.meal_type, MealType::Lunch);
        assert_eq!(poll.options.len(), DEFAULT_OPTION_LABELS.len());
        assert!(poll.votes.is_empty());
        assert_eq!(poll.approved_option_id, None);
        assert_eq!(
            poll.closes_at,
            now + Duration::minutes(DEFAULT_POLL_DURATION_MINUTES)
        );

        let labels: Vec<&str> = poll.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, DEFAULT_OPTION_LABELS);
    }

    #[test]
    fn status_follows_deadline_and_approval() {
        let now = Utc::now();
        let mut poll = FoodPoll::new(now);

        assert_eq!(poll.status(now), PollStatus::Open);
        assert!(!poll.is_locked(now));

        // The deadline itself already counts as expired.
        assert_eq!(poll.status(poll.closes_at), PollStatus::ExpiredUnapproved);
        let later = poll.closes_at + Duration::seconds(1);
        assert_eq!(poll.status(later), PollStatus::ExpiredUnapproved);
        assert!(poll.is_locked(later));

        poll.approved_option_id = Some(poll.options[0].id.clone());
        assert_eq!(poll.status(now), PollStatus::Approved);
        assert!(poll.is_locked(now));
    }

    #[test]
    fn cast_vote_last_write_wins() {
        let now = Utc::now();
        let mut poll = FoodPoll::new(now);
        let first = poll.options[0].id.clone();
        let second = poll.options[1].id.clone();

        assert!(poll.cast_vote("ana", &first, now));
        assert!(poll.cast_vote("ana", &second, now));

        assert_eq!(poll.votes.get("ana"), Some(&second));
        assert_eq!(poll.votes.len(), 1);
    }

    #[test]
    fn cast_vote_rejects_unknown_option() {
        let now = Utc::now();
        let mut poll = FoodPoll::new(now);

        assert!(!poll.cast_vote("ana", "no-such-option", now));
        assert!(poll.votes.is_empty());
    }

    #[test]
    fn locked_poll_rejects_every_mutation() {
        let now = Utc::now();
        let mut poll = FoodPoll::new(now);
        let target = poll.options[0].id.clone();
        let expired = poll.closes_at + Duration::seconds(1);

        assert!(!poll.cast_vote("ana", &target, expired));
        assert!(poll.add_option("Tacos", expired).is_none());
        assert!(!poll.remove_option(&target, expired));
        assert!(!poll.set_meal_type(MealType::Dinner, expired));
        assert!(!poll.set_closes_at(expired + Duration::hours(1), expired));

        // Approval locks even before the deadline.
        poll.approved_option_id = Some(target.clone());
        assert!(!poll.cast_vote("ana", &target, now));
        assert!(poll.add_option("Tacos", now).is_none());
        assert!(!poll.remove_option(&target, now));
        assert_eq!(poll.meal_type, MealType::Lunch);
    }

    #[test]
    fn remove_option_purges_its_votes() {
        let now = Utc::now();
        let mut poll = FoodPoll::new(now);
        let doomed = poll.options[0].id.clone();
        let kept = poll.options[1].id.clone();

        poll.cast_vote("ana", &doomed, now);
        poll.cast_vote("ben", &doomed, now);
        poll.cast_vote("cyd", &kept, now);

        assert!(poll.remove_option(&doomed, now));
        assert!(poll.option(&doomed).is_none());
        assert!(poll.votes.values().all(|choice| *choice != doomed));
        assert_eq!(poll.votes.get("cyd"), Some(&kept));
    }

    #[test]
    fn add_option_trims_and_rejects_empty_labels() {
        let now = Utc::now();
        let mut poll = FoodPoll::new(now);

        assert!(poll.add_option("   ", now).is_none());
        assert!(poll.add_option("", now).is_none());

        let id = poll.add_option("  Ramen  ", now).expect("label accepted");
        let added = poll.option(&id).expect("option present");
        assert_eq!(added.label, "Ramen");
        assert_eq!(added.created_at, now);
    }

    #[test]
    fn wire_format_uses_camel_case_and_omits_unset_approval() {
        let now = Utc::now();
        let mut poll = FoodPoll::new(now);

        let json = serde_json::to_string(&poll).expect("serializes");
        assert!(json.contains("\"mealType\":\"lunch\""));
        assert!(json.contains("\"closesAt\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("approvedOptionId"));

        poll.approved_option_id = Some(poll.options[0].id.clone());
        let json = serde_json::to_string(&poll).expect("serializes");
        assert!(json.contains("\"approvedOptionId\""));
    }

    #[test]
    fn missing_fields_backfill_defaults() {
        let before = Utc::now();
        let poll: FoodPoll = serde_json::from_str("{}").expect("empty object loads");
        let after = Utc::now();

        assert_eq!(poll.meal_type, MealType::Lunch);
        assert!(poll.options.is_empty());
        assert!(poll.votes.is_empty());
        assert_eq!(poll.approved_option_id, None);

        let window = Duration::minutes(DEFAULT_POLL_DURATION_MINUTES);
        assert!(poll.closes_at >= before + window);
        assert!(poll.closes_at <= after + window);
    }

    #[test]
    fn incompatible_field_types_fail_the_parse() {
        assert!(serde_json::from_str::<FoodPoll>(r#"{"options": 5}"#).is_err());
        assert!(serde_json::from_str::<FoodPoll>(r#"{"closesAt": 17}"#).is_err());
        assert!(serde_json::from_str::<FoodPoll>(r#"{"votes": []}"#).is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let poll: FoodPoll =
            serde_json::from_str(r#"{"mealType":"dinner","legacyFlag":true}"#).expect("loads");
        assert_eq!(poll.meal_type, MealType::Dinner);
    }
}
