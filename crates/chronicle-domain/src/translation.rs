//! Translations and community voting

use crate::item::ItemId;
use serde::{Deserialize, Serialize};

/// Who wrote a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorType {
    /// A person
    Human,
    /// The enrichment pipeline
    Ai,
}

impl AuthorType {
    /// Get the author type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorType::Human => "human",
            AuthorType::Ai => "ai",
        }
    }

    /// Parse an author type
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(AuthorType::Human),
            "ai" => Some(AuthorType::Ai),
            _ => None,
        }
    }
}

/// Review state of a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    /// Awaiting review; machine translations start here
    Draft,
    /// Reviewed and visible
    Published,
}

impl TranslationStatus {
    /// Get the status as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationStatus::Draft => "draft",
            TranslationStatus::Published => "published",
        }
    }

    /// Parse a status
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(TranslationStatus::Draft),
            "published" => Some(TranslationStatus::Published),
            _ => None,
        }
    }
}

/// A translation of an item's text into another language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    /// Store-assigned identifier
    pub id: i64,
    /// Item being translated
    pub item_id: ItemId,
    /// Target language code
    pub language_code: String,
    /// Author name
    pub author: String,
    /// Human or machine
    pub author_type: AuthorType,
    /// Translated text
    pub content: String,
    /// Review state
    pub status: TranslationStatus,
    /// Up votes
    pub upvotes: u32,
    /// Down votes
    pub downvotes: u32,
    /// Unix seconds
    pub created_at: u64,
}

impl Translation {
    /// Net score (up minus down)
    pub fn score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }
}

/// A translation that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewTranslation {
    /// Item being translated
    pub item_id: ItemId,
    /// Target language code
    pub language_code: String,
    /// Author name
    pub author: String,
    /// Human or machine
    pub author_type: AuthorType,
    /// Translated text
    pub content: String,
    /// Review state
    pub status: TranslationStatus,
    /// Unix seconds
    pub created_at: u64,
}

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    /// Agree with the translation
    Up,
    /// Disagree with the translation
    Down,
}

impl VoteType {
    /// Get the vote as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Up => "up",
            VoteType::Down => "down",
        }
    }

    /// Parse a vote
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(VoteType::Up),
            "down" => Some(VoteType::Down),
            _ => None,
        }
    }
}

impl std::str::FromStr for VoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid vote type '{}'. Must be \"up\" or \"down\".", s))
    }
}

/// What happened to the voter's stored vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote from this voter
    Recorded,
    /// Same vote cast again; the vote was withdrawn
    Removed,
    /// Vote switched direction
    Changed,
}

/// Counter adjustments produced by a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteChange {
    /// Change to the up counter
    pub up_delta: i32,
    /// Change to the down counter
    pub down_delta: i32,
    /// Effect on the voter's stored vote
    pub outcome: VoteOutcome,
}

impl VoteChange {
    /// Apply to the current counters; counters never drop below zero
    pub fn apply(&self, upvotes: u32, downvotes: u32) -> (u32, u32) {
        (
            upvotes.saturating_add_signed(self.up_delta),
            downvotes.saturating_add_signed(self.down_delta),
        )
    }
}

/// Work out the counter changes for a voter casting `vote`
///
/// Casting the same vote twice toggles it off; casting the opposite vote moves
/// the voter from one side to the other.
///
/// # Examples
///
/// ```
/// use chronicle_domain::translation::{tally_vote, VoteOutcome, VoteType};
///
/// let change = tally_vote(Some(VoteType::Up), VoteType::Down);
/// assert_eq!(change.outcome, VoteOutcome::Changed);
/// assert_eq!(change.apply(3, 0), (2, 1));
/// ```
pub fn tally_vote(previous: Option<VoteType>, vote: VoteType) -> VoteChange {
    let delta = |v: VoteType, amount: i32| match v {
        VoteType::Up => (amount, 0),
        VoteType::Down => (0, amount),
    };

    let (up_delta, down_delta, outcome) = match previous {
        None => {
            let (up, down) = delta(vote, 1);
            (up, down, VoteOutcome::Recorded)
        }
        Some(prev) if prev == vote => {
            let (up, down) = delta(vote, -1);
            (up, down, VoteOutcome::Removed)
        }
        Some(prev) => {
            let (up_off, down_off) = delta(prev, -1);
            let (up_on, down_on) = delta(vote, 1);
            (up_off + up_on, down_off + down_on, VoteOutcome::Changed)
        }
    };

    VoteChange {
        up_delta,
        down_delta,
        outcome,
    }
}

/// Order translations for display: most upvoted first, then newest
pub fn sort_for_display(translations: &mut [Translation]) {
    translations.sort_by(|a, b| {
        b.upvotes
            .cmp(&a.upvotes)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
