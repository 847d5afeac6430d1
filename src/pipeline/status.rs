use serde::{Deserialize, Serialize};

/// Priority family a raw status belongs to. Lower rank wins under deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Completed,
    Scheduled,
    Pending,
    Unrecognized,
}

impl StatusTier {
    pub const fn rank(self) -> u8 {
        match self {
            Self::Completed => 1,
            Self::Scheduled => 2,
            Self::Pending => 3,
            Self::Unrecognized => 99,
        }
    }

    /// Reached the scheduling step or beyond.
    pub const fn is_scheduled_or_later(self) -> bool {
        matches!(self, Self::Completed | Self::Scheduled)
    }
}

/// Status strings per tier; matched case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusVocabulary {
    pub completed: Vec<String>,
    pub scheduled: Vec<String>,
    pub pending: Vec<String>,
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self {
            completed: strings(&["COMPLETED", "Feedback Provided", "Pending Feedback", "No Show"]),
            scheduled: strings(&["SCHEDULED"]),
            pending: strings(&["PENDING", "INVITED", "EMAIL SENT"]),
        }
    }
}

/// Maps raw status strings onto [`StatusTier`]s using a configured vocabulary.
#[derive(Debug, Clone)]
pub struct StatusRanker {
    completed: Vec<String>,
    scheduled: Vec<String>,
    pending: Vec<String>,
}

impl StatusRanker {
    pub fn new(vocabulary: &StatusVocabulary) -> Self {
        Self {
            completed: folded(&vocabulary.completed),
            scheduled: folded(&vocabulary.scheduled),
            pending: folded(&vocabulary.pending),
        }
    }

    pub fn tier(&self, status: Option<&str>) -> StatusTier {
        let Some(status) = status.map(fold).filter(|value| !value.is_empty()) else {
            return StatusTier::Unrecognized;
        };

        if self.completed.contains(&status) {
            StatusTier::Completed
        } else if self.scheduled.contains(&status) {
            StatusTier::Scheduled
        } else if self.pending.contains(&status) {
            StatusTier::Pending
        } else {
            StatusTier::Unrecognized
        }
    }

    pub fn rank(&self, status: Option<&str>) -> u8 {
        self.tier(status).rank()
    }
}

impl Default for StatusRanker {
    fn default() -> Self {
        Self::new(&StatusVocabulary::default())
    }
}

pub(crate) fn fold(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn folded(values: &[String]) -> Vec<String> {
    values.iter().map(|value| fold(value)).collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
