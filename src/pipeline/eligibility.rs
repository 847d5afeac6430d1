use super::record::RawRecord;
use super::status::fold;
use serde::{Deserialize, Serialize};

/// Role a record plays in the adoption rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityLabel {
    /// Counted in numerator and denominator.
    Taken,
    /// Counted in the denominator only.
    EligibleNotTaken,
    /// Excluded from the rate entirely.
    Ineligible,
}

impl EligibilityLabel {
    pub const fn is_eligible(self) -> bool {
        !matches!(self, Self::Ineligible)
    }
}

/// Vocabulary behind the fixed eligibility rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub taken_flag: String,
    pub rejected_statuses: Vec<String>,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            taken_flag: "Y".to_string(),
            rejected_statuses: vec!["rejected".to_string()],
        }
    }
}

/// Labels records as taken, eligible-not-taken or ineligible.
///
/// A screened record is always taken. An unscreened record counts as a missed
/// opportunity unless it was rejected, which reads as a deliberate recruiter decision.
#[derive(Debug, Clone)]
pub struct EligibilityClassifier {
    taken_flag: String,
    rejected: Vec<String>,
}

impl EligibilityClassifier {
    pub fn new(policy: &EligibilityPolicy) -> Self {
        Self {
            taken_flag: fold(&policy.taken_flag),
            rejected: policy.rejected_statuses.iter().map(|value| fold(value)).collect(),
        }
    }

    pub fn classify(
        &self,
        record: &RawRecord,
        ai_flag_field: &str,
        app_status_field: &str,
    ) -> EligibilityLabel {
        self.classify_values(
            record.text(ai_flag_field).as_deref(),
            record.text(app_status_field).as_deref(),
        )
    }

    pub fn classify_values(
        &self,
        ai_flag: Option<&str>,
        app_status: Option<&str>,
    ) -> EligibilityLabel {
        if ai_flag.map(fold).as_deref() == Some(self.taken_flag.as_str()) {
            return EligibilityLabel::Taken;
        }

        let rejected = app_status
            .map(fold)
            .is_some_and(|status| self.rejected.contains(&status));
        if rejected {
            EligibilityLabel::Ineligible
        } else {
            EligibilityLabel::EligibleNotTaken
        }
    }
}

impl Default for EligibilityClassifier {
    fn default() -> Self {
        Self::new(&EligibilityPolicy::default())
    }
}
