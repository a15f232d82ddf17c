//! Almanac fact read model.

use serde::Serialize;

/// Derived holiday/observance/school-break facts for one date.
///
/// Produced fresh per query from the rule table; never persisted or mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlmanacFact {
    /// True only when the date is an exact key of the public holiday table.
    pub is_public_holiday: bool,
    /// Holiday name, observance remark or school-break label, in that
    /// precedence order. `None` when nothing matches.
    pub remark: Option<String>,
}

impl AlmanacFact {
    /// Fact for a date no table mentions.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn public_holiday(name: impl Into<String>) -> Self {
        Self {
            is_public_holiday: true,
            remark: Some(name.into()),
        }
    }

    pub fn remark(remark: impl Into<String>) -> Self {
        Self {
            is_public_holiday: false,
            remark: Some(remark.into()),
        }
    }

    /// Returns whether any table produced something for this date.
    pub fn is_empty(&self) -> bool {
        !self.is_public_holiday && self.remark.is_none()
    }
}
