//! Plan entry domain model.
//!
//! # Responsibility
//! - Define the user-authored note/time/leave annotation attached to a date.
//!
//! # Invariants
//! - A plan entry with a blank note is never persisted; writing one means
//!   "delete the plan for this date".
//! - `time` is free text as typed by the user; it is only interpreted by the
//!   calendar export, which falls back to 09:00 when it cannot be parsed.

use serde::{Deserialize, Serialize};

/// User annotation for one calendar date.
///
/// Serialized as `{"note": .., "time": .., "isLeave": ..}` to stay readable by
/// earlier builds of the app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Free-form plan text.
    pub note: String,
    /// Optional `HH:MM` start time; empty when unset.
    #[serde(default)]
    pub time: String,
    /// Counts against the annual leave entitlement when set.
    #[serde(rename = "isLeave", default)]
    pub is_leave: bool,
}

impl PlanEntry {
    /// Creates a plan without time and without leave flag.
    pub fn new(note: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            time: String::new(),
            is_leave: false,
        }
    }

    /// Sets the user-facing start time text.
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    /// Marks this plan as a day of annual leave.
    pub fn as_leave(mut self) -> Self {
        self.is_leave = true;
        self
    }

    /// Returns whether the note is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.note.trim().is_empty()
    }

    /// Returns the time text when the user entered one.
    pub fn time(&self) -> Option<&str> {
        let trimmed = self.time.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PlanEntry;

    #[test]
    fn whitespace_note_is_blank() {
        assert!(PlanEntry::new("  \t").is_blank());
        assert!(!PlanEntry::new("dentist").is_blank());
    }

    #[test]
    fn serializes_with_legacy_field_names() {
        let entry = PlanEntry::new("trip").with_time("08:15").as_leave();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"note": "trip", "time": "08:15", "isLeave": true})
        );
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let entry: PlanEntry = serde_json::from_str(r#"{"note":"gym"}"#).unwrap();
        assert_eq!(entry, PlanEntry::new("gym"));
        assert_eq!(entry.time(), None);
    }
}
