//! Profile/settings domain model.

use serde::{Deserialize, Deserializer, Serialize};

/// Annual leave days granted when the user never configured a value.
pub const DEFAULT_ENTITLEMENT: u32 = 14;

/// Installation-wide user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Configured number of annual leave days.
    /// Stored negatives read as `0`.
    #[serde(
        default = "default_entitlement",
        deserialize_with = "deserialize_entitlement"
    )]
    pub entitlement: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            entitlement: DEFAULT_ENTITLEMENT,
        }
    }
}

impl Profile {
    pub fn with_entitlement(entitlement: u32) -> Self {
        Self { entitlement }
    }

    /// Builds a profile from raw text typed in the settings field.
    ///
    /// Anything that is not a non-negative integer yields entitlement `0`
    /// rather than keeping the previous value.
    pub fn from_input(text: &str) -> Self {
        Self {
            entitlement: text.trim().parse::<u32>().unwrap_or(0),
        }
    }
}

fn default_entitlement() -> u32 {
    DEFAULT_ENTITLEMENT
}

fn deserialize_entitlement<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = i64::deserialize(deserializer)?;
    Ok(u32::try_from(stored.max(0)).unwrap_or(u32::MAX))
}
