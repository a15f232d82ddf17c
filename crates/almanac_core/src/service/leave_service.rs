//! Leave accounting.
//!
//! # Invariants
//! - Balance is recomputed from the latest plans on every call; nothing is
//!   cached across mutations.
//! - Balance may go negative and is never clamped.

use crate::model::plan::PlanEntry;
use crate::model::profile::Profile;
use crate::repo::kv_repo::{KvStore, RepoResult};
use crate::service::plan_service::PlanStore;
use crate::service::profile_service::ProfileStore;

/// Balance card numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveSummary {
    pub entitlement: u32,
    pub used: u32,
    /// `entitlement - used`, negative when over-booked.
    pub remaining: i64,
}

/// Returns `entitlement - count(plans flagged as leave)`.
pub fn remaining_leave<'a>(
    profile: &Profile,
    plans: impl IntoIterator<Item = &'a PlanEntry>,
) -> i64 {
    leave_summary(profile, plans).remaining
}

pub fn leave_summary<'a>(
    profile: &Profile,
    plans: impl IntoIterator<Item = &'a PlanEntry>,
) -> LeaveSummary {
    let used = plans.into_iter().filter(|entry| entry.is_leave).count();
    let used = u32::try_from(used).unwrap_or(u32::MAX);
    LeaveSummary {
        entitlement: profile.entitlement,
        used,
        remaining: i64::from(profile.entitlement) - i64::from(used),
    }
}

/// Reads both stores and computes the current balance.
pub fn current_leave_summary<P: KvStore, Q: KvStore>(
    profiles: &ProfileStore<P>,
    plans: &PlanStore<Q>,
) -> RepoResult<LeaveSummary> {
    let profile = profiles.get()?;
    let plans = plans.list_all()?;
    Ok(leave_summary(&profile, plans.values()))
}
