//! Plan Store: user annotations keyed by date.
//!
//! # Responsibility
//! - Provide get/upsert/delete/list over the `p` blob.
//! - Persist every mutation before returning.
//!
//! # Invariants
//! - Upserting a blank note deletes the plan for that date.
//! - Loaded maps never contain blank notes or unparsable date keys.
//! - Each mutation is one whole-map read-modify-write.

use crate::model::date::{format_date, parse_date};
use crate::model::plan::PlanEntry;
use crate::repo::kv_repo::{decode_or_default, encode, KvStore, RepoResult, PLANS_KEY};
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::BTreeMap;

/// Date-keyed plan store over a key-value repository.
pub struct PlanStore<S: KvStore> {
    store: S,
}

impl<S: KvStore> PlanStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Gets the plan stored for `date`, if any.
    pub fn get(&self, date: NaiveDate) -> RepoResult<Option<PlanEntry>> {
        let mut plans = self.list_all()?;
        Ok(plans.remove(&date))
    }

    /// Replaces the plan for `date`, or deletes it when `entry` is blank.
    pub fn upsert(&self, date: NaiveDate, entry: PlanEntry) -> RepoResult<()> {
        if entry.is_blank() {
            return self.delete(date);
        }

        let entries = self.store.update_value(PLANS_KEY, |raw| {
            let mut plans = decode_plans(raw);
            plans.insert(date, entry);
            Ok((encode_plans(&plans)?, plans.len()))
        })?;

        info!("event=plan_upsert module=plan status=ok entries={entries}");
        Ok(())
    }

    /// Removes the plan for `date`. Absent dates are a no-op.
    pub fn delete(&self, date: NaiveDate) -> RepoResult<()> {
        let (removed, entries) = self.store.update_value(PLANS_KEY, |raw| {
            let mut plans = decode_plans(raw);
            let removed = plans.remove(&date).is_some();
            Ok((encode_plans(&plans)?, (removed, plans.len())))
        })?;

        info!("event=plan_delete module=plan status=ok removed={removed} entries={entries}");
        Ok(())
    }

    /// Returns every stored plan, ordered by date.
    pub fn list_all(&self) -> RepoResult<BTreeMap<NaiveDate, PlanEntry>> {
        let raw = self.store.get_value(PLANS_KEY)?;
        Ok(decode_plans(raw))
    }

    /// Returns every stored plan as an ascending `(date, plan)` list.
    pub fn itinerary(&self) -> RepoResult<Vec<(NaiveDate, PlanEntry)>> {
        Ok(self.list_all()?.into_iter().collect())
    }
}

fn decode_plans(raw: Option<String>) -> BTreeMap<NaiveDate, PlanEntry> {
    let stored: BTreeMap<String, PlanEntry> = decode_or_default(PLANS_KEY, raw);
    let total = stored.len();

    let plans: BTreeMap<NaiveDate, PlanEntry> = stored
        .into_iter()
        .filter(|(_, entry)| !entry.is_blank())
        .filter_map(|(key, entry)| parse_date(key.as_str()).map(|date| (date, entry)))
        .collect();

    if plans.len() != total {
        warn!(
            "event=plan_decode module=plan status=dropped dropped={} kept={}",
            total - plans.len(),
            plans.len()
        );
    }
    plans
}

fn encode_plans(plans: &BTreeMap<NaiveDate, PlanEntry>) -> RepoResult<String> {
    let keyed: BTreeMap<String, &PlanEntry> = plans
        .iter()
        .map(|(date, entry)| (format_date(*date), entry))
        .collect();
    encode(PLANS_KEY, &keyed)
}
