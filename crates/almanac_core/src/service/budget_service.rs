//! Budget Ledger use-case service.
//!
//! # Responsibility
//! - Append dated expense entries and report the running total.
//! - Offer whole-list replacement for administrative resets.
//!
//! # Invariants
//! - There is no per-entry update or remove; corrections are new entries.
//! - Ids are unique and strictly increasing in creation order.
//! - Every write validates all entries before anything is persisted.

use crate::model::budget::{BudgetEntry, BudgetValidationError};
use crate::repo::kv_repo::{
    decode_or_default, encode, KvStore, RepoError, RepoResult, BUDGET_KEY,
};
use chrono::{NaiveDate, Utc};
use log::info;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for ledger writes.
#[derive(Debug)]
pub enum BudgetError {
    /// Entry failed model validation (blank item, non-finite amount).
    Validation(BudgetValidationError),
    /// Amount text typed by the user is not a number.
    InvalidAmount(String),
    /// Replacement list reuses an id.
    DuplicateId(i64),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for BudgetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidAmount(value) => write!(f, "invalid budget amount: `{value}`"),
            Self::DuplicateId(id) => write!(f, "duplicate budget entry id: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BudgetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InvalidAmount(_) | Self::DuplicateId(_) => None,
        }
    }
}

impl From<BudgetValidationError> for BudgetError {
    fn from(value: BudgetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for BudgetError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Append-only expense ledger persisted under the `b` key.
pub struct BudgetLedger<S: KvStore> {
    store: S,
}

impl<S: KvStore> BudgetLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists entries, most recent (highest id) first.
    pub fn list(&self) -> RepoResult<Vec<BudgetEntry>> {
        let mut entries = self.load()?;
        entries.sort_by(|left, right| right.id.cmp(&left.id));
        Ok(entries)
    }

    /// Appends one entry with a fresh id and persists the full list.
    pub fn add(
        &self,
        item: &str,
        amount: f64,
        date: NaiveDate,
    ) -> Result<BudgetEntry, BudgetError> {
        let mut entry = BudgetEntry::new(0, item.trim(), amount, date);
        entry.validate()?;

        let (entry, entries) = self.store.update_value(BUDGET_KEY, move |raw| {
            let mut entries: Vec<BudgetEntry> = decode_or_default(BUDGET_KEY, raw);
            entry.id = next_id(&entries, Utc::now().timestamp_millis());
            entries.push(entry.clone());
            Ok((encode(BUDGET_KEY, &entries)?, (entry, entries.len())))
        })?;

        info!("event=budget_add module=budget status=ok entries={entries}");
        Ok(entry)
    }

    /// Adds an entry from raw form input.
    ///
    /// # Errors
    /// - `Validation(BlankItem)` when `item` is blank.
    /// - `InvalidAmount` when `amount_text` is not a finite number.
    ///
    /// No entry is created on error.
    pub fn add_from_input(
        &self,
        item: &str,
        amount_text: &str,
        date: NaiveDate,
    ) -> Result<BudgetEntry, BudgetError> {
        if item.trim().is_empty() {
            return Err(BudgetValidationError::BlankItem.into());
        }
        let amount = amount_text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| BudgetError::InvalidAmount(amount_text.to_string()))?;
        self.add(item, amount, date)
    }

    /// Sum of all entry amounts.
    pub fn total(&self) -> RepoResult<f64> {
        Ok(sum_amounts(&self.load()?))
    }

    /// Replaces the whole ledger. An empty list clears it.
    pub fn replace_all(&self, entries: Vec<BudgetEntry>) -> Result<(), BudgetError> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.id) {
                return Err(BudgetError::DuplicateId(entry.id));
            }
        }

        let value = encode(BUDGET_KEY, &entries)?;
        self.store.put_value(BUDGET_KEY, value.as_str())?;
        info!(
            "event=budget_replace module=budget status=ok entries={}",
            entries.len()
        );
        Ok(())
    }

    fn load(&self) -> RepoResult<Vec<BudgetEntry>> {
        let raw = self.store.get_value(BUDGET_KEY)?;
        Ok(decode_or_default(BUDGET_KEY, raw))
    }
}

/// Creation timestamp, bumped past the current maximum id so that entries
/// created within the same millisecond still sort in creation order.
fn next_id(entries: &[BudgetEntry], now_epoch_ms: i64) -> i64 {
    entries
        .iter()
        .map(|entry| entry.id)
        .max()
        .map_or(now_epoch_ms, |max_id| now_epoch_ms.max(max_id.saturating_add(1)))
}

/// Sum of `entries` amounts; lets a caller total a list it already holds.
pub fn sum_amounts(entries: &[BudgetEntry]) -> f64 {
    entries.iter().map(|entry| entry.amount).sum()
}
