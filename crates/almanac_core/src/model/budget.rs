//! Budget ledger entry model.
//!
//! # Invariants
//! - `id` is unique within the ledger and grows with creation order.
//! - `item` is never blank and `amount` is always finite once persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One dated expense line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// Creation token, epoch milliseconds or the next free value after it.
    pub id: i64,
    /// What the money was spent on.
    pub item: String,
    /// Amount in ringgit.
    pub amount: f64,
    /// Day the expense was recorded for.
    pub date: NaiveDate,
}

/// Validation failures for ledger writes.
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetValidationError {
    BlankItem,
    NonFiniteAmount(f64),
}

impl Display for BudgetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankItem => write!(f, "budget item cannot be blank"),
            Self::NonFiniteAmount(value) => write!(f, "budget amount must be finite, got {value}"),
        }
    }
}

impl Error for BudgetValidationError {}

impl BudgetEntry {
    pub fn new(id: i64, item: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id,
            item: item.into(),
            amount,
            date,
        }
    }

    /// Checks the entry can be written to the ledger.
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.item.trim().is_empty() {
            return Err(BudgetValidationError::BlankItem);
        }
        if !self.amount.is_finite() {
            return Err(BudgetValidationError::NonFiniteAmount(self.amount));
        }
        Ok(())
    }
}
