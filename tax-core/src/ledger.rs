//! Editable client and expense lists with confirm-before-commit edits.
//!
//! An edit is staged first and only reaches the entries once it is
//! confirmed. Totals always reflect committed values, so a pending edit
//! never leaks into the tax figures.
//!
//! # Example
//!
//! ```
//! use tax_core::ExpenseItem;
//! use tax_core::ledger::EditableLedger;
//!
//! let mut ledger = EditableLedger::new(vec![
//!     ExpenseItem { category: "Outsourcing".into(), amount: 450_000 },
//!     ExpenseItem { category: "Telecom".into(), amount: 180_000 },
//! ]);
//!
//! ledger.stage_edit(1, 200_000).unwrap();
//! assert_eq!(ledger.total(), 630_000);
//!
//! assert_eq!(ledger.confirm().unwrap(), 650_000);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::common::{checked_total, saturating_total};
use crate::input::{ParseAmountError, parse_amount_input};
use crate::{ClientRevenue, ExpenseItem};

/// Errors that can occur while editing a ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("row {index} does not exist (ledger has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("amount must be non-negative, got {0}")]
    NegativeAmount(i64),

    #[error("no edit is pending")]
    NothingPending,

    #[error("row {index} already has amount {amount}")]
    Unchanged { index: usize, amount: i64 },

    #[error("amount {amount} for row {index} would overflow the ledger total")]
    TotalOverflow { index: usize, amount: i64 },

    #[error(transparent)]
    InvalidAmount(#[from] ParseAmountError),
}

/// A row whose amount can be edited.
pub trait LedgerEntry {
    fn label(&self) -> &str;
    fn amount(&self) -> i64;
    fn set_amount(
        &mut self,
        amount: i64,
    );
}

impl LedgerEntry for ClientRevenue {
    fn label(&self) -> &str {
        &self.name
    }

    fn amount(&self) -> i64 {
        self.revenue
    }

    fn set_amount(
        &mut self,
        amount: i64,
    ) {
        self.revenue = amount;
    }
}

impl LedgerEntry for ExpenseItem {
    fn label(&self) -> &str {
        &self.category
    }

    fn amount(&self) -> i64 {
        self.amount
    }

    fn set_amount(
        &mut self,
        amount: i64,
    ) {
        self.amount = amount;
    }
}

/// A staged change awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    pub index: usize,
    pub previous: i64,
    pub amount: i64,
}

/// Rows plus at most one pending edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableLedger<T> {
    entries: Vec<T>,
    pending: Option<PendingEdit>,
}

impl<T: LedgerEntry> EditableLedger<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self {
            entries,
            pending: None,
        }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }

    pub fn amounts(&self) -> Vec<i64> {
        self.entries.iter().map(LedgerEntry::amount).collect()
    }

    /// Sum of committed amounts, saturating at the `i64` bounds.
    ///
    /// Edits that would overflow are refused when staged, so the total is
    /// exact unless the initial entries already overflow.
    pub fn total(&self) -> i64 {
        saturating_total(self.entries.iter().map(LedgerEntry::amount))
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        self.pending.as_ref()
    }

    /// Stages a new amount for row `index`, replacing any pending edit.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::IndexOutOfRange`] for a missing row
    /// - [`LedgerError::NegativeAmount`] for a negative amount
    /// - [`LedgerError::Unchanged`] if the row already holds `amount`
    /// - [`LedgerError::TotalOverflow`] if the new total would not fit in an `i64`
    ///
    /// A rejected edit leaves any earlier pending edit in place.
    pub fn stage_edit(
        &mut self,
        index: usize,
        amount: i64,
    ) -> Result<&PendingEdit, LedgerError> {
        let entry = self
            .entries
            .get(index)
            .ok_or(LedgerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })?;
        if amount < 0 {
            return Err(LedgerError::NegativeAmount(amount));
        }
        if entry.amount() == amount {
            return Err(LedgerError::Unchanged { index, amount });
        }
        let new_total = checked_total(
            self.entries
                .iter()
                .enumerate()
                .map(|(row, e)| if row == index { amount } else { e.amount() }),
        );
        if new_total.is_none() {
            return Err(LedgerError::TotalOverflow { index, amount });
        }

        debug!(index, label = entry.label(), amount, "staged edit");
        Ok(self.pending.insert(PendingEdit {
            index,
            previous: entry.amount(),
            amount,
        }))
    }

    /// Parses `text` as an amount and stages it for row `index`.
    pub fn stage_edit_text(
        &mut self,
        index: usize,
        text: &str,
    ) -> Result<&PendingEdit, LedgerError> {
        let amount = parse_amount_input(text)?;
        self.stage_edit(index, amount)
    }

    /// Commits the pending edit and returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NothingPending`] if no edit is staged.
    pub fn confirm(&mut self) -> Result<i64, LedgerError> {
        let edit = self.pending.take().ok_or(LedgerError::NothingPending)?;
        if let Some(entry) = self.entries.get_mut(edit.index) {
            entry.set_amount(edit.amount);
            info!(
                label = entry.label(),
                previous = edit.previous,
                amount = edit.amount,
                "edit confirmed"
            );
        }
        Ok(self.total())
    }

    /// Discards the pending edit, returning it if there was one.
    pub fn cancel(&mut self) -> Option<PendingEdit> {
        self.pending.take()
    }
}
