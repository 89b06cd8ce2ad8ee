//! Ledger implementation
//!
//! The ledger is the append-only movement history of one account. Aggregates
//! are always recomputed from the full history on demand; there is no cached
//! state to invalidate.

use chrono::{DateTime, Utc};
use demobank_core::Movement;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::summary::LedgerSummary;

/// Ordering applied to the history view.
///
/// This only affects how movements are presented; the stored order is always
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementOrder {
    /// Storage order (oldest first)
    #[default]
    Insertion,
    /// Ascending by signed amount
    AmountAscending,
}

impl MovementOrder {
    /// Flip between the two orderings
    pub fn toggled(self) -> Self {
        match self {
            MovementOrder::Insertion => MovementOrder::AmountAscending,
            MovementOrder::AmountAscending => MovementOrder::Insertion,
        }
    }
}

/// Append-only movement history of one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    movements: Vec<Movement>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger from an existing history, keeping its order
    pub fn from_movements(movements: Vec<Movement>) -> Self {
        Self { movements }
    }

    /// Append a movement.
    ///
    /// No validation of sign or magnitude happens here; business rules are
    /// the caller's responsibility.
    pub fn record(&mut self, amount: Decimal, timestamp: DateTime<Utc>) {
        tracing::debug!(%amount, %timestamp, "recording movement");
        self.movements.push(Movement::new(amount, timestamp));
    }

    /// The stored history, in insertion order
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Number of movements recorded
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    /// True if no movement has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Sum of all movement amounts
    pub fn balance(&self) -> Decimal {
        self.movements.iter().map(|m| m.amount).sum()
    }

    /// Sum of all positive amounts
    pub fn total_deposits(&self) -> Decimal {
        self.movements
            .iter()
            .filter(|m| m.amount > Decimal::ZERO)
            .map(|m| m.amount)
            .sum()
    }

    /// Sum of the absolute values of all negative amounts
    pub fn total_withdrawals(&self) -> Decimal {
        self.movements
            .iter()
            .filter(|m| m.amount < Decimal::ZERO)
            .map(|m| -m.amount)
            .sum()
    }

    /// Accrued interest at `rate` percent.
    ///
    /// Each deposit earns `amount * rate / 100`, and only contributions of at
    /// least one whole unit count. The threshold applies per deposit, not to
    /// the total.
    pub fn total_interest(&self, rate: Decimal) -> Decimal {
        self.movements
            .iter()
            .filter(|m| m.amount > Decimal::ZERO)
            .map(|m| m.amount * rate / Decimal::ONE_HUNDRED)
            .filter(|interest| *interest >= Decimal::ONE)
            .sum()
    }

    /// All four aggregates bundled for one refresh
    pub fn summary(&self, rate: Decimal) -> LedgerSummary {
        LedgerSummary {
            balance: self.balance(),
            incomes: self.total_deposits(),
            outgoing: self.total_withdrawals(),
            interest: self.total_interest(rate),
        }
    }

    /// True if any single movement is at least `threshold`.
    ///
    /// Used by the loan affordability rule (some past movement >= a tenth of
    /// the requested amount).
    pub fn any_movement_at_least(&self, threshold: Decimal) -> bool {
        self.movements.iter().any(|m| m.amount >= threshold)
    }

    /// A copy of the history in the requested display order.
    ///
    /// Never reorders the stored movements.
    pub fn movements_view(&self, order: MovementOrder) -> Vec<Movement> {
        let mut view = self.movements.clone();
        if order == MovementOrder::AmountAscending {
            view.sort_by(|a, b| a.amount.cmp(&b.amount));
        }
        view
    }
}
