//! Session events - what the controller emits towards a front end
//!
//! A front end (the CLI, originally a browser page) drains these from an
//! unbounded channel and renders them. The controller never waits on the
//! consumer.

use chrono::{DateTime, Utc};
use demobank_core::{Currency, MovementKind};
use demobank_directory::Account;
use demobank_ledger::{LedgerSummary, MovementOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    /// The countdown reached zero
    Expired,
    /// Explicit logout
    LoggedOut,
    /// The account was closed; the front end should hide everything
    Closed,
}

/// One row of the rendered movement history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementLine {
    /// Signed amount
    pub amount: Decimal,
    /// Deposit or withdrawal
    pub kind: MovementKind,
    /// "Today", "Yesterday", "N days ago" or a calendar date
    pub date_label: String,
}

/// Snapshot of everything a refresh redraws: history, balance and summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub owner: String,
    pub username: String,
    pub currency: Currency,
    pub locale: String,
    /// History rows in the requested display order
    pub movements: Vec<MovementLine>,
    pub summary: LedgerSummary,
}

impl AccountView {
    /// Build a view of `account` with its history in `order`, classifying
    /// movement dates relative to `now`.
    pub fn of(account: &Account, order: MovementOrder, now: DateTime<Utc>) -> Self {
        let movements = account
            .ledger
            .movements_view(order)
            .into_iter()
            .map(|m| MovementLine {
                amount: m.amount,
                kind: m.kind(),
                date_label: m.display_date(now),
            })
            .collect();

        Self {
            owner: account.owner.clone(),
            username: account.username.clone(),
            currency: account.currency.clone(),
            locale: account.locale.clone(),
            movements,
            summary: account.ledger.summary(account.interest_rate),
        }
    }

    /// The owner's first name, for the welcome greeting
    pub fn first_name(&self) -> &str {
        self.owner.split_whitespace().next().unwrap_or(&self.owner)
    }
}

/// Events emitted by the session controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The UI should redraw from this snapshot
    Refresh(AccountView),

    /// One second of the countdown elapsed
    Tick {
        /// Seconds left in the session
        remaining: u64,
    },

    /// The session is over; fired exactly once per session
    SessionEnded {
        /// What ended it
        reason: EndReason,
    },
}

impl SessionEvent {
    /// Create a Refresh event
    pub fn refresh(view: AccountView) -> Self {
        Self::Refresh(view)
    }

    /// Create a Tick event
    pub fn tick(remaining: u64) -> Self {
        Self::Tick { remaining }
    }

    /// Create a SessionEnded event
    pub fn session_ended(reason: EndReason) -> Self {
        Self::SessionEnded { reason }
    }
}
