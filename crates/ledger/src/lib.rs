//! Demobank Ledger - Per-account movement log
//!
//! All balance and summary figures in Demobank derive from this crate.
//!
//! # Key Types
//! - `Ledger`: Append-only movement history with recompute-on-demand aggregates
//! - `LedgerSummary`: Balance / incomes / outgoing / interest bundle
//! - `MovementOrder`: Display ordering for the history view

pub mod ledger;
pub mod summary;

pub use ledger::{Ledger, MovementOrder};
pub use summary::LedgerSummary;
