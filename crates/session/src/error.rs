//! Session errors
//!
//! Every validation failure in the original UI is a silent no-op: nothing is
//! rendered, nothing is mutated. The controller keeps that contract towards
//! the front end but surfaces each failure internally as a `Rejection` so the
//! behavior is testable.

use rust_decimal::Decimal;
use thiserror::Error;

/// Why an operation was rejected. Rejections never mutate state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("No account matches the given credentials")]
    BadCredentials,

    #[error("No active session")]
    NotLoggedIn,

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Unknown transfer recipient: {0}")]
    UnknownRecipient(String),

    #[error("Cannot transfer to the sending account")]
    SelfTransfer,

    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance {
        available: Decimal,
        required: Decimal,
    },

    #[error("No past movement covers a tenth of the requested loan of {0}")]
    LoanNotCovered(Decimal),
}
