//! Demobank Session - Session controller and countdown timer
//!
//! This crate orchestrates everything a logged-in user can do. All state
//! changes go through the `SessionController`; front ends render the
//! `SessionEvent` stream it emits.
//!
//! # Key Types
//! - `SessionController`: Login / transfer / loan / close-account state machine
//! - `SessionEvent`: Refresh snapshots, countdown ticks, session-end signal
//! - `AccountView`: Everything one refresh redraws
//! - `Rejection`: Typed silent-no-op validation failures

pub mod controller;
pub mod error;
pub mod event;
pub mod timer;

pub use controller::{SessionController, LOAN_DELAY};
pub use error::Rejection;
pub use event::{AccountView, EndReason, MovementLine, SessionEvent};
pub use timer::SESSION_SECONDS;
