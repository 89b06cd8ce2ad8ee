//! Demobank Core - Domain types
//!
//! This crate contains the fundamental types used across Demobank:
//! - `Currency`: Type-safe currency codes
//! - `Movement`: A signed amount plus its timestamp

pub mod currency;
pub mod movement;

pub use currency::Currency;
pub use movement::{Movement, MovementKind};
