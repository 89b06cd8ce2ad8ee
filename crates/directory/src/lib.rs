//! Demobank Directory - In-memory account collection
//!
//! # Key Types
//! - `Account`: Owner, derived username, credentials and movement history
//! - `AccountDirectory`: Linear-scan lookup by credential or username
//! - `demo_directory`: The two seeded demo accounts

pub mod account;
pub mod directory;
pub mod seed;

pub use account::{derive_username, Account};
pub use directory::AccountDirectory;
pub use seed::demo_directory;
