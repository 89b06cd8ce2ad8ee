//! Account - One customer's identity, credentials and movement history

use demobank_core::Currency;
use demobank_ledger::Ledger;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Derive a username from an owner name: the lowercase first letter of each
/// whitespace-separated word.
///
/// # Examples
/// ```
/// use demobank_directory::derive_username;
///
/// assert_eq!(derive_username("Steven Thomas Williams"), "stw");
/// ```
pub fn derive_username(owner: &str) -> String {
    owner
        .to_lowercase()
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

/// One customer account.
///
/// The username is derived once at construction and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Full owner name, as displayed in the welcome greeting
    pub owner: String,
    /// Login identifier derived from the owner name
    pub username: String,
    /// Numeric login credential
    pub pin: u32,
    /// Interest rate in percent
    pub interest_rate: Decimal,
    /// Account currency
    pub currency: Currency,
    /// BCP-47 locale tag, display-only
    pub locale: String,
    /// The account's movement history
    pub ledger: Ledger,
}

impl Account {
    /// Create an account with an empty history
    pub fn new(
        owner: impl Into<String>,
        pin: u32,
        interest_rate: Decimal,
        currency: Currency,
        locale: impl Into<String>,
    ) -> Self {
        let owner = owner.into();
        let username = derive_username(&owner);
        Self {
            owner,
            username,
            pin,
            interest_rate,
            currency,
            locale: locale.into(),
            ledger: Ledger::new(),
        }
    }

    /// Create an account with a pre-existing history
    pub fn with_ledger(
        owner: impl Into<String>,
        pin: u32,
        interest_rate: Decimal,
        currency: Currency,
        locale: impl Into<String>,
        ledger: Ledger,
    ) -> Self {
        let mut account = Self::new(owner, pin, interest_rate, currency, locale);
        account.ledger = ledger;
        account
    }

    /// The owner's first name, used for the welcome greeting
    pub fn first_name(&self) -> &str {
        self.owner.split_whitespace().next().unwrap_or(&self.owner)
    }

    /// Exact match on both credentials
    pub fn matches(&self, username: &str, pin: u32) -> bool {
        self.username == username && self.pin == pin
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} (owner: {}, currency: {}, movements: {})",
            self.username,
            self.owner,
            self.currency,
            self.ledger.len()
        )
    }
}
