//! Account directory - linear-scan lookup over the in-memory accounts

use crate::account::Account;
use serde::{Deserialize, Serialize};

/// In-memory collection of accounts.
///
/// Lookups are linear scans; the directory holds a handful of accounts.
/// Username uniqueness is assumed, not enforced: a duplicate insert shadows
/// the earlier account for lookup purposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountDirectory {
    accounts: Vec<Account>,
}

impl AccountDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory from existing accounts
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    /// Add an account
    pub fn insert(&mut self, account: Account) {
        tracing::debug!(username = %account.username, "inserting account");
        self.accounts.push(account);
    }

    /// Number of accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// True if the directory holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All accounts, in insertion order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Exact-match lookup on both username and pin
    pub fn find_by_credential(&self, username: &str, pin: u32) -> Option<&Account> {
        self.accounts.iter().find(|a| a.matches(username, pin))
    }

    /// Lookup by username only, for transfer-target resolution
    pub fn find_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    /// Mutable lookup by username
    pub fn find_by_username_mut(&mut self, username: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.username == username)
    }

    /// Mutable access to two distinct accounts at once.
    ///
    /// Returns `None` if either username is missing or both name the same
    /// account.
    pub fn pair_mut(&mut self, a: &str, b: &str) -> Option<(&mut Account, &mut Account)> {
        let ia = self.accounts.iter().position(|acc| acc.username == a)?;
        let ib = self.accounts.iter().position(|acc| acc.username == b)?;
        if ia == ib {
            return None;
        }

        if ia < ib {
            let (left, right) = self.accounts.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.accounts.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    /// Remove the account matching both credentials.
    ///
    /// Silent no-op when nothing matches. Returns the removed account so
    /// callers can log or inspect it.
    pub fn remove(&mut self, username: &str, pin: u32) -> Option<Account> {
        let idx = self.accounts.iter().position(|a| a.matches(username, pin))?;
        let removed = self.accounts.remove(idx);
        tracing::info!(username = %removed.username, "account removed from directory");
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demobank_core::Currency;
    use rust_decimal_macros::dec;

    fn directory() -> AccountDirectory {
        AccountDirectory::with_accounts(vec![
            Account::new("Jonas Schmedtmann", 1111, dec!(1.2), Currency::Eur, "pt-PT"),
            Account::new("Jessica Davis", 2222, dec!(1.5), Currency::Usd, "en-US"),
        ])
    }

    #[test]
    fn test_find_by_credential_exact_match() {
        let dir = directory();
        assert!(dir.find_by_credential("js", 1111).is_some());
        assert!(dir.find_by_credential("js", 1112).is_none());
        assert!(dir.find_by_credential("jx", 1111).is_none());
    }

    #[test]
    fn test_find_by_username() {
        let dir = directory();
        assert_eq!(dir.find_by_username("jd").unwrap().owner, "Jessica Davis");
        assert!(dir.find_by_username("nobody").is_none());
    }

    #[test]
    fn test_remove_requires_both_credentials() {
        let mut dir = directory();
        assert!(dir.remove("js", 9999).is_none());
        assert_eq!(dir.len(), 2);

        assert!(dir.remove("js", 1111).is_some());
        assert_eq!(dir.len(), 1);
        assert!(dir.find_by_credential("js", 1111).is_none());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut dir = directory();
        assert!(dir.remove("ghost", 1234).is_none());
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn test_pair_mut_distinct_accounts() {
        let mut dir = directory();
        let (a, b) = dir.pair_mut("js", "jd").unwrap();
        assert_eq!(a.username, "js");
        assert_eq!(b.username, "jd");

        // Order of arguments is preserved either way round.
        let (b, a) = dir.pair_mut("jd", "js").unwrap();
        assert_eq!(b.username, "jd");
        assert_eq!(a.username, "js");
    }

    #[test]
    fn test_pair_mut_rejects_same_account() {
        let mut dir = directory();
        assert!(dir.pair_mut("js", "js").is_none());
        assert!(dir.pair_mut("js", "ghost").is_none());
    }
}
