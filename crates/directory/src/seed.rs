//! Seed data - the two demo accounts shipped with the original data set

use crate::account::Account;
use crate::directory::AccountDirectory;
use chrono::{DateTime, Utc};
use demobank_core::{Currency, Movement};
use demobank_ledger::Ledger;
use rust_decimal::Decimal;

fn ledger_from(entries: &[(&str, Decimal)]) -> Ledger {
    let movements = entries
        .iter()
        .map(|(ts, amount)| {
            let timestamp: DateTime<Utc> = ts
                .parse()
                .unwrap_or_else(|_| panic!("invalid seed timestamp: {ts}"));
            Movement::new(*amount, timestamp)
        })
        .collect();
    Ledger::from_movements(movements)
}

/// The demo directory: two accounts with their original histories.
pub fn demo_directory() -> AccountDirectory {
    let jonas = Account::with_ledger(
        "Jonas Schmedtmann",
        1111,
        Decimal::new(12, 1), // 1.2%
        Currency::Eur,
        "pt-PT",
        ledger_from(&[
            ("2021-12-04T21:31:17.178Z", Decimal::new(200, 0)),
            ("2021-12-07T07:42:02.383Z", Decimal::new(45523, 2)),
            ("2020-01-28T09:15:04.904Z", Decimal::new(-3065, 1)),
            ("2020-04-01T10:17:24.185Z", Decimal::new(25000, 0)),
            ("2020-05-08T14:11:59.604Z", Decimal::new(-64221, 2)),
            ("2020-05-27T17:01:17.194Z", Decimal::new(-1339, 1)),
            ("2020-07-11T23:36:17.929Z", Decimal::new(7997, 2)),
            ("2021-12-01T10:51:36.790Z", Decimal::new(1300, 0)),
        ]),
    );

    let jessica = Account::with_ledger(
        "Jessica Davis",
        2222,
        Decimal::new(15, 1), // 1.5%
        Currency::Usd,
        "en-US",
        ledger_from(&[
            ("2019-11-01T13:15:33.035Z", Decimal::new(5000, 0)),
            ("2019-11-30T09:48:16.867Z", Decimal::new(3400, 0)),
            ("2019-12-25T06:04:23.907Z", Decimal::new(-150, 0)),
            ("2020-01-25T14:18:46.235Z", Decimal::new(-790, 0)),
            ("2020-02-05T16:33:06.386Z", Decimal::new(-3210, 0)),
            ("2020-04-10T14:43:26.374Z", Decimal::new(-1000, 0)),
            ("2020-06-25T18:49:59.371Z", Decimal::new(8500, 0)),
            ("2020-07-26T12:01:20.894Z", Decimal::new(-30, 0)),
        ]),
    );

    AccountDirectory::with_accounts(vec![jonas, jessica])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_demo_directory_shape() {
        let dir = demo_directory();
        assert_eq!(dir.len(), 2);

        let jonas = dir.find_by_credential("js", 1111).unwrap();
        assert_eq!(jonas.owner, "Jonas Schmedtmann");
        assert_eq!(jonas.currency, Currency::Eur);
        assert_eq!(jonas.ledger.len(), 8);

        let jessica = dir.find_by_username("jd").unwrap();
        assert_eq!(jessica.interest_rate, dec!(1.5));
        assert_eq!(jessica.locale, "en-US");
    }

    #[test]
    fn test_demo_balances() {
        let dir = demo_directory();
        let jonas = dir.find_by_username("js").unwrap();
        assert_eq!(jonas.ledger.balance(), dec!(25552.59));

        let jessica = dir.find_by_username("jd").unwrap();
        assert_eq!(jessica.ledger.balance(), dec!(11720));
    }
}
