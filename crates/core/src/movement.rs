//! Movement - A single signed entry in an account's history
//!
//! A movement is a signed amount plus the instant it was recorded:
//! positive amounts are deposits, negative amounts are withdrawals.
//! Movements are append-only and never mutated after creation.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

/// Direction of a movement, derived from the sign of its amount.
///
/// A zero amount counts as a deposit, matching how the history view
/// classifies non-negative entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Deposit,
    Withdrawal,
}

/// A single signed movement on an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Signed amount: > 0 deposit, < 0 withdrawal
    pub amount: Decimal,
    /// When the movement was recorded
    pub timestamp: DateTime<Utc>,
}

impl Movement {
    /// Create a new movement
    pub fn new(amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self { amount, timestamp }
    }

    /// Create a movement timestamped now
    pub fn now(amount: Decimal) -> Self {
        Self::new(amount, Utc::now())
    }

    /// Deposit or withdrawal, from the sign of the amount
    pub fn kind(&self) -> MovementKind {
        if self.amount < Decimal::ZERO {
            MovementKind::Withdrawal
        } else {
            MovementKind::Deposit
        }
    }

    /// Human-friendly age label of this movement relative to `now`.
    ///
    /// Buckets: "Today", "Yesterday", "N days ago" up to a week, then a
    /// zero-padded MM/DD/YYYY calendar date. The day distance is the rounded
    /// absolute difference, so an entry 6.6 days old reads "7 days ago".
    pub fn display_date(&self, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(self.timestamp);
        let days = (elapsed.num_seconds().abs() as f64 / 86_400.0).round() as i64;

        match days {
            0 => "Today".to_string(),
            1 => "Yesterday".to_string(),
            2..=7 => format!("{days} days ago"),
            _ => format!(
                "{:02}/{:02}/{}",
                self.timestamp.month(),
                self.timestamp.day(),
                self.timestamp.year()
            ),
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_kind_from_sign() {
        assert_eq!(Movement::now(dec!(200)).kind(), MovementKind::Deposit);
        assert_eq!(Movement::now(dec!(-306.5)).kind(), MovementKind::Withdrawal);
        assert_eq!(Movement::now(dec!(0)).kind(), MovementKind::Deposit);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MovementKind::Deposit.to_string(), "deposit");
        assert_eq!(MovementKind::Withdrawal.to_string(), "withdrawal");
    }

    #[test]
    fn test_display_date_buckets() {
        let now = at("2021-12-08T12:00:00Z");

        let today = Movement::new(dec!(100), now - Duration::hours(3));
        assert_eq!(today.display_date(now), "Today");

        let yesterday = Movement::new(dec!(100), now - Duration::days(1));
        assert_eq!(yesterday.display_date(now), "Yesterday");

        let recent = Movement::new(dec!(100), now - Duration::days(4));
        assert_eq!(recent.display_date(now), "4 days ago");

        let week_edge = Movement::new(dec!(100), now - Duration::days(7));
        assert_eq!(week_edge.display_date(now), "7 days ago");
    }

    #[test]
    fn test_display_date_rounds_day_distance() {
        let now = at("2021-12-08T12:00:00Z");

        // 6 days 14 hours rounds to 7 -> still inside the week bucket
        let m = Movement::new(dec!(100), now - Duration::days(6) - Duration::hours(14));
        assert_eq!(m.display_date(now), "7 days ago");

        // 7 days 14 hours rounds to 8 -> calendar date
        let m = Movement::new(dec!(100), now - Duration::days(7) - Duration::hours(14));
        assert_eq!(m.display_date(now), "11/30/2021");
    }

    #[test]
    fn test_display_date_calendar_format() {
        let now = Utc.with_ymd_and_hms(2021, 12, 8, 12, 0, 0).unwrap();
        let m = Movement::new(dec!(25000), at("2020-04-01T10:17:24.185Z"));
        assert_eq!(m.display_date(now), "04/01/2020");
    }

    #[test]
    fn test_serde_roundtrip() {
        let m = Movement::new(dec!(455.23), at("2021-12-07T07:42:02.383Z"));
        let json = serde_json::to_string(&m).unwrap();
        let parsed: Movement = serde_json::from_str(&json).unwrap();
        assert_eq!(m, parsed);
    }
}
