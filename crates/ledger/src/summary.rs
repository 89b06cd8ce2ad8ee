//! Ledger summary - the aggregate bundle behind one UI refresh

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The four aggregates displayed together: balance, incomes, outgoing and
/// accrued interest. All values are recomputed from the full history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Sum of all movements
    pub balance: Decimal,
    /// Sum of deposits
    pub incomes: Decimal,
    /// Sum of withdrawal magnitudes
    pub outgoing: Decimal,
    /// Interest kept under the per-deposit threshold rule
    pub interest: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_serde_shape() {
        let summary = LedgerSummary {
            balance: dec!(25552.59),
            incomes: dec!(27035.2),
            outgoing: dec!(1082.61),
            interest: dec!(300),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["balance"], "25552.59");
        assert_eq!(json["incomes"], "27035.2");
    }
}
