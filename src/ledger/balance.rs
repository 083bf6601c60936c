//! Derives the remaining balance for a submitted entry.

/// The remaining balance after spending: `budget - (bills + travel + misc)`.
///
/// Pure function. All four inputs are expected to be non-negative, which is
/// enforced by the entry form, not here. No currency rounding is performed;
/// float precision is used as-is.
pub fn compute_balance(budget: f64, bills: f64, travel: f64, misc: f64) -> f64 {
    budget - (bills + travel + misc)
}

#[cfg(test)]
mod compute_balance_tests {
    use super::compute_balance;

    #[test]
    fn subtracts_total_spend_from_budget() {
        assert_eq!(compute_balance(1000.0, 200.0, 100.0, 50.0), 650.0);
    }

    #[test]
    fn zero_spend_leaves_the_budget() {
        assert_eq!(compute_balance(50_000.0, 0.0, 0.0, 0.0), 50_000.0);
    }

    #[test]
    fn overspending_goes_negative() {
        assert_eq!(compute_balance(100.0, 80.0, 40.0, 0.0), -20.0);
    }

    #[test]
    fn matches_the_expression_exactly() {
        let (budget, bills, travel, misc) = (123.45, 67.8, 9.01, 2.3);

        assert_eq!(
            compute_balance(budget, bills, travel, misc),
            budget - (bills + travel + misc)
        );
    }
}
