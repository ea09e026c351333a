use rust_decimal::{Decimal, RoundingStrategy};
use savings_core_api::{LedgerError, LedgerResult};

/// Charge breakdown of a deposit: `net + charge == gross` always holds.
///
/// The charge is `gross * charge_rate / 100`, rounded to currency precision
/// (2 decimal places, midpoint away from zero); the net is the remainder, so
/// rounding can never break the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositBreakdown {
    pub gross: Decimal,
    pub charge: Decimal,
    pub net: Decimal,
}

impl DepositBreakdown {
    pub fn compute(gross: Decimal, charge_rate: Decimal) -> LedgerResult<Self> {
        if gross <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(gross));
        }
        let charge = apply_rate(gross, charge_rate);
        Ok(Self {
            gross,
            charge,
            net: gross - charge,
        })
    }
}

/// Penalty breakdown of a withdrawal: `net + penalty == requested`.
///
/// The penalty applies only to early withdrawals (before the plan due date)
/// and is retained by the platform rather than paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalBreakdown {
    pub requested: Decimal,
    pub penalty: Decimal,
    pub net: Decimal,
    pub early: bool,
}

impl WithdrawalBreakdown {
    pub fn compute(requested: Decimal, penalty_rate: Decimal, early: bool) -> LedgerResult<Self> {
        if requested <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(requested));
        }
        let penalty = if early {
            apply_rate(requested, penalty_rate)
        } else {
            Decimal::ZERO
        };
        Ok(Self {
            requested,
            penalty,
            net: requested - penalty,
            early,
        })
    }
}

fn apply_rate(amount: Decimal, rate_percent: Decimal) -> Decimal {
    (amount * rate_percent / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_charge_splits_gross() {
        // target=100000, chargeRate=2%: deposit(10000) -> charge=200, net=9800
        let breakdown =
            DepositBreakdown::compute(Decimal::new(10_000, 0), Decimal::new(2, 0)).unwrap();

        assert_eq!(breakdown.charge, Decimal::new(200, 0));
        assert_eq!(breakdown.net, Decimal::new(9_800, 0));
        assert_eq!(breakdown.net + breakdown.charge, breakdown.gross);
    }

    #[test]
    fn deposit_charge_rounds_to_currency_precision() {
        // 333.33 at 2% is 6.6666, which rounds away from zero to 6.67.
        let breakdown =
            DepositBreakdown::compute(Decimal::new(33_333, 2), Decimal::new(2, 0)).unwrap();

        assert_eq!(breakdown.charge, Decimal::new(667, 2));
        assert_eq!(breakdown.net + breakdown.charge, breakdown.gross);
    }

    #[test]
    fn deposit_rejects_non_positive_gross() {
        assert!(matches!(
            DepositBreakdown::compute(Decimal::ZERO, Decimal::new(2, 0)),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            DepositBreakdown::compute(Decimal::new(-5, 0), Decimal::new(2, 0)),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn early_withdrawal_carries_penalty() {
        let breakdown =
            WithdrawalBreakdown::compute(Decimal::new(4_000, 0), Decimal::new(5, 0), true).unwrap();

        assert_eq!(breakdown.penalty, Decimal::new(200, 0));
        assert_eq!(breakdown.net, Decimal::new(3_800, 0));
        assert_eq!(breakdown.net + breakdown.penalty, breakdown.requested);
    }

    #[test]
    fn on_time_withdrawal_has_no_penalty() {
        let breakdown =
            WithdrawalBreakdown::compute(Decimal::new(4_000, 0), Decimal::new(5, 0), false)
                .unwrap();

        assert_eq!(breakdown.penalty, Decimal::ZERO);
        assert_eq!(breakdown.net, breakdown.requested);
    }

    #[test]
    fn withdrawal_rejects_non_positive_amount() {
        assert!(matches!(
            WithdrawalBreakdown::compute(Decimal::ZERO, Decimal::new(5, 0), true),
            Err(LedgerError::InvalidAmount(_))
        ));
    }
}
