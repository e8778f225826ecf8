//! Score and money bookkeeping.

use path_defence_core::PlacementError;

/// Running score and money totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ledger {
    score: u32,
    money: u32,
}

/// Changes applied by [`Ledger::settle`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settlement {
    /// Applied change in score; never positive.
    pub score_delta: i64,
    /// Applied change in money; never negative.
    pub money_delta: i64,
}

impl Ledger {
    /// Creates a ledger with the provided opening balances.
    #[must_use]
    pub const fn new(score: u32, money: u32) -> Self {
        Self { score, money }
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Current money.
    #[must_use]
    pub const fn money(&self) -> u32 {
        self.money
    }

    /// Deducts the cost, leaving the balance untouched when it cannot cover it.
    pub fn spend(&mut self, cost: u32) -> Result<(), PlacementError> {
        self.money = self
            .money
            .checked_sub(cost)
            .ok_or(PlacementError::InsufficientFunds)?;
        Ok(())
    }

    /// Deducts escaped-monster losses from the score, clamping at zero, and
    /// credits kill bounties.
    pub fn settle(&mut self, score_loss: u32, money_earned: u32) -> Settlement {
        let score_before = self.score;
        let money_before = self.money;
        self.score = self.score.saturating_sub(score_loss);
        self.money = self.money.saturating_add(money_earned);
        Settlement {
            score_delta: i64::from(self.score) - i64::from(score_before),
            money_delta: i64::from(self.money) - i64::from(money_before),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spending_never_overdraws() {
        let mut ledger = Ledger::new(250, 150);
        assert_eq!(ledger.spend(75), Ok(()));
        assert_eq!(ledger.money(), 75);
        assert_eq!(ledger.spend(150), Err(PlacementError::InsufficientFunds));
        assert_eq!(ledger.money(), 75);
        assert_eq!(ledger.spend(75), Ok(()));
        assert_eq!(ledger.money(), 0);
    }

    #[test]
    fn settlement_clamps_score_at_zero() {
        let mut ledger = Ledger::new(25, 0);
        let settlement = ledger.settle(30, 80);
        assert_eq!(ledger.score(), 0);
        assert_eq!(ledger.money(), 80);
        assert_eq!(
            settlement,
            Settlement {
                score_delta: -25,
                money_delta: 80,
            }
        );
    }
}
