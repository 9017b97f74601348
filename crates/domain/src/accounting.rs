//! Accounting engine: purchase totals, settlement splits and the balances
//! accounts hold outside the ledger.

use std::collections::BTreeMap;

use common::{AccountId, Amount};
use serde::{Deserialize, Serialize};

/// 100% in basis points.
pub const BASIS_POINTS: u32 = 10_000;

/// `price * quantity`, or None on overflow.
pub fn purchase_total(price: Amount, quantity: u32) -> Option<Amount> {
    price.checked_mul(quantity)
}

/// How a settled event balance is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncentiveSplit {
    /// Kept by the store.
    pub incentive: Amount,
    /// Paid to the organizer.
    pub organizer_share: Amount,
}

/// Splits `balance` into the store incentive and the organizer share.
///
/// The incentive is `floor(balance * bps / 10000)`; the remainder, including
/// any rounding dust, goes to the organizer. `bps` above 10000 is clamped.
pub fn incentive_split(balance: Amount, bps: u32) -> IncentiveSplit {
    let bps = u128::from(bps.min(BASIS_POINTS));
    let denominator = u128::from(BASIS_POINTS);
    let units = balance.units();

    // Split before multiplying so the product cannot overflow.
    let incentive = (units / denominator) * bps + (units % denominator) * bps / denominator;
    let incentive = Amount::new(incentive);

    IncentiveSplit {
        incentive,
        organizer_share: balance.saturating_sub(incentive),
    }
}

/// An outgoing transfer from custody to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: AccountId,
    pub amount: Amount,
}

/// Balances held by accounts outside the ledger's custody.
#[derive(Debug, Clone, Default)]
pub struct AccountBook {
    balances: BTreeMap<AccountId, Amount>,
}

impl AccountBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    pub fn credit(&mut self, account: &AccountId, amount: Amount) {
        let balance = self.balances.entry(account.clone()).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Removes `amount` from `account`. Callers check funds first.
    pub fn debit(&mut self, account: &AccountId, amount: Amount) {
        if let Some(balance) = self.balances.get_mut(account) {
            *balance = balance.saturating_sub(amount);
        }
    }

    pub fn pay(&mut self, payout: &Payout) {
        self.credit(&payout.to, payout.amount);
    }

    /// Sum over every account.
    pub fn total(&self) -> Amount {
        self.balances.values().copied().sum()
    }
}
