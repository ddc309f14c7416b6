#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A payout pool.
pub trait Treasury {
    /// Identity type.
    type Key;

    /// Admin that owns the treasury.
    fn admin(&self) -> &Self::Key;

    /// Current pool balance.
    fn balance(&self) -> u64;

    /// Overwrite the pool balance.
    fn set_balance(&mut self, balance: u64);
}

/// Extension trait for [`Treasury`].
pub trait TreasuryExt: Treasury {
    /// Add `amount` to the pool and return the new balance.
    fn credit(&mut self, amount: u64) -> crate::Result<u64> {
        if amount == 0 {
            return Err(crate::Error::InvalidAmount);
        }
        let balance = self
            .balance()
            .checked_add(amount)
            .ok_or(crate::Error::Computation("treasury balance overflow"))?;
        self.set_balance(balance);
        Ok(balance)
    }

    /// Fails with [`InsufficientFunds`](crate::Error::InsufficientFunds)
    /// unless the pool holds at least `required`.
    fn ensure_covers(&self, required: u64) -> crate::Result<()> {
        let available = self.balance();
        if available < required {
            return Err(crate::Error::InsufficientFunds {
                required,
                available,
            });
        }
        Ok(())
    }

    /// Remove `amount` from the pool and return the new balance.
    fn debit(&mut self, amount: u64) -> crate::Result<u64> {
        self.ensure_covers(amount)?;
        let balance = self.balance() - amount;
        self.set_balance(balance);
        Ok(balance)
    }
}

impl<T: Treasury + ?Sized> TreasuryExt for T {}

/// Off-chain treasury record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreasuryState<K> {
    admin: K,
    balance: u64,
}

impl<K> TreasuryState<K> {
    /// Create an empty treasury.
    pub fn new(admin: K) -> Self {
        Self { admin, balance: 0 }
    }
}

impl<K> Treasury for TreasuryState<K> {
    type Key = K;

    fn admin(&self) -> &Self::Key {
        &self.admin
    }

    fn balance(&self) -> u64 {
        self.balance
    }

    fn set_balance(&mut self, balance: u64) {
        self.balance = balance;
    }
}
