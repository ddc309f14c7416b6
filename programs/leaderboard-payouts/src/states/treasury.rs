use anchor_lang::prelude::*;
use leaderboard_model as model;

/// Payout pool of an admin.
///
/// The account holds `balance` lamports on top of its rent-exempt reserve.
#[account]
#[derive(Debug)]
pub struct Treasury {
    pub admin: Pubkey,
    pub bump: u8,
    pub balance: u64,
}

impl Treasury {
    pub const LEN: usize = 32 + 1 + 8;

    /// Whether the account has been set up by `initialize`.
    pub fn is_initialized(&self) -> bool {
        self.admin != Pubkey::default()
    }
}

impl model::Treasury for Treasury {
    type Key = Pubkey;

    fn admin(&self) -> &Pubkey {
        &self.admin
    }

    fn balance(&self) -> u64 {
        self.balance
    }

    fn set_balance(&mut self, balance: u64) {
        self.balance = balance;
    }
}
