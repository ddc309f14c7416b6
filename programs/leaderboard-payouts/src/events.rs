use anchor_lang::prelude::*;

/// Scores were merged into a leaderboard.
#[event]
pub struct ScoresUpdated {
    pub leaderboard: Pubkey,
    pub updated: u64,
    pub inserted: u64,
    pub evicted: u64,
}

/// A treasury received funds from its admin.
#[event]
pub struct TreasuryFunded {
    pub treasury: Pubkey,
    pub amount: u64,
    pub balance: u64,
}

/// A period was settled and its winners paid.
#[event]
pub struct PeriodSettled {
    pub leaderboard: Pubkey,
    pub period_start: i64,
    pub settled_at: i64,
    /// Winners in rank order.
    pub winners: Vec<Pubkey>,
    /// Amounts paid, aligned with `winners`.
    pub amounts: Vec<u64>,
    pub total_paid: u64,
    pub retained: u64,
}
