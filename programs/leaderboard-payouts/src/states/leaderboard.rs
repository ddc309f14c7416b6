use anchor_lang::prelude::*;
use leaderboard_model::{self as model, LeaderboardConfig, RankedSlot, MAX_CAPACITY};

/// A ranked slot of the leaderboard.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Participant {
    /// Player. The default pubkey marks an empty slot.
    pub pubkey: Pubkey,
    /// Score.
    pub score: u64,
}

impl Participant {
    pub const LEN: usize = 32 + 8;
}

impl RankedSlot for Participant {
    type Key = Pubkey;

    fn from_parts(key: Self::Key, score: u64) -> Self {
        Self { pubkey: key, score }
    }

    fn key(&self) -> &Self::Key {
        &self.pubkey
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn set_score(&mut self, score: u64) {
        self.score = score;
    }
}

/// A score report submitted by the admin.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct ScoreEntry {
    pub player: Pubkey,
    pub score: u64,
}

/// Leaderboard of an admin.
#[account]
#[derive(Debug)]
pub struct Leaderboard {
    pub admin: Pubkey,
    pub bump: u8,
    pub period_length: i64,
    pub top_spots: u8,
    pub total_payout_per_period: u64,
    pub current_period_start: i64,
    pub participants: [Participant; MAX_CAPACITY],
}

impl Leaderboard {
    pub const LEN: usize = 32 + 1 + 8 + 1 + 8 + 8 + Participant::LEN * MAX_CAPACITY;

    /// Whether the account has been set up by `initialize`.
    pub fn is_initialized(&self) -> bool {
        self.admin != Pubkey::default()
    }

    /// End of the current period.
    pub fn period_end(&self) -> i64 {
        use model::LeaderboardExt;

        self.period_clock().ends_at()
    }
}

impl model::Leaderboard for Leaderboard {
    type Slot = Participant;

    fn admin(&self) -> &Pubkey {
        &self.admin
    }

    fn config(&self) -> LeaderboardConfig {
        LeaderboardConfig::builder()
            .period_length(self.period_length)
            .top_spots(self.top_spots)
            .total_payout_per_period(self.total_payout_per_period)
            .build()
    }

    fn set_config(&mut self, config: LeaderboardConfig) {
        self.period_length = config.period_length;
        self.top_spots = config.top_spots;
        self.total_payout_per_period = config.total_payout_per_period;
    }

    fn current_period_start(&self) -> i64 {
        self.current_period_start
    }

    fn set_current_period_start(&mut self, start: i64) {
        self.current_period_start = start;
    }

    fn slots(&self) -> &[Participant] {
        &self.participants
    }

    fn slots_mut(&mut self) -> &mut [Participant] {
        &mut self.participants
    }
}
