use anchor_lang::prelude::*;
use leaderboard_model::LeaderboardConfig;

pub mod error;
pub mod events;
pub mod instructions;
pub mod states;

pub use instructions::*;
pub use states::ScoreEntry;

declare_id!("DvFnWQ2WZjfCAVWTmyHgKNEknELAJHA2JE7F5Az1PCzb");

#[program]
pub mod leaderboard_payouts {
    use super::*;

    /// Create the leaderboard and the treasury of the signing admin.
    pub fn initialize(
        ctx: Context<Initialize>,
        period_length: i64,
        top_spots: u8,
        total_payout_per_period: u64,
    ) -> Result<()> {
        let config = LeaderboardConfig::builder()
            .period_length(period_length)
            .top_spots(top_spots)
            .total_payout_per_period(total_payout_per_period)
            .build();
        Initialize::invoke(ctx, config)
    }

    /// Replace the leaderboard configuration.
    pub fn update_config(
        ctx: Context<UpdateConfig>,
        period_length: i64,
        top_spots: u8,
        total_payout_per_period: u64,
    ) -> Result<()> {
        let config = LeaderboardConfig::builder()
            .period_length(period_length)
            .top_spots(top_spots)
            .total_payout_per_period(total_payout_per_period)
            .build();
        UpdateConfig::invoke(ctx, config)
    }

    /// Merge a batch of scores into the leaderboard.
    pub fn update_scores(ctx: Context<UpdateScores>, entries: Vec<ScoreEntry>) -> Result<()> {
        UpdateScores::invoke(ctx, entries)
    }

    /// Move lamports from the admin into the treasury.
    pub fn fund_treasury(ctx: Context<FundTreasury>, amount: u64) -> Result<()> {
        FundTreasury::invoke(ctx, amount)
    }

    /// Settle the current period.
    pub fn end_period_and_distribute_payouts<'info>(
        ctx: Context<'_, '_, 'info, 'info, EndPeriodAndDistributePayouts<'info>>,
    ) -> Result<()> {
        EndPeriodAndDistributePayouts::invoke(ctx)
    }

    /// Close the leaderboard account.
    pub fn close_leaderboard_account(ctx: Context<CloseLeaderboardAccount>) -> Result<()> {
        CloseLeaderboardAccount::invoke(ctx)
    }

    /// Close the treasury account and return its lamports to the admin.
    pub fn close_treasury_account(ctx: Context<CloseTreasuryAccount>) -> Result<()> {
        CloseTreasuryAccount::invoke(ctx)
    }
}
