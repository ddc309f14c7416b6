use anchor_lang::prelude::*;
use leaderboard_model::{LeaderboardConfig, LeaderboardExt};

use crate::{
    error::{model_error, LeaderboardError},
    states::{Leaderboard, LEADERBOARD_SEED},
};

/// The accounts definition for [`update_config`](crate::leaderboard_payouts::update_config).
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub admin: Signer<'info>,
    #[account(
        mut,
        has_one = admin @ LeaderboardError::Unauthorized,
        seeds = [LEADERBOARD_SEED, leaderboard.admin.as_ref()],
        bump = leaderboard.bump,
    )]
    pub leaderboard: Box<Account<'info, Leaderboard>>,
}

impl UpdateConfig<'_> {
    /// The scoreboard and the current period start are left untouched.
    pub(crate) fn invoke(ctx: Context<Self>, config: LeaderboardConfig) -> Result<()> {
        ctx.accounts
            .leaderboard
            .update_config(config)
            .map_err(model_error)?;
        msg!(
            "leaderboard: config updated period_length={} top_spots={} total_payout={}",
            config.period_length,
            config.top_spots,
            config.total_payout_per_period,
        );
        Ok(())
    }
}
