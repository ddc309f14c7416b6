use anchor_lang::prelude::*;
use leaderboard_model::LeaderboardExt;

use crate::{
    error::{model_error, LeaderboardError},
    events::ScoresUpdated,
    states::{Leaderboard, ScoreEntry, LEADERBOARD_SEED},
};

/// The accounts definition for [`update_scores`](crate::leaderboard_payouts::update_scores).
#[derive(Accounts)]
pub struct UpdateScores<'info> {
    pub admin: Signer<'info>,
    #[account(
        mut,
        has_one = admin @ LeaderboardError::Unauthorized,
        seeds = [LEADERBOARD_SEED, leaderboard.admin.as_ref()],
        bump = leaderboard.bump,
    )]
    pub leaderboard: Box<Account<'info, Leaderboard>>,
}

impl UpdateScores<'_> {
    pub(crate) fn invoke(ctx: Context<Self>, entries: Vec<ScoreEntry>) -> Result<()> {
        let report = ctx
            .accounts
            .leaderboard
            .update_scores(entries.into_iter().map(|entry| (entry.player, entry.score)))
            .map_err(model_error)?;

        if report.evicted > 0 {
            msg!("leaderboard: board full, evicted={}", report.evicted);
        }
        emit!(ScoresUpdated {
            leaderboard: ctx.accounts.leaderboard.key(),
            updated: report.updated as u64,
            inserted: report.inserted as u64,
            evicted: report.evicted as u64,
        });
        Ok(())
    }
}
