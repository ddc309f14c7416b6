use anchor_lang::prelude::*;
use leaderboard_model::{Leaderboard as _, LeaderboardConfig, MAX_CAPACITY};

use crate::{
    error::{model_error, LeaderboardError},
    states::{Leaderboard, Participant, Treasury, LEADERBOARD_SEED, TREASURY_SEED},
};

/// The accounts definition for [`initialize`](crate::leaderboard_payouts::initialize).
///
/// Both PDAs use `init_if_needed` so that a second call fails with
/// [`AlreadyInitialized`](LeaderboardError::AlreadyInitialized).
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Admin of the new leaderboard. Pays for both accounts.
    #[account(mut)]
    pub admin: Signer<'info>,
    /// Leaderboard to create.
    #[account(
        init_if_needed,
        payer = admin,
        space = 8 + Leaderboard::LEN,
        seeds = [LEADERBOARD_SEED, admin.key().as_ref()],
        bump,
    )]
    pub leaderboard: Box<Account<'info, Leaderboard>>,
    /// Treasury to create.
    #[account(
        init_if_needed,
        payer = admin,
        space = 8 + Treasury::LEN,
        seeds = [TREASURY_SEED, admin.key().as_ref()],
        bump,
    )]
    pub treasury: Account<'info, Treasury>,
    /// The system program.
    pub system_program: Program<'info, System>,
}

impl Initialize<'_> {
    pub(crate) fn invoke(ctx: Context<Self>, config: LeaderboardConfig) -> Result<()> {
        require!(
            !ctx.accounts.leaderboard.is_initialized(),
            LeaderboardError::AlreadyInitialized
        );
        require!(
            !ctx.accounts.treasury.is_initialized(),
            LeaderboardError::AlreadyInitialized
        );
        config.validate().map_err(model_error)?;

        let admin = ctx.accounts.admin.key();
        let now = Clock::get()?.unix_timestamp;

        let leaderboard = &mut ctx.accounts.leaderboard;
        leaderboard.admin = admin;
        leaderboard.bump = ctx.bumps.leaderboard;
        leaderboard.set_config(config);
        leaderboard.current_period_start = now;
        leaderboard.participants = [Participant::default(); MAX_CAPACITY];

        let treasury = &mut ctx.accounts.treasury;
        treasury.admin = admin;
        treasury.bump = ctx.bumps.treasury;
        treasury.balance = 0;

        msg!(
            "leaderboard: initialized admin={} period_length={} top_spots={} total_payout={} period_start={}",
            admin,
            config.period_length,
            config.top_spots,
            config.total_payout_per_period,
            now,
        );
        Ok(())
    }
}
