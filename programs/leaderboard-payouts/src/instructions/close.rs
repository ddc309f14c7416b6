use anchor_lang::prelude::*;

use crate::{
    error::LeaderboardError,
    states::{Leaderboard, Treasury, LEADERBOARD_SEED, TREASURY_SEED},
};

/// The accounts definition for
/// [`close_leaderboard_account`](crate::leaderboard_payouts::close_leaderboard_account).
#[derive(Accounts)]
pub struct CloseLeaderboardAccount<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,
    #[account(
        mut,
        has_one = admin @ LeaderboardError::Unauthorized,
        seeds = [LEADERBOARD_SEED, leaderboard.admin.as_ref()],
        bump = leaderboard.bump,
        close = admin,
    )]
    pub leaderboard: Box<Account<'info, Leaderboard>>,
}

impl CloseLeaderboardAccount<'_> {
    pub(crate) fn invoke(ctx: Context<Self>) -> Result<()> {
        msg!("leaderboard: closed {}", ctx.accounts.leaderboard.key());
        Ok(())
    }
}

/// The accounts definition for
/// [`close_treasury_account`](crate::leaderboard_payouts::close_treasury_account).
///
/// Every lamport of the treasury, reserve and undistributed pool alike,
/// goes back to the admin.
#[derive(Accounts)]
pub struct CloseTreasuryAccount<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,
    #[account(
        mut,
        has_one = admin @ LeaderboardError::Unauthorized,
        seeds = [TREASURY_SEED, treasury.admin.as_ref()],
        bump = treasury.bump,
        close = admin,
    )]
    pub treasury: Account<'info, Treasury>,
}

impl CloseTreasuryAccount<'_> {
    pub(crate) fn invoke(ctx: Context<Self>) -> Result<()> {
        msg!(
            "leaderboard: closed treasury {} refund={}",
            ctx.accounts.treasury.key(),
            ctx.accounts.treasury.to_account_info().lamports(),
        );
        Ok(())
    }
}
