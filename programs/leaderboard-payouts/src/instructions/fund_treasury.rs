use anchor_lang::{
    prelude::*,
    system_program::{transfer, Transfer},
};
use leaderboard_model::{self as model, TreasuryExt};

use crate::{
    error::{model_error, LeaderboardError},
    events::TreasuryFunded,
    states::{Treasury, TREASURY_SEED},
};

/// The accounts definition for [`fund_treasury`](crate::leaderboard_payouts::fund_treasury).
#[derive(Accounts)]
pub struct FundTreasury<'info> {
    /// Admin paying into the treasury.
    #[account(mut)]
    pub admin: Signer<'info>,
    /// Treasury to fund.
    #[account(
        mut,
        has_one = admin @ LeaderboardError::Unauthorized,
        seeds = [TREASURY_SEED, treasury.admin.as_ref()],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,
    /// The system program.
    pub system_program: Program<'info, System>,
}

impl FundTreasury<'_> {
    /// Move `amount` lamports from the admin into the treasury.
    pub(crate) fn invoke(ctx: Context<Self>, amount: u64) -> Result<()> {
        let balance = ctx
            .accounts
            .treasury
            .credit(amount)
            .map_err(model_error)?;

        let available = ctx.accounts.admin.lamports();
        if available < amount {
            return Err(model_error(model::Error::InsufficientFunds {
                required: amount,
                available,
            }));
        }

        let cpi = CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.admin.to_account_info(),
                to: ctx.accounts.treasury.to_account_info(),
            },
        );
        transfer(cpi, amount)?;

        msg!("leaderboard: treasury funded amount={} balance={}", amount, balance);
        emit!(TreasuryFunded {
            treasury: ctx.accounts.treasury.key(),
            amount,
            balance,
        });
        Ok(())
    }
}
