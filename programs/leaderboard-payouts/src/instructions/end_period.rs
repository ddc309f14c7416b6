use anchor_lang::prelude::*;
use leaderboard_model::{self as model, LeaderboardExt, Payout, TreasuryExt};

use crate::{
    error::{model_error, LeaderboardError},
    events::PeriodSettled,
    states::{Leaderboard, Treasury, LEADERBOARD_SEED, TREASURY_SEED},
};

/// The accounts definition for
/// [`end_period_and_distribute_payouts`](crate::leaderboard_payouts::end_period_and_distribute_payouts).
///
/// Remaining accounts expected by this instruction:
///
///   - 0..N. `[writable]` N winner accounts holding ranks `1..=N` in order,
///     where N is `min(top_spots, occupied ranks)`. Each account must stay
///     rent-exempt after receiving its share.
#[derive(Accounts)]
pub struct EndPeriodAndDistributePayouts<'info> {
    pub admin: Signer<'info>,
    #[account(
        mut,
        has_one = admin @ LeaderboardError::Unauthorized,
        seeds = [LEADERBOARD_SEED, leaderboard.admin.as_ref()],
        bump = leaderboard.bump,
    )]
    pub leaderboard: Box<Account<'info, Leaderboard>>,
    #[account(
        mut,
        has_one = admin @ LeaderboardError::Unauthorized,
        seeds = [TREASURY_SEED, treasury.admin.as_ref()],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,
}

impl<'info> EndPeriodAndDistributePayouts<'info> {
    /// Pay the winners out of the treasury, clear the board and start the
    /// next period.
    pub(crate) fn invoke(ctx: Context<'_, '_, 'info, 'info, Self>) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        let winners = ctx
            .remaining_accounts
            .iter()
            .map(|info| info.key())
            .collect::<Vec<_>>();

        let settlement = ctx
            .accounts
            .leaderboard
            .prepare_settlement(now, &winners, &*ctx.accounts.treasury)
            .map_err(model_error)?;
        ctx.accounts
            .treasury
            .debit(settlement.total_paid)
            .map_err(model_error)?;

        pay_winners(
            &ctx.accounts.treasury.to_account_info(),
            ctx.remaining_accounts,
            &settlement.payouts,
            &Rent::get()?,
        )?;

        ctx.accounts.leaderboard.finish_period(now);

        emit!(PeriodSettled {
            leaderboard: ctx.accounts.leaderboard.key(),
            period_start: settlement.period_start,
            settled_at: settlement.settled_at,
            winners,
            amounts: settlement.payouts.iter().map(|payout| payout.amount).collect(),
            total_paid: settlement.total_paid,
            retained: settlement.retained,
        });
        Ok(())
    }
}

/// Move each payout from `treasury` into the winner account of the same rank.
///
/// Every winner is checked before any lamports move.
pub(crate) fn pay_winners<'info>(
    treasury: &AccountInfo<'info>,
    winners: &[AccountInfo<'info>],
    payouts: &[Payout<Pubkey>],
    rent: &Rent,
) -> Result<()> {
    require_eq!(
        winners.len(),
        payouts.len(),
        LeaderboardError::WinnerCountMismatch
    );
    for (payout, winner) in payouts.iter().zip(winners) {
        require_keys_eq!(
            winner.key(),
            payout.recipient,
            LeaderboardError::RankMismatch
        );
        if payout.amount == 0 {
            continue;
        }
        require!(winner.is_writable, LeaderboardError::WinnerNotWritable);
        let credited = winner
            .lamports()
            .checked_add(payout.amount)
            .ok_or_else(|| model_error(model::Error::Computation("winner lamports overflow")))?;
        require!(
            rent.is_exempt(credited, winner.data_len()),
            LeaderboardError::WinnerNotRentExempt
        );
    }

    for (payout, winner) in payouts.iter().zip(winners) {
        if payout.amount == 0 {
            continue;
        }
        let remaining = treasury
            .lamports()
            .checked_sub(payout.amount)
            .ok_or_else(|| model_error(model::Error::Computation("treasury lamports underflow")))?;
        let credited = winner
            .lamports()
            .checked_add(payout.amount)
            .ok_or_else(|| model_error(model::Error::Computation("winner lamports overflow")))?;
        **treasury.try_borrow_mut_lamports()? = remaining;
        **winner.try_borrow_mut_lamports()? = credited;
        msg!(
            "leaderboard: rank={} winner={} payout={}",
            payout.rank,
            payout.recipient,
            payout.amount
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Lamports {
        key: Pubkey,
        owner: Pubkey,
        lamports: u64,
        data: Vec<u8>,
        writable: bool,
    }

    impl Lamports {
        fn system(lamports: u64) -> Self {
            Self {
                key: Pubkey::new_unique(),
                owner: anchor_lang::system_program::ID,
                lamports,
                data: Vec::new(),
                writable: true,
            }
        }

        fn info(&mut self) -> AccountInfo<'_> {
            AccountInfo::new(
                &self.key,
                false,
                self.writable,
                &mut self.lamports,
                &mut self.data,
                &self.owner,
                false,
                0,
            )
        }
    }

    fn payouts(winners: &[Lamports], amounts: &[u64]) -> Vec<Payout<Pubkey>> {
        winners
            .iter()
            .zip(amounts)
            .enumerate()
            .map(|(idx, (winner, amount))| Payout {
                rank: idx + 1,
                recipient: winner.key,
                amount: *amount,
            })
            .collect()
    }

    fn pay(
        treasury: &mut Lamports,
        winners: &mut [Lamports],
        payouts: &[Payout<Pubkey>],
    ) -> Result<()> {
        let treasury = treasury.info();
        let winners = winners.iter_mut().map(Lamports::info).collect::<Vec<_>>();
        pay_winners(&treasury, &winners, payouts, &Rent::default())
    }

    fn error_code(err: Error) -> Option<u32> {
        match err {
            Error::AnchorError(err) => Some(err.error_code_number),
            Error::ProgramError(_) => None,
        }
    }

    #[test]
    fn lamports_are_conserved() -> Result<()> {
        let reserve = Rent::default().minimum_balance(8 + crate::states::Treasury::LEN);
        let mut treasury = Lamports::system(reserve + 50_000_000);
        let mut winners = [
            Lamports::system(1_000_000),
            Lamports::system(0),
            Lamports::system(5),
        ];
        let payouts = payouts(&winners, &[25_000_000, 12_500_000, 6_250_000]);
        let before = treasury.lamports + winners.iter().map(|w| w.lamports).sum::<u64>();

        pay(&mut treasury, &mut winners, &payouts)?;

        assert_eq!(treasury.lamports, reserve + 6_250_000);
        assert_eq!(winners[0].lamports, 26_000_000);
        assert_eq!(winners[1].lamports, 12_500_000);
        assert_eq!(winners[2].lamports, 6_250_005);
        let after = treasury.lamports + winners.iter().map(|w| w.lamports).sum::<u64>();
        assert_eq!(before, after);
        Ok(())
    }

    #[test]
    fn read_only_winner_is_rejected_before_any_transfer() {
        let mut treasury = Lamports::system(100_000_000);
        let mut winners = [Lamports::system(0), Lamports::system(0)];
        winners[1].writable = false;
        let payouts = payouts(&winners, &[25_000_000, 12_500_000]);

        let err = pay(&mut treasury, &mut winners, &payouts).unwrap_err();
        assert_eq!(
            error_code(err),
            Some(u32::from(LeaderboardError::WinnerNotWritable))
        );
        assert_eq!(treasury.lamports, 100_000_000);
        assert_eq!(winners[0].lamports, 0);
    }

    #[test]
    fn share_below_rent_exemption_is_rejected() {
        let mut treasury = Lamports::system(100_000_000);
        let mut winners = [Lamports::system(0), Lamports::system(0)];
        let payouts = payouts(&winners, &[2_000_000, 1_000]);

        let err = pay(&mut treasury, &mut winners, &payouts).unwrap_err();
        assert_eq!(
            error_code(err),
            Some(u32::from(LeaderboardError::WinnerNotRentExempt))
        );
        assert_eq!(treasury.lamports, 100_000_000);
        assert_eq!(winners[0].lamports, 0);
    }

    #[test]
    fn zero_share_leaves_accounts_untouched() -> Result<()> {
        let mut treasury = Lamports::system(10);
        let mut winners = [Lamports::system(0)];
        winners[0].writable = false;
        let payouts = payouts(&winners, &[0]);

        pay(&mut treasury, &mut winners, &payouts)?;
        assert_eq!(treasury.lamports, 10);
        assert_eq!(winners[0].lamports, 0);
        Ok(())
    }

    #[test]
    fn winner_must_match_rank() {
        let mut treasury = Lamports::system(100_000_000);
        let mut winners = [Lamports::system(0), Lamports::system(0)];
        let mut payouts = payouts(&winners, &[25_000_000, 12_500_000]);
        payouts.swap(0, 1);

        let err = pay(&mut treasury, &mut winners, &payouts).unwrap_err();
        assert_eq!(
            error_code(err),
            Some(u32::from(LeaderboardError::RankMismatch))
        );
    }
}
