use std::{fmt, marker::PhantomData};

use crate::{
    board::MergeReport,
    config::LeaderboardConfig,
    host::{Host, Record, RecordKey, RecordKind},
    leaderboard::{LeaderboardExt, LeaderboardState, Settlement},
    treasury::{Treasury, TreasuryExt, TreasuryState},
};

/// Executes leaderboard operations against a [`Host`].
///
/// Every operation works on staged copies of the records it touches and
/// publishes them only after all of its checks have passed, so a failed
/// call leaves the host unchanged.
#[derive(Debug, Clone)]
pub struct Processor<K, H> {
    host: H,
    marker: PhantomData<K>,
}

impl<K, H> Processor<K, H>
where
    K: Clone + Ord + Default + fmt::Debug,
    H: Host<K>,
{
    /// Create a processor over the given host.
    pub fn new(host: H) -> Self {
        Self {
            host,
            marker: PhantomData,
        }
    }

    /// Get the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Get the host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the processor and return the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Fetch the leaderboard owned by `admin`.
    pub fn leaderboard(&self, admin: &K) -> crate::Result<&LeaderboardState<K>> {
        match self.host.fetch_record(&RecordKey::leaderboard(admin.clone()))? {
            Record::Leaderboard(state) => Ok(state),
            Record::Treasury(_) => Err(crate::Error::NotInitialized(RecordKind::Leaderboard)),
        }
    }

    /// Fetch the treasury owned by `admin`.
    pub fn treasury(&self, admin: &K) -> crate::Result<&TreasuryState<K>> {
        match self.host.fetch_record(&RecordKey::treasury(admin.clone()))? {
            Record::Treasury(state) => Ok(state),
            Record::Leaderboard(_) => Err(crate::Error::NotInitialized(RecordKind::Treasury)),
        }
    }

    /// Create the leaderboard and the treasury of `admin`.
    pub fn initialize(&mut self, admin: &K, config: LeaderboardConfig) -> crate::Result<()> {
        if *admin == K::default() {
            return Err(crate::Error::ReservedIdentity);
        }
        for key in [
            RecordKey::leaderboard(admin.clone()),
            RecordKey::treasury(admin.clone()),
        ] {
            if self.host.fetch_record(&key).is_ok() {
                return Err(crate::Error::AlreadyInitialized(key.kind));
            }
        }

        let now = self.host.now();
        let leaderboard = LeaderboardState::new(admin.clone(), config, now)?;
        self.host.create_record(
            RecordKey::leaderboard(admin.clone()),
            leaderboard.into(),
        )?;
        self.host.create_record(
            RecordKey::treasury(admin.clone()),
            TreasuryState::new(admin.clone()).into(),
        )?;
        tracing::info!(?admin, ?config, period_start = now, "initialized leaderboard");
        Ok(())
    }

    /// Replace the configuration. The board and the current period are kept.
    pub fn update_config(
        &mut self,
        caller: &K,
        admin: &K,
        config: LeaderboardConfig,
    ) -> crate::Result<()> {
        let mut leaderboard = self.leaderboard(admin)?.clone();
        leaderboard.ensure_admin(caller)?;
        leaderboard.update_config(config)?;
        self.host
            .write_record(&RecordKey::leaderboard(admin.clone()), leaderboard.into())?;
        tracing::info!(?admin, ?config, "updated config");
        Ok(())
    }

    /// Merge a batch of score reports into the board.
    pub fn update_scores<I>(&mut self, caller: &K, admin: &K, batch: I) -> crate::Result<MergeReport>
    where
        I: IntoIterator<Item = (K, u64)>,
    {
        let mut leaderboard = self.leaderboard(admin)?.clone();
        leaderboard.ensure_admin(caller)?;
        let report = leaderboard.update_scores(batch)?;
        self.host
            .write_record(&RecordKey::leaderboard(admin.clone()), leaderboard.into())?;
        if report.evicted > 0 {
            tracing::warn!(?admin, evicted = report.evicted, "board full, dropped lowest scores");
        }
        tracing::debug!(?admin, ?report, "updated scores");
        Ok(report)
    }

    /// Move `amount` from the admin's account into the treasury and
    /// return the new treasury balance.
    pub fn fund_treasury(&mut self, caller: &K, admin: &K, amount: u64) -> crate::Result<u64> {
        let mut treasury = self.treasury(admin)?.clone();
        if treasury.admin() != caller {
            return Err(crate::Error::Unauthorized);
        }
        let balance = treasury.credit(amount)?;
        self.host.debit(caller, amount)?;
        self.host
            .write_record(&RecordKey::treasury(admin.clone()), treasury.into())?;
        tracing::info!(?admin, amount, balance, "funded treasury");
        Ok(balance)
    }

    /// Settle the current period: pay the ranked winners from the
    /// treasury, clear the board and start the next period.
    ///
    /// `winners` lists the external accounts of ranks `1..=n` in order.
    pub fn end_period_and_distribute_payouts(
        &mut self,
        caller: &K,
        admin: &K,
        winners: &[K],
    ) -> crate::Result<Settlement<K>> {
        let mut leaderboard = self.leaderboard(admin)?.clone();
        leaderboard.ensure_admin(caller)?;
        let mut treasury = self.treasury(admin)?.clone();

        let now = self.host.now();
        let settlement = leaderboard.prepare_settlement(now, winners, &treasury)?;
        treasury.debit(settlement.total_paid)?;
        leaderboard.finish_period(now);

        let credits = settlement
            .payouts
            .iter()
            .map(|payout| (payout.recipient.clone(), payout.amount))
            .collect::<Vec<_>>();
        self.host.credit_all(&credits)?;
        self.host
            .write_record(&RecordKey::treasury(admin.clone()), treasury.into())?;
        self.host
            .write_record(&RecordKey::leaderboard(admin.clone()), leaderboard.into())?;

        tracing::info!(
            ?admin,
            period_start = settlement.period_start,
            settled_at = settlement.settled_at,
            total_paid = settlement.total_paid,
            retained = settlement.retained,
            "settled period"
        );
        Ok(settlement)
    }

    /// Destroy the leaderboard of `admin`.
    pub fn close_leaderboard_account(&mut self, caller: &K, admin: &K) -> crate::Result<()> {
        self.leaderboard(admin)?.ensure_admin(caller)?;
        self.host
            .destroy_record(&RecordKey::leaderboard(admin.clone()))?;
        tracing::info!(?admin, "closed leaderboard");
        Ok(())
    }

    /// Destroy the treasury of `admin`, returning its balance to the admin.
    ///
    /// Returns the refunded amount.
    pub fn close_treasury_account(&mut self, caller: &K, admin: &K) -> crate::Result<u64> {
        let treasury = self.treasury(admin)?;
        if treasury.admin() != caller {
            return Err(crate::Error::Unauthorized);
        }
        let refund = treasury.balance();
        if refund > 0 {
            self.host.credit_all(&[(caller.clone(), refund)])?;
        }
        self.host
            .destroy_record(&RecordKey::treasury(admin.clone()))?;
        tracing::info!(?admin, refund, "closed treasury");
        Ok(refund)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        host::{TimeSource, ValueTransfer},
        leaderboard::Leaderboard,
        memory::MemoryHost,
    };

    use super::*;

    const START: i64 = 1_727_126_128;
    const DAY: i64 = 86_400;
    const ADMIN: &str = "admin";

    type TestProcessor = Processor<&'static str, MemoryHost<&'static str>>;

    fn config(top_spots: u8, total: u64) -> LeaderboardConfig {
        LeaderboardConfig::builder()
            .period_length(DAY)
            .top_spots(top_spots)
            .total_payout_per_period(total)
            .build()
    }

    fn setup(top_spots: u8, total: u64, funding: u64) -> crate::Result<TestProcessor> {
        let mut host = MemoryHost::new(START);
        host.airdrop(ADMIN, 100_000_000_000)?;
        let mut processor = Processor::new(host);
        processor.initialize(&ADMIN, config(top_spots, total))?;
        if funding > 0 {
            processor.fund_treasury(&ADMIN, &ADMIN, funding)?;
        }
        Ok(processor)
    }

    fn snapshot(
        processor: &TestProcessor,
    ) -> crate::Result<(LeaderboardState<&'static str>, TreasuryState<&'static str>)> {
        Ok((
            processor.leaderboard(&ADMIN)?.clone(),
            processor.treasury(&ADMIN)?.clone(),
        ))
    }

    #[test]
    fn initialize_twice_fails_and_keeps_state() -> crate::Result<()> {
        let mut processor = setup(5, 0, 0)?;
        let before = snapshot(&processor)?;
        assert_eq!(before.0.current_period_start(), START);
        assert_eq!(before.0.config(), config(5, 0));

        processor.host_mut().advance(10);
        for config in [config(5, 0), config(2, 9)] {
            assert_eq!(
                processor.initialize(&ADMIN, config),
                Err(crate::Error::AlreadyInitialized(RecordKind::Leaderboard))
            );
        }
        assert_eq!(snapshot(&processor)?, before);
        Ok(())
    }

    #[test]
    fn initialize_rejects_invalid_config_without_creating_records() -> crate::Result<()> {
        let mut processor = Processor::new(MemoryHost::new(START));
        assert_eq!(
            processor.initialize(&ADMIN, config(0, 0)),
            Err(crate::Error::InvalidTopSpots)
        );
        assert_eq!(processor.host().record_count(), 0);
        assert_eq!(
            processor.initialize(&"", config(3, 0)),
            Err(crate::Error::ReservedIdentity)
        );
        Ok(())
    }

    #[test]
    fn only_admin_may_mutate() -> crate::Result<()> {
        let mut processor = setup(3, 100, 100)?;
        processor.host_mut().airdrop("mallory", 1_000)?;
        let before = snapshot(&processor)?;

        let mallory = "mallory";
        assert_eq!(
            processor.update_config(&mallory, &ADMIN, config(1, 1)),
            Err(crate::Error::Unauthorized)
        );
        assert_eq!(
            processor
                .update_scores(&mallory, &ADMIN, [("mallory", 1_000)])
                .unwrap_err(),
            crate::Error::Unauthorized
        );
        assert_eq!(
            processor.fund_treasury(&mallory, &ADMIN, 10),
            Err(crate::Error::Unauthorized)
        );
        processor.host_mut().advance(DAY);
        assert_eq!(
            processor
                .end_period_and_distribute_payouts(&mallory, &ADMIN, &[])
                .unwrap_err(),
            crate::Error::Unauthorized
        );
        assert_eq!(
            processor.close_leaderboard_account(&mallory, &ADMIN),
            Err(crate::Error::Unauthorized)
        );
        assert_eq!(
            processor.close_treasury_account(&mallory, &ADMIN),
            Err(crate::Error::Unauthorized)
        );

        assert_eq!(snapshot(&processor)?, before);
        assert_eq!(processor.host().balance_of(&mallory), 1_000);
        Ok(())
    }

    #[test]
    fn update_config_keeps_board_and_period() -> crate::Result<()> {
        let mut processor = setup(5, 0, 0)?;
        processor.update_scores(&ADMIN, &ADMIN, [("alice", 3), ("bob", 4)])?;
        processor.host_mut().advance(100);

        let new_config = LeaderboardConfig::builder()
            .period_length(604_800)
            .top_spots(10)
            .total_payout_per_period(1_000)
            .build();
        processor.update_config(&ADMIN, &ADMIN, new_config)?;

        let leaderboard = processor.leaderboard(&ADMIN)?;
        assert_eq!(leaderboard.config(), new_config);
        assert_eq!(leaderboard.current_period_start(), START);
        assert_eq!(
            leaderboard.ranked().map(|e| e.key).collect::<Vec<_>>(),
            vec!["bob", "alice"]
        );
        Ok(())
    }

    #[test]
    fn fund_treasury_moves_admin_funds() -> crate::Result<()> {
        let mut processor = setup(3, 0, 0)?;
        let admin_before = processor.host().balance_of(&ADMIN);

        assert_eq!(processor.fund_treasury(&ADMIN, &ADMIN, 5_000_000_000)?, 5_000_000_000);
        assert_eq!(processor.treasury(&ADMIN)?.balance(), 5_000_000_000);
        assert_eq!(
            processor.host().balance_of(&ADMIN),
            admin_before - 5_000_000_000
        );

        assert_eq!(
            processor.fund_treasury(&ADMIN, &ADMIN, 0),
            Err(crate::Error::InvalidAmount)
        );
        let err = processor
            .fund_treasury(&ADMIN, &ADMIN, u64::MAX - 5_000_000_000)
            .unwrap_err();
        assert!(matches!(err, crate::Error::InsufficientFunds { .. }));
        assert_eq!(processor.treasury(&ADMIN)?.balance(), 5_000_000_000);
        Ok(())
    }

    #[test]
    fn settlement_conserves_value() -> crate::Result<()> {
        let total = 50_000_000;
        let mut processor = setup(3, total, total)?;
        processor.update_scores(
            &ADMIN,
            &ADMIN,
            [("carol", 10), ("alice", 90), ("dave", 1), ("bob", 40)],
        )?;
        processor.host_mut().advance(DAY);

        let treasury_before = processor.treasury(&ADMIN)?.balance();
        let settlement =
            processor.end_period_and_distribute_payouts(&ADMIN, &ADMIN, &["alice", "bob", "carol"])?;

        assert_eq!(settlement.total_paid, 43_750_000);
        assert_eq!(settlement.retained, 6_250_000);
        assert_eq!(processor.host().balance_of(&"alice"), 25_000_000);
        assert_eq!(processor.host().balance_of(&"bob"), 12_500_000);
        assert_eq!(processor.host().balance_of(&"carol"), 6_250_000);
        assert_eq!(processor.host().balance_of(&"dave"), 0);
        assert_eq!(
            processor.treasury(&ADMIN)?.balance(),
            treasury_before - (total / 2 + total / 4 + total / 8)
        );
        assert_eq!(processor.treasury(&ADMIN)?.balance(), 6_250_000);

        let leaderboard = processor.leaderboard(&ADMIN)?;
        assert!(leaderboard
            .participants()
            .iter()
            .all(|slot| slot.key.is_empty() && slot.score == 0));
        assert_eq!(
            leaderboard.current_period_start(),
            processor.host().now()
        );
        Ok(())
    }

    #[test]
    fn early_settlement_changes_nothing() -> crate::Result<()> {
        let mut processor = setup(1, 100, 100)?;
        processor.update_scores(&ADMIN, &ADMIN, [("alice", 1)])?;
        processor.host_mut().advance(DAY - 1);
        let before = snapshot(&processor)?;

        assert_eq!(
            processor
                .end_period_and_distribute_payouts(&ADMIN, &ADMIN, &["alice"])
                .unwrap_err(),
            crate::Error::PeriodNotEnded {
                ends_at: START + DAY
            }
        );
        assert_eq!(snapshot(&processor)?, before);
        assert_eq!(processor.host().balance_of(&"alice"), 0);
        Ok(())
    }

    #[test]
    fn failed_settlement_is_atomic() -> crate::Result<()> {
        let mut processor = setup(2, 1_000, 700)?;
        processor.update_scores(&ADMIN, &ADMIN, [("alice", 2), ("bob", 1)])?;
        processor.host_mut().advance(DAY);
        let before = snapshot(&processor)?;

        assert_eq!(
            processor
                .end_period_and_distribute_payouts(&ADMIN, &ADMIN, &["alice", "bob"])
                .unwrap_err(),
            crate::Error::InsufficientFunds {
                required: 750,
                available: 700
            }
        );
        assert_eq!(
            processor
                .end_period_and_distribute_payouts(&ADMIN, &ADMIN, &["bob", "alice"])
                .unwrap_err(),
            crate::Error::RankMismatch { rank: 1 }
        );
        assert_eq!(snapshot(&processor)?, before);
        assert_eq!(processor.host().balance_of(&"alice"), 0);
        assert_eq!(processor.host().balance_of(&"bob"), 0);
        Ok(())
    }

    #[test]
    fn payout_ranks_follow_top_spots() -> crate::Result<()> {
        let mut processor = setup(5, 3_200, 3_200)?;
        processor.update_scores(
            &ADMIN,
            &ADMIN,
            [("a", 6), ("b", 5), ("c", 4), ("d", 3), ("e", 2), ("f", 1)],
        )?;
        processor.host_mut().advance(DAY);
        let settlement =
            processor.end_period_and_distribute_payouts(&ADMIN, &ADMIN, &["a", "b", "c", "d", "e"])?;
        assert_eq!(
            settlement
                .payouts
                .iter()
                .map(|payout| payout.amount)
                .collect::<Vec<_>>(),
            vec![1_600, 800, 400, 200, 100]
        );
        assert_eq!(processor.treasury(&ADMIN)?.balance(), 100);
        assert_eq!(processor.host().balance_of(&"f"), 0);
        Ok(())
    }

    #[test]
    fn next_period_starts_at_settlement() -> crate::Result<()> {
        let mut processor = setup(1, 10, 100)?;
        processor.update_scores(&ADMIN, &ADMIN, [("alice", 1)])?;
        processor.host_mut().advance(DAY + 5);
        processor.end_period_and_distribute_payouts(&ADMIN, &ADMIN, &["alice"])?;

        processor.update_scores(&ADMIN, &ADMIN, [("bob", 1)])?;
        processor.host_mut().advance(DAY - 1);
        assert_eq!(
            processor
                .end_period_and_distribute_payouts(&ADMIN, &ADMIN, &["bob"])
                .unwrap_err(),
            crate::Error::PeriodNotEnded {
                ends_at: START + 2 * DAY + 5
            }
        );
        processor.host_mut().advance(1);
        processor.end_period_and_distribute_payouts(&ADMIN, &ADMIN, &["bob"])?;
        assert_eq!(processor.host().balance_of(&"bob"), 5);
        Ok(())
    }

    #[test]
    fn close_then_close_fails() -> crate::Result<()> {
        let mut processor = setup(3, 0, 40)?;
        let admin_before = processor.host().balance_of(&ADMIN);

        processor.close_leaderboard_account(&ADMIN, &ADMIN)?;
        assert_eq!(
            processor.close_leaderboard_account(&ADMIN, &ADMIN),
            Err(crate::Error::NotInitialized(RecordKind::Leaderboard))
        );
        assert_eq!(
            processor
                .update_scores(&ADMIN, &ADMIN, [("alice", 1)])
                .unwrap_err(),
            crate::Error::NotInitialized(RecordKind::Leaderboard)
        );

        assert_eq!(processor.close_treasury_account(&ADMIN, &ADMIN)?, 40);
        assert_eq!(processor.host().balance_of(&ADMIN), admin_before + 40);
        assert_eq!(
            processor.close_treasury_account(&ADMIN, &ADMIN),
            Err(crate::Error::NotInitialized(RecordKind::Treasury))
        );
        assert_eq!(processor.host().record_count(), 0);

        // Closed records can be recreated.
        processor.initialize(&ADMIN, config(3, 0))?;
        assert_eq!(processor.treasury(&ADMIN)?.balance(), 0);
        Ok(())
    }

    #[test]
    fn initialize_is_blocked_by_a_leftover_treasury() -> crate::Result<()> {
        let mut processor = setup(3, 0, 0)?;
        processor.close_leaderboard_account(&ADMIN, &ADMIN)?;
        assert_eq!(
            processor.initialize(&ADMIN, config(3, 0)),
            Err(crate::Error::AlreadyInitialized(RecordKind::Treasury))
        );
        assert!(processor.leaderboard(&ADMIN).is_err());
        Ok(())
    }
}
