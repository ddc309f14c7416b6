use crate::{
    board::{self, Entry, MergeReport, RankedSlot, MAX_CAPACITY},
    clock::PeriodClock,
    config::LeaderboardConfig,
    payout::PayoutSchedule,
    treasury::{Treasury, TreasuryExt},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Leaderboard state.
pub trait Leaderboard {
    /// Slot type of the scoreboard.
    type Slot: RankedSlot;

    /// Admin of the leaderboard.
    fn admin(&self) -> &<Self::Slot as RankedSlot>::Key;

    /// Current configuration.
    fn config(&self) -> LeaderboardConfig;

    /// Overwrite the configuration without validation.
    fn set_config(&mut self, config: LeaderboardConfig);

    /// Start of the current period.
    fn current_period_start(&self) -> i64;

    /// Overwrite the start of the current period.
    fn set_current_period_start(&mut self, start: i64);

    /// Scoreboard slots in rank order.
    fn slots(&self) -> &[Self::Slot];

    /// Mutable scoreboard slots.
    fn slots_mut(&mut self) -> &mut [Self::Slot];
}

/// Extension trait for [`Leaderboard`].
pub trait LeaderboardExt: Leaderboard {
    /// Fails with [`Unauthorized`](crate::Error::Unauthorized) unless
    /// `caller` is the admin.
    fn ensure_admin(&self, caller: &<Self::Slot as RankedSlot>::Key) -> crate::Result<()> {
        if self.admin() == caller {
            Ok(())
        } else {
            Err(crate::Error::Unauthorized)
        }
    }

    /// Clock of the current period.
    fn period_clock(&self) -> PeriodClock {
        PeriodClock::new(self.current_period_start(), self.config().period_length)
    }

    /// Validate and apply a new configuration. The board and the
    /// current period are left untouched.
    fn update_config(&mut self, config: LeaderboardConfig) -> crate::Result<()> {
        config.validate()?;
        self.set_config(config);
        Ok(())
    }

    /// Merge a batch of score reports into the board.
    fn update_scores<I>(&mut self, batch: I) -> crate::Result<MergeReport>
    where
        I: IntoIterator<Item = (<Self::Slot as RankedSlot>::Key, u64)>,
    {
        board::merge(self.slots_mut(), batch)
    }

    /// Number of winner accounts a settlement expects.
    fn winner_count(&self) -> usize {
        usize::from(self.config().top_spots).min(board::occupied(self.slots()))
    }

    /// Check every settlement precondition and compute the payouts.
    ///
    /// `winners` must list the identities holding ranks `1..=n` in order,
    /// where `n` is [`winner_count`](LeaderboardExt::winner_count). Nothing
    /// is mutated.
    fn prepare_settlement<T>(
        &self,
        now: i64,
        winners: &[<Self::Slot as RankedSlot>::Key],
        treasury: &T,
    ) -> crate::Result<Settlement<<Self::Slot as RankedSlot>::Key>>
    where
        T: Treasury + ?Sized,
    {
        let clock = self.period_clock();
        clock.ensure_elapsed(now)?;

        let expected = self.winner_count();
        if winners.len() != expected {
            return Err(crate::Error::WinnerCountMismatch {
                expected,
                actual: winners.len(),
            });
        }

        let schedule = PayoutSchedule::new(self.config().total_payout_per_period, expected);
        let payouts = board::ranked(self.slots())
            .zip(winners)
            .zip(schedule.shares())
            .map(|((slot, winner), (rank, amount))| {
                if slot.key() == winner {
                    Ok(Payout {
                        rank,
                        recipient: winner.clone(),
                        amount,
                    })
                } else {
                    Err(crate::Error::RankMismatch { rank })
                }
            })
            .collect::<crate::Result<Vec<_>>>()?;

        let total_paid = schedule.total();
        treasury.ensure_covers(total_paid)?;

        Ok(Settlement {
            period_start: clock.start(),
            settled_at: now,
            payouts,
            total_paid,
            retained: schedule.retained(),
        })
    }

    /// Clear the board and start a new period at `now`.
    fn finish_period(&mut self, now: i64) {
        board::reset(self.slots_mut());
        self.set_current_period_start(now);
    }
}

impl<L: Leaderboard + ?Sized> LeaderboardExt for L {}

/// A single payout of a settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Payout<K> {
    /// Rank (1-indexed).
    pub rank: usize,
    /// Winner.
    pub recipient: K,
    /// Amount paid.
    pub amount: u64,
}

/// Receipt of a period settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settlement<K> {
    /// Start of the settled period.
    pub period_start: i64,
    /// Settlement time, also the start of the next period.
    pub settled_at: i64,
    /// Payouts in rank order.
    pub payouts: Vec<Payout<K>>,
    /// Sum of all payouts.
    pub total_paid: u64,
    /// Part of the period pool left in the treasury.
    pub retained: u64,
}

/// Off-chain leaderboard record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardState<K> {
    admin: K,
    config: LeaderboardConfig,
    current_period_start: i64,
    participants: [Entry<K>; MAX_CAPACITY],
}

impl<K: Clone + Eq + Default> LeaderboardState<K> {
    /// Create an empty leaderboard whose first period starts at `now`.
    pub fn new(admin: K, config: LeaderboardConfig, now: i64) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            admin,
            config,
            current_period_start: now,
            participants: std::array::from_fn(|_| Entry::default()),
        })
    }

    /// All slots, including the empty ones.
    pub fn participants(&self) -> &[Entry<K>] {
        &self.participants
    }

    /// Occupied slots in rank order.
    pub fn ranked(&self) -> impl Iterator<Item = &Entry<K>> {
        board::ranked(&self.participants)
    }
}

impl<K: Clone + Eq + Default> Leaderboard for LeaderboardState<K> {
    type Slot = Entry<K>;

    fn admin(&self) -> &K {
        &self.admin
    }

    fn config(&self) -> LeaderboardConfig {
        self.config
    }

    fn set_config(&mut self, config: LeaderboardConfig) {
        self.config = config;
    }

    fn current_period_start(&self) -> i64 {
        self.current_period_start
    }

    fn set_current_period_start(&mut self, start: i64) {
        self.current_period_start = start;
    }

    fn slots(&self) -> &[Self::Slot] {
        &self.participants
    }

    fn slots_mut(&mut self) -> &mut [Self::Slot] {
        &mut self.participants
    }
}
