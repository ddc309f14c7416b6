#![deny(missing_docs)]
#![deny(unreachable_pub)]

//! # Leaderboard Model
//!
//! Chain-agnostic core of the leaderboard payouts system: the ranked
//! scoreboard, the period clock, the decaying payout schedule and the
//! treasury arithmetic. On-chain accounts plug in by implementing
//! [`Leaderboard`] and [`Treasury`].

/// Error type.
pub mod error;

/// Ranked scoreboard.
pub mod board;

/// Period clock.
pub mod clock;

/// Leaderboard configuration.
pub mod config;

/// Payout schedule.
pub mod payout;

/// Treasury.
pub mod treasury;

/// Leaderboard.
pub mod leaderboard;

/// Contracts of the hosting environment.
pub mod host;

/// In-memory host.
pub mod memory;

/// Operation processor.
pub mod processor;

pub use crate::{
    board::{Entry, MergeReport, RankedSlot, MAX_CAPACITY},
    clock::PeriodClock,
    config::{LeaderboardConfig, MAX_TOP_SPOTS},
    error::Error,
    host::{Host, Record, RecordKey, RecordKind, RecordStore, TimeSource, ValueTransfer},
    leaderboard::{Leaderboard, LeaderboardExt, LeaderboardState, Payout, Settlement},
    memory::MemoryHost,
    payout::PayoutSchedule,
    processor::Processor,
    treasury::{Treasury, TreasuryExt, TreasuryState},
};

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
