//! Services the core consumes from its hosting environment: persistent
//! records, value transfers between external accounts, and the wall
//! clock. Each host call must be all-or-nothing.

use crate::{leaderboard::LeaderboardState, treasury::TreasuryState};

/// Kind of a persistent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    /// Leaderboard record.
    Leaderboard,
    /// Treasury record.
    Treasury,
}

/// Address of a persistent record: one record of each kind per admin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey<K> {
    /// Kind.
    pub kind: RecordKind,
    /// Owning admin.
    pub admin: K,
}

impl<K> RecordKey<K> {
    /// Key of the leaderboard owned by `admin`.
    pub fn leaderboard(admin: K) -> Self {
        Self {
            kind: RecordKind::Leaderboard,
            admin,
        }
    }

    /// Key of the treasury owned by `admin`.
    pub fn treasury(admin: K) -> Self {
        Self {
            kind: RecordKind::Treasury,
            admin,
        }
    }
}

/// A persistent record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<K> {
    /// Leaderboard.
    Leaderboard(LeaderboardState<K>),
    /// Treasury.
    Treasury(TreasuryState<K>),
}

impl<K> Record<K> {
    /// Kind of this record.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Leaderboard(_) => RecordKind::Leaderboard,
            Self::Treasury(_) => RecordKind::Treasury,
        }
    }
}

impl<K> From<LeaderboardState<K>> for Record<K> {
    fn from(state: LeaderboardState<K>) -> Self {
        Self::Leaderboard(state)
    }
}

impl<K> From<TreasuryState<K>> for Record<K> {
    fn from(state: TreasuryState<K>) -> Self {
        Self::Treasury(state)
    }
}

/// Persistent record lifecycle.
pub trait RecordStore<K> {
    /// Create a record.
    ///
    /// Fails with [`AlreadyInitialized`](crate::Error::AlreadyInitialized)
    /// if a live record exists at `key`.
    fn create_record(&mut self, key: RecordKey<K>, record: Record<K>) -> crate::Result<()>;

    /// Replace a live record.
    ///
    /// Fails with [`NotInitialized`](crate::Error::NotInitialized) if
    /// there is no live record at `key`.
    fn write_record(&mut self, key: &RecordKey<K>, record: Record<K>) -> crate::Result<()>;

    /// Destroy a record and return its last state.
    ///
    /// Fails with [`NotInitialized`](crate::Error::NotInitialized) if
    /// there is no live record at `key`.
    fn destroy_record(&mut self, key: &RecordKey<K>) -> crate::Result<Record<K>>;

    /// Fetch a live record.
    ///
    /// Fails with [`NotInitialized`](crate::Error::NotInitialized) if
    /// there is no live record at `key`.
    fn fetch_record(&self, key: &RecordKey<K>) -> crate::Result<&Record<K>>;
}

/// Value transfers between external accounts.
pub trait ValueTransfer<K> {
    /// Balance of an external account.
    fn balance_of(&self, account: &K) -> u64;

    /// Take `amount` out of `account`.
    ///
    /// Fails with [`InsufficientFunds`](crate::Error::InsufficientFunds)
    /// without side effects if the account cannot cover it.
    fn debit(&mut self, account: &K, amount: u64) -> crate::Result<()>;

    /// Pay every `(account, amount)` pair, either all of them or none.
    fn credit_all(&mut self, credits: &[(K, u64)]) -> crate::Result<()>;
}

/// Wall-clock time source.
pub trait TimeSource {
    /// Current unix timestamp in seconds.
    fn now(&self) -> i64;
}

/// A hosting environment.
pub trait Host<K>: RecordStore<K> + ValueTransfer<K> + TimeSource {}

impl<K, H> Host<K> for H where H: RecordStore<K> + ValueTransfer<K> + TimeSource {}
