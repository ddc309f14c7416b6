#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometric payout schedule: rank `i` (1-indexed) receives
/// `floor(pool / 2^i)`.
///
/// Whatever the paid ranks do not consume stays with the payer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PayoutSchedule {
    pool: u64,
    ranks: usize,
}

impl PayoutSchedule {
    /// Create a schedule splitting `pool` among `ranks` ranks.
    pub fn new(pool: u64, ranks: usize) -> Self {
        Self { pool, ranks }
    }

    /// The pool being split.
    pub fn pool(&self) -> u64 {
        self.pool
    }

    /// Number of paid ranks.
    pub fn ranks(&self) -> usize {
        self.ranks
    }

    /// Share of the given rank (1-indexed). Rank `0` and ranks beyond the
    /// schedule receive nothing.
    pub fn share(&self, rank: usize) -> u64 {
        if rank == 0 || rank > self.ranks {
            return 0;
        }
        u32::try_from(rank)
            .ok()
            .and_then(|shift| self.pool.checked_shr(shift))
            .unwrap_or(0)
    }

    /// Iterate over `(rank, share)` pairs in rank order.
    pub fn shares(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        (1..=self.ranks).map(|rank| (rank, self.share(rank)))
    }

    /// Sum of all shares.
    ///
    /// Never exceeds the pool since the shares form a strictly
    /// halving series.
    pub fn total(&self) -> u64 {
        self.shares().map(|(_, share)| share).sum()
    }

    /// Part of the pool left undistributed.
    pub fn retained(&self) -> u64 {
        self.pool - self.total()
    }
}
