use crate::host::RecordKind;

/// Error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Error {
    /// The caller is not the registered admin.
    #[error("unauthorized: caller is not the admin")]
    Unauthorized,
    /// The record already exists.
    #[error("{0} record is already initialized")]
    AlreadyInitialized(RecordKind),
    /// The record does not exist or has been closed.
    #[error("{0} record is not initialized")]
    NotInitialized(RecordKind),
    /// The current period has not ended yet.
    #[error("period has not ended yet, ends at {ends_at}")]
    PeriodNotEnded {
        /// Timestamp at which the period ends.
        ends_at: i64,
    },
    /// The winner account at the given rank is not the ranked participant.
    #[error("winner account at rank {rank} does not match the ranked participant")]
    RankMismatch {
        /// Rank (1-indexed).
        rank: usize,
    },
    /// Wrong number of winner accounts.
    #[error("expected {expected} winner accounts, got {actual}")]
    WinnerCountMismatch {
        /// Expected number of winners.
        expected: usize,
        /// Number of winners supplied.
        actual: usize,
    },
    /// Not enough funds for the requested debit.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Required amount.
        required: u64,
        /// Available amount.
        available: u64,
    },
    /// Invalid period length.
    #[error("invalid period length")]
    InvalidPeriodLength,
    /// Invalid number of top spots.
    #[error("invalid number of top spots")]
    InvalidTopSpots,
    /// Invalid amount.
    #[error("invalid amount")]
    InvalidAmount,
    /// The empty-slot identity was submitted as a participant.
    #[error("the reserved empty-slot identity cannot be ranked")]
    ReservedIdentity,
    /// Computation error.
    #[error("computation: {0}")]
    Computation(&'static str),
}

impl Error {
    /// Name of the condition, without its details.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_snake_case() {
        assert_eq!(Error::Unauthorized.name(), "unauthorized");
        assert_eq!(
            Error::PeriodNotEnded { ends_at: 0 }.name(),
            "period_not_ended"
        );
        assert_eq!(
            Error::NotInitialized(RecordKind::Treasury).name(),
            "not_initialized"
        );
    }
}
