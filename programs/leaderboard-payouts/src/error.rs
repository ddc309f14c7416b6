use anchor_lang::prelude::*;
use leaderboard_model as model;

#[error_code]
pub enum LeaderboardError {
    #[msg("Caller is not the leaderboard admin")]
    Unauthorized,

    #[msg("Account is already initialized")]
    AlreadyInitialized,

    #[msg("Account is not initialized")]
    NotInitialized,

    #[msg("Current period has not ended yet")]
    PeriodNotEnded,

    #[msg("Winner account does not match its rank")]
    RankMismatch,

    #[msg("Wrong number of winner accounts")]
    WinnerCountMismatch,

    #[msg("Insufficient funds")]
    InsufficientFunds,

    #[msg("Period length must be positive")]
    InvalidPeriodLength,

    #[msg("Top spots must be between 1 and 10")]
    InvalidTopSpots,

    #[msg("Amount must be positive")]
    InvalidAmount,

    #[msg("The default pubkey cannot hold a score")]
    ReservedIdentity,

    #[msg("Computation error")]
    Computation,

    #[msg("Winner account must be writable")]
    WinnerNotWritable,

    #[msg("Winner account would not be rent-exempt after the payout")]
    WinnerNotRentExempt,
}

impl From<model::Error> for LeaderboardError {
    fn from(err: model::Error) -> Self {
        match err {
            model::Error::Unauthorized => Self::Unauthorized,
            model::Error::AlreadyInitialized(_) => Self::AlreadyInitialized,
            model::Error::NotInitialized(_) => Self::NotInitialized,
            model::Error::PeriodNotEnded { .. } => Self::PeriodNotEnded,
            model::Error::RankMismatch { .. } => Self::RankMismatch,
            model::Error::WinnerCountMismatch { .. } => Self::WinnerCountMismatch,
            model::Error::InsufficientFunds { .. } => Self::InsufficientFunds,
            model::Error::InvalidPeriodLength => Self::InvalidPeriodLength,
            model::Error::InvalidTopSpots => Self::InvalidTopSpots,
            model::Error::InvalidAmount => Self::InvalidAmount,
            model::Error::ReservedIdentity => Self::ReservedIdentity,
            model::Error::Computation(_) => Self::Computation,
        }
    }
}

/// Log the detailed model error and convert it into a program error.
pub(crate) fn model_error(err: model::Error) -> Error {
    msg!("leaderboard: {}", err);
    let code = LeaderboardError::from(err);
    error!(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_keep_their_condition() {
        assert!(matches!(
            LeaderboardError::from(model::Error::PeriodNotEnded { ends_at: 7 }),
            LeaderboardError::PeriodNotEnded
        ));
        assert!(matches!(
            LeaderboardError::from(model::Error::AlreadyInitialized(
                model::RecordKind::Treasury
            )),
            LeaderboardError::AlreadyInitialized
        ));
        assert!(matches!(
            LeaderboardError::from(model::Error::Computation("overflow")),
            LeaderboardError::Computation
        ));
    }
}
