#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Maximum number of ranks eligible for a payout.
pub const MAX_TOP_SPOTS: u8 = 10;

/// Mutable leaderboard configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeaderboardConfig {
    /// Period length in seconds.
    pub period_length: i64,
    /// Number of ranks eligible for a payout.
    pub top_spots: u8,
    /// Payout pool of each period.
    #[builder(default)]
    pub total_payout_per_period: u64,
}

impl LeaderboardConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if self.period_length <= 0 {
            return Err(crate::Error::InvalidPeriodLength);
        }
        if self.top_spots == 0 || self.top_spots > MAX_TOP_SPOTS {
            return Err(crate::Error::InvalidTopSpots);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate() {
        let config = LeaderboardConfig::builder()
            .period_length(86_400)
            .top_spots(3)
            .build();
        assert_eq!(config.total_payout_per_period, 0);
        assert_eq!(config.validate(), Ok(()));

        let zero_period = LeaderboardConfig {
            period_length: 0,
            ..config
        };
        assert_eq!(
            zero_period.validate(),
            Err(crate::Error::InvalidPeriodLength)
        );

        let negative_period = LeaderboardConfig {
            period_length: -1,
            ..config
        };
        assert_eq!(
            negative_period.validate(),
            Err(crate::Error::InvalidPeriodLength)
        );

        for top_spots in [0, MAX_TOP_SPOTS + 1] {
            let invalid = LeaderboardConfig { top_spots, ..config };
            assert_eq!(invalid.validate(), Err(crate::Error::InvalidTopSpots));
        }

        let max = LeaderboardConfig {
            top_spots: MAX_TOP_SPOTS,
            ..config
        };
        assert_eq!(max.validate(), Ok(()));
    }
}
