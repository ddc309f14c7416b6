/// Leaderboard account.
pub mod leaderboard;

/// Treasury account.
pub mod treasury;

pub use leaderboard::{Leaderboard, Participant, ScoreEntry};
pub use treasury::Treasury;

/// Seed of the leaderboard PDA.
pub const LEADERBOARD_SEED: &[u8] = b"leaderboard";

/// Seed of the treasury PDA.
pub const TREASURY_SEED: &[u8] = b"treasury";
