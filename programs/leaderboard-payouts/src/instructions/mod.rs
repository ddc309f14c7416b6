pub mod close;
pub mod end_period;
pub mod fund_treasury;
pub mod initialize;
pub mod update_config;
pub mod update_scores;

pub use close::*;
pub use end_period::*;
pub use fund_treasury::*;
pub use initialize::*;
pub use update_config::*;
pub use update_scores::*;
