use enum_dispatch::enum_dispatch;

use schedule::Schedule;
use simulate::Simulate;

use crate::config::Config;

mod schedule;
mod simulate;

/// Commands.
#[enum_dispatch(Command)]
#[derive(Debug, clap::Subcommand)]
pub(crate) enum Commands {
    /// Print the decaying payout schedule of a period.
    Schedule(Schedule),
    /// Replay a scenario file against an in-memory leaderboard.
    Simulate(Simulate),
}

#[enum_dispatch]
pub(crate) trait Command {
    fn execute(&self, ctx: Context<'_>) -> eyre::Result<()>;
}

pub(crate) struct Context<'a> {
    config: &'a Config,
}

impl<'a> Context<'a> {
    pub(crate) fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub(crate) fn config(&self) -> &Config {
        self.config
    }
}
