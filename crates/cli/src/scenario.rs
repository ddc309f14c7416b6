use std::{collections::BTreeMap, path::Path};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use leaderboard_model::{
    Error as ModelError, LeaderboardConfig, LeaderboardExt, MemoryHost, Processor, TimeSource,
    Treasury,
};
use serde::{Deserialize, Serialize};

use crate::config::ENV_PREFIX;

/// Identity of an account in a scenario.
type Key = String;

type ScenarioProcessor = Processor<Key, MemoryHost<Key>>;

/// A scripted sequence of leaderboard operations.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Scenario {
    /// Admin the leaderboard and treasury belong to.
    #[serde(default = "default_admin")]
    admin: String,
    /// Initial clock reading.
    #[serde(default)]
    start: i64,
    /// Initial balances of external accounts.
    #[serde(default)]
    accounts: BTreeMap<String, u64>,
    #[serde(default)]
    steps: Vec<Step>,
}

fn default_admin() -> String {
    "admin".to_string()
}

/// A single step of a [`Scenario`].
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Step {
    #[serde(flatten)]
    action: Action,
    /// Signer of the step, defaults to the admin.
    #[serde(default)]
    caller: Option<String>,
    /// Condition name the step must fail with.
    #[serde(default)]
    expect_error: Option<String>,
}

#[derive(Debug, Clone, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "action", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum Action {
    Initialize(ConfigArgs),
    UpdateConfig(ConfigArgs),
    UpdateScores {
        scores: Vec<ScoreReport>,
    },
    FundTreasury {
        amount: u64,
    },
    AdvanceClock {
        by: Seconds,
    },
    /// Winners default to the current top ranks.
    EndPeriod {
        #[serde(default)]
        winners: Option<Vec<String>>,
    },
    CloseLeaderboard,
    CloseTreasury,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct ConfigArgs {
    period_length: Seconds,
    top_spots: u8,
    #[serde(default)]
    total_payout_per_period: u64,
}

impl From<ConfigArgs> for LeaderboardConfig {
    fn from(args: ConfigArgs) -> Self {
        LeaderboardConfig::builder()
            .period_length(args.period_length.0)
            .top_spots(args.top_spots)
            .total_payout_per_period(args.total_payout_per_period)
            .build()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ScoreReport {
    player: String,
    score: u64,
}

/// A non-negative duration in seconds, given either as an integer or as a
/// humantime string such as `"1day"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSeconds")]
pub(crate) struct Seconds(i64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeconds {
    Seconds(i64),
    Text(String),
}

impl TryFrom<RawSeconds> for Seconds {
    type Error = String;

    fn try_from(raw: RawSeconds) -> Result<Self, Self::Error> {
        match raw {
            RawSeconds::Seconds(seconds) if seconds < 0 => {
                Err(format!("duration must not be negative, got {seconds}"))
            }
            RawSeconds::Seconds(seconds) => Ok(Self(seconds)),
            RawSeconds::Text(text) => {
                let duration = humantime::parse_duration(&text)
                    .map_err(|err| format!("invalid duration `{text}`: {err}"))?;
                i64::try_from(duration.as_secs())
                    .map(Self)
                    .map_err(|_| format!("duration `{text}` is too long"))
            }
        }
    }
}

/// Outcome of a replayed step.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StepOutcome {
    pub(crate) step: usize,
    pub(crate) action: &'static str,
    pub(crate) caller: String,
    pub(crate) ok: bool,
    pub(crate) outcome: String,
}

/// A ranked participant in the final state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct BoardRow {
    pub(crate) rank: usize,
    pub(crate) player: String,
    pub(crate) score: u64,
}

/// Final state of a replay.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Report {
    pub(crate) steps: Vec<StepOutcome>,
    pub(crate) now: i64,
    /// `None` if the leaderboard is not live.
    pub(crate) board: Option<Vec<BoardRow>>,
    pub(crate) period_start: Option<i64>,
    pub(crate) period_end: Option<i64>,
    /// `None` if the treasury is not live.
    pub(crate) treasury: Option<u64>,
    pub(crate) balances: BTreeMap<String, u64>,
}

impl Scenario {
    /// Load a scenario file. Top-level fields may be overridden with
    /// `LEADERBOARD_SCENARIO_*` variables.
    pub(crate) fn load(path: &Path) -> eyre::Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(path))
                .merge(Env::prefixed(&format!("{ENV_PREFIX}SCENARIO_"))),
        )
    }

    pub(crate) fn from_figment(figment: Figment) -> eyre::Result<Self> {
        Ok(figment.extract()?)
    }

    /// Replay every step against a fresh in-memory host.
    ///
    /// A failing step is recorded and the replay goes on, unless the step
    /// carries an `expect_error` that does not match its outcome.
    pub(crate) fn replay(&self) -> eyre::Result<Report> {
        let mut host = MemoryHost::new(self.start);
        for (account, amount) in &self.accounts {
            host.airdrop(account.clone(), *amount)?;
        }
        let mut processor = Processor::new(host);

        let mut steps = Vec::with_capacity(self.steps.len());
        for (idx, step) in self.steps.iter().enumerate() {
            let index = idx + 1;
            let action: &'static str = (&step.action).into();
            let caller = step.caller.clone().unwrap_or_else(|| self.admin.clone());
            let _span = tracing::info_span!("step", index, action).entered();

            let result = self.apply(&mut processor, &caller, &step.action);
            let (ok, outcome) = match (result, step.expect_error.as_deref()) {
                (Ok(summary), None) => {
                    tracing::info!(%summary, "done");
                    (true, summary)
                }
                (Ok(summary), Some(expected)) => {
                    eyre::bail!(
                        "step {index} ({action}) succeeded with `{summary}` but `{expected}` was expected"
                    );
                }
                (Err(err), Some(expected)) if err.name() == expected => {
                    tracing::info!(%err, "failed as expected");
                    (true, format!("failed as expected: {}", err.name()))
                }
                (Err(err), Some(expected)) => {
                    eyre::bail!(
                        "step {index} ({action}) failed with `{}` ({err}) but `{expected}` was expected",
                        err.name()
                    );
                }
                (Err(err), None) => {
                    tracing::warn!(%err, "failed");
                    (false, format!("{}: {err}", err.name()))
                }
            };
            steps.push(StepOutcome {
                step: index,
                action,
                caller,
                ok,
                outcome,
            });
        }

        Ok(self.report(&processor, steps))
    }

    fn apply(
        &self,
        processor: &mut ScenarioProcessor,
        caller: &Key,
        action: &Action,
    ) -> Result<String, ModelError> {
        let admin = &self.admin;
        match action {
            Action::Initialize(args) => {
                processor.initialize(caller, (*args).into())?;
                Ok(format!(
                    "period {}s, top {}, payout {}",
                    args.period_length.0, args.top_spots, args.total_payout_per_period
                ))
            }
            Action::UpdateConfig(args) => {
                processor.update_config(caller, admin, (*args).into())?;
                Ok(format!(
                    "period {}s, top {}, payout {}",
                    args.period_length.0, args.top_spots, args.total_payout_per_period
                ))
            }
            Action::UpdateScores { scores } => {
                let report = processor.update_scores(
                    caller,
                    admin,
                    scores
                        .iter()
                        .map(|report| (report.player.clone(), report.score)),
                )?;
                Ok(format!(
                    "updated {}, inserted {}, evicted {}",
                    report.updated, report.inserted, report.evicted
                ))
            }
            Action::FundTreasury { amount } => {
                let balance = processor.fund_treasury(caller, admin, *amount)?;
                Ok(format!("treasury balance {balance}"))
            }
            Action::AdvanceClock { by } => {
                processor.host_mut().advance(by.0);
                Ok(format!("now {}", processor.host().now()))
            }
            Action::EndPeriod { winners } => {
                let winners = match winners {
                    Some(winners) => winners.clone(),
                    None => {
                        let leaderboard = processor.leaderboard(admin)?;
                        leaderboard
                            .ranked()
                            .take(leaderboard.winner_count())
                            .map(|entry| entry.key.clone())
                            .collect()
                    }
                };
                let settlement =
                    processor.end_period_and_distribute_payouts(caller, admin, &winners)?;
                let paid = settlement
                    .payouts
                    .iter()
                    .map(|payout| format!("#{} {} {}", payout.rank, payout.recipient, payout.amount))
                    .collect::<Vec<_>>();
                Ok(format!(
                    "paid {} [{}], retained {}",
                    settlement.total_paid,
                    paid.join(", "),
                    settlement.retained
                ))
            }
            Action::CloseLeaderboard => {
                processor.close_leaderboard_account(caller, admin)?;
                Ok("leaderboard closed".to_string())
            }
            Action::CloseTreasury => {
                let refund = processor.close_treasury_account(caller, admin)?;
                Ok(format!("treasury closed, refunded {refund}"))
            }
        }
    }

    fn report(&self, processor: &ScenarioProcessor, steps: Vec<StepOutcome>) -> Report {
        let leaderboard = processor.leaderboard(&self.admin).ok();
        Report {
            steps,
            now: processor.host().now(),
            board: leaderboard.map(|leaderboard| {
                leaderboard
                    .ranked()
                    .enumerate()
                    .map(|(idx, entry)| BoardRow {
                        rank: idx + 1,
                        player: entry.key.clone(),
                        score: entry.score,
                    })
                    .collect()
            }),
            period_start: leaderboard.map(|leaderboard| leaderboard.period_clock().start()),
            period_end: leaderboard.map(|leaderboard| leaderboard.period_clock().ends_at()),
            treasury: processor
                .treasury(&self.admin)
                .ok()
                .map(|treasury| treasury.balance()),
            balances: processor
                .host()
                .balances()
                .map(|(account, balance)| (account.clone(), balance))
                .collect(),
        }
    }
}
