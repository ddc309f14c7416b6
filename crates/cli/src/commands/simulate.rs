use std::path::PathBuf;

use serde_json::json;

use crate::{
    config::{DisplayOptions, OutputFormat},
    scenario::Scenario,
};

/// Replay a scenario file.
#[derive(Debug, clap::Args)]
pub(crate) struct Simulate {
    /// Path to the scenario file (TOML).
    scenario: PathBuf,
}

impl super::Command for Simulate {
    fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        tracing::info!(path = %self.scenario.display(), "loading scenario");
        let report = Scenario::load(&self.scenario)?.replay()?;
        let output = ctx.config().output();

        match output {
            OutputFormat::Json => {
                println!("{}", output.display_object(&serde_json::to_value(&report)?)?);
            }
            OutputFormat::Table => {
                let steps = report
                    .steps
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<Vec<_>, _>>()?;
                println!(
                    "{}",
                    output.display_many(
                        steps,
                        DisplayOptions::table_projection([
                            ("step", "Step"),
                            ("action", "Action"),
                            ("caller", "Caller"),
                            ("outcome", "Outcome"),
                        ]),
                    )?
                );

                match &report.board {
                    Some(board) if !board.is_empty() => {
                        let rows = board
                            .iter()
                            .map(serde_json::to_value)
                            .collect::<Result<Vec<_>, _>>()?;
                        println!(
                            "{}",
                            output.display_many(
                                rows,
                                DisplayOptions::table_projection([
                                    ("rank", "Rank"),
                                    ("player", "Player"),
                                    ("score", "Score"),
                                ]),
                            )?
                        );
                    }
                    Some(_) => println!("Leaderboard is empty\n"),
                    None => println!("Leaderboard is closed\n"),
                }

                println!(
                    "{}",
                    output.display_object(&json!({
                        "now": report.now,
                        "period start": report.period_start,
                        "period end": report.period_end,
                        "treasury": report.treasury,
                    }))?
                );

                let balances = report
                    .balances
                    .iter()
                    .map(|(account, balance)| json!({ "account": account, "balance": balance }));
                println!(
                    "{}",
                    output.display_many(
                        balances,
                        DisplayOptions::table_projection([
                            ("account", "Account"),
                            ("balance", "Balance"),
                        ]),
                    )?
                );
            }
        }
        Ok(())
    }
}
