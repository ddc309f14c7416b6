use leaderboard_model::{PayoutSchedule, MAX_TOP_SPOTS};
use serde_json::{json, Value};

use crate::config::{DisplayOptions, OutputFormat};

/// Print the payout schedule of a period.
#[derive(Debug, clap::Args)]
pub(crate) struct Schedule {
    /// Total payout of the period, in lamports.
    #[arg(long)]
    total: u64,
    /// Number of paid ranks.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_TOP_SPOTS)))]
    top_spots: u8,
}

impl super::Command for Schedule {
    fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let schedule = PayoutSchedule::new(self.total, usize::from(self.top_spots));
        let output = ctx.config().output();
        let rows = rows(&schedule);
        match output {
            OutputFormat::Json => {
                let value = json!({
                    "pool": schedule.pool(),
                    "ranks": rows,
                    "total_paid": schedule.total(),
                    "retained": schedule.retained(),
                });
                println!("{}", output.display_object(&value)?);
            }
            OutputFormat::Table => {
                println!(
                    "{}",
                    output.display_many(
                        rows,
                        DisplayOptions::table_projection([
                            ("rank", "Rank"),
                            ("share", "Share"),
                            ("cumulative", "Cumulative"),
                        ]),
                    )?
                );
                println!(
                    "{}",
                    output.display_object(&json!({
                        "total paid": schedule.total(),
                        "retained": schedule.retained(),
                    }))?
                );
            }
        }
        Ok(())
    }
}

fn rows(schedule: &PayoutSchedule) -> Vec<Value> {
    schedule
        .shares()
        .scan(0u64, |cumulative, (rank, share)| {
            *cumulative = cumulative.saturating_add(share);
            Some(json!({
                "rank": rank,
                "share": share,
                "cumulative": *cumulative,
            }))
        })
        .collect()
}
