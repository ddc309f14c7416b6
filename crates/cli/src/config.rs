use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use prettytable::{format::consts::FORMAT_CLEAN, Cell, Row, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of the environment variables overriding the config file.
pub(crate) const ENV_PREFIX: &str = "LEADERBOARD_";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Output format.
    output: OutputFormat,
    /// Default log filter, used when `RUST_LOG` is not set.
    log: Option<String>,
}

impl Config {
    /// Load the config from defaults, the optional config file and the
    /// environment, in that order.
    pub(crate) fn load(path: Option<&Path>) -> eyre::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub(crate) fn from_figment(figment: Figment) -> eyre::Result<Self> {
        Ok(figment.extract()?)
    }

    pub(crate) fn output(&self) -> OutputFormat {
        self.output
    }

    pub(crate) fn set_output(&mut self, output: OutputFormat) {
        self.output = output;
    }

    pub(crate) fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Table,
    /// JSON.
    Json,
}

/// Options for displaying a list of items.
#[derive(Debug, Clone, Default)]
pub(crate) struct DisplayOptions {
    /// `(key, title)` pairs selecting the table columns. All keys of the
    /// first item are shown when empty.
    projection: Vec<(String, String)>,
}

impl DisplayOptions {
    /// Show only the given `(key, title)` columns in tables.
    pub(crate) fn table_projection<'a>(
        columns: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            projection: columns
                .into_iter()
                .map(|(key, title)| (key.to_string(), title.to_string()))
                .collect(),
        }
    }
}

impl OutputFormat {
    /// Render a list of JSON objects.
    pub(crate) fn display_many(
        &self,
        items: impl IntoIterator<Item = Value>,
        options: DisplayOptions,
    ) -> eyre::Result<String> {
        let items = items.into_iter().collect::<Vec<_>>();
        match self {
            Self::Json => Ok(serde_json::to_string_pretty(&items)?),
            Self::Table => {
                let columns = if options.projection.is_empty() {
                    items
                        .first()
                        .and_then(Value::as_object)
                        .map(|object| {
                            object
                                .keys()
                                .map(|key| (key.clone(), key.clone()))
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default()
                } else {
                    options.projection
                };

                let mut table = Table::new();
                table.set_format(*FORMAT_CLEAN);
                table.set_titles(Row::new(
                    columns.iter().map(|(_, title)| Cell::new(title)).collect(),
                ));
                for item in &items {
                    table.add_row(Row::new(
                        columns
                            .iter()
                            .map(|(key, _)| Cell::new(&display_cell(item.get(key))))
                            .collect(),
                    ));
                }
                Ok(table.to_string())
            }
        }
    }

    /// Render a single JSON object as `key: value` lines.
    pub(crate) fn display_object(&self, value: &Value) -> eyre::Result<String> {
        match self {
            Self::Json => Ok(serde_json::to_string_pretty(value)?),
            Self::Table => {
                let Some(object) = value.as_object() else {
                    return Ok(display_cell(Some(value)));
                };
                let mut table = Table::new();
                table.set_format(*FORMAT_CLEAN);
                for (key, value) in object {
                    table.add_row(Row::new(vec![
                        Cell::new(key),
                        Cell::new(&display_cell(Some(value))),
                    ]));
                }
                Ok(table.to_string())
            }
        }
    }
}

fn display_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn config_file_overrides_defaults() -> eyre::Result<()> {
        let config = Config::from_figment(Figment::from(Serialized::defaults(Config::default())))?;
        assert_eq!(config.output(), OutputFormat::Table);
        assert_eq!(config.log(), None);

        let config = Config::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::string("output = \"json\"\nlog = \"debug\"")),
        )?;
        assert_eq!(config.output(), OutputFormat::Json);
        assert_eq!(config.log(), Some("debug"));
        Ok(())
    }

    #[test]
    fn table_follows_projection() -> eyre::Result<()> {
        let items = [
            json!({ "rank": 1, "player": "alice", "score": 90 }),
            json!({ "rank": 2, "player": "bob", "score": 40 }),
        ];
        let table = OutputFormat::Table.display_many(
            items.clone(),
            DisplayOptions::table_projection([("player", "Player"), ("score", "Score")]),
        )?;
        assert!(table.contains("Player"));
        assert!(table.contains("alice"));
        assert!(!table.contains("\"alice\""));
        assert!(!table.contains("Rank"));

        let json = OutputFormat::Json.display_many(items, DisplayOptions::default())?;
        let parsed: Value = serde_json::from_str(&json)?;
        assert_eq!(parsed[1]["player"], "bob");
        Ok(())
    }
}
