//! Utils

use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;

use crate::{aggregation::DEFAULT_TOP_N, observability::LoggingConfig};

/// Arguments for the scenario command
#[derive(Debug, Parser)]
#[command(
    name = "tariffscope",
    about = "Explore tariff and FX scenarios against a SKU list"
)]
pub struct ScenarioArgs {
    /// Fixture set to load the scenario and items from
    #[arg(short, long, default_value = "sample")]
    pub fixture: String,

    /// Base directory for fixture sets
    #[arg(long, default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Items CSV to use instead of the fixture set's items
    #[arg(short, long)]
    pub items: Option<PathBuf>,

    /// Scenario YAML to use instead of the fixture set's scenario
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Override the scenario's FX multiplier
    #[arg(long)]
    pub fx: Option<Decimal>,

    /// Number of rows in the top-N tables
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Write per-item results to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Logging options
    #[command(flatten)]
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn args_are_well_formed() {
        ScenarioArgs::command().debug_assert();
    }

    #[test]
    fn logging_options_read_environment() {
        let command = ScenarioArgs::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .and_then(|env| env.to_str())
                .map(str::to_string)
        };

        assert_eq!(env_of("log_level").as_deref(), Some("RUST_LOG"));
        assert_eq!(env_of("log_format").as_deref(), Some("LOG_FORMAT"));
    }

    #[test]
    fn parses_overrides() -> TestResult {
        let args = ScenarioArgs::try_parse_from([
            "tariffscope",
            "-f",
            "q3",
            "--fx",
            "1.05",
            "-n",
            "5",
            "--csv",
            "out.csv",
        ])?;

        assert_eq!(args.fixture, "q3");
        assert_eq!(args.fx, Some(dec!(1.05)));
        assert_eq!(args.top, 5);
        assert_eq!(args.csv, Some(PathBuf::from("out.csv")));
        assert!(args.items.is_none());

        Ok(())
    }
}
