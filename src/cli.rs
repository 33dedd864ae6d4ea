//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::health::ValidationTarget;
use crate::seeding::SetupOptions;

#[derive(Parser, Debug)]
#[command(name = "tattoo-devtools")]
#[command(
    author,
    version,
    about = "Seed, validate and proxy the tattoo directory's local development stack"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a dataset and write it to every configured store.
    SetupData {
        /// Only write the frontend mock data file
        #[arg(long)]
        frontend_only: bool,
        /// Number of artists to generate
        #[arg(long)]
        count: Option<usize>,
        /// Scenario preset to generate (defaults to full-dataset)
        #[arg(long)]
        scenario: Option<String>,
        /// Also write dataset.json, artists.json and studios.json to the export directory
        #[arg(long)]
        export: bool,
    },

    /// Seed a named scenario preset.
    SeedScenario {
        /// Scenario name, see list-scenarios
        name: String,
    },

    /// List the available scenario presets.
    ListScenarios,

    /// Validate stored data and print the report as JSON.
    ValidateData {
        #[arg(long = "type", value_enum, default_value_t = ValidationTarget::All)]
        target: ValidationTarget,
    },

    /// Validate studios and suggest fixes.
    StudioHealth {
        /// Print the report and guidance as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show record counts per store.
    DataStatus,

    /// Remove seeded records from the key-value store and search index.
    ResetData,

    /// Run a full validation, once or on a cron schedule.
    HealthMonitor {
        /// Cron expression with seconds, e.g. "0 */5 * * * *"
        #[arg(long)]
        schedule: Option<String>,
    },

    /// Run the hot-reload proxy in front of the backend API.
    DevProxy {
        #[arg(long)]
        port: Option<u16>,
        /// Backend base URL
        #[arg(long)]
        backend: Option<String>,
        /// Source directory to watch for changes
        #[arg(long)]
        watch: Option<PathBuf>,
    },
}

impl Commands {
    /// Seeding options for `setup-data` and `seed-scenario`
    pub fn setup_options(&self) -> Option<SetupOptions> {
        match self {
            Self::SetupData {
                frontend_only,
                count,
                scenario,
                export,
            } => Some(SetupOptions {
                scenario: scenario.clone(),
                count: *count,
                frontend_only: *frontend_only,
                export: *export,
            }),
            Self::SeedScenario { name } => Some(SetupOptions::scenario(name.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_data_flags() {
        let cli = Cli::parse_from([
            "tattoo-devtools",
            "setup-data",
            "--frontend-only",
            "--count",
            "25",
            "--export",
        ]);
        let options = cli.command.setup_options().unwrap();
        assert!(options.frontend_only);
        assert!(options.export);
        assert_eq!(options.count, Some(25));
        assert_eq!(options.scenario, None);
    }

    #[test]
    fn test_seed_scenario_is_setup_with_scenario() {
        let cli = Cli::parse_from(["tattoo-devtools", "seed-scenario", "minimal"]);
        assert_eq!(
            cli.command.setup_options(),
            Some(SetupOptions::scenario("minimal"))
        );
    }

    #[test]
    fn test_validate_type_defaults_to_all() {
        let cli = Cli::parse_from(["tattoo-devtools", "validate-data"]);
        assert!(matches!(
            cli.command,
            Commands::ValidateData {
                target: ValidationTarget::All
            }
        ));

        let cli = Cli::parse_from(["tattoo-devtools", "validate-data", "--type", "studios"]);
        assert!(matches!(
            cli.command,
            Commands::ValidateData {
                target: ValidationTarget::Studios
            }
        ));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
