use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dotenvy::dotenv;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tattoo_devtools::{
    cli::{Cli, Commands},
    config::Config,
    health::{HealthMonitor, ValidationTarget},
    output,
    proxy::DevProxy,
    scenarios,
    seeding::{Seeder, SetupOptions, TargetOutcome},
    tasks,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so JSON reports on stdout stay machine-readable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "tattoo_devtools=info".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn exit_status(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn seed(config: &Config, options: SetupOptions) -> Result<ExitCode> {
    let seeder = Seeder::from_config(config).await?;
    let summary = seeder.setup_data(&options).await?;
    output::print_seed_summary(&summary);
    Ok(ExitCode::from(summary.exit_code()))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load()?;
    tracing::debug!(phase = config.service_phase.as_str(), "Configuration loaded");

    let setup_options = cli.command.setup_options();

    match cli.command {
        Commands::SetupData { .. } | Commands::SeedScenario { .. } => {
            seed(&config, setup_options.unwrap_or_default()).await
        }

        Commands::ListScenarios => {
            output::print_scenarios(scenarios::list());
            Ok(ExitCode::SUCCESS)
        }

        Commands::ValidateData { target } => {
            let monitor = HealthMonitor::from_config(&config).await?;
            let report = monitor.validate(target).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(exit_status(report.has_errors()))
        }

        Commands::StudioHealth { json } => {
            let monitor = HealthMonitor::from_config(&config).await?;
            let health = monitor.studio_health().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                output::print_studio_health(&health);
            }
            Ok(exit_status(health.report.has_errors()))
        }

        Commands::DataStatus => {
            let seeder = Seeder::from_config(&config).await?;
            output::print_data_status(&seeder.data_status().await);
            Ok(ExitCode::SUCCESS)
        }

        Commands::ResetData => {
            let seeder = Seeder::from_config(&config).await?;
            let reports = seeder.reset_data().await;
            output::print_reset(&reports);
            let failed = reports
                .iter()
                .any(|r| matches!(r.outcome, TargetOutcome::Failed { .. }));
            Ok(exit_status(failed))
        }

        Commands::HealthMonitor { schedule: None } => {
            let monitor = HealthMonitor::from_config(&config).await?;
            let report = monitor.validate(ValidationTarget::All).await?;
            output::print_report_summary(&report);
            Ok(exit_status(report.has_errors()))
        }

        Commands::HealthMonitor {
            schedule: Some(schedule),
        } => {
            let monitor = Arc::new(HealthMonitor::from_config(&config).await?);
            let mut scheduler = tasks::start_health_schedule(monitor, &schedule).await?;

            tokio::signal::ctrl_c().await?;
            tracing::info!("Stopping health monitor");
            scheduler.shutdown().await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::DevProxy {
            port,
            backend,
            watch,
        } => {
            if let Some(port) = port {
                config.proxy_port = port;
            }
            if let Some(backend) = backend {
                config.proxy_backend_url = backend;
            }
            if watch.is_some() {
                config.proxy_watch_path = watch;
            }

            let handle = DevProxy::start(&config).await?;
            println!(
                "{} http://{} -> {}",
                "Dev proxy".green().bold(),
                handle.local_addr(),
                config.proxy_backend_url
            );

            tokio::signal::ctrl_c().await?;
            handle.shutdown().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
