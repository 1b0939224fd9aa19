mod cli;
mod config;
mod error;
mod gdocs;
mod logging;
mod notion;
mod openai;
mod orchestrator;
mod persona;
mod prompt;
mod state_machine;
mod ui;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;

use cli::{Cli, Command};
use config::RunnerConfig;
use error::RunnerError;
use gdocs::DocPublisher;
use notion::{NotionClient, TaskQueue};
use openai::Generator;
use orchestrator::JobOrchestrator;
use ui::RunReport;

/// Build the immutable run configuration, applying CLI overrides.
fn load_config(cli: &Cli) -> Result<RunnerConfig, RunnerError> {
    let mut config = RunnerConfig::load(cli.config.as_deref())?;
    if cli.offline {
        config.offline = true;
    }
    if let Some(model) = &cli.model {
        config.openai_model = model.clone();
    }
    Ok(config)
}

/// The queue filter compares against the local calendar date.
fn resolve_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;

    let config = load_config(&cli)?;
    let queue = NotionClient::from_config(&config).context("failed to build queue client")?;
    let report = RunReport::default();

    match cli.command {
        Command::List { date } => {
            let jobs = queue.list_due(resolve_today(date)).await?;
            report.print_due(&jobs);
        }
        Command::Run { date, json } => {
            let persona = persona::load_persona(&config.persona_path);
            let generator =
                Generator::from_config(&config, persona).context("failed to build model client")?;
            let publisher = DocPublisher::from_config(&config)
                .context("failed to build document publisher")?;

            let orchestrator =
                JobOrchestrator::new(queue, generator, publisher, config.default_gate);
            let summary = orchestrator.run(resolve_today(date)).await?;

            if json {
                report.print_json(&summary);
            } else {
                report.print_summary(&summary);
            }
        }
    }

    Ok(())
}
