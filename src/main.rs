mod cli;
mod config;
mod error;
mod estimate;
mod params;
mod provider;
mod response;
mod server;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::EstimatorConfig;
use error::EstimateError;
use params::EstimateParams;
use response::{ErrorBody, EstimateBody};
use server::AppState;
use ui::EstimateProgress;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = EstimatorConfig::load_from(&cli.config)?;

    match cli.command {
        Command::Estimate {
            workflow_id,
            project_user,
            project_name,
            project_vcs,
            token,
            circle_url,
            json,
        } => {
            let token = token.unwrap_or_else(|| config.circle_token.clone());
            let params = match EstimateParams::new(
                &token,
                &workflow_id,
                &project_user,
                &project_name,
                &project_vcs,
                circle_url.as_deref(),
            ) {
                Ok(params) => params,
                Err(err) => return Ok(report_error(&err, json)),
            };
            Ok(run_estimate(&config, &params, json).await)
        }
        Command::Serve { addr } => {
            let pricing = Arc::new(config.pricing_table());
            server::serve(addr, Arc::new(AppState { config, pricing })).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_estimate(config: &EstimatorConfig, params: &EstimateParams, json: bool) -> ExitCode {
    let progress = (!json).then(|| EstimateProgress::start(&params.workflow_id));

    let pricing = Arc::new(config.pricing_table());
    let result = server::estimate_workflow(config, pricing, params).await;

    match (result, progress) {
        (Ok(estimate), progress) => {
            let body = EstimateBody::new(&estimate, config.credit_price, &config.disclaimer);
            match progress {
                Some(progress) => progress.finish(&body),
                None => print_json(&body),
            }
            ExitCode::SUCCESS
        }
        (Err(err), Some(progress)) => {
            progress.fail(&err);
            exit_code(&err)
        }
        (Err(err), None) => report_error(&err, true),
    }
}

fn report_error(err: &EstimateError, json: bool) -> ExitCode {
    if json {
        print_json(&ErrorBody::from(err));
    } else {
        eprintln!("error: {err}");
    }
    exit_code(err)
}

/// Not-ready workflows exit with 2 so scripts can poll; other failures with 1.
fn exit_code(err: &EstimateError) -> ExitCode {
    match err.kind() {
        error::ErrorKind::NotReady => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("error: failed to serialize output: {e}"),
    }
}
