// grid-advisor entry point
use clap::Parser;
use engine::cli::{self, Cli, InputOverrides, NoPrompt, StdioPrompter};
use engine::config::EngineSettings;
use engine::data::MarketDataStore;
use engine::report::{self, ReportOptions};
use engine::services::{GridCalculation, GridService};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(cli.log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();

    info!("Starting Grid Advisor...");

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut settings = EngineSettings::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(format) = cli.format {
        settings.csv_format = format;
    }
    info!(
        data_dir = %settings.data_dir.display(),
        format = ?settings.csv_format,
        workers = settings.worker_threads,
        "Settings loaded"
    );

    let defaults = settings.defaults.clone();
    let market_data_store = Arc::new(RwLock::new(MarketDataStore::new()));
    let service = GridService::new(market_data_store, settings);

    if cli.non_interactive {
        let inputs = cli::resolve_inputs(&cli.overrides(), &defaults, &mut NoPrompt)?;
        let calc = service.calculate(&inputs.symbol, inputs.request).await?;
        return print_report(cli, &calc);
    }

    let mut prompter = StdioPrompter::new(std::io::stdin().lock(), std::io::stdout());
    let mut overrides = cli.overrides();
    loop {
        let outcome = match cli::resolve_inputs(&overrides, &defaults, &mut prompter) {
            Ok(inputs) => service.calculate(&inputs.symbol, inputs.request).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(calc) => return print_report(cli, &calc),
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "Calculation failed");
                println!("An error occurred: {}", e);
                if !cli::wants_retry(&mut prompter) {
                    return Ok(());
                }
                // A retry asks for every value again
                overrides = InputOverrides::default();
            }
        }
    }
}

fn print_report(cli: &Cli, calc: &GridCalculation) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", report::render_json(calc, cli.pretty)?);
    } else {
        let options = ReportOptions {
            show_candidates: cli.show_candidates,
        };
        println!();
        print!("{}", report::render_text(calc, options));
    }
    Ok(())
}
