//! CLI entrypoint for The Council AI
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{NoopObserver, Orchestrator};
use council_infrastructure::{ConfigLoader, HttpBoardApi, WsSessionConnector};
use council_presentation::{
    Cli, ConsoleFormatter, CouncilRepl, TranscriptReporter, save_diagram, save_report,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!("{e}"))?
    };
    if !config.output.color {
        colored::control::set_override(false);
    }
    info!("Using board service at {}", config.server.base_url);

    // === Dependency Injection ===
    let connector = Arc::new(WsSessionConnector::new(&config.server.base_url));
    let api = Arc::new(HttpBoardApi::new(
        reqwest::Client::new(),
        &config.server.base_url,
    ));
    let mut orchestrator = Orchestrator::new(connector, api);

    let show_transcript = !cli.quiet && config.output.show_transcript;

    // Chat mode
    if cli.chat {
        let mut repl = CouncilRepl::new(orchestrator)
            .with_transcript(show_transcript)
            .with_json_output(cli.json);
        repl.run().await?;
        return Ok(());
    }

    // One-shot mode - a question is required
    let query = match cli.query {
        Some(q) => q,
        None => bail!("A question is required. Use --chat for interactive mode."),
    };

    let result = if show_transcript {
        let reporter = TranscriptReporter::new();
        orchestrator
            .submit_query_with_observer(&query, &reporter)
            .await
    } else {
        orchestrator
            .submit_query_with_observer(&query, &NoopObserver)
            .await
    };
    if let Err(e) = result {
        bail!("Deliberation failed: {e}");
    }

    let snapshot = orchestrator.snapshot();
    let board = snapshot
        .board
        .clone()
        .context("deliberation finished without a board result")?;

    if cli.json {
        println!("{}", ConsoleFormatter::format_json(&board));
    } else {
        println!("{}", ConsoleFormatter::format(&board));
    }

    if let Some(path) = cli.diagram.as_deref() {
        match snapshot.diagram {
            Some(ref diagram) => {
                save_diagram(diagram, path)?;
                println!("Decision map saved to {}", path.display());
            }
            None => eprintln!("Diagram unavailable for this decision."),
        }
    }

    if let Some(report_path) = cli.report {
        // Export failure is a one-shot alert; the decision stands.
        match orchestrator.export_report().await {
            Ok(report) => {
                let written = save_report(&report, report_path.as_deref())?;
                println!("Report saved to {}", written.display());
            }
            Err(e) => eprintln!("Report export failed: {e}"),
        }
    }

    if cli.execute {
        if show_transcript {
            let reporter = TranscriptReporter::new();
            orchestrator
                .request_execution_with_observer(&reporter)
                .await?;
        } else {
            orchestrator
                .request_execution_with_observer(&NoopObserver)
                .await?;
        }
    }

    Ok(())
}
