//! Re-identification risk assessment tool.
//!
//! This binary scores the columns of a tabular dataset by re-identification
//! risk and evaluates how well a sequence of de-identification attempts
//! trades privacy gain against utility loss.
//!
//! # Privacy Guarantees
//! - Input datasets are read only, never modified
//! - Cell values are never logged
//! - Offline operation

use anonsurveyor::report::{render_classification, render_evaluation};
use anonsurveyor::{Cli, Command, output::emit_report, session};
use anonsurveyor_core::init_logging;
use anyhow::Context;
use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose, cli.global.quiet).context("failed to initialize logging")?;

    let result = match &cli.command {
        Command::Classify(args) => classify(args).await,
        Command::Evaluate(args) => evaluate(args).await,
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn classify(args: &anonsurveyor::ClassifyArgs) -> anyhow::Result<()> {
    let report = session::run_classify(args)
        .await
        .with_context(|| format!("classification of {} failed", args.input.display()))?;
    let rendered = render_classification(&report, args.output.format)?;
    emit_report(&rendered, &args.output).await?;
    Ok(())
}

async fn evaluate(args: &anonsurveyor::EvaluateArgs) -> anyhow::Result<()> {
    let outcome = session::run_evaluate(args)
        .await
        .with_context(|| format!("evaluation of {} failed", args.original.display()))?;
    let rendered = render_evaluation(&outcome, args.output.format)?;
    emit_report(&rendered, &args.output).await?;
    Ok(())
}
