//! Session driver for the classify and evaluate stages.
//!
//! Loads datasets from disk, turns CLI arguments into core configuration and
//! runs one pass of the classifier or the evaluator.

use std::path::Path;

use anonsurveyor_core::anonymity::{
    DeidentificationAttempt, EvaluationOutcome, EvaluationSession, EvaluatorConfig,
    TClosenessMode,
};
use anonsurveyor_core::classification::{
    ClassificationReport, ClassifierConfig, ColumnClassifier, MissingValueGate, RiskThresholds,
};
use anonsurveyor_core::{AnonSurveyorError, Dataset, DatasetFormat, Result, parse_dataset};
use tracing::{info, warn};

use crate::{ClassifyArgs, EvaluateArgs, parse_column_list};

/// Reads and parses a dataset file; the file name becomes the dataset name.
pub async fn load_dataset(path: &Path) -> Result<Dataset> {
    let format = DatasetFormat::from_path(path)?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AnonSurveyorError::Io {
            context: format!("Failed to read {}", path.display()),
            source: e,
        })?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_dataset(&name, &bytes, format)
}

/// Runs the classify stage.
pub async fn run_classify(args: &ClassifyArgs) -> Result<ClassificationReport> {
    let thresholds = match (args.alpha, args.beta) {
        (Some(alpha), Some(beta)) => Some(RiskThresholds::new(alpha, beta)?),
        (None, None) => None,
        _ => {
            return Err(AnonSurveyorError::invalid_input(
                "--alpha and --beta must be given together",
            ));
        }
    };

    let gate = if args.per_column_missing_gate {
        MissingValueGate::PerColumn
    } else {
        MissingValueGate::DatasetWide
    };
    let config = ClassifierConfig::new()
        .with_missing_threshold_pct(args.missing_threshold)
        .with_missing_gate(gate);

    let dataset = load_dataset(&args.input).await?;
    info!(
        "Loaded '{}' with {} rows and {} columns",
        dataset.name(),
        dataset.row_count(),
        dataset.column_count()
    );

    let excluded = parse_column_list(&args.exclude);
    ColumnClassifier::new(config).classify(dataset, &excluded, thresholds)
}

/// Runs the evaluate stage over the attempts in command-line order.
///
/// Evaluation stops once every declared QID is covered; later attempts are
/// ignored. Running out of attempts before that is an input error.
pub async fn run_evaluate(args: &EvaluateArgs) -> Result<EvaluationOutcome> {
    let mode = if args.conditional_t {
        TClosenessMode::Conditional
    } else {
        TClosenessMode::Global
    };
    let config = EvaluatorConfig::new()
        .with_t_closeness_mode(mode)
        .with_min_k_anonymity(args.min_k);

    let original = load_dataset(&args.original).await?;
    let suppressed = load_dataset(&args.suppressed).await?;

    let mut session = EvaluationSession::new(
        config,
        original,
        &suppressed,
        parse_column_list(&args.qids),
        parse_column_list(&args.sas),
    )?;

    for (index, spec) in args.attempts.iter().enumerate() {
        if session.is_complete() {
            warn!(
                "All QIDs were processed; ignoring {} remaining attempt(s)",
                args.attempts.len() - index
            );
            break;
        }

        let after = load_dataset(&spec.path).await?;
        session.evaluate(DeidentificationAttempt::new(after, spec.qids.iter().cloned()))?;
    }

    if !session.is_complete() {
        return Err(AnonSurveyorError::invalid_input(format!(
            "attempts do not cover every declared QID; missing: {}",
            session.remaining_qids().join(", ")
        )));
    }

    session.finish()
}
