//! Text and JSON rendering of classification and evaluation results.

use std::fmt;

use anonsurveyor_core::Result;
use anonsurveyor_core::anonymity::EvaluationOutcome;
use anonsurveyor_core::classification::{ClassificationReport, ColumnRisk};

use crate::ReportFormat;
use crate::output::to_json;

/// Human-readable classification report.
pub struct ClassificationText<'a>(pub &'a ClassificationReport);

/// Human-readable evaluation report.
pub struct EvaluationText<'a>(pub &'a EvaluationOutcome);

fn write_risks(f: &mut fmt::Formatter<'_>, title: &str, risks: &[ColumnRisk]) -> fmt::Result {
    writeln!(f, "{title}:")?;
    if risks.is_empty() {
        writeln!(f, "\t(none)")?;
    }
    for risk in risks {
        writeln!(f, "\t{}: {}", risk.column_name, risk.risk_rate)?;
    }
    writeln!(f)
}

impl fmt::Display for ClassificationText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "Dataset: {} ({} rows)",
            report.dataset_name, report.analyzed_rows
        )?;
        if !report.pruned_columns.is_empty() {
            writeln!(
                f,
                "Excluded direct identifiers: {}",
                report.pruned_columns.join(", ")
            )?;
        }
        writeln!(f)?;

        if !report.dropped_columns.is_empty() {
            writeln!(f, "Columns excluded because of missing values:")?;
            for dropped in &report.dropped_columns {
                writeln!(f, "\t{}: {:.2}", dropped.column_name, dropped.missing_percentage)?;
            }
            writeln!(f)?;
        }

        write_risks(f, "Re-identification risk rates", &report.risk_rates)?;

        let (Some(thresholds), Some(classification)) =
            (&report.thresholds, &report.classification)
        else {
            writeln!(
                f,
                "No thresholds supplied; pass --alpha and --beta to classify the columns."
            )?;
            return Ok(());
        };

        writeln!(
            f,
            "Thresholds: alpha = {}, beta = {}",
            thresholds.alpha(),
            thresholds.beta()
        )?;
        writeln!(f)?;
        write_risks(f, "Sensitive attributes", &classification.sensitive_attributes)?;
        write_risks(f, "Quasi-identifiers", &classification.quasi_identifiers)?;
        write_risks(f, "Non-sensitive attributes", &classification.non_sensitive)?;

        writeln!(f, "Advice:")?;
        writeln!(
            f,
            "\tDe-identify the columns according to their re-identification risk rates."
        )?;
        writeln!(
            f,
            "\tStart with the column with the highest risk rate and end with the column with the lowest risk rate."
        )?;
        writeln!(f, "\tAfterwards, proceed to the QID dimension stage.")
    }
}

impl fmt::Display for EvaluationText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        writeln!(f, "Dataset: {}", outcome.dataset_name)?;
        writeln!(f, "Quasi-identifiers: {}", outcome.quasi_identifiers.join(", "))?;
        writeln!(
            f,
            "Sensitive attributes: {}",
            outcome.sensitive_attributes.join(", ")
        )?;
        writeln!(f)?;

        for (index, measurement) in outcome.measurements.iter().enumerate() {
            writeln!(
                f,
                "Attempt {}: de-identified QIDs: {}",
                index + 1,
                measurement.deidentified_qids.join(", ")
            )?;
            writeln!(f, "\tK-anonymity original:\t\t{}", measurement.k_before)?;
            writeln!(f, "\tK-anonymity after:\t\t{}", measurement.k_after)?;
            writeln!(f, "\tT-closeness original:\t\t{:.4}", measurement.t_before)?;
            writeln!(f, "\tT-closeness after:\t\t{:.4}", measurement.t_after)?;
            for diversity in &measurement.l_diversity {
                writeln!(f, "\t\tSensitive attribute: {}", diversity.attribute)?;
                writeln!(f, "\t\t\tL-diversity original:\t{}", diversity.before)?;
                writeln!(f, "\t\t\tL-diversity after:\t{}", diversity.after)?;
            }
            writeln!(f, "\tPrivacy gain:\t\t\t{}", measurement.privacy_gain)?;
            writeln!(f, "\tNon-uniform entropy:\t\t{:.4}", measurement.nue)?;
            writeln!(f, "\tNon-uniform entropy(%):\t\t{}", measurement.nue_percentage)?;
            writeln!(
                f,
                "\tInverse non-uniform entropy(%):\t{}",
                measurement.inverse_nue_percentage
            )?;
            writeln!(f)?;
        }

        writeln!(f, "Optimal QID dimension: {}", outcome.optimal_dimension)?;
        writeln!(f)?;
        writeln!(f, "Advice:")?;
        writeln!(f, "\t{}", outcome.advice())
    }
}

/// Renders a classification report in the requested format.
pub fn render_classification(report: &ClassificationReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(ClassificationText(report).to_string()),
        ReportFormat::Json => to_json(report),
    }
}

/// Renders an evaluation outcome in the requested format.
pub fn render_evaluation(outcome: &EvaluationOutcome, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(EvaluationText(outcome).to_string()),
        ReportFormat::Json => to_json(outcome),
    }
}
