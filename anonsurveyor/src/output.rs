//! File output operations for classification and evaluation reports.
//!
//! Handles writing rendered reports to stdout or files with optional
//! compression.

use anonsurveyor_core::{AnonSurveyorError, Result};
use serde::Serialize;
use std::path::Path;

use crate::OutputArgs;

/// Serializes a report to pretty-printed JSON.
pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| AnonSurveyorError::Serialization {
        context: "report serialization".to_string(),
        source: e,
    })
}

/// Writes a rendered report according to the output arguments.
///
/// Without an output path the report goes to stdout; logs stay on stderr.
pub async fn emit_report(rendered: &str, args: &OutputArgs) -> Result<()> {
    match &args.output {
        None => {
            if args.compress {
                tracing::warn!("--compress has no effect without --output");
            }
            println!("{rendered}");
            Ok(())
        }
        Some(path) if args.compress => {
            #[cfg(feature = "compression")]
            {
                save_compressed(rendered, path).await
            }
            #[cfg(not(feature = "compression"))]
            {
                let _ = path;
                Err(AnonSurveyorError::invalid_input(
                    "Compression not available. Compile with --features compression",
                ))
            }
        }
        Some(path) => save_report(rendered, path).await,
    }
}

/// Saves a rendered report to file.
pub async fn save_report(rendered: &str, output_path: &Path) -> Result<()> {
    tokio::fs::write(output_path, rendered)
        .await
        .map_err(|e| AnonSurveyorError::Io {
            context: format!("Failed to write to {}", output_path.display()),
            source: e,
        })?;
    tracing::info!("Report written to {}", output_path.display());
    Ok(())
}

/// Saves a compressed report.
#[cfg(feature = "compression")]
async fn save_compressed(rendered: &str, output_path: &Path) -> Result<()> {
    use std::io::Write;

    let mut encoder = zstd::Encoder::new(Vec::new(), 3).map_err(|e| AnonSurveyorError::Io {
        context: "Failed to create compressor".to_string(),
        source: e,
    })?;

    encoder
        .write_all(rendered.as_bytes())
        .map_err(|e| AnonSurveyorError::Io {
            context: "Compression failed".to_string(),
            source: e,
        })?;

    let compressed_data = encoder.finish().map_err(|e| AnonSurveyorError::Io {
        context: "Compression finalization failed".to_string(),
        source: e,
    })?;

    tokio::fs::write(output_path, compressed_data)
        .await
        .map_err(|e| AnonSurveyorError::Io {
            context: format!(
                "Failed to write compressed file to {}",
                output_path.display()
            ),
            source: e,
        })?;

    tracing::info!("Compressed report written to {}", output_path.display());
    Ok(())
}
