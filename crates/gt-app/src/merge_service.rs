//! Gas file merge service.

use std::path::PathBuf;

use gt_gas::{GasReport, MergeSummary, TransportTable, build_report};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Smallest number of files a merge folds together.
pub const MIN_INPUTS: usize = 2;

/// Request to merge gas files into one.
#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    /// Files in priority order: on shared fields the first listed wins.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    /// Later files overwrite shared fields instead.
    pub replace: bool,
    /// Also write the JSON report next to the output.
    pub write_report: bool,
}

#[derive(Debug, Clone)]
pub struct MergeResponse {
    pub table: TransportTable,
    pub summaries: Vec<(PathBuf, MergeSummary)>,
    pub report: Option<(PathBuf, GasReport)>,
}

pub fn merge_files(request: &MergeRequest) -> AppResult<MergeResponse> {
    if request.inputs.len() < MIN_INPUTS {
        return Err(AppError::InvalidInput(format!(
            "merge needs at least {MIN_INPUTS} gas files, got {}",
            request.inputs.len()
        )));
    }

    let mut table = TransportTable::new();
    let mut summaries = Vec::with_capacity(request.inputs.len());
    for input in &request.inputs {
        let summary = table.merge_file(input, request.replace)?;
        info!(
            path = %input.display(),
            added = summary.added,
            replaced = summary.replaced,
            kept = summary.kept,
            skipped = summary.skipped,
            "merged gas file"
        );
        summaries.push((input.clone(), summary));
    }

    if table.is_empty() {
        return Err(AppError::InvalidInput(
            "all input gas files are empty".to_string(),
        ));
    }

    table.write(&request.output)?;
    info!(
        path = %request.output.display(),
        points = table.len(),
        "wrote merged gas file"
    );

    let report = if request.write_report {
        let path = request.output.with_extension("json");
        let report = build_report(&table, &[]);
        report.write_json(&path)?;
        Some((path, report))
    } else {
        None
    };

    Ok(MergeResponse {
        table,
        summaries,
        report,
    })
}
