//! Gas file inspection service.

use std::path::PathBuf;

use gt_gas::{GasReport, TransportTable, build_report};
use tracing::info;

use crate::error::AppResult;

/// Request to read a gas file.
#[derive(Debug, Clone, Default)]
pub struct ReadRequest {
    pub path: PathBuf,
    /// Report at these fields instead of the stored grid.
    pub fields: Vec<f64>,
    /// Write the report here instead of only returning it.
    pub json_output: Option<PathBuf>,
}

/// Load a gas file and build its report.
pub fn read_report(request: &ReadRequest) -> AppResult<GasReport> {
    let table = TransportTable::load(&request.path)?;
    info!(
        path = %request.path.display(),
        gas = %table.mixture(),
        points = table.len(),
        "loaded gas file"
    );

    let report = build_report(&table, &request.fields);
    if let Some(path) = &request.json_output {
        report.write_json(path)?;
        info!(path = %path.display(), "wrote report");
    }
    Ok(report)
}
