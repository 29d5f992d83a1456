//! JSON exchange report built from a transport table.

use crate::error::{GasError, GasResult};
use crate::table::TransportTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportComponents {
    pub labels: Vec<String>,
    pub fractions: Vec<f64>,
}

/// Snapshot of a table at a list of electric fields.
///
/// Units: °C, bar, V/cm, cm/µs, cm^1/2, 1/cm. A quantity that is exactly zero
/// at every field is left out of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasReport {
    pub name: String,
    pub temperature: f64,
    pub pressure: f64,
    pub components: ReportComponents,
    pub electric_field: Vec<f64>,
    #[serde(
        rename = "electron_drift_velocity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub drift_velocity: Option<Vec<f64>>,
    #[serde(
        rename = "electron_transversal_diffusion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transversal_diffusion: Option<Vec<f64>>,
    #[serde(
        rename = "electron_longitudinal_diffusion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub longitudinal_diffusion: Option<Vec<f64>>,
    #[serde(
        rename = "electron_townsend",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub townsend: Option<Vec<f64>>,
    #[serde(
        rename = "electron_attachment",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub attachment: Option<Vec<f64>>,
}

fn unless_all_zero(values: Vec<f64>) -> Option<Vec<f64>> {
    if values.iter().all(|&v| v == 0.0) {
        None
    } else {
        Some(values)
    }
}

/// Build the report at `override_fields`, or at the table grid when empty.
///
/// Off-grid fields are interpolated; a single warning lists how many.
pub fn build_report(table: &TransportTable, override_fields: &[f64]) -> GasReport {
    let fields = if override_fields.is_empty() {
        table.field_grid()
    } else {
        override_fields.to_vec()
    };

    let off_grid = fields.iter().filter(|&&e| !table.contains_field(e)).count();
    if off_grid > 0 && !table.is_empty() {
        warn!(
            off_grid,
            requested = fields.len(),
            "electric field values not in the table; results are interpolated"
        );
    }

    let mut drift = Vec::with_capacity(fields.len());
    let mut longitudinal = Vec::with_capacity(fields.len());
    let mut transversal = Vec::with_capacity(fields.len());
    let mut townsend = Vec::with_capacity(fields.len());
    let mut attachment = Vec::with_capacity(fields.len());
    for &e in &fields {
        drift.push(table.drift_velocity(e));
        let (l, t) = table.diffusion(e);
        longitudinal.push(l);
        transversal.push(t);
        townsend.push(table.townsend(e));
        attachment.push(table.attachment(e));
    }

    let (labels, fractions) = table.components();
    GasReport {
        name: table.name(),
        temperature: table.temperature(),
        pressure: table.pressure(),
        components: ReportComponents { labels, fractions },
        electric_field: fields,
        drift_velocity: unless_all_zero(drift),
        transversal_diffusion: unless_all_zero(transversal),
        longitudinal_diffusion: unless_all_zero(longitudinal),
        townsend: unless_all_zero(townsend),
        attachment: unless_all_zero(attachment),
    }
}

impl GasReport {
    pub fn to_json_pretty(&self) -> GasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> GasResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_pretty()?).map_err(|e| GasError::io(path, e))
    }
}
