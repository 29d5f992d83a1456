//! On-disk gas table format (pretty JSON).

use crate::error::{GasError, GasResult};
use crate::mixture::{Component, Mixture};
use crate::table::{Environment, TableRow, TransportTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const FORMAT_TAG: &str = "gastable";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct GasFileDocument {
    format: String,
    version: u32,
    created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collisions: Option<u32>,
    mixture: Vec<Component>,
    pressure_torr: f64,
    temperature_kelvin: f64,
    rows: Vec<TableRow>,
}

/// True when `path` exists but holds nothing: a reservation left by an
/// interrupted incremental run.
pub fn is_placeholder(path: &Path) -> GasResult<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => Ok(true),
        Ok(_) => {
            let content = fs::read_to_string(path).map_err(|e| GasError::io(path, e))?;
            Ok(content.trim().is_empty())
        }
        Err(e) => Err(GasError::io(path, e)),
    }
}

pub(crate) fn write_table(table: &TransportTable, path: &Path) -> GasResult<()> {
    let document = GasFileDocument {
        format: FORMAT_TAG.to_string(),
        version: FORMAT_VERSION,
        created: chrono::Utc::now().to_rfc3339(),
        engine: table.engine().map(str::to_string),
        collisions: table.collisions(),
        mixture: table.mixture().components().to_vec(),
        pressure_torr: table.environment().pressure_torr(),
        temperature_kelvin: table.environment().temperature_kelvin(),
        rows: table.rows().to_vec(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    fs::write(path, json).map_err(|e| GasError::io(path, e))
}

pub(crate) fn read_table(path: &Path) -> GasResult<TransportTable> {
    let content = fs::read_to_string(path).map_err(|e| GasError::io(path, e))?;
    let document: GasFileDocument =
        serde_json::from_str(&content).map_err(|e| GasError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if document.format != FORMAT_TAG {
        return Err(GasError::Parse {
            path: path.to_path_buf(),
            message: format!("unexpected format tag '{}'", document.format),
        });
    }
    if document.version != FORMAT_VERSION {
        return Err(GasError::Parse {
            path: path.to_path_buf(),
            message: format!("unsupported format version {}", document.version),
        });
    }
    if !(document.pressure_torr.is_finite() && document.pressure_torr > 0.0)
        || !(document.temperature_kelvin.is_finite() && document.temperature_kelvin > 0.0)
    {
        return Err(GasError::Parse {
            path: path.to_path_buf(),
            message: "pressure and temperature must be positive".to_string(),
        });
    }

    let mixture = if document.mixture.is_empty() {
        Mixture::default()
    } else {
        Mixture::new(
            document
                .mixture
                .into_iter()
                .map(|c| (c.name, c.fraction))
                .collect(),
        )?
    };
    let environment =
        Environment::from_engine_units(document.pressure_torr, document.temperature_kelvin);

    Ok(TransportTable::from_parts(
        mixture,
        environment,
        document.rows,
        document.collisions,
        document.engine,
    ))
}
