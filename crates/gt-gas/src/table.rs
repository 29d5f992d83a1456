//! Electron transport table: field grid plus coefficients.

use crate::engine::{FieldPoint, MediumSpec, TransportEngine};
use crate::error::{GasError, GasResult};
use crate::file;
use crate::mixture::Mixture;
use gt_core::numeric::{Tolerances, nearly_equal, position_close};
use gt_core::units::{
    ATMOSPHERE_TORR, DEFAULT_TEMPERATURE_CELSIUS, bar_to_torr, celsius_to_kelvin,
    kelvin_to_celsius, torr_to_bar,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Drift velocity unit conversion: engine cm/ns to reported cm/µs.
const CM_PER_NS_TO_CM_PER_US: f64 = 1e3;

/// Gas pressure and temperature, stored in engine units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pressure_torr: f64,
    temperature_kelvin: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            pressure_torr: ATMOSPHERE_TORR,
            temperature_kelvin: celsius_to_kelvin(DEFAULT_TEMPERATURE_CELSIUS),
        }
    }
}

impl Environment {
    pub fn from_bar_celsius(pressure_bar: f64, temperature_celsius: f64) -> Self {
        Self {
            pressure_torr: bar_to_torr(pressure_bar),
            temperature_kelvin: celsius_to_kelvin(temperature_celsius),
        }
    }

    pub fn from_engine_units(pressure_torr: f64, temperature_kelvin: f64) -> Self {
        Self {
            pressure_torr,
            temperature_kelvin,
        }
    }

    /// Pressure [bar]
    pub fn pressure_bar(&self) -> f64 {
        torr_to_bar(self.pressure_torr)
    }

    /// Temperature [°C]
    pub fn temperature_celsius(&self) -> f64 {
        kelvin_to_celsius(self.temperature_kelvin)
    }

    /// Pressure [Torr]
    pub fn pressure_torr(&self) -> f64 {
        self.pressure_torr
    }

    /// Temperature [K]
    pub fn temperature_kelvin(&self) -> f64 {
        self.temperature_kelvin
    }

    pub fn set_pressure_bar(&mut self, pressure_bar: f64) {
        self.pressure_torr = bar_to_torr(pressure_bar);
    }

    pub fn set_temperature_celsius(&mut self, temperature_celsius: f64) {
        self.temperature_kelvin = celsius_to_kelvin(temperature_celsius);
    }

    pub fn matches(&self, other: &Environment, tol: Tolerances) -> bool {
        nearly_equal(self.pressure_torr, other.pressure_torr, tol)
            && nearly_equal(self.temperature_kelvin, other.temperature_kelvin, tol)
    }
}

/// One tabulated grid point, coefficients in engine units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// [V/cm]
    pub electric_field: f64,
    /// [T]
    pub magnetic_field: f64,
    /// [rad]
    pub angle: f64,
    /// [cm/ns]
    pub drift_velocity: f64,
    /// [cm^1/2]
    pub longitudinal_diffusion: f64,
    /// [cm^1/2]
    pub transversal_diffusion: f64,
    /// [1/cm]
    pub townsend: f64,
    /// [1/cm]
    pub attachment: f64,
}

impl TableRow {
    fn same_point(&self, other: &TableRow) -> bool {
        let tol = Tolerances::GRID_MATCH;
        nearly_equal(self.electric_field, other.electric_field, tol)
            && nearly_equal(self.magnetic_field, other.magnetic_field, tol)
            && nearly_equal(self.angle, other.angle, tol)
    }
}

/// Outcome of a table merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Grid points new to the receiving table.
    pub added: usize,
    /// Shared points overwritten by the incoming table.
    pub replaced: usize,
    /// Shared points where the receiving table kept its values.
    pub kept: usize,
    /// The incoming table was empty and ignored.
    pub skipped: bool,
}

/// Electron transport table for one gas at one pressure and temperature.
///
/// Rows are kept sorted by electric field. Not synchronized: callers sharing a
/// table between threads must serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct TransportTable {
    mixture: Mixture,
    environment: Environment,
    rows: Vec<TableRow>,
    collisions: Option<u32>,
    engine: Option<String>,
}

impl TransportTable {
    /// Empty table: no gas, 20 °C, 1 atm.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mixture(mixture: Mixture) -> Self {
        Self {
            mixture,
            ..Self::default()
        }
    }

    /// Load a table previously written with [`TransportTable::write`].
    pub fn load(path: impl AsRef<Path>) -> GasResult<Self> {
        file::read_table(path.as_ref())
    }

    /// Serialize to `path`, replacing any existing file.
    pub fn write(&self, path: impl AsRef<Path>) -> GasResult<()> {
        file::write_table(self, path.as_ref())
    }

    pub(crate) fn from_parts(
        mixture: Mixture,
        environment: Environment,
        mut rows: Vec<TableRow>,
        collisions: Option<u32>,
        engine: Option<String>,
    ) -> Self {
        rows.sort_by(|a, b| a.electric_field.total_cmp(&b.electric_field));
        Self {
            mixture,
            environment,
            rows,
            collisions,
            engine,
        }
    }

    pub fn mixture(&self) -> &Mixture {
        &self.mixture
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Canonical mixture name.
    pub fn name(&self) -> String {
        self.mixture.name()
    }

    /// Slash-joined component names as understood by the engine.
    pub fn engine_name(&self) -> String {
        self.mixture.formula()
    }

    /// Component labels and fractions in canonical order.
    pub fn components(&self) -> (Vec<String>, Vec<f64>) {
        (self.mixture.labels(), self.mixture.fractions())
    }

    /// Pressure [bar]
    pub fn pressure(&self) -> f64 {
        self.environment.pressure_bar()
    }

    /// Temperature [°C]
    pub fn temperature(&self) -> f64 {
        self.environment.temperature_celsius()
    }

    pub fn set_pressure(&mut self, pressure_bar: f64) {
        self.environment.set_pressure_bar(pressure_bar);
    }

    pub fn set_temperature(&mut self, temperature_celsius: f64) {
        self.environment.set_temperature_celsius(temperature_celsius);
    }

    /// Collision count of the last generation, if known.
    pub fn collisions(&self) -> Option<u32> {
        self.collisions
    }

    /// Name of the engine that produced the table, if known.
    pub fn engine(&self) -> Option<&str> {
        self.engine.as_deref()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Tabulated electric field values, ascending.
    pub fn field_grid(&self) -> Vec<f64> {
        let mut fields: Vec<f64> = self.rows.iter().map(|r| r.electric_field).collect();
        fields.sort_by(f64::total_cmp);
        fields
    }

    /// Whether `electric_field` is a tabulated grid point.
    pub fn contains_field(&self, electric_field: f64) -> bool {
        position_close(&self.field_grid(), electric_field.abs(), Tolerances::GRID_MATCH).is_some()
    }

    /// Run the engine on `fields` and replace the table contents.
    ///
    /// The grid becomes exactly the sorted `fields` with no magnetic field and
    /// a 90° angle. Coefficients for fields outside the new grid are dropped.
    pub fn generate<E: TransportEngine + ?Sized>(
        &mut self,
        engine: &E,
        fields: &[f64],
        collisions: u32,
        verbose: bool,
    ) -> GasResult<()> {
        if self.mixture.is_empty() {
            return Err(GasError::EmptyMixture);
        }
        if fields.is_empty() {
            return Err(GasError::InvalidArg {
                what: "no electric field values to generate",
            });
        }
        for component in self.mixture.components() {
            if !engine.supports_component(&component.name) {
                return Err(GasError::UnknownComponent {
                    name: component.name.clone(),
                });
            }
        }

        let mut sorted = fields.to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        let grid: Vec<FieldPoint> = sorted.iter().copied().map(FieldPoint::electric).collect();

        let medium = MediumSpec::new(&self.mixture, &self.environment);
        info!(
            gas = %self.mixture,
            points = grid.len(),
            collisions,
            engine = engine.name(),
            "generating gas table"
        );
        let samples = engine.compute(&medium, &grid, collisions, verbose)?;
        if samples.len() != grid.len() {
            return Err(GasError::Engine {
                message: format!(
                    "engine returned {} samples for {} grid points",
                    samples.len(),
                    grid.len()
                ),
            });
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(GasError::Engine {
                message: format!(
                    "non-finite coefficients at E = {} V/cm",
                    grid[index].electric_field
                ),
            });
        }

        self.rows = grid
            .iter()
            .zip(samples)
            .map(|(point, sample)| TableRow {
                electric_field: point.electric_field,
                magnetic_field: point.magnetic_field,
                angle: point.angle,
                drift_velocity: sample.drift_velocity,
                longitudinal_diffusion: sample.longitudinal_diffusion,
                transversal_diffusion: sample.transversal_diffusion,
                townsend: sample.townsend,
                attachment: sample.attachment,
            })
            .collect();
        self.collisions = Some(collisions);
        self.engine = Some(engine.name().to_string());
        Ok(())
    }

    /// Absorb the grid points of `other`.
    ///
    /// Shared points keep this table's values unless `replace_on_conflict` is
    /// set. An empty incoming table is skipped with a warning; a table
    /// describing another gas, pressure or temperature is rejected.
    pub fn merge(
        &mut self,
        other: &TransportTable,
        replace_on_conflict: bool,
    ) -> GasResult<MergeSummary> {
        let mut summary = MergeSummary::default();
        if other.is_empty() {
            warn!(gas = %other.mixture, "skipping empty gas table during merge");
            summary.skipped = true;
            return Ok(summary);
        }

        if self.mixture.is_empty() && self.rows.is_empty() {
            self.mixture = other.mixture.clone();
            self.environment = other.environment;
        } else {
            self.check_compatible(other)?;
        }
        if self.collisions.is_none() {
            self.collisions = other.collisions;
        }
        if self.engine.is_none() {
            self.engine = other.engine.clone();
        }

        for incoming in &other.rows {
            match self.rows.iter_mut().find(|row| row.same_point(incoming)) {
                Some(existing) if replace_on_conflict => {
                    *existing = *incoming;
                    summary.replaced += 1;
                }
                Some(_) => summary.kept += 1,
                None => {
                    self.rows.push(*incoming);
                    summary.added += 1;
                }
            }
        }
        self.rows
            .sort_by(|a, b| a.electric_field.total_cmp(&b.electric_field));

        debug!(
            added = summary.added,
            replaced = summary.replaced,
            kept = summary.kept,
            "merged gas table"
        );
        Ok(summary)
    }

    /// Merge the table stored at `path`. An empty file counts as an empty table.
    pub fn merge_file(
        &mut self,
        path: impl AsRef<Path>,
        replace_on_conflict: bool,
    ) -> GasResult<MergeSummary> {
        let path = path.as_ref();
        if file::is_placeholder(path)? {
            warn!(path = %path.display(), "skipping empty gas file during merge");
            return Ok(MergeSummary {
                skipped: true,
                ..MergeSummary::default()
            });
        }
        let other = TransportTable::load(path)?;
        self.merge(&other, replace_on_conflict)
    }

    fn check_compatible(&self, other: &TransportTable) -> GasResult<()> {
        let tol = Tolerances::default();
        if !self.mixture.matches(&other.mixture, tol) {
            return Err(GasError::Incompatible {
                reason: format!(
                    "gas mixtures differ: {} vs {}",
                    self.mixture, other.mixture
                ),
            });
        }
        if !self.environment.matches(&other.environment, Tolerances::GRID_MATCH) {
            return Err(GasError::Incompatible {
                reason: format!(
                    "conditions differ: {} bar, {} °C vs {} bar, {} °C",
                    self.pressure(),
                    self.temperature(),
                    other.pressure(),
                    other.temperature()
                ),
            });
        }
        Ok(())
    }

    /// Linear interpolation on the grid: constant below the first point,
    /// linear extrapolation above the last.
    fn interpolate(&self, electric_field: f64, value: impl Fn(&TableRow) -> f64) -> f64 {
        let e = electric_field.abs();
        let rows = &self.rows;
        let (first, last) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        let grid: Vec<f64> = rows.iter().map(|r| r.electric_field).collect();
        if let Some(index) = position_close(&grid, e, Tolerances::GRID_MATCH) {
            return value(&rows[index]);
        }
        if e <= first.electric_field || rows.len() == 1 {
            return value(first);
        }

        let upper = rows
            .iter()
            .position(|r| r.electric_field > e)
            .unwrap_or(rows.len() - 1);
        let (a, b) = (&rows[upper - 1], &rows[upper]);
        let span = b.electric_field - a.electric_field;
        if span <= 0.0 {
            return value(last);
        }
        let t = (e - a.electric_field) / span;
        value(a) + t * (value(b) - value(a))
    }

    /// Electron drift velocity [cm/µs] for a field along −z.
    pub fn drift_velocity(&self, electric_field: f64) -> f64 {
        self.interpolate(electric_field, |r| r.drift_velocity) * CM_PER_NS_TO_CM_PER_US
    }

    /// (longitudinal, transversal) diffusion [cm^1/2].
    pub fn diffusion(&self, electric_field: f64) -> (f64, f64) {
        (
            self.interpolate(electric_field, |r| r.longitudinal_diffusion),
            self.interpolate(electric_field, |r| r.transversal_diffusion),
        )
    }

    pub fn longitudinal_diffusion(&self, electric_field: f64) -> f64 {
        self.diffusion(electric_field).0
    }

    pub fn transversal_diffusion(&self, electric_field: f64) -> f64 {
        self.diffusion(electric_field).1
    }

    /// Townsend coefficient [1/cm].
    pub fn townsend(&self, electric_field: f64) -> f64 {
        self.interpolate(electric_field, |r| r.townsend)
    }

    /// Attachment coefficient [1/cm].
    pub fn attachment(&self, electric_field: f64) -> f64 {
        self.interpolate(electric_field, |r| r.attachment)
    }
}
