//! Transport engine trait.
//!
//! The engine is the only component that knows how to turn a gas medium and
//! a field grid into transport coefficients. Everything else in this crate
//! (tables, merging, reports) is backend-independent.

use crate::error::GasResult;
use crate::mixture::{Component, MAX_COMPONENTS, Mixture};
use crate::table::Environment;
use std::f64::consts::FRAC_PI_2;

/// Medium description handed to the engine.
///
/// The engine interface has a fixed number of component slots; unused slots
/// carry an empty name and zero fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct MediumSpec {
    pub slots: [Component; MAX_COMPONENTS],
    /// Pressure [Torr]
    pub pressure_torr: f64,
    /// Temperature [K]
    pub temperature_kelvin: f64,
}

impl MediumSpec {
    pub fn new(mixture: &Mixture, environment: &Environment) -> Self {
        Self {
            slots: mixture.padded_slots(),
            pressure_torr: environment.pressure_torr(),
            temperature_kelvin: environment.temperature_kelvin(),
        }
    }

    /// Populated slots only.
    pub fn active_slots(&self) -> impl Iterator<Item = &Component> + '_ {
        self.slots.iter().filter(|slot| !slot.name.is_empty())
    }
}

/// One grid point of the field map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPoint {
    /// Electric field magnitude [V/cm]
    pub electric_field: f64,
    /// Magnetic field magnitude [T]
    pub magnetic_field: f64,
    /// Angle between electric and magnetic field [rad]
    pub angle: f64,
}

impl FieldPoint {
    /// Pure electric field: no magnetic field, angle fixed at 90 degrees.
    pub fn electric(electric_field: f64) -> Self {
        Self {
            electric_field,
            magnetic_field: 0.0,
            angle: FRAC_PI_2,
        }
    }
}

/// Electron transport coefficients at one grid point, in engine units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransportSample {
    /// Drift velocity [cm/ns]
    pub drift_velocity: f64,
    /// Longitudinal diffusion [cm^1/2]
    pub longitudinal_diffusion: f64,
    /// Transversal diffusion [cm^1/2]
    pub transversal_diffusion: f64,
    /// Townsend coefficient [1/cm]
    pub townsend: f64,
    /// Attachment coefficient [1/cm]
    pub attachment: f64,
}

impl TransportSample {
    pub fn is_finite(&self) -> bool {
        [
            self.drift_velocity,
            self.longitudinal_diffusion,
            self.transversal_diffusion,
            self.townsend,
            self.attachment,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Trait for electron transport backends.
///
/// A call to [`TransportEngine::compute`] blocks until every grid point has
/// been evaluated; there is no cancellation.
pub trait TransportEngine {
    /// Get the engine name (written to gas files).
    fn name(&self) -> &str;

    /// Check if the engine has data for a component name.
    fn supports_component(&self, name: &str) -> bool;

    /// Compute transport coefficients for every grid point, in grid order.
    ///
    /// `collisions` controls the integration length of the underlying
    /// simulation (engine-defined meaning, at least 1).
    fn compute(
        &self,
        medium: &MediumSpec,
        grid: &[FieldPoint],
        collisions: u32,
        verbose: bool,
    ) -> GasResult<Vec<TransportSample>>;
}
