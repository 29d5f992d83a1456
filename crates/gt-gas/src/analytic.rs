//! Analytic electron transport backend.
//!
//! Evaluates closed-form approximations in terms of the reduced field E/N:
//!
//! ```text
//! v    = v_sat · x / (1 + x),            x = (E/N) / (E/N)_knee
//! ε_k  = kT/e + s · (E/N)                 characteristic energy [eV]
//! σ_T  = sqrt(2 ε_k / E),  σ_L = r · σ_T  [cm^1/2]
//! α    = A p exp(-B p / E)                Townsend formula [1/cm]
//! η    = Σ f_i η_i p exp(-ln²((E/N)/(E/N)_i) / 2)
//! ```
//!
//! Species parameters come from the gas catalog and are mixed linearly by
//! fraction. Results are deterministic, so the collision count only has to be
//! valid; it does not change the output.

use crate::catalog::{GasCatalogEntry, lookup_gas};
use crate::engine::{FieldPoint, MediumSpec, TransportEngine, TransportSample};
use crate::error::{GasError, GasResult};
use gt_core::numeric::ensure_positive;
use tracing::debug;

const BOLTZMANN_J_PER_K: f64 = 1.380_649e-23;
const BOLTZMANN_EV_PER_K: f64 = 8.617_333_262e-5;
const PASCAL_PER_TORR: f64 = 101_325.0 / 760.0;
/// 1 Td = 1e-17 V·cm²
const TOWNSEND_UNIT_V_CM2: f64 = 1e-17;

/// Closed-form transport model for the gases in the catalog.
#[derive(Debug, Clone, Default)]
pub struct AnalyticEngine {}

impl AnalyticEngine {
    pub fn new() -> Self {
        Self {}
    }
}

/// Fraction-weighted species parameters.
#[derive(Debug, Clone, Default)]
struct MixedParameters {
    drift_saturation: f64,
    drift_knee_td: f64,
    energy_slope: f64,
    diffusion_ratio: f64,
    townsend_a: f64,
    townsend_b: f64,
    /// (fraction, peak per Torr, peak position in Td)
    attachers: Vec<(f64, f64, f64)>,
}

impl MixedParameters {
    fn from_medium(medium: &MediumSpec) -> GasResult<Self> {
        let mut mixed = MixedParameters::default();
        let mut total = 0.0;

        for slot in medium.active_slots() {
            let entry: &GasCatalogEntry =
                lookup_gas(&slot.name).ok_or_else(|| GasError::UnknownComponent {
                    name: slot.name.clone(),
                })?;
            let f = slot.fraction;
            total += f;
            mixed.drift_saturation += f * entry.drift_saturation;
            mixed.drift_knee_td += f * entry.drift_knee_td;
            mixed.energy_slope += f * entry.energy_slope;
            mixed.diffusion_ratio += f * entry.diffusion_ratio;
            mixed.townsend_a += f * entry.townsend_a;
            mixed.townsend_b += f * entry.townsend_b;
            if entry.is_electronegative() {
                mixed
                    .attachers
                    .push((f, entry.attachment_peak, entry.attachment_peak_td));
            }
        }

        if total <= 0.0 {
            return Err(GasError::EmptyMixture);
        }

        // Renormalize in case the slots do not sum to exactly one.
        mixed.drift_saturation /= total;
        mixed.drift_knee_td /= total;
        mixed.energy_slope /= total;
        mixed.diffusion_ratio /= total;
        mixed.townsend_a /= total;
        mixed.townsend_b /= total;
        for attacher in &mut mixed.attachers {
            attacher.0 /= total;
        }
        Ok(mixed)
    }
}

/// Gas number density [1/cm³].
fn number_density_per_cm3(pressure_torr: f64, temperature_kelvin: f64) -> f64 {
    pressure_torr * PASCAL_PER_TORR / (BOLTZMANN_J_PER_K * temperature_kelvin) * 1e-6
}

fn evaluate(params: &MixedParameters, medium: &MediumSpec, e: f64) -> TransportSample {
    if e <= 0.0 {
        return TransportSample::default();
    }

    let p = medium.pressure_torr;
    let n = number_density_per_cm3(p, medium.temperature_kelvin);
    let reduced_td = e / n / TOWNSEND_UNIT_V_CM2;

    let x = reduced_td / params.drift_knee_td;
    let drift_velocity = params.drift_saturation * x / (1.0 + x);

    let thermal_ev = BOLTZMANN_EV_PER_K * medium.temperature_kelvin;
    let characteristic_ev = thermal_ev + params.energy_slope * reduced_td;
    let transversal_diffusion = (2.0 * characteristic_ev / e).sqrt();
    let longitudinal_diffusion = params.diffusion_ratio * transversal_diffusion;

    let townsend = params.townsend_a * p * (-params.townsend_b * p / e).exp();

    let attachment = params
        .attachers
        .iter()
        .map(|&(fraction, peak, peak_td)| {
            let log_ratio = (reduced_td / peak_td).ln();
            fraction * peak * p * (-0.5 * log_ratio * log_ratio).exp()
        })
        .sum();

    TransportSample {
        drift_velocity,
        longitudinal_diffusion,
        transversal_diffusion,
        townsend,
        attachment,
    }
}

impl TransportEngine for AnalyticEngine {
    fn name(&self) -> &str {
        "analytic"
    }

    fn supports_component(&self, name: &str) -> bool {
        lookup_gas(name).is_some()
    }

    fn compute(
        &self,
        medium: &MediumSpec,
        grid: &[FieldPoint],
        collisions: u32,
        verbose: bool,
    ) -> GasResult<Vec<TransportSample>> {
        if collisions == 0 {
            return Err(GasError::InvalidArg {
                what: "number of collisions must be at least 1",
            });
        }
        ensure_positive(medium.pressure_torr, "pressure [Torr]")?;
        ensure_positive(medium.temperature_kelvin, "temperature [K]")?;
        if grid
            .iter()
            .any(|point| !point.electric_field.is_finite() || point.electric_field < 0.0)
        {
            return Err(GasError::InvalidArg {
                what: "electric field values must be finite and non-negative",
            });
        }

        let params = MixedParameters::from_medium(medium)?;
        let samples: Vec<TransportSample> = grid
            .iter()
            .map(|point| {
                let sample = evaluate(&params, medium, point.electric_field);
                if verbose {
                    debug!(
                        electric_field = point.electric_field,
                        drift_velocity = sample.drift_velocity,
                        townsend = sample.townsend,
                        "evaluated grid point"
                    );
                }
                sample
            })
            .collect();
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixture::Mixture;
    use crate::table::Environment;

    fn medium(tokens: &[&str]) -> MediumSpec {
        let mixture = Mixture::from_tokens(tokens).unwrap();
        MediumSpec::new(&mixture, &Environment::default())
    }

    fn grid(values: &[f64]) -> Vec<FieldPoint> {
        values.iter().copied().map(FieldPoint::electric).collect()
    }

    #[test]
    fn one_sample_per_point() {
        let engine = AnalyticEngine::new();
        let samples = engine
            .compute(&medium(&["Ar", "90", "CO2"]), &grid(&[10.0, 100.0, 1000.0]), 10, false)
            .unwrap();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(TransportSample::is_finite));
    }

    #[test]
    fn drift_velocity_grows_with_field() {
        let engine = AnalyticEngine::new();
        let samples = engine
            .compute(&medium(&["Ar", "97.7", "C4H10"]), &grid(&[10.0, 100.0, 1000.0]), 10, false)
            .unwrap();
        assert!(samples[0].drift_velocity < samples[1].drift_velocity);
        assert!(samples[1].drift_velocity < samples[2].drift_velocity);
        assert!(samples[2].drift_velocity > 0.0);
    }

    #[test]
    fn zero_field_gives_zero_coefficients() {
        let engine = AnalyticEngine::new();
        let samples = engine
            .compute(&medium(&["Ar"]), &grid(&[0.0]), 1, false)
            .unwrap();
        assert_eq!(samples[0], TransportSample::default());
    }

    #[test]
    fn noble_gas_has_no_attachment() {
        let engine = AnalyticEngine::new();
        let samples = engine
            .compute(&medium(&["Ar", "90", "CO2"]), &grid(&[100.0, 5000.0]), 10, false)
            .unwrap();
        assert!(samples.iter().all(|s| s.attachment == 0.0));
        // Multiplication only sets in at high field
        assert_eq!(samples[0].townsend, 0.0);
        assert!(samples[1].townsend > 0.0);
    }

    #[test]
    fn electronegative_gas_attaches() {
        let engine = AnalyticEngine::new();
        let samples = engine
            .compute(&medium(&["Ar", "90", "CF4"]), &grid(&[1000.0]), 10, false)
            .unwrap();
        assert!(samples[0].attachment > 0.0);
    }

    #[test]
    fn unknown_component_rejected() {
        let engine = AnalyticEngine::new();
        let err = engine
            .compute(&medium(&["Ar", "90", "Unobtainium"]), &grid(&[100.0]), 10, false)
            .unwrap_err();
        assert!(matches!(err, GasError::UnknownComponent { name } if name == "Unobtainium"));
        assert!(!engine.supports_component("Unobtainium"));
        assert!(engine.supports_component("argon"));
    }

    #[test]
    fn invalid_inputs_rejected() {
        let engine = AnalyticEngine::new();
        let m = medium(&["Ar"]);
        assert!(engine.compute(&m, &grid(&[100.0]), 0, false).is_err());
        assert!(engine.compute(&m, &grid(&[-1.0]), 10, false).is_err());

        let mut cold = m.clone();
        cold.temperature_kelvin = 0.0;
        assert!(engine.compute(&cold, &grid(&[100.0]), 10, false).is_err());
    }

    #[test]
    fn number_density_at_normal_conditions() {
        let n = number_density_per_cm3(760.0, 273.15);
        assert!((n / 2.687e19 - 1.0).abs() < 1e-3);
    }
}
