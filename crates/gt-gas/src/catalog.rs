//! Gas catalog with the per-species parameters used by the analytic engine.

/// Catalog entry for one gas species.
///
/// Transport parameters are coarse effective values meant to reproduce the
/// shape and order of magnitude of measured curves; they are not a substitute
/// for a cross-section based simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasCatalogEntry {
    /// Identifier written to gas files and mixture names.
    pub canonical_id: &'static str,
    /// Human-readable name, also accepted on lookup.
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
    /// Asymptotic electron drift velocity [cm/ns].
    pub drift_saturation: f64,
    /// Reduced field at half of the saturation velocity [Td].
    pub drift_knee_td: f64,
    /// Growth of the characteristic energy with reduced field [eV/Td].
    pub energy_slope: f64,
    /// Ratio of longitudinal to transversal diffusion.
    pub diffusion_ratio: f64,
    /// Townsend formula coefficient A [1/(cm·Torr)].
    pub townsend_a: f64,
    /// Townsend formula coefficient B [V/(cm·Torr)].
    pub townsend_b: f64,
    /// Peak attachment coefficient per unit pressure [1/(cm·Torr)].
    pub attachment_peak: f64,
    /// Reduced field of the attachment peak [Td].
    pub attachment_peak_td: f64,
}

impl GasCatalogEntry {
    pub fn matches_name(&self, query: &str) -> bool {
        let query = query.trim();
        self.canonical_id.eq_ignore_ascii_case(query)
            || self.display_name.eq_ignore_ascii_case(query)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(query))
    }

    pub fn is_electronegative(&self) -> bool {
        self.attachment_peak > 0.0
    }
}

#[allow(clippy::too_many_arguments)]
const fn gas(
    canonical_id: &'static str,
    display_name: &'static str,
    aliases: &'static [&'static str],
    drift: (f64, f64),
    energy_slope: f64,
    diffusion_ratio: f64,
    townsend: (f64, f64),
    attachment: (f64, f64),
) -> GasCatalogEntry {
    GasCatalogEntry {
        canonical_id,
        display_name,
        aliases,
        drift_saturation: drift.0,
        drift_knee_td: drift.1,
        energy_slope,
        diffusion_ratio,
        townsend_a: townsend.0,
        townsend_b: townsend.1,
        attachment_peak: attachment.0,
        attachment_peak_td: attachment.1,
    }
}

const GAS_CATALOG: [GasCatalogEntry; 17] = [
    gas("He", "Helium", &["helium", "He4"], (0.010, 15.0), 0.5, 0.6, (3.0, 34.0), (0.0, 0.0)),
    gas("Ne", "Neon", &["neon"], (0.008, 10.0), 0.8, 0.5, (4.0, 100.0), (0.0, 0.0)),
    gas("Ar", "Argon", &["argon"], (0.0045, 4.0), 1.5, 0.3, (12.0, 180.0), (0.0, 0.0)),
    gas("Kr", "Krypton", &["krypton"], (0.004, 4.0), 1.5, 0.3, (17.0, 240.0), (0.0, 0.0)),
    gas("Xe", "Xenon", &["xenon"], (0.0035, 4.0), 1.6, 0.3, (26.0, 350.0), (0.0, 0.0)),
    gas("H2", "Hydrogen", &["hydrogen"], (0.010, 20.0), 0.1, 0.6, (5.0, 130.0), (0.0, 0.0)),
    gas("N2", "Nitrogen", &["nitrogen"], (0.010, 20.0), 0.1, 0.7, (12.0, 342.0), (0.0, 0.0)),
    gas("O2", "Oxygen", &["oxygen"], (0.012, 30.0), 0.1, 0.7, (6.5, 190.0), (0.5, 50.0)),
    gas("CO2", "Carbon dioxide", &["carbon-dioxide"], (0.011, 40.0), 0.02, 0.9, (20.0, 466.0), (0.0, 0.0)),
    gas("CH4", "Methane", &["methane"], (0.011, 8.0), 0.05, 0.6, (15.0, 300.0), (0.0, 0.0)),
    gas("C2H6", "Ethane", &["ethane"], (0.009, 10.0), 0.04, 0.6, (18.0, 350.0), (0.0, 0.0)),
    gas("C3H8", "Propane", &["propane"], (0.008, 9.0), 0.035, 0.6, (21.0, 400.0), (0.0, 0.0)),
    gas("C4H10", "n-Butane", &["butane", "nC4H10", "n-butane"], (0.007, 8.0), 0.03, 0.6, (25.0, 450.0), (0.0, 0.0)),
    gas("iC4H10", "Isobutane", &["isobutane", "i-C4H10"], (0.007, 8.0), 0.03, 0.6, (25.0, 450.0), (0.0, 0.0)),
    gas("CF4", "Tetrafluoromethane", &["freon-14"], (0.012, 15.0), 0.05, 0.5, (11.0, 213.0), (0.3, 80.0)),
    gas("H2O", "Water", &["water"], (0.010, 30.0), 0.02, 0.9, (13.0, 290.0), (0.2, 100.0)),
    gas("SF6", "Sulfur hexafluoride", &["sulfur-hexafluoride"], (0.005, 50.0), 0.02, 0.8, (30.0, 700.0), (3.0, 100.0)),
];

/// All gases known to the analytic engine.
pub fn gas_catalog() -> &'static [GasCatalogEntry] {
    &GAS_CATALOG
}

/// Find a gas by canonical identifier, display name or alias (case-insensitive).
pub fn lookup_gas(name: &str) -> Option<&'static GasCatalogEntry> {
    GAS_CATALOG.iter().find(|entry| entry.matches_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id_and_alias() {
        assert_eq!(lookup_gas("Ar").unwrap().canonical_id, "Ar");
        assert_eq!(lookup_gas("argon").unwrap().canonical_id, "Ar");
        assert_eq!(lookup_gas("isobutane").unwrap().canonical_id, "iC4H10");
        assert_eq!(lookup_gas("c4h10").unwrap().canonical_id, "C4H10");
        assert!(lookup_gas("Unobtainium").is_none());
    }

    #[test]
    fn lookup_by_display_name() {
        let co2 = lookup_gas("carbon dioxide").unwrap();
        assert_eq!(co2.canonical_id, "CO2");
        assert_eq!(co2.display_name, "Carbon dioxide");
        assert_eq!(lookup_gas("Tetrafluoromethane").unwrap().canonical_id, "CF4");
    }

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = gas_catalog();
        for (i, a) in catalog.iter().enumerate() {
            for b in &catalog[i + 1..] {
                assert!(!a.matches_name(b.canonical_id), "{} vs {}", a.canonical_id, b.canonical_id);
            }
        }
    }

    #[test]
    fn noble_gases_do_not_attach() {
        for id in ["He", "Ne", "Ar", "Kr", "Xe"] {
            assert!(!lookup_gas(id).unwrap().is_electronegative());
        }
        assert!(lookup_gas("SF6").unwrap().is_electronegative());
    }

    #[test]
    fn parameters_are_positive() {
        for entry in gas_catalog() {
            assert!(entry.drift_saturation > 0.0);
            assert!(entry.drift_knee_td > 0.0);
            assert!(entry.energy_slope > 0.0);
            assert!(entry.townsend_a > 0.0 && entry.townsend_b > 0.0);
        }
    }
}
