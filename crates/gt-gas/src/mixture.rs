//! Gas mixture definition (component names and fractions).

use crate::error::{GasError, GasResult};
use gt_core::numeric::{Tolerances, nearly_equal};
use gt_core::percent_token;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Maximum number of components the transport engine accepts.
pub const MAX_COMPONENTS: usize = 6;

/// One named gas component with its fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub fraction: f64,
}

impl Component {
    pub fn new(name: impl Into<String>, fraction: f64) -> Self {
        Self {
            name: name.into(),
            fraction,
        }
    }

    /// Unused engine slot.
    pub fn empty() -> Self {
        Self::new("", 0.0)
    }
}

/// Classification of a raw command-line token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Name,
    Fraction(f64),
}

/// A token that starts with digits, optionally followed by `.` and more
/// digits, is a fraction; anything else is a component name. The value is
/// read from that numeric prefix.
///
/// Component names starting with a digit (`3He`) are therefore read as
/// fractions. This is a known limitation of the token syntax and is kept
/// as-is.
pub fn classify_token(token: &str) -> TokenKind {
    let token = token.trim();
    let integer_len = token.bytes().take_while(u8::is_ascii_digit).count();
    if integer_len == 0 {
        return TokenKind::Name;
    }
    let mut prefix_len = integer_len;
    if token[integer_len..].starts_with('.') {
        prefix_len += 1 + token[integer_len + 1..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
    }
    match token[..prefix_len].trim_end_matches('.').parse::<f64>() {
        Ok(value) => TokenKind::Fraction(value),
        Err(_) => TokenKind::Name,
    }
}

/// Validated gas mixture.
///
/// Fractions are normalized to sum to 1 and components are kept in canonical
/// order: descending fraction, ties by ascending name. A mixture is immutable;
/// build a new one to represent a change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mixture {
    components: Vec<Component>,
}

impl Mixture {
    /// Build a mixture from explicit `(name, fraction)` pairs.
    ///
    /// Fractions may be given as unit fractions or percentages; only their
    /// ratios matter. Zero fractions are dropped with a warning.
    pub fn new(components: Vec<(String, f64)>) -> GasResult<Self> {
        if components.is_empty() {
            return Err(GasError::EmptyMixture);
        }

        let mut kept: Vec<Component> = Vec::with_capacity(components.len());
        for (name, fraction) in components {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(GasError::EmptyComponentName);
            }
            if !fraction.is_finite() {
                return Err(GasError::NonFiniteFraction {
                    name,
                    value: fraction,
                });
            }
            if fraction < 0.0 {
                return Err(GasError::NegativeFraction {
                    name,
                    value: fraction,
                });
            }
            if fraction == 0.0 {
                warn!(component = %name, "dropping component with zero fraction");
                continue;
            }
            if kept.iter().any(|c| c.name == name) {
                return Err(GasError::DuplicateComponent { name });
            }
            kept.push(Component::new(name, fraction));
        }

        if kept.is_empty() {
            return Err(GasError::EmptyMixture);
        }
        if kept.len() > MAX_COMPONENTS {
            return Err(GasError::TooManyComponents {
                count: kept.len(),
                max: MAX_COMPONENTS,
            });
        }

        let sum: f64 = kept.iter().map(|c| c.fraction).sum();
        for component in &mut kept {
            component.fraction /= sum;
        }
        sort_canonical(&mut kept);

        Ok(Self { components: kept })
    }

    /// Build a mixture from parallel name and fraction lists.
    ///
    /// When exactly one fraction is missing it is inferred for the last name.
    pub fn from_names_and_fractions<S: AsRef<str>>(
        names: &[S],
        fractions: &[f64],
    ) -> GasResult<Self> {
        let mut given: Vec<Option<f64>> = fractions.iter().copied().map(Some).collect();
        if names.len() == fractions.len() + 1 {
            given.push(None);
        } else if names.len() != fractions.len() {
            return Err(GasError::CountMismatch {
                names: names.len(),
                fractions: fractions.len(),
            });
        }
        let pending = names
            .iter()
            .map(|n| n.as_ref().to_string())
            .zip(given)
            .collect();
        Self::from_pending(pending)
    }

    /// Build a mixture from a flat token stream such as `["Ar", "97.7", "C4H10"]`.
    ///
    /// Every fraction binds to the name right before it. One name may come
    /// without a fraction; its value is inferred from the others.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> GasResult<Self> {
        let mut pending: Vec<(String, Option<f64>)> = Vec::new();
        let mut orphans = 0usize;

        for token in tokens {
            let token = token.as_ref();
            match classify_token(token) {
                TokenKind::Name => pending.push((token.trim().to_string(), None)),
                TokenKind::Fraction(value) => match pending.last_mut() {
                    Some((_, slot @ None)) => *slot = Some(value),
                    _ => orphans += 1,
                },
            }
        }

        if orphans > 0 {
            let fractions = pending.iter().filter(|(_, f)| f.is_some()).count() + orphans;
            return Err(GasError::CountMismatch {
                names: pending.len(),
                fractions,
            });
        }
        Self::from_pending(pending)
    }

    fn from_pending(mut pending: Vec<(String, Option<f64>)>) -> GasResult<Self> {
        if pending.is_empty() {
            return Err(GasError::EmptyMixture);
        }

        let missing = pending.iter().filter(|(_, f)| f.is_none()).count();
        if missing > 1 {
            return Err(GasError::CountMismatch {
                names: pending.len(),
                fractions: pending.len() - missing,
            });
        }

        if missing == 1 {
            let given_sum: f64 = pending.iter().filter_map(|(_, f)| *f).sum();
            // Percentages when the given fractions already exceed one.
            let total = if given_sum > 1.0 { 100.0 } else { 1.0 };
            let inferred = total - given_sum;
            if let Some((name, slot)) = pending.iter_mut().find(|(_, f)| f.is_none()) {
                warn!(component = %name, fraction = inferred, "inferred missing fraction");
                *slot = Some(inferred);
            }
        }

        Self::new(
            pending
                .into_iter()
                .map(|(name, f)| (name, f.unwrap_or_default()))
                .collect(),
        )
    }

    /// Components in canonical order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component names in canonical order.
    pub fn labels(&self) -> Vec<String> {
        self.components.iter().map(|c| c.name.clone()).collect()
    }

    /// Normalized fractions in canonical order.
    pub fn fractions(&self) -> Vec<f64> {
        self.components.iter().map(|c| c.fraction).collect()
    }

    /// Filesystem-safe canonical name, e.g. `Ar_97p7-C4H10_2p3`.
    pub fn name(&self) -> String {
        self.components
            .iter()
            .map(|c| format!("{}_{}", c.name, percent_token(c.fraction)))
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Slash-joined component names, e.g. `Ar/C4H10`.
    pub fn formula(&self) -> String {
        self.labels().join("/")
    }

    /// Components padded with empty slots to the engine's fixed arity.
    pub fn padded_slots(&self) -> [Component; MAX_COMPONENTS] {
        std::array::from_fn(|i| {
            self.components
                .get(i)
                .cloned()
                .unwrap_or_else(Component::empty)
        })
    }

    /// Same components with fractions equal within `tol`.
    pub fn matches(&self, other: &Mixture, tol: Tolerances) -> bool {
        self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| a.name == b.name && nearly_equal(a.fraction, b.fraction, tol))
    }
}

impl fmt::Display for Mixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percentages: Vec<String> = self
            .components
            .iter()
            .map(|c| gt_core::clean_number_string(&format!("{:.6}", c.fraction * 100.0)))
            .collect();
        write!(f, "{} ({})", self.formula(), percentages.join("/"))
    }
}

fn sort_canonical(components: &mut [Component]) {
    components.sort_by(|a, b| {
        b.fraction
            .total_cmp(&a.fraction)
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tol() -> Tolerances {
        Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        }
    }

    #[test]
    fn classify_tokens() {
        assert_eq!(classify_token("Ar"), TokenKind::Name);
        assert_eq!(classify_token("C4H10"), TokenKind::Name);
        assert_eq!(classify_token("97.7"), TokenKind::Fraction(97.7));
        assert_eq!(classify_token("2"), TokenKind::Fraction(2.0));
        assert_eq!(classify_token("5."), TokenKind::Fraction(5.0));
        assert_eq!(classify_token(".5"), TokenKind::Name);
        assert_eq!(classify_token("-1"), TokenKind::Name);
        assert_eq!(classify_token("1e3"), TokenKind::Fraction(1.0));
    }

    #[test]
    fn digit_prefixed_name_reads_as_fraction() {
        assert_eq!(classify_token("3He"), TokenKind::Fraction(3.0));
        assert_eq!(classify_token("12.5abc"), TokenKind::Fraction(12.5));
        assert_eq!(classify_token("4"), TokenKind::Fraction(4.0));

        // "3He" binds as a second fraction of nothing
        let err = Mixture::from_tokens(&["3He", "90", "CO2"]).unwrap_err();
        assert!(matches!(err, GasError::CountMismatch { .. }));
    }

    #[test]
    fn canonical_name_descending() {
        let mix = Mixture::new(vec![("C4H10".into(), 2.3), ("Ar".into(), 97.7)]).unwrap();
        assert_eq!(mix.name(), "Ar_97p7-C4H10_2p3");
        assert_eq!(mix.labels(), vec!["Ar", "C4H10"]);
    }

    #[test]
    fn canonical_name_four_components() {
        let mix = Mixture::new(vec![
            ("C2H6".into(), 9.99),
            ("CF4".into(), 9.99),
            ("Ne".into(), 79.92),
            ("H2O".into(), 0.1),
        ])
        .unwrap();
        assert_eq!(mix.name(), "Ne_79p92-C2H6_9p99-CF4_9p99-H2O_0p1");
    }

    #[test]
    fn ties_sorted_by_name() {
        let mix = Mixture::new(vec![("Ne".into(), 50.0), ("Ar".into(), 50.0)]).unwrap();
        assert_eq!(mix.labels(), vec!["Ar", "Ne"]);
    }

    #[test]
    fn tokens_with_inferred_percentage() {
        let mix = Mixture::from_tokens(&["Ar", "97.7", "C4H10"]).unwrap();
        assert_eq!(mix.labels(), vec!["Ar", "C4H10"]);
        assert!(nearly_equal(mix.fractions()[1], 0.023, tol()));
    }

    #[test]
    fn tokens_with_inferred_unit_fraction() {
        let mix = Mixture::from_tokens(&["C4H10", "0.5", "Ar"]).unwrap();
        assert!(nearly_equal(mix.fractions()[0], 0.5, tol()));
        assert!(nearly_equal(mix.fractions()[1], 0.5, tol()));
        assert_eq!(mix.labels(), vec!["Ar", "C4H10"]);
    }

    #[test]
    fn single_name_is_pure_gas() {
        let mix = Mixture::from_tokens(&["Ar"]).unwrap();
        assert_eq!(mix.name(), "Ar_100");
    }

    #[test]
    fn tokens_count_mismatch() {
        assert!(matches!(
            Mixture::from_tokens(&["Ar", "CO2", "CF4", "10"]),
            Err(GasError::CountMismatch { .. })
        ));
        assert!(matches!(
            Mixture::from_tokens(&["10", "Ar"]),
            Err(GasError::CountMismatch { .. })
        ));
        assert!(matches!(
            Mixture::from_tokens(&["Ar", "10", "20"]),
            Err(GasError::CountMismatch { .. })
        ));
    }

    #[test]
    fn inferred_negative_fraction_rejected() {
        assert!(matches!(
            Mixture::from_tokens(&["Ar", "60", "CO2", "50", "CF4"]),
            Err(GasError::NegativeFraction { .. })
        ));
    }

    #[test]
    fn zero_fraction_dropped() {
        let mix = Mixture::from_tokens(&["Ar", "90", "CO2", "0", "CF4", "10"]).unwrap();
        assert_eq!(mix.labels(), vec!["Ar", "CF4"]);
        assert!(nearly_equal(mix.fractions()[0], 0.9, tol()));
    }

    #[test]
    fn empty_rejected() {
        let none: [&str; 0] = [];
        assert!(matches!(
            Mixture::from_tokens(&none),
            Err(GasError::EmptyMixture)
        ));
        assert!(matches!(Mixture::new(vec![]), Err(GasError::EmptyMixture)));
        assert!(matches!(
            Mixture::new(vec![("Ar".into(), 0.0)]),
            Err(GasError::EmptyMixture)
        ));
    }

    #[test]
    fn too_many_components_rejected() {
        let components = ["He", "Ne", "Ar", "Kr", "Xe", "CO2", "CF4"]
            .iter()
            .map(|n| (n.to_string(), 1.0))
            .collect();
        assert!(matches!(
            Mixture::new(components),
            Err(GasError::TooManyComponents { count: 7, max: 6 })
        ));
    }

    #[test]
    fn negative_fraction_rejected() {
        assert!(matches!(
            Mixture::new(vec![("Ar".into(), 1.1), ("CO2".into(), -0.1)]),
            Err(GasError::NegativeFraction { .. })
        ));
    }

    #[test]
    fn duplicate_and_empty_names_rejected() {
        assert!(matches!(
            Mixture::new(vec![("Ar".into(), 0.5), ("Ar".into(), 0.5)]),
            Err(GasError::DuplicateComponent { .. })
        ));
        assert!(matches!(
            Mixture::new(vec![(" ".into(), 1.0)]),
            Err(GasError::EmptyComponentName)
        ));
    }

    #[test]
    fn names_and_fractions_lists() {
        let mix = Mixture::from_names_and_fractions(&["Ar", "C4H10"], &[97.7]).unwrap();
        assert!(nearly_equal(mix.fractions()[1], 0.023, tol()));
        assert!(Mixture::from_names_and_fractions(&["Ar"], &[0.5, 0.5]).is_err());
    }

    #[test]
    fn padded_slots_have_engine_arity() {
        let mix = Mixture::from_tokens(&["Ar", "90", "CO2"]).unwrap();
        let slots = mix.padded_slots();
        assert_eq!(slots.len(), MAX_COMPONENTS);
        assert_eq!(slots[0].name, "Ar");
        assert_eq!(slots[1].name, "CO2");
        assert!(slots[2..].iter().all(|s| s.name.is_empty() && s.fraction == 0.0));
    }

    #[test]
    fn display_shows_percentages() {
        let mix = Mixture::from_tokens(&["Ar", "90", "CO2"]).unwrap();
        assert_eq!(mix.to_string(), "Ar/CO2 (90/10)");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_sum_is_one(fracs in prop::collection::vec(0.0_f64..100.0_f64, 1..=6)) {
            let names = ["Ar", "CO2", "CF4", "Ne", "He", "CH4"];
            let input: Vec<(String, f64)> = fracs
                .iter()
                .enumerate()
                .map(|(i, &f)| (names[i].to_string(), f))
                .collect();

            if let Ok(mix) = Mixture::new(input) {
                let sum: f64 = mix.fractions().iter().sum();
                let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
                prop_assert!(nearly_equal(sum, 1.0, tol));
            }
        }

        #[test]
        fn canonical_order_is_descending(fracs in prop::collection::vec(0.01_f64..100.0_f64, 1..=6)) {
            let names = ["Ar", "CO2", "CF4", "Ne", "He", "CH4"];
            let input: Vec<(String, f64)> = fracs
                .iter()
                .enumerate()
                .map(|(i, &f)| (names[i].to_string(), f))
                .collect();

            let mix = Mixture::new(input).unwrap();
            let fractions = mix.fractions();
            prop_assert!(fractions.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
