use crate::Error;
use crate::math::compute_k_vectors;
use crate::systems::{ParticleSystem, PairSearch, CellListPairs};

use super::{EnergyCalculator, EnergyObserver, EnergyResult, EnergyTerm};
use super::energy::EnergyResultBuilder;
use super::prepare::{Prepared, prepare, validate_cutoff};
use super::terms::{Screening, is_charged};
use super::terms::{real_space_energy, reciprocal_space_energy, self_energy};
use super::terms::{dipole_correction, neutralization_correction};

/// Relative permittivity of the medium surrounding the periodic system
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum Epsilon {
    /// Metallic (tin-foil) boundary conditions. The dipole correction is not
    /// computed at all.
    #[default]
    Infinite,
    /// Dielectric medium with the given relative permittivity
    Finite(f64),
}

impl Epsilon {
    pub fn validate(&self) -> Result<(), Error> {
        if let Epsilon::Finite(epsilon) = *self {
            if !(epsilon.is_finite() && epsilon > 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "expected a positive finite value for epsilon, got {}. Use \
                    `Infinite` for metallic boundary conditions",
                    epsilon
                )));
            }
        }
        return Ok(());
    }
}

/// Largest accepted value for `n_kvecs`, the number of k-vectors grows as
/// `(2 n_kvecs + 1)³`
pub const MAX_N_KVECS: usize = 256;

fn default_alpha() -> f64 { 10.0 }
fn default_n_kvecs() -> usize { 20 }

/// Parameters for Ewald summation of the electrostatic energy
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EwaldParameters {
    /// Splitting parameter between the real space and reciprocal space sums.
    /// Larger values make the real space sum converge faster, and require
    /// more k-vectors in the reciprocal space sum.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Cutoff radius for the real space sum. Defaults to `sqrt(3)/2 L` for a
    /// cell of side length `L`.
    #[serde(default)]
    pub r_cutoff: Option<f64>,
    /// The reciprocal space sum uses all k-vectors `2π/L (n_x, n_y, n_z)`
    /// with `-n_kvecs <= n_i <= n_kvecs`
    #[serde(default = "default_n_kvecs")]
    pub n_kvecs: usize,
    /// Relative permittivity of the surrounding medium
    #[serde(default)]
    pub epsilon: Epsilon,
}

impl Default for EwaldParameters {
    fn default() -> EwaldParameters {
        EwaldParameters {
            alpha: default_alpha(),
            r_cutoff: None,
            n_kvecs: default_n_kvecs(),
            epsilon: Epsilon::Infinite,
        }
    }
}

impl EwaldParameters {
    /// Check all the parameters which do not depend on the system
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "alpha must be positive, got {}", self.alpha
            )));
        }

        if self.n_kvecs < 1 {
            return Err(Error::InvalidParameter(
                "n_kvecs must be at least 1, got 0".into()
            ));
        }

        if self.n_kvecs > MAX_N_KVECS {
            return Err(Error::InvalidParameter(format!(
                "n_kvecs can not be larger than {}, got {}", MAX_N_KVECS, self.n_kvecs
            )));
        }

        validate_cutoff(self.r_cutoff)?;
        self.epsilon.validate()?;

        return Ok(());
    }
}

/// Ewald summation of the electrostatic energy of a periodic system of point
/// charges.
///
/// The energy is split into a screened real space sum, a reciprocal space
/// sum and a self energy correction. A dipole correction is added for
/// non-metallic boundary conditions, and a neutralization correction is
/// added for charged systems.
#[derive(Debug)]
pub struct Ewald {
    parameters: EwaldParameters,
    pair_search: Box<dyn PairSearch>,
}

impl Ewald {
    /// Create a new Ewald calculator, using a cell list to find pairs
    pub fn new(parameters: EwaldParameters) -> Result<Ewald, Error> {
        parameters.validate()?;
        return Ok(Ewald {
            parameters,
            pair_search: Box::new(CellListPairs),
        });
    }

    /// Use the given `pair_search` for the real space sum
    #[must_use]
    pub fn with_pair_search(mut self, pair_search: impl PairSearch + 'static) -> Ewald {
        self.pair_search = Box::new(pair_search);
        self
    }

    /// Get the pair search used by this calculator
    pub fn pair_search(&self) -> &dyn PairSearch {
        &*self.pair_search
    }

    /// Derive the quantities needed by the energy terms for `system`
    pub fn prepare(&self, system: &ParticleSystem) -> Result<Prepared, Error> {
        prepare(system, self.parameters.r_cutoff)
    }

    /// Screened real space energy, `1/2 Σ_ij q_i q_j erfc(alpha r_ij) / r_ij`
    pub fn real_space(&self, system: &ParticleSystem, prepared: &Prepared) -> f64 {
        let pairs = self.pair_search.pairs(system.positions(), system.cell(), prepared.r_cutoff);
        let screening = Screening::Erfc { alpha: self.parameters.alpha };
        return real_space_energy(system, &pairs, screening);
    }

    /// Reciprocal space energy, summing over the cube of k-vectors
    pub fn reciprocal_space(&self, system: &ParticleSystem) -> f64 {
        let k_vectors = compute_k_vectors(&system.cell(), self.parameters.n_kvecs);
        return reciprocal_space_energy(system, self.parameters.alpha, &k_vectors);
    }

    /// Self energy correction
    pub fn self_energy(&self, system: &ParticleSystem) -> f64 {
        self_energy(system, self.parameters.alpha)
    }

    /// Dipole correction, `None` with metallic boundary conditions
    pub fn dipole(&self, system: &ParticleSystem) -> Option<f64> {
        match self.parameters.epsilon {
            Epsilon::Infinite => None,
            Epsilon::Finite(epsilon) => Some(dipole_correction(system, epsilon)),
        }
    }

    /// Neutralizing background correction, `None` for neutral systems
    pub fn neutralization(&self, system: &ParticleSystem, prepared: &Prepared) -> Option<f64> {
        if is_charged(prepared.total_charge) {
            Some(neutralization_correction(system, prepared.total_charge, self.parameters.alpha))
        } else {
            None
        }
    }
}

impl EnergyCalculator for Ewald {
    fn name(&self) -> &'static str {
        "ewald"
    }

    fn parameters(&self) -> String {
        serde_json::to_string(&self.parameters).expect("failed to serialize to JSON")
    }

    #[time_graph::instrument(name = "Ewald::compute")]
    fn compute_with_observer(&self, system: &ParticleSystem, observer: &dyn EnergyObserver) -> Result<EnergyResult, Error> {
        let prepared = self.prepare(system)?;

        let mut result = EnergyResultBuilder::new();
        result.observe(observer, EnergyTerm::Real, || self.real_space(system, &prepared));
        result.observe(observer, EnergyTerm::Reciprocal, || self.reciprocal_space(system));
        result.observe(observer, EnergyTerm::SelfEnergy, || self.self_energy(system));

        result.observe_optional(observer, EnergyTerm::Dipole, || self.dipole(system));
        result.observe_optional(observer, EnergyTerm::Neutralization, || {
            self.neutralization(system, &prepared)
        });

        return Ok(result.finish());
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_relative_eq, assert_ulps_eq};

    use super::*;
    use crate::Vector3D;
    use crate::systems::{BruteForcePairs, CubicCell};
    use crate::systems::test_utils::test_system;
    use crate::Calculator;
    use crate::calculators::SilentObserver;
    use crate::calculators::observer::tests::RecordingObserver;

    fn ewald(parameters: EwaldParameters) -> Ewald {
        Ewald::new(parameters).unwrap()
    }

    #[test]
    fn parameters() {
        let parameters: EwaldParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(parameters, EwaldParameters::default());
        assert_eq!(parameters.alpha, 10.0);
        assert_eq!(parameters.n_kvecs, 20);
        assert_eq!(parameters.r_cutoff, None);
        assert_eq!(parameters.epsilon, Epsilon::Infinite);

        let parameters: EwaldParameters = serde_json::from_str(
            r#"{"alpha": 3.5, "r_cutoff": 2.0, "n_kvecs": 4, "epsilon": {"Finite": 80.0}}"#
        ).unwrap();
        assert_eq!(parameters.alpha, 3.5);
        assert_eq!(parameters.r_cutoff, Some(2.0));
        assert_eq!(parameters.n_kvecs, 4);
        assert_eq!(parameters.epsilon, Epsilon::Finite(80.0));

        assert!(serde_json::from_str::<EwaldParameters>(r#"{"beta": 3}"#).is_err());

        let calculator = ewald(parameters);
        assert_eq!(
            EnergyCalculator::parameters(&calculator),
            r#"{"alpha":3.5,"r_cutoff":2.0,"n_kvecs":4,"epsilon":{"Finite":80.0}}"#
        );
    }

    #[test]
    fn invalid_parameters() {
        let error = Ewald::new(EwaldParameters { alpha: 0.0, ..Default::default() }).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: alpha must be positive, got 0");
        assert!(Ewald::new(EwaldParameters { alpha: -2.0, ..Default::default() }).is_err());
        assert!(Ewald::new(EwaldParameters { alpha: f64::NAN, ..Default::default() }).is_err());

        let error = Ewald::new(EwaldParameters { n_kvecs: 0, ..Default::default() }).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: n_kvecs must be at least 1, got 0");

        let error = Ewald::new(EwaldParameters { n_kvecs: usize::MAX, ..Default::default() }).unwrap_err();
        assert_eq!(
            error.to_string(),
            format!("invalid parameter: n_kvecs can not be larger than 256, got {}", usize::MAX)
        );
        assert!(Ewald::new(EwaldParameters { n_kvecs: MAX_N_KVECS, ..Default::default() }).is_ok());

        let error = Calculator::new("ewald", r#"{"n_kvecs": 100000000000}"#.into()).unwrap_err();
        assert!(matches!(error, Error::InvalidParameter(_)));

        let error = Ewald::new(EwaldParameters { r_cutoff: Some(-1.0), ..Default::default() }).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: r_cutoff must be positive, got -1");

        let error = Ewald::new(EwaldParameters {
            epsilon: Epsilon::Finite(0.0),
            ..Default::default()
        }).unwrap_err();
        assert!(error.to_string().starts_with("invalid parameter: expected a positive finite value for epsilon"));

        assert!(Ewald::new(EwaldParameters {
            epsilon: Epsilon::Finite(f64::INFINITY),
            ..Default::default()
        }).is_err());

        // the cutoff is only checked against the cell during the calculation
        let calculator = ewald(EwaldParameters { r_cutoff: Some(2.0), ..Default::default() });
        let error = calculator.compute_with_observer(&test_system("CsCl"), &SilentObserver).unwrap_err();
        assert!(matches!(error, Error::InvalidParameter(_)));
    }

    #[test]
    fn terms_order() {
        let calculator = ewald(EwaldParameters {
            n_kvecs: 3,
            epsilon: Epsilon::Finite(1.0),
            ..Default::default()
        });

        let observer = RecordingObserver::default();
        let result = calculator.compute_with_observer(&test_system("single charge"), &observer).unwrap();

        let expected = [
            EnergyTerm::Real,
            EnergyTerm::Reciprocal,
            EnergyTerm::SelfEnergy,
            EnergyTerm::Dipole,
            EnergyTerm::Neutralization,
        ];
        assert_eq!(*observer.started.borrow(), expected);
        assert_eq!(*observer.computed.borrow(), result.terms().collect::<Vec<_>>());

        let terms = result.terms().map(|(term, _)| term).collect::<Vec<_>>();
        assert_eq!(terms, expected);

        let sum = result.terms().map(|(_, value)| value).sum::<f64>();
        assert_ulps_eq!(result.total(), sum);
    }

    #[test]
    fn optional_terms() {
        let system = test_system("ion pair");

        // neutral system with metallic boundary conditions
        let calculator = ewald(EwaldParameters { alpha: 0.5, n_kvecs: 5, ..Default::default() });
        let result = calculator.compute_with_observer(&system, &SilentObserver).unwrap();
        assert_eq!(result.dipole(), None);
        assert_eq!(result.neutralization(), None);
        assert!(result.reciprocal().is_some());
        assert!(result.self_energy().is_some());
        assert_ulps_eq!(
            result.total(),
            result.real() + result.reciprocal().unwrap() + result.self_energy().unwrap()
        );

        // finite epsilon adds a dipole correction
        let calculator = ewald(EwaldParameters {
            alpha: 0.5,
            n_kvecs: 5,
            epsilon: Epsilon::Finite(2.0),
            ..Default::default()
        });
        let result = calculator.compute_with_observer(&system, &SilentObserver).unwrap();
        let dipole = result.dipole().unwrap();
        assert_relative_eq!(dipole, 2.0 * std::f64::consts::PI / 3000.0 * 4.0, max_relative = 1e-12);
        assert_eq!(result.neutralization(), None);

        // charged systems get a neutralization correction
        let calculator = ewald(EwaldParameters::default());
        let result = calculator.compute_with_observer(&test_system("single charge"), &SilentObserver).unwrap();
        assert_relative_eq!(
            result.neutralization().unwrap(),
            -std::f64::consts::PI / 200.0,
            max_relative = 1e-12
        );
        assert_eq!(result.dipole(), None);
    }

    #[test]
    fn optional_term_methods() {
        let metallic = ewald(EwaldParameters::default());
        let dielectric = ewald(EwaldParameters { epsilon: Epsilon::Finite(2.0), ..Default::default() });

        let system = test_system("ion pair");
        let prepared = metallic.prepare(&system).unwrap();
        assert_eq!(metallic.dipole(&system), None);
        assert_relative_eq!(
            dielectric.dipole(&system).unwrap(),
            2.0 * std::f64::consts::PI / 3000.0 * 4.0,
            max_relative = 1e-12
        );
        assert_eq!(metallic.neutralization(&system, &prepared), None);
        assert_eq!(dielectric.neutralization(&system, &prepared), None);

        let system = test_system("single charge");
        let prepared = metallic.prepare(&system).unwrap();
        assert_eq!(dielectric.dipole(&system), Some(0.0));
        assert_relative_eq!(
            metallic.neutralization(&system, &prepared).unwrap(),
            -std::f64::consts::PI / 200.0,
            max_relative = 1e-12
        );

        // the full calculation contains the same optional terms
        let result = dielectric.compute_with_observer(&system, &SilentObserver).unwrap();
        assert_eq!(result.dipole(), dielectric.dipole(&system));
        assert_eq!(result.neutralization(), dielectric.neutralization(&system, &prepared));
    }

    #[test]
    fn neutrality_threshold() {
        let calculator = ewald(EwaldParameters { n_kvecs: 2, ..Default::default() });

        let mut system = ParticleSystem::new(CubicCell::new(1.0).unwrap());
        system.add_particle(1.0, Vector3D::new(0.0, 0.0, 0.0));
        system.add_particle(-1.0 + 0.5e-8, Vector3D::new(0.5, 0.5, 0.5));
        let result = calculator.compute_with_observer(&system, &SilentObserver).unwrap();
        assert_eq!(result.neutralization(), None);

        let mut system = ParticleSystem::new(CubicCell::new(1.0).unwrap());
        system.add_particle(1.0, Vector3D::new(0.0, 0.0, 0.0));
        system.add_particle(-1.0 + 2e-8, Vector3D::new(0.5, 0.5, 0.5));
        let result = calculator.compute_with_observer(&system, &SilentObserver).unwrap();
        assert!(result.neutralization().is_some());
    }

    #[test]
    fn empty_system() {
        let system = ParticleSystem::new(CubicCell::new(4.0).unwrap());

        let calculator = ewald(EwaldParameters { n_kvecs: 3, ..Default::default() });
        let result = calculator.compute_with_observer(&system, &SilentObserver).unwrap();
        assert_eq!(result.real(), 0.0);
        assert_eq!(result.reciprocal(), Some(0.0));
        assert_eq!(result.self_energy(), Some(0.0));
        assert_eq!(result.dipole(), None);
        assert_eq!(result.neutralization(), None);
        assert_eq!(result.total(), 0.0);

        let calculator = ewald(EwaldParameters {
            n_kvecs: 3,
            epsilon: Epsilon::Finite(3.0),
            ..Default::default()
        });
        let result = calculator.compute_with_observer(&system, &SilentObserver).unwrap();
        assert_eq!(result.dipole(), Some(0.0));
        assert_eq!(result.total(), 0.0);
    }

    #[test]
    fn deterministic() {
        let system = test_system("random");
        let calculator = ewald(EwaldParameters { alpha: 1.2, n_kvecs: 6, ..Default::default() });

        let first = calculator.compute_with_observer(&system, &SilentObserver).unwrap();
        let second = calculator.compute_with_observer(&system, &SilentObserver).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn pair_search_independent() {
        let system = test_system("random");
        let parameters = EwaldParameters { alpha: 1.2, n_kvecs: 6, ..Default::default() };

        let cell_list = ewald(parameters.clone());
        assert_eq!(cell_list.pair_search().name(), "cell list");
        let brute_force = ewald(parameters).with_pair_search(BruteForcePairs);
        assert_eq!(brute_force.pair_search().name(), "brute force");

        for r_cutoff in [0.7, 1.3, 2.0] {
            let prepared = prepare(&system, Some(r_cutoff)).unwrap();
            assert_eq!(
                cell_list.real_space(&system, &prepared),
                brute_force.real_space(&system, &prepared),
            );
        }

        let first = cell_list.compute_with_observer(&system, &SilentObserver).unwrap();
        let second = brute_force.compute_with_observer(&system, &SilentObserver).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn real_space_convergence() {
        let system = test_system("NaCl");
        let calculator = ewald(EwaldParameters { alpha: 2.0, ..Default::default() });

        let real = |r_cutoff| {
            let prepared = prepare(&system, Some(r_cutoff)).unwrap();
            calculator.real_space(&system, &prepared)
        };

        // all minimum image pairs are within sqrt(3)/2 L
        let reference = real(0.9);
        assert_eq!(real(1.0), reference);

        let residuals = [0.55, 0.75].map(|r_cutoff| f64::abs(real(r_cutoff) - reference));
        assert!(residuals[0] > residuals[1]);
        assert!(residuals[1] > 0.0);
    }

    #[test]
    fn reciprocal_space_convergence() {
        let system = test_system("CsCl");
        let reciprocal = |n_kvecs| {
            let calculator = ewald(EwaldParameters { n_kvecs, ..Default::default() });
            calculator.reciprocal_space(&system)
        };

        // every additional shell of k-vectors adds a positive contribution
        let values = (1..=5).map(reciprocal).collect::<Vec<_>>();
        for window in values.windows(2) {
            assert!(window[1] > window[0]);
        }

        // and the sum converges
        assert_relative_eq!(reciprocal(15), reciprocal(20), max_relative = 1e-8);
    }

    #[test]
    fn independent_of_alpha() {
        let system = test_system("CsCl");
        let total = |alpha| {
            let calculator = ewald(EwaldParameters {
                alpha: alpha,
                r_cutoff: Some(1.0),
                ..Default::default()
            });
            calculator.compute_with_observer(&system, &SilentObserver).unwrap().total()
        };

        let reference = total(10.0);
        assert_relative_eq!(total(8.0), reference, max_relative = 1e-8);
        assert_relative_eq!(total(6.0), reference, max_relative = 1e-8);
    }

    #[test]
    fn self_energy_term() {
        let calculator = ewald(EwaldParameters { alpha: 3.0, ..Default::default() });
        let value = calculator.self_energy(&test_system("NaCl"));
        assert_relative_eq!(value, -3.0 / f64::sqrt(std::f64::consts::PI) * 8.0, max_relative = 1e-14);
    }
}
