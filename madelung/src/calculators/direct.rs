use crate::Error;
use crate::systems::{ParticleSystem, PairSearch, CellListPairs};

use super::{EnergyCalculator, EnergyObserver, EnergyResult, EnergyTerm};
use super::energy::EnergyResultBuilder;
use super::prepare::{prepare, validate_cutoff};
use super::terms::{Screening, real_space_energy};

/// Parameters for the direct summation of the electrostatic energy
#[derive(Debug, Clone, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DirectParameters {
    /// Cutoff radius for the pair sum. Defaults to `sqrt(3)/2 L` for a cell
    /// of side length `L`.
    #[serde(default)]
    pub r_cutoff: Option<f64>,
}

/// Bare Coulomb sum over the minimum image pairs within the cutoff, without
/// any periodic correction. This is only meaningful for a few well separated
/// charges, and is mainly useful as a reference.
#[derive(Debug)]
pub struct Direct {
    parameters: DirectParameters,
    pair_search: Box<dyn PairSearch>,
}

impl Direct {
    pub fn new(parameters: DirectParameters) -> Result<Direct, Error> {
        validate_cutoff(parameters.r_cutoff)?;
        return Ok(Direct {
            parameters,
            pair_search: Box::new(CellListPairs),
        });
    }

    /// Use the given `pair_search` to find pairs
    #[must_use]
    pub fn with_pair_search(mut self, pair_search: impl PairSearch + 'static) -> Direct {
        self.pair_search = Box::new(pair_search);
        self
    }
}

impl EnergyCalculator for Direct {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn parameters(&self) -> String {
        serde_json::to_string(&self.parameters).expect("failed to serialize to JSON")
    }

    #[time_graph::instrument(name = "Direct::compute")]
    fn compute_with_observer(&self, system: &ParticleSystem, observer: &dyn EnergyObserver) -> Result<EnergyResult, Error> {
        let prepared = prepare(system, self.parameters.r_cutoff)?;

        let mut result = EnergyResultBuilder::new();
        result.observe(observer, EnergyTerm::Real, || {
            let pairs = self.pair_search.pairs(system.positions(), system.cell(), prepared.r_cutoff);
            real_space_energy(system, &pairs, Screening::None)
        });

        return Ok(result.finish());
    }
}
