use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::Error;
use crate::systems::ParticleSystem;
use crate::calculators::{EnergyCalculator, EnergyObserver, EnergyResult};
use crate::calculators::{Ewald, EwaldParameters, Direct, DirectParameters};

/// A `Calculator` wraps one of the energy calculators, created by name from
/// JSON parameters.
#[derive(Debug)]
pub struct Calculator {
    implementation: Box<dyn EnergyCalculator>,
    parameters: String,
}

impl Calculator {
    /// Create a new calculator with the given `name` and `parameters`.
    ///
    /// The list of available calculators and the corresponding parameters
    /// are documented in the JSON schemas.
    ///
    /// # Errors
    ///
    /// If no calculator with the given `name` exists, or if the parameters
    /// are not valid for this calculator.
    pub fn new(name: &str, parameters: String) -> Result<Calculator, Error> {
        let creator = match REGISTERED_CALCULATORS.get(name) {
            Some(creator) => creator,
            None => {
                return Err(Error::InvalidParameter(
                    format!("unknown calculator with name '{}'", name)
                ));
            }
        };

        return Ok(Calculator {
            implementation: creator(&parameters)?,
            parameters: parameters,
        });
    }

    /// Get the name associated with this Calculator
    pub fn name(&self) -> &'static str {
        self.implementation.name()
    }

    /// Get the parameters used to create this calculator in a string,
    /// formatted as JSON.
    pub fn parameters(&self) -> &str {
        &self.parameters
    }

    /// Compute the energy of `system`, logging progress through the `log`
    /// crate
    pub fn compute(&self, system: &ParticleSystem) -> Result<EnergyResult, Error> {
        self.implementation.compute(system)
    }

    /// Compute the energy of `system`, notifying `observer` of the progress
    pub fn compute_with_observer(&self, system: &ParticleSystem, observer: &dyn EnergyObserver) -> Result<EnergyResult, Error> {
        self.implementation.compute_with_observer(system, observer)
    }
}

type CalculatorCreator = fn(&str) -> Result<Box<dyn EnergyCalculator>, Error>;

macro_rules! add_calculator {
    ($map :expr, $name :literal, $type :ty, $parameters :ty) => (
        $map.insert($name, (|json| {
            let parameters = serde_json::from_str::<$parameters>(json)?;
            Ok(Box::new(<$type>::new(parameters)?))
        }) as CalculatorCreator);
    );
}

static REGISTERED_CALCULATORS: Lazy<BTreeMap<&'static str, CalculatorCreator>> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    add_calculator!(map, "ewald", Ewald, EwaldParameters);
    add_calculator!(map, "direct", Direct, DirectParameters);
    return map;
});
