use crate::Error;
use crate::systems::ParticleSystem;

mod energy;
pub use self::energy::{EnergyTerm, EnergyResult};

mod observer;
pub use self::observer::{EnergyObserver, LogObserver, SilentObserver};

mod prepare;
pub use self::prepare::{Prepared, prepare};

pub mod terms;

mod ewald;
pub use self::ewald::{Ewald, EwaldParameters, Epsilon, MAX_N_KVECS};

mod direct;
pub use self::direct::{Direct, DirectParameters};

/// Common interface for all the methods computing the electrostatic energy
/// of a periodic system.
///
/// `Send + Sync` are required super-traits so that calculators can be shared
/// between threads, each thread computing energies for different systems.
pub trait EnergyCalculator: std::fmt::Debug + Send + Sync {
    /// Get the name of this calculator
    fn name(&self) -> &'static str;

    /// Get the parameters used to create this calculator as a JSON string
    fn parameters(&self) -> String;

    /// Compute the energy of `system`, notifying `observer` of the progress
    /// of the calculation.
    ///
    /// Two particles at the same position (up to periodic images) have an
    /// infinite interaction energy: the real space term and the total are
    /// then infinite (or NaN if both signs are present), and a warning is
    /// emitted through `log` by the pair search.
    fn compute_with_observer(&self, system: &ParticleSystem, observer: &dyn EnergyObserver) -> Result<EnergyResult, Error>;

    /// Compute the energy of `system`, logging progress with [`LogObserver`]
    fn compute(&self, system: &ParticleSystem) -> Result<EnergyResult, Error> {
        self.compute_with_observer(system, &LogObserver)
    }
}
