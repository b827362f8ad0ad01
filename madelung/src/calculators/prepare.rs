use crate::Error;
use crate::systems::ParticleSystem;

/// Quantities derived from a system and the calculation parameters, computed
/// once before evaluating the energy terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prepared {
    /// number of particles in the system
    pub n_particles: usize,
    /// sum of all charges in the system
    pub total_charge: f64,
    /// box descriptor: three lengths and three angles in degrees
    pub dimensions: [f64; 6],
    /// volume of the cell
    pub volume: f64,
    /// real space cutoff, with the default value resolved
    pub r_cutoff: f64,
}

/// Check that `r_cutoff` is a valid cutoff, without knowing the system yet
pub(crate) fn validate_cutoff(r_cutoff: Option<f64>) -> Result<(), Error> {
    if let Some(r_cutoff) = r_cutoff {
        if !(r_cutoff.is_finite() && r_cutoff > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "r_cutoff must be positive, got {}", r_cutoff
            )));
        }
    }
    Ok(())
}

/// Compute the derived quantities for the given `system`, resolving the
/// default real space cutoff (`sqrt(3)/2 L`) if `r_cutoff` is `None`.
pub fn prepare(system: &ParticleSystem, r_cutoff: Option<f64>) -> Result<Prepared, Error> {
    validate_cutoff(r_cutoff)?;

    let cell = system.cell();
    let r_cutoff = match r_cutoff {
        Some(r_cutoff) => {
            if r_cutoff > cell.max_cutoff() {
                return Err(Error::InvalidParameter(format!(
                    "r_cutoff ({}) can not be larger than the cell length ({}) \
                    with the minimum image convention",
                    r_cutoff, cell.length()
                )));
            }
            r_cutoff
        }
        None => cell.max_image_distance(),
    };

    return Ok(Prepared {
        n_particles: system.size(),
        total_charge: system.total_charge(),
        dimensions: cell.dimensions(),
        volume: cell.volume(),
        r_cutoff: r_cutoff,
    });
}
