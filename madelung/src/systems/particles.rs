use crate::{Error, Vector3D};
use super::CubicCell;

/// A set of point charges inside a periodic cubic cell.
///
/// The system is only read during energy calculations, so it can be shared
/// freely between calculators.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ParticleSystemData")]
pub struct ParticleSystem {
    cell: CubicCell,
    positions: Vec<Vector3D>,
    charges: Vec<f64>,
}

/// Serialized form of a [`ParticleSystem`], checked for consistency when
/// deserializing
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ParticleSystemData {
    cell: CubicCell,
    positions: Vec<Vector3D>,
    charges: Vec<f64>,
}

impl TryFrom<ParticleSystemData> for ParticleSystem {
    type Error = Error;

    fn try_from(data: ParticleSystemData) -> Result<ParticleSystem, Error> {
        ParticleSystem::from_parts(data.positions, data.charges, data.cell.length())
    }
}

impl ParticleSystem {
    /// Create a new empty system with the given unit cell
    pub fn new(cell: CubicCell) -> ParticleSystem {
        ParticleSystem {
            cell: cell,
            positions: Vec::new(),
            charges: Vec::new(),
        }
    }

    /// Create a system from separate lists of positions and charges, in a
    /// cubic cell of side length `length`.
    pub fn from_parts(positions: Vec<Vector3D>, charges: Vec<f64>, length: f64) -> Result<ParticleSystem, Error> {
        if positions.len() != charges.len() {
            return Err(Error::DimensionMismatch {
                positions: positions.len(),
                charges: charges.len(),
            });
        }

        let cell = CubicCell::new(length)?;
        return Ok(ParticleSystem { cell, positions, charges });
    }

    /// Add a particle with the given charge and position to this system
    pub fn add_particle(&mut self, charge: f64, position: Vector3D) {
        self.charges.push(charge);
        self.positions.push(position);
    }

    /// Get the number of particles in this system
    pub fn size(&self) -> usize {
        self.charges.len()
    }

    /// Get the unit cell of this system
    pub fn cell(&self) -> CubicCell {
        self.cell
    }

    /// Get the positions of all particles
    pub fn positions(&self) -> &[Vector3D] {
        &self.positions
    }

    /// Get the charges of all particles
    pub fn charges(&self) -> &[f64] {
        &self.charges
    }

    /// Sum of all charges in the system
    pub fn total_charge(&self) -> f64 {
        self.charges.iter().sum()
    }

    /// Total dipole moment of the system, `Σ q_i r_i`, computed from the
    /// positions as given (without wrapping them inside the cell).
    pub fn dipole_moment(&self) -> Vector3D {
        let mut dipole = Vector3D::zero();
        for (&charge, position) in self.charges.iter().zip(&self.positions) {
            dipole += charge * position;
        }
        return dipole;
    }
}
