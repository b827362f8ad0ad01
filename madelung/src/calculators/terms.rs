//! Individual contributions to the electrostatic energy. All functions here
//! are pure functions of their inputs, and sum their contributions in a fixed
//! order.
//!
//! Energies are in natural electrostatic units: the energy of two charges
//! `q_i` and `q_j` at a distance `r` is `q_i q_j / r`.

use std::f64::consts::PI;

use crate::Vector3D;
use crate::math::{KVector, erfc};
use crate::systems::{Pair, ParticleSystem};

/// Systems with a total charge below this value (in absolute value) are
/// considered neutral, and do not get a neutralization correction.
pub const NEUTRALITY_TOLERANCE: f64 = 1e-8;

/// Screening function applied to the pair interactions in real space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screening {
    /// Bare Coulomb interactions, `q_i q_j / r`
    None,
    /// Ewald screening, `q_i q_j erfc(alpha r) / r`
    Erfc {
        /// Ewald splitting parameter
        alpha: f64,
    },
}

impl Screening {
    #[inline]
    fn factor(&self, distance: f64) -> f64 {
        match *self {
            Screening::None => 1.0,
            Screening::Erfc { alpha } => erfc(alpha * distance),
        }
    }
}

/// Real space energy from a list of ordered `pairs`.
///
/// Every pair appears twice in `pairs` (as `i-j` and `j-i`), so the sum is
/// divided by two.
#[time_graph::instrument(name = "real_space_energy")]
pub fn real_space_energy(system: &ParticleSystem, pairs: &[Pair], screening: Screening) -> f64 {
    let charges = system.charges();
    let energy = pairs.iter()
        .map(|pair| {
            charges[pair.first] * charges[pair.second] * screening.factor(pair.distance) / pair.distance
        })
        .sum::<f64>();

    return energy / 2.0;
}

/// Squared norm of the structure factor at the wave vector `k`,
/// `|Σ_i q_i exp(i k·r_i)|²`.
pub fn structure_factor(system: &ParticleSystem, k: Vector3D) -> f64 {
    let mut real = 0.0;
    let mut imag = 0.0;
    for (&charge, position) in system.charges().iter().zip(system.positions()) {
        let (sin, cos) = f64::sin_cos(k * position);
        real += charge * cos;
        imag += charge * sin;
    }

    return real * real + imag * imag;
}

/// Reciprocal space part of the Ewald energy, summing over all the given
/// `k_vectors`.
#[time_graph::instrument(name = "reciprocal_space_energy")]
pub fn reciprocal_space_energy(system: &ParticleSystem, alpha: f64, k_vectors: &[KVector]) -> f64 {
    let energy = k_vectors.iter()
        .map(|k| {
            f64::exp(-k.norm2 / (4.0 * alpha * alpha)) / k.norm2 * structure_factor(system, k.vector)
        })
        .sum::<f64>();

    return 2.0 * PI / system.cell().volume() * energy;
}

/// Self energy correction, `-alpha / sqrt(π) Σ_i q_i²`. This only depends on
/// the charges, not on the positions.
pub fn self_energy(system: &ParticleSystem, alpha: f64) -> f64 {
    let sum_charges_squared = system.charges().iter().map(|q| q * q).sum::<f64>();
    return -alpha / PI.sqrt() * sum_charges_squared;
}

/// Dipole correction for a system surrounded by a medium of relative
/// permittivity `epsilon`, `2π / ((1 + ε) V) |Σ_i q_i r_i|²`.
pub fn dipole_correction(system: &ParticleSystem, epsilon: f64) -> f64 {
    let dipole = system.dipole_moment();
    return 2.0 * PI / ((1.0 + epsilon) * system.cell().volume()) * dipole.norm2();
}

/// Energy of the interaction between a charged system and the uniform
/// background neutralizing it, `-π Q² / (2 alpha² V)`.
pub fn neutralization_correction(system: &ParticleSystem, total_charge: f64, alpha: f64) -> f64 {
    let volume = system.cell().volume();
    return -PI / (2.0 * alpha * alpha * volume) * total_charge * total_charge;
}

/// Does a system with the given `total_charge` need a neutralization
/// correction? This is a hard threshold at [`NEUTRALITY_TOLERANCE`].
pub fn is_charged(total_charge: f64) -> bool {
    f64::abs(total_charge) > NEUTRALITY_TOLERANCE
}
