mod cell;
pub use self::cell::CubicCell;

mod particles;
pub use self::particles::ParticleSystem;

mod neighbors;
pub use self::neighbors::{PairSearch, BruteForcePairs, CellListPairs};

#[cfg(test)]
pub(crate) mod test_utils;

/// Ordered pair of particles coming from a [`PairSearch`].
///
/// Pair searches return both `i-j` and `j-i`, so any sum over pairs counts
/// every interaction twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair {
    /// index of the first particle in the pair
    pub first: usize,
    /// index of the second particle in the pair
    pub second: usize,
    /// minimum image distance between the two particles
    pub distance: f64,
}
