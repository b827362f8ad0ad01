use log::warn;
use ndarray::Array3;

use crate::Vector3D;
use super::{CubicCell, Pair};

/// Maximal number of cells, we need to use this to prevent having too many
/// cells with a large unit cell and a small cutoff
const MAX_NUMBER_OF_CELLS: f64 = 1e5;

/// Particles closer than this distance trigger a warning
const CLOSE_CONTACT: f64 = 1e-3;

/// A `PairSearch` finds all pairs of particles within a cutoff of one another,
/// using the minimum image convention in a periodic cubic cell.
///
/// Implementations must return every ordered pair `(i, j)` with `i != j` and a
/// minimum image distance below or equal to the cutoff: both `i-j` and `j-i`
/// are included. The pairs must be sorted by `(first, second)`, which makes the
/// summation order of all energies independent of the pair search in use.
pub trait PairSearch: std::fmt::Debug + Send + Sync {
    /// Get the name of this pair search
    fn name(&self) -> &'static str;

    /// Compute the list of ordered pairs in a system with the given
    /// `positions`, `cell` and `cutoff`.
    fn pairs(&self, positions: &[Vector3D], cell: CubicCell, cutoff: f64) -> Vec<Pair>;
}

/// Check if the particles `first` and `second` are within `cutoff` of one
/// another, and create the corresponding pair.
///
/// The distance itself is compared to the cutoff, so that pairs at exactly
/// `sqrt(3)/2 L` are found with the default cutoff.
fn pair_within_cutoff(
    positions: &[Vector3D],
    cell: &CubicCell,
    cutoff: f64,
    first: usize,
    second: usize,
) -> Option<Pair> {
    let distance = cell.distance(positions[first], positions[second]);
    if distance > cutoff {
        return None;
    }

    if first < second && distance < CLOSE_CONTACT {
        warn!(
            "particles {} and {} are very close to one another ({} A)",
            first, second, distance
        );
    }

    return Some(Pair { first, second, distance });
}

/// Reference pair search looking at all the `N²` pairs in the system.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForcePairs;

impl PairSearch for BruteForcePairs {
    fn name(&self) -> &'static str {
        "brute force"
    }

    #[time_graph::instrument(name = "BruteForcePairs")]
    fn pairs(&self, positions: &[Vector3D], cell: CubicCell, cutoff: f64) -> Vec<Pair> {
        let mut pairs = Vec::new();
        for first in 0..positions.len() {
            for second in 0..positions.len() {
                if first == second {
                    continue;
                }

                if let Some(pair) = pair_within_cutoff(positions, &cell, cutoff, first, second) {
                    pairs.push(pair);
                }
            }
        }

        return pairs;
    }
}

/// The cell list is used to sort particles inside bins/cells.
///
/// Each bin is at least `cutoff` wide, so all the minimum image neighbors of a
/// particle are in the same bin or in one of the (periodically wrapped)
/// neighboring bins.
#[derive(Debug, Clone)]
struct CellList {
    /// indexes of the particles in each bin
    bins: Array3<Vec<usize>>,
    /// Unit cell defining periodic boundary conditions
    cell: CubicCell,
}

impl CellList {
    /// Create a new empty `CellList` for the given unit cell and cutoff
    fn new(cell: CubicCell, cutoff: f64) -> CellList {
        let mut n_bins = f64::clamp(f64::trunc(cell.length() / cutoff), 1.0, f64::INFINITY);

        // limit memory consumption by ensuring we have less than
        // `MAX_NUMBER_OF_CELLS` bins to look though
        if n_bins * n_bins * n_bins > MAX_NUMBER_OF_CELLS {
            n_bins = f64::trunc(f64::cbrt(MAX_NUMBER_OF_CELLS));
        }

        let n_bins = n_bins as usize;
        CellList {
            bins: Array3::from_elem([n_bins, n_bins, n_bins], Vec::new()),
            cell: cell,
        }
    }

    /// Number of bins along each axis
    fn n_bins(&self) -> usize {
        self.bins.shape()[0]
    }

    /// Add a single particle to the cell list at the given `position`. The
    /// particle is uniquely identified by its `index`.
    fn add_particle(&mut self, index: usize, mut position: Vector3D) {
        self.cell.wrap_vector(&mut position);
        let fractional = self.cell.fractional(position);

        let n_bins = self.n_bins();
        // rounding in `wrap_vector` can produce a fractional coordinate of
        // exactly 1, which belongs to the last bin
        let bin = |x: f64| usize::min(f64::floor(x * n_bins as f64) as usize, n_bins - 1);

        self.bins[[bin(fractional[0]), bin(fractional[1]), bin(fractional[2])]].push(index);
    }

    /// Get the indexes of the bins to search around `bin` along one axis. Each
    /// bin appears at most once, even when there are less than three bins.
    fn search_range(&self, bin: usize) -> Vec<usize> {
        let n_bins = self.n_bins();
        if n_bins < 3 {
            (0..n_bins).collect()
        } else {
            vec![(bin + n_bins - 1) % n_bins, bin, (bin + 1) % n_bins]
        }
    }
}

/// Pair search based on a cell list, scaling linearly with the number of
/// particles at constant density.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellListPairs;

impl PairSearch for CellListPairs {
    fn name(&self) -> &'static str {
        "cell list"
    }

    #[time_graph::instrument(name = "CellListPairs")]
    fn pairs(&self, positions: &[Vector3D], cell: CubicCell, cutoff: f64) -> Vec<Pair> {
        let mut cell_list = CellList::new(cell, cutoff);
        for (index, &position) in positions.iter().enumerate() {
            cell_list.add_particle(index, position);
        }

        let mut pairs = Vec::new();
        for ((bin_x, bin_y, bin_z), current_bin) in cell_list.bins.indexed_iter() {
            for &neighbor_x in &cell_list.search_range(bin_x) {
                for &neighbor_y in &cell_list.search_range(bin_y) {
                    for &neighbor_z in &cell_list.search_range(bin_z) {
                        let neighbor_bin = &cell_list.bins[[neighbor_x, neighbor_y, neighbor_z]];
                        for &first in current_bin {
                            for &second in neighbor_bin {
                                if first == second {
                                    continue;
                                }

                                if let Some(pair) = pair_within_cutoff(positions, &cell, cutoff, first, second) {
                                    pairs.push(pair);
                                }
                            }
                        }
                    }
                }
            }
        }

        // sort the pairs to use the same order as the brute force search
        pairs.sort_unstable_by_key(|pair| (pair.first, pair.second));

        return pairs;
    }
}
