//! Generate the k-vectors (also called reciprocal or Fourier vectors) needed
//! for the reciprocal space part of the Ewald summation. More specifically,
//! these are all points of the reciprocal lattice of a cubic cell with integer
//! coordinates in `[-n, n]` along each axis, excluding the origin.

use crate::Vector3D;
use crate::systems::CubicCell;

/// A single k-vector and its squared norm stored together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KVector {
    /// the k-vector itself
    pub vector: Vector3D,
    /// squared length of the k-vector
    pub norm2: f64,
}

/// Generate all k-vectors `2π/L (n_x, n_y, n_z)` with `|n_x|, |n_y|, |n_z| <=
/// n_kvecs` for the given cell, excluding `k = 0`.
///
/// The vectors cover the full cube of integer triples, not a sphere, and come
/// in a fixed order (`n_x` varies slowest, `n_z` fastest), which makes any sum
/// over them reproducible.
///
/// The number of vectors grows as `(2 n_kvecs + 1)³`, `n_kvecs` should come
/// from validated parameters (see [`crate::calculators::MAX_N_KVECS`]).
pub fn compute_k_vectors(cell: &CubicCell, n_kvecs: usize) -> Vec<KVector> {
    let prefactor = 2.0 * std::f64::consts::PI / cell.length();

    let n_max = n_kvecs as i64;
    let n_per_axis = 2 * n_kvecs + 1;
    let mut results = Vec::with_capacity(n_per_axis * n_per_axis * n_per_axis - 1);
    for n_x in -n_max..=n_max {
        for n_y in -n_max..=n_max {
            for n_z in -n_max..=n_max {
                if n_x == 0 && n_y == 0 && n_z == 0 {
                    // the k = 0 term diverges, and is handled by the
                    // neutralization correction
                    continue;
                }

                let vector = prefactor * Vector3D::new(n_x as f64, n_y as f64, n_z as f64);
                results.push(KVector {
                    vector: vector,
                    norm2: vector.norm2(),
                });
            }
        }
    }

    return results;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;
    use std::f64::consts::PI;

    #[test]
    fn number_of_kvectors() {
        let cell = CubicCell::new(1.0).unwrap();
        assert_eq!(compute_k_vectors(&cell, 0).len(), 0);
        assert_eq!(compute_k_vectors(&cell, 1).len(), 26);
        assert_eq!(compute_k_vectors(&cell, 2).len(), 124);
        assert_eq!(compute_k_vectors(&cell, 20).len(), 41 * 41 * 41 - 1);
    }

    #[test]
    fn kvectors() {
        let cell = CubicCell::new(2.0).unwrap();
        let k_vectors = compute_k_vectors(&cell, 1);

        // no zero vector
        assert!(k_vectors.iter().all(|k| k.norm2 > 0.0));

        // fixed ordering
        assert_eq!(k_vectors[0].vector, Vector3D::new(-PI, -PI, -PI));
        assert_eq!(k_vectors[1].vector, Vector3D::new(-PI, -PI, 0.0));
        assert_eq!(k_vectors[25].vector, Vector3D::new(PI, PI, PI));

        for k_vector in &k_vectors {
            assert_ulps_eq!(k_vector.norm2, k_vector.vector.norm2());
            // the cube includes corner vectors with |k| = sqrt(3) 2π/L
            assert!(k_vector.norm2 <= 3.0 * PI * PI * (1.0 + 1e-12));
        }

        // the set is symmetric under k -> -k
        for k_vector in &k_vectors {
            assert!(k_vectors.iter().any(|k| k.vector == -k_vector.vector));
        }
    }
}
