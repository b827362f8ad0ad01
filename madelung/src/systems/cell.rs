//! The `CubicCell` type represents the enclosing box of a periodic system of
//! point charges.
use crate::{Error, Vector3D};

/// A `CubicCell` defines the periodic boundaries of a system as a cube of side
/// length `L`. All three angles are fixed at 90°.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "CubicCellData")]
pub struct CubicCell {
    length: f64,
}

/// Serialized form of a [`CubicCell`], validated by [`CubicCell::new`] when
/// deserializing
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct CubicCellData {
    length: f64,
}

impl TryFrom<CubicCellData> for CubicCell {
    type Error = Error;

    fn try_from(data: CubicCellData) -> Result<CubicCell, Error> {
        CubicCell::new(data.length)
    }
}

impl CubicCell {
    /// Create a new cubic cell with the given side length. The length must be
    /// a finite, strictly positive number.
    pub fn new(length: f64) -> Result<CubicCell, Error> {
        if !(length.is_finite() && length > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "cell length must be positive, got {}", length
            )));
        }

        return Ok(CubicCell { length });
    }

    /// Get the side length `L` of the cell
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Get the volume `L³` of the cell
    pub fn volume(&self) -> f64 {
        self.length * self.length * self.length
    }

    /// Get the box descriptor for this cell: the three lengths followed by the
    /// three angles (in degrees).
    pub fn dimensions(&self) -> [f64; 6] {
        [self.length, self.length, self.length, 90.0, 90.0, 90.0]
    }

    /// Largest possible distance between two points under the minimum image
    /// convention, i.e. half of the cell diagonal.
    pub fn max_image_distance(&self) -> f64 {
        0.5 * f64::sqrt(3.0) * self.length
    }

    /// Largest real-space cutoff accepted for this cell. Pairs are found with
    /// the minimum image convention, which can not represent spheres larger
    /// than one cell length.
    pub fn max_cutoff(&self) -> f64 {
        self.length
    }
}

/// Geometric operations using periodic boundary conditions
impl CubicCell {
    /// Wrap a vector in the unit cell, producing a vector with all components
    /// in `[0, L)`.
    pub fn wrap_vector(&self, vector: &mut Vector3D) {
        for xyz in 0..3 {
            vector[xyz] -= f64::floor(vector[xyz] / self.length) * self.length;
        }
    }

    /// Find the minimum image of a vector in the unit cell, producing a vector
    /// with all components in `[-L/2, L/2]`.
    pub fn vector_image(&self, vector: &mut Vector3D) {
        for xyz in 0..3 {
            vector[xyz] -= f64::round(vector[xyz] / self.length) * self.length;
        }
    }

    /// Get the fractional representation of the `vector` in this cell
    pub fn fractional(&self, vector: Vector3D) -> Vector3D {
        vector / self.length
    }

    /// Periodic boundary conditions squared distance between the point `u` and
    /// the point `v`
    pub fn distance2(&self, u: Vector3D, v: Vector3D) -> f64 {
        let mut d = v - u;
        self.vector_image(&mut d);
        return d.norm2();
    }

    /// Periodic boundary conditions distance between the point `u` and
    /// the point `v`
    pub fn distance(&self, u: Vector3D, v: Vector3D) -> f64 {
        return f64::sqrt(self.distance2(u, v));
    }
}
