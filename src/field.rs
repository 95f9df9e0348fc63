//! Distance-weighted value noise.
//!
//! For a query point `q`, every value point `p` closer than `max_distance` contributes
//! `p.value * (max_distance - |q - p|)^2`. The sum is not normalized; it is folded into
//! `[0, 1]` with `(sin(sum) + 1) / 2`.
//!
//! ```text
//!  weight
//!  r²|*
//!    | *
//!    |   *
//!    |      *
//!    |          *  *
//!  0 +---------------*----------> distance
//!    0               r = max_distance
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    config::NoiseConfig,
    error::Result,
    grid::Grid,
    types::{Point, Value, distance},
    value_point::ValuePoint,
};

/// Weight of a value point at `distance` from the query.
///
/// Quadratic falloff from `max_distance²` at zero to exactly zero at `max_distance`; points
/// at or beyond `max_distance` weigh nothing.
#[inline]
pub fn falloff_weight(distance: Value, max_distance: Value) -> Value {
    if distance < max_distance {
        (max_distance - distance).powi(2)
    } else {
        0.0
    }
}

/// Maps any real number into `[0, 1]`.
#[inline]
pub fn sine_fold(sum: Value) -> Value {
    (sum.sin() + 1.0) / 2.0
}

/// A populated value-noise field.
///
/// Only obtainable through its constructors, which fill the grid completely before
/// returning, so every `NoiseField` is ready to be sampled. It is immutable afterwards and
/// can be shared between threads for concurrent sampling.
#[derive(Debug, Clone)]
pub struct NoiseField {
    grid: Grid,
    max_distance: Value,
}

impl NoiseField {
    /// Builds a field over `[-boundary, boundary]^3` with `point_count` random value points.
    pub fn new<R: Rng>(
        boundary: u32,
        point_count: usize,
        cell_size: Value,
        rng: &mut R,
    ) -> Result<Self> {
        let mut grid = Grid::new(boundary, cell_size)?;
        grid.populate(point_count, rng)?;
        log::debug!(
            "noise field ready: {} points, {:?} cells",
            grid.len(),
            grid.dimensions()
        );
        Ok(Self {
            grid,
            max_distance: cell_size,
        })
    }

    /// Builds a field from a [`NoiseConfig`], seeding the placement RNG from `config.seed`.
    pub fn from_config(config: &NoiseConfig) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::new(config.boundary, config.point_count, config.cell_size, &mut rng)
    }

    /// Builds a field from explicit value points.
    ///
    /// Fails on the first point outside the cube or duplicating earlier coordinates.
    pub fn from_points<I>(boundary: u32, cell_size: Value, points: I) -> Result<Self>
    where
        I: IntoIterator<Item = ValuePoint>,
    {
        let mut grid = Grid::new(boundary, cell_size)?;
        for point in points {
            grid.insert(point)?;
        }
        Ok(Self {
            grid,
            max_distance: cell_size,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Influence radius of a value point. Equal to the grid's cell size.
    pub fn max_distance(&self) -> Value {
        self.max_distance
    }

    pub fn point_count(&self) -> usize {
        self.grid.len()
    }

    /// Unfolded sum of weighted contributions at `point`.
    pub fn weighted_sum(&self, point: Point) -> Result<Value> {
        let sum: Value = self
            .grid
            .neighborhood(point)?
            .map(|p| p.value * falloff_weight(distance(&point, &p.position), self.max_distance))
            .sum();
        Ok(sum)
    }

    /// Noise value in `[0, 1]` at `point`.
    ///
    /// Fails with [`NoiseError::OutOfRangeQuery`](crate::error::NoiseError::OutOfRangeQuery)
    /// when `point` lies outside the addressable cube.
    pub fn evaluate(&self, point: Point) -> Result<Value> {
        self.weighted_sum(point).map(sine_fold)
    }
}
