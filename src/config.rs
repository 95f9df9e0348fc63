use crate::types::Value;

/// Construction parameters for a [`NoiseField`](crate::field::NoiseField).
///
/// ```rust,ignore
/// let field = NoiseField::from_config(
///     &NoiseConfig::default().with_point_count(4000).with_seed(7),
/// )?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseConfig {
    /// Half-extent of the addressable cube `[-boundary, boundary]^3`.
    pub boundary: u32,
    /// Number of random value points placed in the cube.
    pub point_count: usize,
    /// Edge length of a grid cell, and the influence radius of every value point.
    pub cell_size: Value,
    /// Seed for the point placement RNG. Equal configs build identical fields.
    pub seed: u64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            boundary: 10,
            point_count: 2000,
            cell_size: 2.0,
            seed: 0,
        }
    }
}

impl NoiseConfig {
    pub fn new(boundary: u32, point_count: usize, cell_size: Value) -> Self {
        Self {
            boundary,
            point_count,
            cell_size,
            ..Default::default()
        }
    }

    pub fn with_boundary(mut self, boundary: u32) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_point_count(mut self, point_count: usize) -> Self {
        self.point_count = point_count;
        self
    }

    pub fn with_cell_size(mut self, cell_size: Value) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
