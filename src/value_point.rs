use rand::Rng;

use crate::types::{Point, Value};

/// The discrete payloads a generated [`ValuePoint`] can carry, each equally likely.
pub const VALUE_LEVELS: [Value; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Spacing of the coordinate lattice random value points are placed on.
pub const COORDINATE_STEP: Value = 0.1;

/// Lattice positions per axis between `-boundary` (inclusive) and `boundary` (exclusive).
#[inline]
pub fn lattice_steps(boundary: u32) -> u64 {
    boundary as u64 * 20
}

/// Position of lattice slot `[a, b, c]`, each step counted from `-boundary`.
#[inline]
pub fn lattice_point(boundary: u32, steps: [u64; 3]) -> Point {
    let start = -(boundary as Value);
    Point::from(steps.map(|n| n as Value * COORDINATE_STEP + start))
}

/// A point in space carrying a scalar used as a noise source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuePoint {
    pub position: Point,
    pub value: Value,
}

impl ValuePoint {
    pub fn new(position: Point, value: Value) -> Self {
        Self { position, value }
    }

    /// Draws a lattice position inside `[-boundary, boundary)` per axis and a payload from
    /// [`VALUE_LEVELS`].
    ///
    /// `boundary` must be non-zero, otherwise the lattice is empty.
    pub fn random<R: Rng>(boundary: u32, rng: &mut R) -> Self {
        let steps = lattice_steps(boundary);
        let slot = [
            rng.random_range(0..steps),
            rng.random_range(0..steps),
            rng.random_range(0..steps),
        ];
        Self::at_slot(boundary, slot, rng)
    }

    /// A value point on lattice slot `slot` with a payload drawn from [`VALUE_LEVELS`].
    pub fn at_slot<R: Rng>(boundary: u32, slot: [u64; 3], rng: &mut R) -> Self {
        let value = VALUE_LEVELS[rng.random_range(0..VALUE_LEVELS.len())];
        Self {
            position: lattice_point(boundary, slot),
            value,
        }
    }

    /// Exact coordinate equality; payloads are ignored.
    #[inline]
    pub fn same_position(&self, other: &ValuePoint) -> bool {
        self.position == other.position
    }
}
