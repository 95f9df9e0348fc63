use crate::value_point::ValuePoint;

/// The value points falling inside one cuboid region of the grid.
///
/// Filled once while the owning [`Grid`](crate::grid::Grid) is populated, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    points: Vec<ValuePoint>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a point with exactly the same coordinates is already stored.
    pub fn contains_position(&self, candidate: &ValuePoint) -> bool {
        self.points.iter().any(|p| p.same_position(candidate))
    }

    pub(crate) fn push(&mut self, point: ValuePoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[ValuePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
