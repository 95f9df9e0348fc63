//! Uniform-grid spatial index over the addressable cube `[-boundary, boundary]^3`.
//!
//! Points are bucketed into cubic cells of edge `cell_size`. A query only ever looks at the
//! 3×3×3 block of cells around the cell containing the query point, so its cost depends on
//! local density rather than on the total number of stored points.
//!
//! ```text
//!  stored index:   0   1   2  ...  n   n+1
//!                [pad][ core cells ...][pad]
//!  core index:         0   1  ... n-1
//! ```
//!
//! The padding ring never holds points. It lets every point of the addressable cube
//! answer a full neighborhood query without any index leaving the array.

use rand::Rng;

use crate::{
    cell::Cell,
    error::{ConfigurationError, NoiseError, Result},
    types::{CellIndex, Point, Value},
    value_point::{ValuePoint, lattice_point, lattice_steps},
};

/// Consecutive rejected candidates tolerated while placing a single random point.
pub const MAX_REJECTIONS: usize = 10_000;

/// Random placement switches to enumerating free lattice slots once fewer than
/// `capacity / DENSE_FILL_DIVISOR` remain.
pub const DENSE_FILL_DIVISOR: u128 = 8;

/// Upper bound on stored cells per axis, padding included; 2^24 cells in total.
pub const MAX_CELLS_PER_AXIS: usize = 256;

#[derive(Debug, Clone)]
pub struct Grid {
    boundary: u32,
    cell_size: Value,
    /// Stored cells per axis, padding ring included.
    dims: [usize; 3],
    cells: Vec<Cell>,
    len: usize,
}

impl Grid {
    /// Allocates an empty grid covering `[-boundary, boundary]^3` with cubic cells of edge
    /// `cell_size`.
    ///
    /// The core holds `ceil(2·boundary / cell_size) + 1` cells per axis, plus one padding
    /// cell on each side.
    pub fn new(boundary: u32, cell_size: Value) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(ConfigurationError::InvalidCellSize { cell_size }.into());
        }

        let core = (2.0 * boundary as Value / cell_size).ceil() + 1.0;
        let side = core + 2.0;
        if side > MAX_CELLS_PER_AXIS as Value {
            return Err(ConfigurationError::GridTooLarge {
                per_axis: side,
                max: MAX_CELLS_PER_AXIS,
            }
            .into());
        }

        let side = side as usize;
        log::debug!("allocating {side}x{side}x{side} grid (boundary {boundary}, cell size {cell_size})");

        Ok(Self {
            boundary,
            cell_size,
            dims: [side; 3],
            cells: vec![Cell::new(); side * side * side],
            len: 0,
        })
    }

    pub fn boundary(&self) -> u32 {
        self.boundary
    }

    pub fn cell_size(&self) -> Value {
        self.cell_size
    }

    /// Stored cells per axis, padding ring included.
    pub fn dimensions(&self) -> [usize; 3] {
        self.dims
    }

    /// Number of stored value points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct lattice coordinates random points can be placed on.
    pub fn capacity(&self) -> u128 {
        (lattice_steps(self.boundary) as u128).pow(3)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: CellIndex) -> Option<&Cell> {
        let in_range = index.iter().zip(self.dims).all(|(&i, n)| i < n);
        in_range.then(|| &self.cells[self.linear_index(index)])
    }

    /// Every stored value point, in cell order.
    pub fn points(&self) -> impl Iterator<Item = &ValuePoint> {
        self.cells.iter().flat_map(|cell| cell.points())
    }

    #[inline]
    fn linear_index(&self, [i, j, k]: CellIndex) -> usize {
        (i * self.dims[1] + j) * self.dims[2] + k
    }

    /// Stored index of the cell containing `point`: `floor((c + boundary) / cell_size) + 1`
    /// per axis.
    ///
    /// Returns [`NoiseError::OutOfRangeQuery`] when the point maps outside the stored array
    /// or has a non-finite coordinate.
    pub fn cell_index_for(&self, point: &Point) -> Result<CellIndex> {
        let mut index = [0; 3];
        for (axis, slot) in index.iter_mut().enumerate() {
            let cell = ((point[axis] + self.boundary as Value) / self.cell_size).floor() + 1.0;
            if !cell.is_finite() || cell < 0.0 || cell >= self.dims[axis] as Value {
                return Err(NoiseError::OutOfRangeQuery { position: *point });
            }
            *slot = cell as usize;
        }
        Ok(index)
    }

    /// Center cell of a neighborhood query. The whole 3×3×3 block around it must be stored.
    fn query_center(&self, point: &Point) -> Result<CellIndex> {
        let index = self.cell_index_for(point)?;
        let touches_edge = index.iter().zip(self.dims).any(|(&i, n)| i == 0 || i + 1 >= n);
        if touches_edge {
            return Err(NoiseError::OutOfRangeQuery { position: *point });
        }
        Ok(index)
    }

    /// Stores a specific value point.
    ///
    /// The point must lie inside `[-boundary, boundary]` on every axis and must not share its
    /// coordinates with a point already stored.
    pub fn insert(&mut self, point: ValuePoint) -> Result<()> {
        let bound = self.boundary as Value;
        if point.position.iter().any(|c| !(-bound..=bound).contains(c)) {
            return Err(NoiseError::PointOutOfBounds {
                position: point.position,
            });
        }

        if !self.push_unique(point)? {
            return Err(NoiseError::DuplicatePoint {
                position: point.position,
            });
        }
        Ok(())
    }

    /// Adds `count` random value points with pairwise distinct coordinates.
    ///
    /// A candidate whose coordinates already exist in its cell is redrawn. Once at most
    /// `1 / DENSE_FILL_DIVISOR` of the lattice slots remain free, the remaining points are
    /// drawn from the enumerated free slots instead, so any `count` within capacity
    /// succeeds. A `count` larger than the remaining lattice capacity is refused before
    /// anything is drawn. An RNG that keeps repeating taken slots while the lattice is still
    /// sparse fails after [`MAX_REJECTIONS`] consecutive rejections.
    pub fn populate<R: Rng>(&mut self, count: usize, rng: &mut R) -> Result<()> {
        let capacity = self.capacity();
        if count as u128 > capacity.saturating_sub(self.len as u128) {
            return Err(ConfigurationError::TooManyPoints {
                requested: count,
                capacity,
            }
            .into());
        }

        let mut total_rejections = 0;
        for placed in 0..count {
            let free = capacity.saturating_sub(self.len as u128);
            if free * DENSE_FILL_DIVISOR <= capacity {
                log::debug!(
                    "{free} of {capacity} lattice slots free, placing last {} points from free slots",
                    count - placed
                );
                return self.populate_free_slots(count - placed, rng);
            }

            let mut rejections = 0;
            loop {
                let candidate = ValuePoint::random(self.boundary, rng);
                if self.push_unique(candidate)? {
                    break;
                }

                rejections += 1;
                if rejections >= MAX_REJECTIONS {
                    log::warn!("rejection limit hit after placing {placed} of {count} points");
                    return Err(ConfigurationError::RejectionLimit { placed, rejections }.into());
                }
            }
            total_rejections += rejections;
        }

        log::debug!("placed {count} value points ({total_rejections} duplicate candidates redrawn)");
        Ok(())
    }

    /// Places `count` points on lattice slots picked uniformly from the ones still free.
    fn populate_free_slots<R: Rng>(&mut self, count: usize, rng: &mut R) -> Result<()> {
        let steps = lattice_steps(self.boundary);
        let mut free = Vec::new();
        for a in 0..steps {
            for b in 0..steps {
                for c in 0..steps {
                    let slot = [a, b, c];
                    let at_slot = ValuePoint::new(lattice_point(self.boundary, slot), 0.0);
                    let index = self.linear_index(self.cell_index_for(&at_slot.position)?);
                    if !self.cells[index].contains_position(&at_slot) {
                        free.push(slot);
                    }
                }
            }
        }

        for placed in 0..count {
            if free.is_empty() {
                return Err(ConfigurationError::TooManyPoints {
                    requested: count - placed,
                    capacity: self.capacity(),
                }
                .into());
            }
            let slot = free.swap_remove(rng.random_range(0..free.len()));
            self.push_unique(ValuePoint::at_slot(self.boundary, slot, rng))?;
        }
        Ok(())
    }

    /// Stores `point` unless its cell already holds the same coordinates.
    fn push_unique(&mut self, point: ValuePoint) -> Result<bool> {
        let index = self.linear_index(self.cell_index_for(&point.position)?);
        let cell = &mut self.cells[index];
        if cell.contains_position(&point) {
            return Ok(false);
        }
        cell.push(point);
        self.len += 1;
        Ok(true)
    }

    /// All value points in the 3×3×3 block of cells centered on the cell containing `point`.
    ///
    /// Every point of the addressable cube has a full block. Queries outside the cube fail
    /// with [`NoiseError::OutOfRangeQuery`] unless they still land in a core cell.
    pub fn neighborhood(&self, point: Point) -> Result<impl Iterator<Item = &ValuePoint>> {
        let [i, j, k] = self.query_center(&point)?;
        let block = (i - 1..=i + 1).flat_map(move |x| {
            (j - 1..=j + 1).flat_map(move |y| (k - 1..=k + 1).map(move |z| [x, y, z]))
        });
        Ok(block.flat_map(move |index| self.cells[self.linear_index(index)].points()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn key(p: &ValuePoint) -> [u64; 3] {
        [
            p.position.x.to_bits(),
            p.position.y.to_bits(),
            p.position.z.to_bits(),
        ]
    }

    #[test]
    fn test_dimensions_include_padding() {
        let grid = Grid::new(10, 2.0).unwrap();
        // ceil(20 / 2) + 1 = 11 core cells, plus one padding cell per side
        assert_eq!(grid.dimensions(), [13, 13, 13]);
        assert_eq!(grid.cells().len(), 13 * 13 * 13);
        assert!(grid.is_empty());

        let grid = Grid::new(10, 3.0).unwrap();
        // ceil(20 / 3) = 7
        assert_eq!(grid.dimensions(), [10, 10, 10]);
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        for cell_size in [0.0, -1.0, Value::NAN, Value::INFINITY] {
            let err = Grid::new(10, cell_size).unwrap_err();
            assert!(matches!(
                err,
                NoiseError::InvalidConfiguration(ConfigurationError::InvalidCellSize { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_oversized_grid() {
        // 4 * 64 + 1 core cells plus padding
        let err = Grid::new(64, 0.5).unwrap_err();
        assert_eq!(
            err,
            NoiseError::InvalidConfiguration(ConfigurationError::GridTooLarge {
                per_axis: 259.0,
                max: MAX_CELLS_PER_AXIS,
            })
        );

        // Side lengths whose cube overflows still report a readable per-axis count
        for (boundary, cell_size) in [(u32::MAX, 1e-3), (10, Value::MIN_POSITIVE)] {
            let err = Grid::new(boundary, cell_size).unwrap_err();
            let NoiseError::InvalidConfiguration(ConfigurationError::GridTooLarge { per_axis, .. }) =
                err
            else {
                panic!("expected GridTooLarge, got {err:?}");
            };
            assert!(per_axis > MAX_CELLS_PER_AXIS as Value);
            assert!(err.to_string().contains("cells per axis"));
        }
    }

    #[test]
    fn test_cell_index_for() {
        let grid = Grid::new(10, 2.0).unwrap();
        assert_eq!(grid.cell_index_for(&Point::origin()).unwrap(), [6, 6, 6]);
        assert_eq!(grid.cell_index_for(&Point::new(-10.0, -10.0, -10.0)).unwrap(), [1, 1, 1]);
        assert_eq!(grid.cell_index_for(&Point::new(10.0, 10.0, 10.0)).unwrap(), [11, 11, 11]);
        assert_eq!(grid.cell_index_for(&Point::new(-9.9, 0.0, 1.99)).unwrap(), [1, 6, 6]);
        // Padding ring is addressable but not queryable
        assert_eq!(grid.cell_index_for(&Point::new(-10.5, 0.0, 0.0)).unwrap(), [0, 6, 6]);
        assert!(grid.cell_index_for(&Point::new(-12.5, 0.0, 0.0)).is_err());
        assert!(grid.cell_index_for(&Point::new(0.0, 14.0, 0.0)).is_err());
        assert!(grid.cell_index_for(&Point::new(Value::NAN, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_insert_validates_points() {
        let mut grid = Grid::new(10, 2.0).unwrap();
        grid.insert(ValuePoint::new(Point::new(1.0, 2.0, 3.0), 0.5)).unwrap();
        grid.insert(ValuePoint::new(Point::new(10.0, -10.0, 10.0), 1.0)).unwrap();
        assert_eq!(grid.len(), 2);

        let dup = grid.insert(ValuePoint::new(Point::new(1.0, 2.0, 3.0), 0.0));
        assert!(matches!(dup, Err(NoiseError::DuplicatePoint { .. })));

        let outside = grid.insert(ValuePoint::new(Point::new(10.5, 0.0, 0.0), 0.0));
        assert!(matches!(outside, Err(NoiseError::PointOutOfBounds { .. })));
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_populate_places_unique_points() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut grid = Grid::new(5, 1.0).unwrap();
        grid.populate(3000, &mut rng).unwrap();

        assert_eq!(grid.len(), 3000);
        assert_eq!(grid.cells().iter().map(Cell::len).sum::<usize>(), 3000);

        let unique: HashSet<_> = grid.points().map(key).collect();
        assert_eq!(unique.len(), 3000);

        // Every point sits in the cell its coordinates quantize to
        for (n, cell) in grid.cells().iter().enumerate() {
            for p in cell.points() {
                let index = grid.cell_index_for(&p.position).unwrap();
                assert_eq!(grid.linear_index(index), n);
            }
        }
    }

    #[test]
    fn test_populate_refuses_more_points_than_lattice() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut grid = Grid::new(1, 0.5).unwrap();
        assert_eq!(grid.capacity(), 8000);

        let err = grid.populate(8001, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            NoiseError::InvalidConfiguration(ConfigurationError::TooManyPoints { .. })
        ));
        assert!(grid.is_empty());

        let mut empty_cube = Grid::new(0, 1.0).unwrap();
        assert!(empty_cube.populate(1, &mut rng).is_err());
        empty_cube.populate(0, &mut rng).unwrap();
    }

    #[test]
    fn test_populate_fills_whole_lattice() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut grid = Grid::new(1, 0.25).unwrap();
            grid.populate(8000, &mut rng).unwrap();

            assert_eq!(grid.len(), 8000);
            let unique: HashSet<_> = grid.points().map(key).collect();
            assert_eq!(unique.len(), 8000, "seed {seed}");

            // Nothing left to draw
            assert!(matches!(
                grid.populate(1, &mut rng),
                Err(NoiseError::InvalidConfiguration(ConfigurationError::TooManyPoints { .. }))
            ));
        }
    }

    #[test]
    fn test_populate_tops_up_around_explicit_points() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut grid = Grid::new(1, 1.0).unwrap();
        grid.insert(ValuePoint::new(Point::new(-1.0, -1.0, -1.0), 1.0)).unwrap();
        grid.insert(ValuePoint::new(Point::new(0.05, 0.0, 0.0), 1.0)).unwrap();

        // One lattice slot is taken, the off-lattice point still counts against capacity
        grid.populate(7998, &mut rng).unwrap();
        assert_eq!(grid.len(), 8000);
        let unique: HashSet<_> = grid.points().map(key).collect();
        assert_eq!(unique.len(), 8000);
    }

    #[test]
    fn test_padding_cells_stay_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut grid = Grid::new(2, 0.5).unwrap();
        grid.populate(20_000, &mut rng).unwrap();

        let [nx, ny, nz] = grid.dimensions();
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    let on_ring = [(i, nx), (j, ny), (k, nz)]
                        .iter()
                        .any(|&(c, n)| c == 0 || c + 1 == n);
                    let cell = grid.cell([i, j, k]).unwrap();
                    if on_ring {
                        assert!(cell.is_empty(), "padding cell {:?} holds points", [i, j, k]);
                    }
                }
            }
        }
        assert!(grid.cell([nx, 0, 0]).is_none());
    }

    /// Always yields zero bits, so every candidate lands on the same lattice slot.
    struct StuckRng;

    impl rand::RngCore for StuckRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn test_populate_gives_up_on_repeating_rng() {
        let mut grid = Grid::new(1, 1.0).unwrap();
        let err = grid.populate(2, &mut StuckRng).unwrap_err();
        assert_eq!(
            err,
            NoiseError::InvalidConfiguration(ConfigurationError::RejectionLimit {
                placed: 1,
                rejections: MAX_REJECTIONS,
            })
        );
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_neighborhood_covers_adjacent_cells_only() {
        let mut grid = Grid::new(10, 2.0).unwrap();
        grid.insert(ValuePoint::new(Point::origin(), 1.0)).unwrap();

        // Cell 7 along x, adjacent to the origin's cell 6
        assert_eq!(grid.neighborhood(Point::new(3.9, 0.0, 0.0)).unwrap().count(), 1);
        // Cell 8 along x, two cells away
        assert_eq!(grid.neighborhood(Point::new(4.5, 0.0, 0.0)).unwrap().count(), 0);
    }

    #[test]
    fn test_neighborhood_boundary_contract() {
        let grid = Grid::new(10, 2.0).unwrap();
        for c in [-10.0, -9.99, 0.0, 9.99, 10.0, 11.9] {
            assert!(grid.neighborhood(Point::new(c, c, c)).is_ok(), "{c} should be answerable");
        }
        for c in [-10.01, -12.1, 12.0, 30.0] {
            let err = grid.neighborhood(Point::new(c, 0.0, 0.0)).err();
            assert!(
                matches!(err, Some(NoiseError::OutOfRangeQuery { .. })),
                "{c} should be rejected"
            );
        }
    }

    #[test]
    fn test_neighborhood_ignores_insertion_order() {
        let points = [
            ValuePoint::new(Point::new(0.1, 0.2, 0.3), 0.25),
            ValuePoint::new(Point::new(0.4, 0.2, 0.3), 0.5),
            ValuePoint::new(Point::new(-1.5, 1.0, 0.0), 1.0),
            ValuePoint::new(Point::new(2.5, -1.0, 0.5), 0.75),
        ];

        let mut forward = Grid::new(10, 2.0).unwrap();
        let mut backward = Grid::new(10, 2.0).unwrap();
        for p in points {
            forward.insert(p).unwrap();
        }
        for p in points.into_iter().rev() {
            backward.insert(p).unwrap();
        }

        let query = Point::new(0.5, 0.0, 0.0);
        let a: HashSet<_> = forward.neighborhood(query).unwrap().map(key).collect();
        let b: HashSet<_> = backward.neighborhood(query).unwrap().map(key).collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }
}
