use nalgebra::Point3;

/// Scalar noise value and coordinate component.
pub type Value = f64;

/// A 3D point with [`Value`] components.
pub type Point = Point3<Value>;

/// Stored `[i, j, k]` index of a grid cell, padding ring included.
pub type CellIndex = [usize; 3];

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point, b: &Point) -> Value {
    nalgebra::distance(a, b)
}
