//! Maps raster pixels to sampling points in noise space.

use crate::{
    interp::remap,
    types::{Point, Value},
};

/// How a raster's pixels are placed in noise space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Equirectangular wrap onto a sphere of `radius` centered on the origin.
    ///
    /// Texture edges meet seamlessly when the result is wrapped onto a UV sphere.
    Sphere { radius: Value },
    /// A flat square `[-extent, extent]^2` in the `z = 0` plane.
    Plane { extent: Value },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Sphere { radius: 5.0 }
    }
}

impl Projection {
    pub fn point(&self, x: usize, y: usize, width: usize, height: usize) -> Point {
        match *self {
            Projection::Sphere { radius } => sphere_point(x, y, width, height, radius),
            Projection::Plane { extent } => plane_point(x, y, width, height, extent),
        }
    }
}

/// Longitude sweeps `0..360°` across the width, colatitude `0..180°` down the height.
pub fn sphere_point(x: usize, y: usize, width: usize, height: usize, radius: Value) -> Point {
    let longitude = (360.0 / width as Value * x as Value).to_radians();
    let colatitude = (180.0 / height as Value * y as Value).to_radians();
    Point::new(
        radius * longitude.cos() * colatitude.sin(),
        radius * longitude.sin() * colatitude.sin(),
        radius * colatitude.cos(),
    )
}

pub fn plane_point(x: usize, y: usize, width: usize, height: usize, extent: Value) -> Point {
    Point::new(
        remap(x as Value, [0.0, width as Value], [-extent, extent]),
        remap(y as Value, [0.0, height as Value], [-extent, extent]),
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_points_lie_on_sphere() {
        for y in 0..16 {
            for x in 0..32 {
                let p = sphere_point(x, y, 32, 16, 4.0);
                assert!((p.coords.norm() - 4.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_sphere_poles() {
        let north = sphere_point(7, 0, 32, 16, 2.0);
        assert!((north - Point::new(0.0, 0.0, 2.0)).norm() < 1e-12);

        let equator = sphere_point(0, 8, 32, 16, 2.0);
        assert!((equator - Point::new(2.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_plane_points() {
        assert_eq!(plane_point(0, 0, 100, 100, 5.0), Point::new(-5.0, -5.0, 0.0));
        assert_eq!(plane_point(50, 10, 100, 100, 5.0), Point::new(0.0, -4.0, 0.0));
        assert_eq!(
            Projection::Plane { extent: 5.0 }.point(50, 50, 100, 100),
            Point::origin()
        );
    }
}
