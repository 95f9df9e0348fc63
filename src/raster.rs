use ndarray::Array2;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    error::{ConfigurationError, Result},
    field::NoiseField,
    gradient::PlanetType,
    projection::Projection,
    turbulence::turbulent_noise,
    types::Value,
};

/// How a [`NoiseRaster`] samples a [`NoiseField`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSettings {
    /// Pixels per row.
    pub width: usize,
    /// Rows.
    pub height: usize,
    pub projection: Projection,
    /// Octaves of turbulence mixed into each pixel. `None` samples the bare field.
    pub turbulence_steps: Option<usize>,
    /// Gradient used when the raster is converted to colors.
    pub planet: PlanetType,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 256,
            projection: Projection::default(),
            turbulence_steps: Some(5),
            planet: PlanetType::default(),
        }
    }
}

impl TextureSettings {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_turbulence(mut self, steps: Option<usize>) -> Self {
        self.turbulence_steps = steps;
        self
    }

    pub fn with_planet(mut self, planet: PlanetType) -> Self {
        self.planet = planet;
        self
    }

    /// Noise value of pixel `(x, y)`.
    pub fn sample(&self, field: &NoiseField, x: usize, y: usize) -> Result<Value> {
        let point = self.projection.point(x, y, self.width, self.height);
        match self.turbulence_steps {
            Some(steps) => turbulent_noise(field, point, steps),
            None => field.evaluate(point),
        }
    }
}

/// Noise values of a 2D raster, indexed `[y, x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseRaster {
    values: Array2<Value>,
}

impl NoiseRaster {
    /// Samples every pixel of `settings` from `field`.
    ///
    /// Rows are sampled in parallel with Rayon; the field is only read.
    pub fn bake(field: &NoiseField, settings: &TextureSettings) -> Result<Self> {
        let (width, height) = (settings.width, settings.height);
        if width == 0 || height == 0 {
            return Err(ConfigurationError::InvalidTextureSize { width, height }.into());
        }

        let rows: Vec<Vec<Value>> = (0..height)
            .into_par_iter()
            .map(|y| {
                (0..width)
                    .map(|x| settings.sample(field, x, y))
                    .collect::<Result<Vec<Value>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("baked {width}x{height} noise raster");

        Ok(Self {
            values: Array2::from_shape_fn((height, width), |(y, x)| rows[y][x]),
        })
    }

    pub fn values(&self) -> &Array2<Value> {
        &self.values
    }

    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Value> {
        self.values.get((y, x)).copied()
    }

    /// Row-major RGBA8 pixels colored with `planet`'s gradient, fully opaque.
    pub fn to_rgba8(&self, planet: PlanetType) -> Vec<u8> {
        self.values
            .iter()
            .flat_map(|&v| {
                let [r, g, b] = planet.rgb_for(v);
                [r, g, b, u8::MAX]
            })
            .collect()
    }
}
