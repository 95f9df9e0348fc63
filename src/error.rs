use derive_more::{Display, From};

use crate::types::{Point, Value};

pub type Result<T> = core::result::Result<T, NoiseError>;

#[derive(Debug, Clone, PartialEq, Display, From)]
pub enum NoiseError {
    /// Construction parameters that can never produce a usable field.
    #[display("invalid configuration: {_0}")]
    InvalidConfiguration(ConfigurationError),
    /// The query's center cell has no complete 3×3×3 neighborhood inside the padded grid.
    #[from(skip)]
    #[display("query at {position} lies outside the padded grid")]
    OutOfRangeQuery { position: Point },
    #[from(skip)]
    #[display("value point at {position} lies outside the addressable cube")]
    PointOutOfBounds { position: Point },
    #[from(skip)]
    #[display("a value point already exists at {position}")]
    DuplicatePoint { position: Point },
}

impl std::error::Error for NoiseError {}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum ConfigurationError {
    #[display("cell size must be positive and finite, got {cell_size}")]
    InvalidCellSize { cell_size: Value },
    #[display("grid needs {per_axis} cells per axis, the supported maximum is {max}")]
    GridTooLarge { per_axis: Value, max: usize },
    #[display("{requested} value points requested but the cube only holds {capacity} distinct coordinates")]
    TooManyPoints { requested: usize, capacity: u128 },
    #[display("gave up placing value point #{placed} after {rejections} rejected candidates")]
    RejectionLimit { placed: usize, rejections: usize },
    #[display("texture size must be non-zero, got {width}x{height}")]
    InvalidTextureSize { width: usize, height: usize },
}

impl std::error::Error for ConfigurationError {}
