pub mod cell;
pub mod config;
pub mod error;
pub mod field;
pub mod gradient;
pub mod grid;
pub mod interp;
pub mod plugin;
pub mod projection;
pub mod raster;
pub mod turbulence;
pub mod types;
pub mod value_point;

pub use config::NoiseConfig;
pub use field::NoiseField;
pub use plugin::NoiseTexturePlugin;
