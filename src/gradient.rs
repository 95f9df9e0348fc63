//! Color gradients mapping a noise value in `[0, 1]` to an RGB triple.

use crate::{interp::lerp_rgb, types::Value};

/// The texture style a noise raster is colored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlanetType {
    IcePlanet,
    LavaPlanet,
    #[default]
    Star,
    BlackAndWhite,
}

/// A piecewise-linear gradient stop: noise values below `end` interpolate from `from` to `to`
/// across `[start, end)`.
struct Band {
    start: Value,
    end: Value,
    from: [Value; 3],
    to: [Value; 3],
}

const ICE: [Band; 3] = [
    Band { start: 0.0, end: 0.65, from: [56.0, 81.0, 89.0], to: [200.0, 200.0, 200.0] },
    Band { start: 0.65, end: 0.97, from: [230.0, 230.0, 230.0], to: [255.0, 255.0, 255.0] },
    Band { start: 0.97, end: 1.0, from: [0.0, 22.0, 255.0], to: [12.0, 43.0, 124.0] },
];

const LAVA: [Band; 2] = [
    Band { start: 0.0, end: 0.7, from: [255.0, 226.0, 27.0], to: [141.0, 0.0, 0.0] },
    Band { start: 0.7, end: 1.0, from: [31.0, 4.0, 4.0], to: [84.0, 74.0, 68.0] },
];

const STAR: [Band; 1] = [Band { start: 0.0, end: 1.0, from: [246.0, 247.0, 255.0], to: [96.0, 151.0, 244.0] }];

const BLACK_AND_WHITE: [Band; 1] = [Band { start: 0.0, end: 1.0, from: [0.0; 3], to: [255.0; 3] }];

impl PlanetType {
    fn bands(self) -> &'static [Band] {
        match self {
            PlanetType::IcePlanet => &ICE,
            PlanetType::LavaPlanet => &LAVA,
            PlanetType::Star => &STAR,
            PlanetType::BlackAndWhite => &BLACK_AND_WHITE,
        }
    }

    /// RGB color for `noise`, each channel truncated toward zero.
    ///
    /// The last band absorbs everything at or above its start, so values slightly outside
    /// `[0, 1]` extrapolate rather than panic; channels are clamped to `0..=255`.
    pub fn rgb_for(self, noise: Value) -> [u8; 3] {
        let bands = self.bands();
        let band = bands
            .iter()
            .find(|band| noise < band.end)
            .unwrap_or(&bands[bands.len() - 1]);
        let t = (noise - band.start) / (band.end - band.start);
        lerp_rgb(band.from, band.to, t).map(|c| c.clamp(0.0, 255.0) as u8)
    }
}
