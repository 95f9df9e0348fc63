use crate::{
    error::Result,
    field::{NoiseField, sine_fold},
    types::{Point, Value},
};

/// Weight of the turbulence term when combined with the base noise.
pub const TURBULENCE_STRENGTH: Value = 3.0;

/// Sampling point of the next octave: `c² / (|c| + 1)` per axis.
///
/// The map pulls points toward the origin, so octaves of a point inside the addressable cube
/// stay inside it.
pub fn next_octave_point(p: &Point) -> Point {
    p.map(|c| c * c / (c.abs() + 1.0))
}

/// Sum of `steps` octaves, the `i`-th weighted by `1 / 2^i`, halved.
pub fn turbulence(field: &NoiseField, point: Point, steps: usize) -> Result<Value> {
    let mut total = 0.0;
    let mut p = point;
    let mut weight = 1.0;
    for _ in 0..steps {
        total += field.evaluate(p)? * weight;
        p = next_octave_point(&p);
        weight /= 2.0;
    }
    Ok(total / 2.0)
}

/// Base noise perturbed by turbulence, folded back into `[0, 1]`.
#[inline]
pub fn combine(noise: Value, turbulence: Value) -> Value {
    sine_fold(noise + TURBULENCE_STRENGTH * turbulence)
}

/// [`combine`] of the field's noise and `steps` octaves of turbulence at `point`.
pub fn turbulent_noise(field: &NoiseField, point: Point, steps: usize) -> Result<Value> {
    let noise = field.evaluate(point)?;
    Ok(combine(noise, turbulence(field, point, steps)?))
}
