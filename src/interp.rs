use crate::types::Value;

// linearly map a number from one range to another
pub fn remap(s: Value, range_in: [Value; 2], range_out: [Value; 2]) -> Value {
    range_out[0] + (s - range_in[0]) * (range_out[1] - range_out[0]) / (range_in[1] - range_in[0])
}

// Linear interpolation
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

// Component-wise linear interpolation between two RGB colors
pub fn lerp_rgb(a: [Value; 3], b: [Value; 3], t: Value) -> [Value; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}
