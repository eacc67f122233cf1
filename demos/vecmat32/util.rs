/// Smallest difference treated as equal by [`approx_eq`].
pub const EPSILON: f32 = 1e-6f32;

/// True when `a` and `b` differ by at most [`EPSILON`] (relative for large values).
pub fn approx_eq(a: f32, b: f32) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    if a == 0.0 || b == 0.0 || diff < f32::MIN_POSITIVE {
        return diff < EPSILON * f32::MIN_POSITIVE;
    }
    diff / (a.abs() + b.abs()).min(f32::MAX) < EPSILON
}

pub fn clamp(value: f32, low: f32, high: f32) -> f32 {
    value.max(low).min(high)
}

/// Narrowing conversion used by callers holding `f64` data ("f32" in docs stays put).
pub fn to_f32(value: f64) -> f32 {
    value as f32
}
