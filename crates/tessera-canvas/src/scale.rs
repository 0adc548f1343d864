//! Logical <-> physical unit conversion.
//!
//! Scaling up rounds to the nearest pixel while scaling down truncates, so a
//! round trip can lose a unit. A scale of exactly 1.0 is passed through
//! untouched.

pub fn scale_int(scale: f32, v: i32) -> i32 {
    if scale == 1.0 {
        v
    } else {
        (f64::from(v) * f64::from(scale)).round() as i32
    }
}

pub fn unscale_int(scale: f32, v: i32) -> i32 {
    if scale == 1.0 {
        v
    } else {
        (v as f32 / scale) as i32
    }
}
