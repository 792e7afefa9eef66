//! Scalar helpers shared by the geometry code.

/// Restricts `value` to `[min, max]`. Unlike `f64::clamp` this never panics
/// when `min > max`; `min` wins.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}

#[inline]
pub fn clamp01(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * clamp01(t)
}

#[inline]
pub fn unclamped_lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Where `value` sits between `from` and `to`, clamped to `[0, 1]`.
/// A zero-width range maps to 0.
pub fn inverse_lerp(from: f64, to: f64, value: f64) -> f64 {
    if from == to {
        return 0.0;
    }
    if from < to {
        if value < from {
            return 0.0;
        } else if value > to {
            return 1.0;
        }
    } else if value < to {
        return 1.0;
    } else if value > from {
        return 0.0;
    }

    (value - from) / (to - from)
}

/// Moves `start` towards `end` by `shift` without overshooting.
pub fn approach(start: f64, end: f64, shift: f64) -> f64 {
    if start < end {
        (start + shift).min(end)
    } else {
        (start - shift).max(end)
    }
}

/// Smallest of the values; `f64::INFINITY` for an empty slice.
pub fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Largest of the values; `f64::NEG_INFINITY` for an empty slice.
pub fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// -1, 0 or 1. Zero maps to zero, unlike `f64::signum`.
#[inline]
pub fn sign(value: f64) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

#[inline]
pub fn floor_to_int(value: f64) -> i32 {
    value.floor() as i32
}

#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Vector of length `length` pointing along `direction` radians.
pub fn length_dir(length: f64, direction: f64) -> crate::math::vec2::Vec2 {
    crate::math::vec2::Vec2::new(length * direction.cos(), length * direction.sin())
}

/// Heading in degrees `[0, 360)` from `from` to `to`, measured with y pointing down.
pub fn direction(from: crate::math::vec2::Vec2, to: crate::math::vec2::Vec2) -> f64 {
    let dir = (from.y - to.y).atan2(to.x - from.x).to_degrees();
    if dir < 0.0 {
        360.0 + dir
    } else {
        dir
    }
}
