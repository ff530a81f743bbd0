use std::f64::consts::{PI, TAU};

/// Normalize an unbounded angle to [0, 2π).
#[inline]
pub fn normalize(angle: f64) -> f64 {
    ((angle % TAU) + TAU) % TAU
}

/// Shortest circular distance between two angles, in [0, π].
#[inline]
pub fn shortest_distance(a: f64, b: f64) -> f64 {
    let diff = (normalize(a) - normalize(b)).abs();
    if diff > PI { TAU - diff } else { diff }
}

/// Whether `pointer` lies inside the arc of `width` centered on `center`.
#[inline]
pub fn within_arc(pointer: f64, center: f64, width: f64) -> bool {
    shortest_distance(pointer, center) <= width / 2.0
}
