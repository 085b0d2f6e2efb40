//! Azimuthal angle utilities.
//!
//! Azimuth is periodic: all helpers here treat angles as points on a circle
//! and report results in the half-open range (−π, π].

use std::cmp::Ordering;
use std::f64::consts::{PI, TAU};

/// Reduces an angle into (−π, π].
#[inline]
#[must_use]
pub fn normalize_phi(angle: f64) -> f64 {
    let reduced = (angle + PI).rem_euclid(TAU) - PI;
    if reduced <= -PI {
        reduced + TAU
    } else {
        reduced
    }
}

/// Signed difference `a - b`, reduced into (−π, π].
#[inline]
#[must_use]
pub fn delta_phi(a: f64, b: f64) -> f64 {
    normalize_phi(a - b)
}

/// Circular "less than": `true` when `a` lies clockwise of `b` by less than π.
///
/// Angles on either side of the ±π branch cut are ordered the way a linear
/// comparison orders them anywhere else on the circle.
#[inline]
#[must_use]
pub fn phi_less(a: f64, b: f64) -> bool {
    delta_phi(a, b) < 0.0
}

/// Total-order view of [`phi_less`], suitable for sorting angles that span
/// less than half a turn.
#[must_use]
pub fn phi_cmp(a: f64, b: f64) -> Ordering {
    if phi_less(a, b) {
        Ordering::Less
    } else if phi_less(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
