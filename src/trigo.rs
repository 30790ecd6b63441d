//! Sine/cosine backends and angle reduction.
//!
//! Every rotating or oscillating component only needs `sin`/`cos` of an `f32`
//! angle. [`Libm`] is the reference backend and keeps the absolute error below
//! `2e-5` over the whole angle range. [`Cordic`] runs the fixed-point CORDIC
//! iteration on [`I16F16`] values, trading precision (about `1e-3`) for an
//! implementation that maps onto integer-only cores.

use core::f32::consts::{PI, TAU};

use fixed::types::I16F16;

/// A `sin`/`cos` capability.
pub trait Trigonometry {
    /// Returns `(sin(angle), cos(angle))`.
    fn sin_cos(angle: f32) -> (f32, f32);

    fn sin(angle: f32) -> f32 {
        Self::sin_cos(angle).0
    }

    fn cos(angle: f32) -> f32 {
        Self::sin_cos(angle).1
    }
}

/// Floating point backend built on `libm`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Libm;

impl Trigonometry for Libm {
    fn sin_cos(angle: f32) -> (f32, f32) {
        (libm::sinf(angle), libm::cosf(angle))
    }

    fn sin(angle: f32) -> f32 {
        libm::sinf(angle)
    }

    fn cos(angle: f32) -> f32 {
        libm::cosf(angle)
    }
}

/// Fixed point CORDIC backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cordic;

impl Trigonometry for Cordic {
    fn sin_cos(angle: f32) -> (f32, f32) {
        // I16F16 holds +-32768, but the rotation loop is only exact close to zero
        let mut angle = modulo_2pi(angle);
        if angle >= PI {
            angle -= TAU;
        }
        let (sin, cos) = cordic::sin_cos(I16F16::from_num(angle));
        (sin.to_num(), cos.to_num())
    }
}

/// `sin` with the default backend.
#[inline]
pub fn sin(angle: f32) -> f32 {
    Libm::sin(angle)
}

/// `cos` with the default backend.
#[inline]
pub fn cos(angle: f32) -> f32 {
    Libm::cos(angle)
}

/// `(sin, cos)` with the default backend.
#[inline]
pub fn sin_cos(angle: f32) -> (f32, f32) {
    Libm::sin_cos(angle)
}

/// Reduce `angle` into `[0, 2π)`.
///
/// Works for negative angles as well. The subtraction is carried out in `f64`
/// and a value that rounds up to `2π` in `f32` wraps to `0`. A NaN input is
/// returned unchanged.
pub fn modulo_2pi(angle: f32) -> f32 {
    let x = angle as f64;
    let turns = libm::floor(x / core::f64::consts::TAU);
    let reduced = (x - turns * core::f64::consts::TAU) as f32;
    if reduced >= TAU || reduced < 0.0 {
        0.0
    } else {
        reduced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn circular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(core::f64::consts::TAU);
        d.min(core::f64::consts::TAU - d)
    }

    #[test]
    fn modulo_known_values() {
        assert_eq!(modulo_2pi(0.0), 0.0);
        assert!((modulo_2pi(PI) - PI).abs() < 1e-6);
        assert!((modulo_2pi(-PI) - PI).abs() < 1e-6);
        assert!((modulo_2pi(3.0 * PI) - PI).abs() < 1e-5);
        assert!((modulo_2pi(-0.5) - (TAU - 0.5)).abs() < 1e-6);
    }

    #[test]
    fn modulo_never_returns_two_pi() {
        assert_eq!(modulo_2pi(TAU), 0.0);
        assert_eq!(modulo_2pi(-TAU), 0.0);
        assert!(modulo_2pi(-1e-9) < TAU);
        assert!(modulo_2pi(-f32::MIN_POSITIVE) < TAU);
    }

    #[test]
    fn cordic_close_to_libm() {
        let mut angle = -20.0f32;
        while angle < 20.0 {
            let (sin, cos) = Cordic::sin_cos(angle);
            assert!((sin - libm::sinf(angle)).abs() < 2e-3, "sin({angle}) = {sin}");
            assert!((cos - libm::cosf(angle)).abs() < 2e-3, "cos({angle}) = {cos}");
            angle += 0.013;
        }
    }

    proptest! {
        #[test]
        fn libm_meets_precision_contract(angle in -1000.0f32..1000.0) {
            let reference = angle as f64;
            prop_assert!((sin(angle) as f64 - libm::sin(reference)).abs() <= 2e-5);
            prop_assert!((cos(angle) as f64 - libm::cos(reference)).abs() <= 2e-5);
            let (s, c) = sin_cos(angle);
            prop_assert_eq!(s, sin(angle));
            prop_assert_eq!(c, cos(angle));
        }

        #[test]
        fn modulo_in_range_and_equivalent(angle in -1.0e4f32..1.0e4) {
            let reduced = modulo_2pi(angle);
            prop_assert!((0.0..TAU).contains(&reduced));
            prop_assert!(circular_distance(reduced as f64, angle as f64) <= 2e-5);
        }
    }
}
