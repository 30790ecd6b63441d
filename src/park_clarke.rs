//! Park and Clarke transformations (along with their inverses).
//!
//! Three reference frames are used:
//!
//! 1. `abc`, the three phase quantities ([`ThreePhase`]),
//! 2. `αβo`, the stationary orthogonal frame with its zero sequence ([`Clarke`]),
//! 3. `dqo`, the frame rotating at angle `θ` ([`Dqo`]).
//!
//! The Clarke transform is amplitude invariant: a balanced set of amplitude
//! `X` maps onto an `αβ` vector of length `X`.

use crate::{trigo, FRAC_1_SQRT_3, SQRT_3_DIV_2};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreePhase {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clarke {
    pub alpha: f32,
    pub beta: f32,
    /// Zero sequence
    pub o: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dqo {
    pub d: f32,
    pub q: f32,
    /// Zero sequence
    pub o: f32,
}

/// Clarke transform, `abc -> αβo`.
pub fn clarke(inputs: ThreePhase) -> Clarke {
    Clarke {
        alpha: 2.0 / 3.0 * (inputs.a - 0.5 * (inputs.b + inputs.c)),
        beta: FRAC_1_SQRT_3 * (inputs.b - inputs.c),
        o: (inputs.a + inputs.b + inputs.c) / 3.0,
    }
}

/// Inverse Clarke transform, `αβo -> abc`.
pub fn clarke_inverse(inputs: Clarke) -> ThreePhase {
    ThreePhase {
        a: inputs.alpha + inputs.o,
        b: -0.5 * inputs.alpha + SQRT_3_DIV_2 * inputs.beta + inputs.o,
        c: -0.5 * inputs.alpha - SQRT_3_DIV_2 * inputs.beta + inputs.o,
    }
}

/// Park transform from precomputed `cos θ` and `sin θ`, a `-θ` rotation.
pub fn park(cos_angle: f32, sin_angle: f32, inputs: Clarke) -> Dqo {
    Dqo {
        d: cos_angle * inputs.alpha + sin_angle * inputs.beta,
        q: cos_angle * inputs.beta - sin_angle * inputs.alpha,
        o: inputs.o,
    }
}

/// Inverse Park transform from precomputed `cos θ` and `sin θ`, a `θ` rotation.
pub fn inverse_park(cos_angle: f32, sin_angle: f32, inputs: Dqo) -> Clarke {
    Clarke {
        alpha: cos_angle * inputs.d - sin_angle * inputs.q,
        beta: sin_angle * inputs.d + cos_angle * inputs.q,
        o: inputs.o,
    }
}

/// `αβo -> dqo` at angle `theta`.
pub fn rotation_to_dqo(inputs: Clarke, theta: f32) -> Dqo {
    let (sin_angle, cos_angle) = trigo::sin_cos(theta);
    park(cos_angle, sin_angle, inputs)
}

/// `dqo -> αβo` at angle `theta`.
pub fn rotation_to_clarke(inputs: Dqo, theta: f32) -> Clarke {
    let (sin_angle, cos_angle) = trigo::sin_cos(theta);
    inverse_park(cos_angle, sin_angle, inputs)
}

/// `abc -> dqo` at angle `theta`.
pub fn to_dqo(inputs: ThreePhase, theta: f32) -> Dqo {
    rotation_to_dqo(clarke(inputs), theta)
}

/// `dqo -> abc` at angle `theta`.
pub fn to_threephase(inputs: Dqo, theta: f32) -> ThreePhase {
    clarke_inverse(rotation_to_clarke(inputs, theta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigo::{Cordic, Trigonometry};
    use approx::assert_abs_diff_eq;
    use core::f32::consts::PI;
    use proptest::prelude::*;

    #[track_caller]
    fn assert_three_phase_eq(result: ThreePhase, expected: ThreePhase, epsilon: f32) {
        assert_abs_diff_eq!(result.a, expected.a, epsilon = epsilon);
        assert_abs_diff_eq!(result.b, expected.b, epsilon = epsilon);
        assert_abs_diff_eq!(result.c, expected.c, epsilon = epsilon);
    }

    #[test]
    fn clarke_known_vectors() {
        let cases = [
            (
                ThreePhase { a: 1.0, b: -0.5, c: -0.5 },
                Clarke { alpha: 1.0, beta: 0.0, o: 0.0 },
            ),
            (
                ThreePhase { a: 0.0, b: 0.866025, c: -0.866025 },
                Clarke { alpha: 0.0, beta: 1.0, o: 0.0 },
            ),
            (
                ThreePhase { a: 0.707107, b: 0.258819, c: -0.965926 },
                Clarke { alpha: 0.707107, beta: 0.707107, o: 0.0 },
            ),
        ];

        for (abc, expected) in cases {
            let result = clarke(abc);
            assert_abs_diff_eq!(result.alpha, expected.alpha, epsilon = 1e-4);
            assert_abs_diff_eq!(result.beta, expected.beta, epsilon = 1e-4);
            assert_abs_diff_eq!(result.o, expected.o, epsilon = 1e-4);
            assert_three_phase_eq(clarke_inverse(result), abc, 1e-4);
        }
    }

    #[test]
    fn zero_sequence() {
        let result = clarke(ThreePhase { a: 2.0, b: 2.0, c: 2.0 });
        assert_abs_diff_eq!(result.alpha, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.beta, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.o, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn balanced_set_aligned_with_d_axis() {
        for theta in [0.0, PI / 2.0, PI / 4.0, 4.0, -1.0] {
            let abc = ThreePhase {
                a: trigo::cos(theta),
                b: trigo::cos(theta - 2.0 * PI / 3.0),
                c: trigo::cos(theta - 4.0 * PI / 3.0),
            };
            let dqo = to_dqo(abc, theta);
            assert_abs_diff_eq!(dqo.d, 1.0, epsilon = 2e-5);
            assert_abs_diff_eq!(dqo.q, 0.0, epsilon = 2e-5);
            assert_abs_diff_eq!(dqo.o, 0.0, epsilon = 2e-5);
            assert_three_phase_eq(to_threephase(dqo, theta), abc, 2e-5);
        }
    }

    #[test]
    fn park_with_cordic_angles() {
        let angle = 0.82;
        let (sin_angle, cos_angle) = Cordic::sin_cos(angle);
        let input = Clarke { alpha: 2.0, beta: 3.0, o: 0.5 };

        let moving = park(cos_angle, sin_angle, input);
        let result = inverse_park(cos_angle, sin_angle, moving);

        assert_abs_diff_eq!(result.alpha, input.alpha, epsilon = 1e-2);
        assert_abs_diff_eq!(result.beta, input.beta, epsilon = 1e-2);
        assert_eq!(result.o, input.o);
    }

    fn three_phase() -> impl Strategy<Value = ThreePhase> {
        (-10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0)
            .prop_map(|(a, b, c)| ThreePhase { a, b, c })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn clarke_round_trip(abc in three_phase()) {
            let result = clarke_inverse(clarke(abc));
            prop_assert!((result.a - abc.a).abs() < 1e-4);
            prop_assert!((result.b - abc.b).abs() < 1e-4);
            prop_assert!((result.c - abc.c).abs() < 1e-4);
        }

        #[test]
        fn dqo_round_trip(abc in three_phase(), theta in -100.0f32..100.0) {
            let result = to_threephase(to_dqo(abc, theta), theta);
            prop_assert!((result.a - abc.a).abs() < 1e-4);
            prop_assert!((result.b - abc.b).abs() < 1e-4);
            prop_assert!((result.c - abc.c).abs() < 1e-4);
        }
    }
}
