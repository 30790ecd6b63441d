//! Proportional resonant controller.
//!
//! The resonant term is a second order recursive filter tuned to the pulsation
//! `w0`, with a phase lead `phi_prime` to compensate loop delays:
//!
//! ```text
//!              Ts * (cos(φ') - cos(φ' - w0·Ts)·z⁻¹)
//! R(z) = ---------------------------------------------
//!              1 - 2·cos(w0·Ts)·z⁻¹ + z⁻²
//!
//! u = Kp·e + Kr·R(z)·e
//! ```

use crate::{
    controller::{Bounds, Ports},
    trigo, ControlError, Controller, Fir,
};

/// Tuning of a [`Pr`] controller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrParams {
    /// Sample time [s]
    pub ts: f32,
    /// Proportional gain
    pub kp: f32,
    /// Resonant gain
    pub kr: f32,
    /// Resonant pulsation [rad/s]
    pub w0: f32,
    /// Phase lead [rad]
    pub phi_prime: f32,
    pub lower_bound: f32,
    pub upper_bound: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pr {
    ports: Ports,
    kp: f32,
    kr: f32,
    inverse_kr: f32,
    numerator: Fir,
    denominator: Fir,
    resonant: f32,
}

impl Pr {
    /// Validate `params` and derive the resonator coefficients.
    pub fn new(params: PrParams) -> Result<Self, ControlError> {
        if !(params.ts > 0.0) {
            log::error!("pr: Ts should be > 0");
            return Err(ControlError::SampleTime);
        }
        if params.kr == 0.0 {
            log::error!("pr: Kr = 0 is not possible");
            return Err(ControlError::ResonantGain);
        }
        let bounds = Bounds::new(params.lower_bound, params.upper_bound)?;

        let PrParams {
            ts, w0, phi_prime, ..
        } = params;
        let numerator = Fir::new(&[
            ts * trigo::cos(phi_prime),
            -ts * trigo::cos(phi_prime - w0 * ts),
        ])?;
        let denominator = Fir::new(&[-2.0 * trigo::cos(ts * w0), 1.0])?;

        Ok(Self {
            ports: Ports::new(bounds),
            kp: params.kp,
            kr: params.kr,
            inverse_kr: 1.0 / params.kr,
            numerator,
            denominator,
            resonant: 0.0,
        })
    }

    /// Reload the controller, leaving it untouched on error.
    pub fn init(&mut self, params: PrParams) -> Result<(), ControlError> {
        *self = Self::new(params)?;
        Ok(())
    }

    /// Output of the resonator before the `Kr` gain.
    pub fn resonant(&self) -> f32 {
        self.resonant
    }
}

impl Controller for Pr {
    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn calculate(&mut self) {
        let error = self.ports.reference - self.ports.measurement;
        self.resonant = self.numerator.update(error) - self.denominator.update(self.resonant);

        let unsaturated = self.kp * error + self.kr * self.resonant;
        let output = self.saturate(unsaturated);
        self.ports.output = output;

        if output != unsaturated {
            self.resonant = self.inverse_kr * (output - self.kp * error);
        }
    }

    fn reset(&mut self) {
        self.numerator.reset();
        self.denominator.reset();
        self.resonant = 0.0;
        self.ports.output = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f32::consts::PI;

    const TS: f32 = 1e-4;
    const W0: f32 = 2.0 * PI * 400.0;

    fn params() -> PrParams {
        PrParams {
            ts: TS,
            kp: 0.2,
            kr: 300.0,
            w0: W0,
            phi_prime: 0.377,
            lower_bound: -1.0,
            upper_bound: 1.0,
        }
    }

    #[test]
    fn rejects_bad_params() {
        let mut p = params();
        p.kr = 0.0;
        assert_eq!(Pr::new(p), Err(ControlError::ResonantGain));

        let mut p = params();
        p.lower_bound = 2.0;
        assert_eq!(Pr::new(p), Err(ControlError::Bounds));

        for ts in [0.0, -1e-4, f32::NAN] {
            let mut p = params();
            p.ts = ts;
            assert_eq!(Pr::new(p), Err(ControlError::SampleTime), "Ts = {ts}");
        }
    }

    #[test]
    fn first_tick() {
        let p = params();
        let mut pr = Pr::new(p).unwrap();
        let u = pr.calculate_with_return(0.5, 0.0);
        let resonant = 0.5 * TS * libm::cosf(p.phi_prime);
        assert_abs_diff_eq!(pr.resonant(), resonant, epsilon = 1e-9);
        assert_abs_diff_eq!(u, 0.2 * 0.5 + 300.0 * resonant, epsilon = 1e-6);
    }

    #[test]
    fn resonant_gain_grows_at_tuned_pulsation() {
        let mut p = params();
        p.lower_bound = -1e6;
        p.upper_bound = 1e6;
        let mut pr = Pr::new(p).unwrap();

        let mut peak_early = 0.0f32;
        let mut peak_late = 0.0f32;
        for k in 0..2000 {
            let error = 0.01 * libm::sinf(W0 * TS * k as f32);
            let resonant = {
                pr.calculate_with_return(error, 0.0);
                pr.resonant().abs()
            };
            if k < 250 {
                peak_early = peak_early.max(resonant);
            } else if k >= 1750 {
                peak_late = peak_late.max(resonant);
            }
        }
        assert!(peak_late > 5.0 * peak_early, "{peak_early} -> {peak_late}");
    }

    #[test]
    fn off_resonance_stays_bounded() {
        let mut p = params();
        p.lower_bound = -1e6;
        p.upper_bound = 1e6;
        let mut pr = Pr::new(p).unwrap();

        let mut peak = 0.0f32;
        for _ in 0..20_000 {
            peak = peak.max(pr.calculate_with_return(0.01, 0.0).abs());
        }
        assert!(peak < 1.0, "{peak}");
    }

    #[test]
    fn anti_windup_keeps_resonator_consistent() {
        let p = params();
        let mut pr = Pr::new(p).unwrap();
        let mut saturated = 0;
        for k in 0..2000 {
            let error = 0.5 * libm::sinf(W0 * TS * k as f32);
            let u = pr.calculate_with_return(error, 0.0);
            assert!((-1.0..=1.0).contains(&u));
            if u.abs() == 1.0 {
                saturated += 1;
                assert_abs_diff_eq!(p.kp * error + p.kr * pr.resonant(), u, epsilon = 1e-4);
            }
        }
        assert!(saturated > 0);
    }

    #[test]
    fn reset_clears_state() {
        let mut pr = Pr::new(params()).unwrap();
        for k in 0..100 {
            pr.calculate_with_return(libm::sinf(k as f32), 0.0);
        }
        pr.reset();
        assert_eq!(pr.output(), 0.0);
        assert_eq!(pr.resonant(), 0.0);

        let mut fresh = Pr::new(params()).unwrap();
        assert_eq!(
            pr.calculate_with_return(0.3, 0.1),
            fresh.calculate_with_return(0.3, 0.1)
        );
    }
}
