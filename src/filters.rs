//! First order low-pass and notch filters.

use core::f32::consts::PI;

use crate::{trigo, ControlError, Fir};

/// First order low-pass `y[k] = b1·x[k] - a1·y[k-1]`.
///
/// The pole `-a1` is the second order series expansion of `exp(-Ts/τ)`, not
/// the exponential itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPassFirstOrderFilter {
    ts: f32,
    tau: f32,
    a1: f32,
    b1: f32,
    previous: f32,
}

impl LowPassFirstOrderFilter {
    /// Build the filter. A time constant `tau <= 0` gives a pass-through
    /// filter, see [`init`](Self::init).
    pub fn new(ts: f32, tau: f32) -> Self {
        let mut filter = Self::pass_through(ts, tau);
        // the error is already logged, and the pass-through keeps the loop alive
        let _ = filter.init(ts, tau);
        filter
    }

    fn pass_through(ts: f32, tau: f32) -> Self {
        Self {
            ts,
            tau,
            a1: 0.0,
            b1: 1.0,
            previous: 0.0,
        }
    }

    /// Derive the coefficients from the sample time and the time constant.
    ///
    /// When `tau <= 0` the filter still becomes usable: it is switched to a
    /// pass-through and [`ControlError::TimeConstant`] is returned.
    pub fn init(&mut self, ts: f32, tau: f32) -> Result<(), ControlError> {
        if !(tau > 0.0) {
            log::warn!("low-pass: tau = {} must be > 0, signal is not filtered", tau);
            *self = Self::pass_through(ts, tau);
            return Err(ControlError::TimeConstant);
        }

        let x = -ts / tau;
        let a1 = -(1.0 + x + x * x * 0.5);
        *self = Self {
            ts,
            tau,
            a1,
            b1: 1.0 + a1,
            previous: 0.0,
        };
        log::debug!("low-pass: a1 = {}, b1 = {}", self.a1, self.b1);
        Ok(())
    }

    #[inline]
    pub fn calculate_with_return(&mut self, signal: f32) -> f32 {
        let value = self.b1 * signal - self.a1 * self.previous;
        self.previous = value;
        value
    }

    pub fn reset(&mut self) {
        self.reset_to(0.0);
    }

    /// Start again from a steady output of `value`.
    pub fn reset_to(&mut self, value: f32) {
        self.previous = value;
    }

    pub fn is_pass_through(&self) -> bool {
        self.a1 == 0.0 && self.b1 == 1.0
    }

    pub fn sample_time(&self) -> f32 {
        self.ts
    }

    pub fn time_constant(&self) -> f32 {
        self.tau
    }
}

/// Band-stop biquad.
///
/// With `w0 = 2π·f0·Ts`, `Δw = 2π·bandwidth·Ts` and `g = 1 / (1 + Δw/2)`:
///
/// ```text
///         g·(1 - 2·cos(w0)·z⁻¹ + z⁻²)
/// H(z) = ------------------------------------
///         1 - 2·g·cos(w0)·z⁻¹ + (2g - 1)·z⁻²
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotchFilter {
    ts: f32,
    f0: f32,
    bandwidth: f32,
    numerator: Fir,
    denominator: Fir,
    output: f32,
}

impl NotchFilter {
    /// * `ts` - sample time [s]
    /// * `f0` - centre frequency to reject [Hz]
    /// * `bandwidth` - band around `f0` where the gain is below -3dB [Hz]
    pub fn new(ts: f32, f0: f32, bandwidth: f32) -> Result<Self, ControlError> {
        if !(ts > 0.0) {
            log::error!("notch: Ts should be > 0");
            return Err(ControlError::SampleTime);
        }
        if !(f0 >= 0.0) {
            log::error!("notch: f0 should be >= 0");
            return Err(ControlError::Frequency);
        }
        if !(bandwidth >= 0.0) {
            log::error!("notch: bandwidth should be >= 0");
            return Err(ControlError::Bandwidth);
        }

        let w0 = 2.0 * PI * f0 * ts;
        let delta_w = 2.0 * PI * bandwidth * ts;
        let gain = 1.0 / (1.0 + delta_w * 0.5);
        let cos_w0 = trigo::cos(w0);

        let numerator = Fir::new(&[gain, -2.0 * gain * cos_w0, gain])?;
        let denominator = Fir::new(&[-2.0 * gain * cos_w0, 2.0 * gain - 1.0])?;

        Ok(Self {
            ts,
            f0,
            bandwidth,
            numerator,
            denominator,
            output: 0.0,
        })
    }

    #[inline]
    pub fn calculate_with_return(&mut self, signal: f32) -> f32 {
        self.output = self.numerator.update(signal) - self.denominator.update(self.output);
        self.output
    }

    pub fn reset(&mut self) {
        self.output = 0.0;
        self.numerator.reset();
        self.denominator.reset();
    }

    pub fn centre_frequency(&self) -> f32 {
        self.f0
    }

    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    pub fn sample_time(&self) -> f32 {
        self.ts
    }
}
