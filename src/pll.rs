//! Software phase locked loops.
//!
//! Both loops share one skeleton. An error detector compares the input with
//! the estimated angle, the error is optionally notch filtered, a PI regulator
//! turns it into an angular rate and the angle is advanced by `w·Ts` and
//! wrapped into `[0, 2π)`:
//!
//! ```text
//! signal -> detector -> [notch 2·f0] -> PI -> w -> ∫ -> angle
//!              ^                                        |
//!              +----------------------------------------+
//! ```
//!
//! What differs is captured by a [`Strategy`]:
//!
//! * [`Pll::new_sinus`] tracks `A·sin(θ)`. The detector `cos(angle)·signal`
//!   carries a ripple at twice the signal frequency, which the notch removes.
//!   The rate is kept non-negative, so only the magnitude of the pulsation is
//!   estimated.
//! * [`Pll::new_angle`] tracks an angle (sawtooth) input with the detector
//!   `sin(signal - angle)`. It needs no notch and the rate keeps its sign.
//!
//! The PI gains come from a second order loop shape with damping `0.7` and
//! natural pulsation `3 / rise_time`.

use core::{f32::consts::TAU, marker::PhantomData};

use crate::{
    trigo::{self, Libm, Trigonometry},
    ControlError, Controller, NotchFilter, Pid, PidParams,
};

/// Damping ratio of the closed loop.
const XI: f32 = 0.7;
/// Lower limit for the rise time and the amplitude.
const MIN_POSITIVE: f32 = 1e-6;
/// The rate is limited to `±RATE_LIMIT·f0`.
const RATE_LIMIT: f32 = 100.0;

/// Parameters of a [`Pll::new_sinus`] loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PllSinusParams {
    /// Sample time [s]
    pub ts: f32,
    /// Amplitude of the tracked signal
    pub amplitude: f32,
    /// Nominal frequency [Hz]
    pub f0: f32,
    /// Rise time of the loop [s]
    pub rise_time: f32,
}

/// Parameters of a [`Pll::new_angle`] loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PllAngleParams {
    /// Sample time [s]
    pub ts: f32,
    /// Nominal frequency [Hz]
    pub f0: f32,
    /// Rise time of the loop [s]
    pub rise_time: f32,
}

/// Output of one PLL tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PllData {
    /// Estimated pulsation [rad/s]
    pub w: f32,
    /// Estimated angle [rad], in `[0, 2π)`
    pub angle: f32,
    /// Error fed to the PI regulator
    pub error: f32,
}

/// The parts in which the PLL variants differ.
#[derive(Debug, Clone, Copy)]
pub struct Strategy {
    /// `(signal, estimated angle) -> phase error`
    error: fn(f32, f32) -> f32,
    /// `(natural pulsation, amplitude) -> (Kp, Ti)`
    gains: fn(f32, f32) -> (f32, f32),
    notch: bool,
    rectify: bool,
}

impl Strategy {
    pub fn sinus<T: Trigonometry>() -> Self {
        Self {
            error: sinus_error::<T>,
            gains: sinus_gains,
            notch: true,
            rectify: true,
        }
    }

    pub fn angle<T: Trigonometry>() -> Self {
        Self {
            error: angle_error::<T>,
            gains: angle_gains,
            notch: false,
            rectify: false,
        }
    }
}

fn sinus_error<T: Trigonometry>(signal: f32, angle: f32) -> f32 {
    T::cos(angle) * signal
}

fn angle_error<T: Trigonometry>(signal: f32, angle: f32) -> f32 {
    T::sin(signal - angle)
}

fn sinus_gains(wn: f32, amplitude: f32) -> (f32, f32) {
    (2.0 * wn * XI / amplitude, 2.0 * XI / wn)
}

fn angle_gains(wn: f32, _amplitude: f32) -> (f32, f32) {
    (2.0 * XI * wn, 2.0 * XI / wn)
}

/// Phase locked loop, generic over the trigonometry used in the loop.
///
/// ```
/// use regul::{Pll, PllAngleParams};
///
/// let mut pll: Pll = Pll::new_angle(PllAngleParams {
///     ts: 100e-6,
///     f0: 50.0,
///     rise_time: 0.02,
/// })
/// .unwrap();
/// pll.reset_to(50.0);
/// let data = pll.calculate_with_return(0.0);
/// assert!((0.0..core::f32::consts::TAU).contains(&data.angle));
/// ```
#[derive(Debug, Clone)]
pub struct Pll<T: Trigonometry = Libm> {
    strategy: Strategy,
    ts: f32,
    f0: f32,
    pi: Pid,
    notch: Option<NotchFilter>,
    w: f32,
    angle: f32,
    trigonometry: PhantomData<T>,
}

impl<T: Trigonometry> Pll<T> {
    /// Loop locking on `amplitude·sin(θ)`.
    pub fn new_sinus(params: PllSinusParams) -> Result<Self, ControlError> {
        Self::with_strategy(
            Strategy::sinus::<T>(),
            params.ts,
            params.amplitude,
            params.f0,
            params.rise_time,
        )
    }

    /// Loop locking on an angle signal.
    pub fn new_angle(params: PllAngleParams) -> Result<Self, ControlError> {
        Self::with_strategy(
            Strategy::angle::<T>(),
            params.ts,
            1.0,
            params.f0,
            params.rise_time,
        )
    }

    /// Build a loop from any [`Strategy`].
    ///
    /// `amplitude` scales the gains of the sinus detector and must be
    /// `> 1e-6` whatever the strategy.
    pub fn with_strategy(
        strategy: Strategy,
        ts: f32,
        amplitude: f32,
        f0: f32,
        rise_time: f32,
    ) -> Result<Self, ControlError> {
        if !(ts > 0.0) {
            log::error!("pll: Ts must be > 0");
            return Err(ControlError::SampleTime);
        }
        if !(rise_time > MIN_POSITIVE) {
            log::error!("pll: rise time must be > 0");
            return Err(ControlError::RiseTime);
        }
        if !(f0 >= 0.0) {
            log::error!("pll: f0 must be >= 0");
            return Err(ControlError::Frequency);
        }
        if !(amplitude > MIN_POSITIVE) {
            log::error!("pll: amplitude must be > 0");
            return Err(ControlError::Amplitude);
        }

        let wn = 3.0 / rise_time;
        let (kp, ti) = (strategy.gains)(wn, amplitude);
        log::debug!("pll: wn = {}, Kp = {}, Ti = {}", wn, kp, ti);

        let pi = Pid::new(PidParams {
            ts,
            kp,
            ti,
            td: 0.0,
            n: 0.0,
            lower_bound: -RATE_LIMIT * f0,
            upper_bound: RATE_LIMIT * f0,
        })?;
        let notch = if strategy.notch {
            Some(NotchFilter::new(ts, 2.0 * f0, 0.2 * f0)?)
        } else {
            None
        };

        Ok(Self {
            strategy,
            ts,
            f0,
            pi,
            notch,
            w: 0.0,
            angle: 0.0,
            trigonometry: PhantomData,
        })
    }

    /// Run one tick of the loop on a new input sample.
    pub fn calculate_with_return(&mut self, signal: f32) -> PllData {
        let mut error = (self.strategy.error)(signal, self.angle);
        if let Some(notch) = &mut self.notch {
            error = notch.calculate_with_return(error);
        }

        let mut w = self.pi.calculate_with_return(error, 0.0);
        if self.strategy.rectify {
            w = w.abs();
        }
        self.w = w;
        self.angle = trigo::modulo_2pi(self.angle + w * self.ts);

        PllData {
            w,
            angle: self.angle,
            error,
        }
    }

    pub fn reset(&mut self) {
        self.reset_to(0.0);
    }

    /// Restart from angle `0` with the loop running at `f0` [Hz].
    pub fn reset_to(&mut self, f0: f32) {
        self.angle = 0.0;
        self.w = TAU * f0;
        if let Some(notch) = &mut self.notch {
            notch.reset();
        }
        self.pi.reset_to(self.w);
    }

    /// Estimated angle [rad].
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Estimated pulsation [rad/s].
    pub fn w(&self) -> f32 {
        self.w
    }

    /// Nominal frequency [Hz].
    pub fn nominal_frequency(&self) -> f32 {
        self.f0
    }
}
