//! PID controller in standard form.
//!
//! ```text
//! u = Kp * (e + 1/Ti * ∫e + Td * s / (1 + Td/N * s) * e)
//! ```
//!
//! The integral uses backward Euler, the derivative is low-pass filtered with a
//! time constant of `Td/N`. When the output saturates the integral is solved
//! back from the clamped output so it cannot wind up.

use crate::{
    controller::{Bounds, Ports},
    ControlError, Controller,
};

/// Tuning of a [`Pid`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PidParams {
    /// Sample time [s]
    pub ts: f32,
    /// Proportional gain
    pub kp: f32,
    /// Integral time [s]
    pub ti: f32,
    /// Derivative time [s]
    pub td: f32,
    /// Derivative filter ratio, the filter time constant is `td / n`
    pub n: f32,
    pub lower_bound: f32,
    pub upper_bound: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pid {
    ports: Ports,
    ts: f32,
    kp: f32,
    ti: f32,
    td: f32,
    inverse_ts: f32,
    inverse_ti: f32,
    inverse_kp: f32,
    // first order derivative filter
    b1: f32,
    a1: f32,

    integral: f32,
    previous_error: f32,
    previous_filtered_derivative: f32,
}

impl Pid {
    /// Validate `params` and build a controller with cleared state.
    pub fn new(params: PidParams) -> Result<Self, ControlError> {
        if !(params.ts > 0.0) {
            log::error!("pid: Ts should be > 0");
            return Err(ControlError::SampleTime);
        }
        // also rejects NaN and infinite gains
        if !params.kp.is_finite() || params.kp == 0.0 {
            log::error!("pid: Kp = {} must be finite and not 0", params.kp);
            return Err(ControlError::ProportionalGain);
        }
        if !params.ti.is_finite() || params.ti == 0.0 {
            log::error!("pid: Ti = {} must be finite and not 0", params.ti);
            return Err(ControlError::IntegralTime);
        }
        let tau = if params.n == 0.0 {
            0.0
        } else {
            params.td / params.n
        };
        if !(tau >= 0.0) {
            log::error!("pid: Td/N should be >= 0");
            return Err(ControlError::DerivativeFilter);
        }
        let bounds = Bounds::new(params.lower_bound, params.upper_bound)?;

        log::debug!(
            "pid: Ts = {}, Kp = {}, Ti = {}, Td = {}, N = {}",
            params.ts,
            params.kp,
            params.ti,
            params.td,
            params.n
        );
        Ok(Self {
            ports: Ports::new(bounds),
            ts: params.ts,
            kp: params.kp,
            ti: params.ti,
            td: params.td,
            inverse_ts: 1.0 / params.ts,
            inverse_ti: 1.0 / params.ti,
            inverse_kp: 1.0 / params.kp,
            b1: params.ts / (params.ts + tau),
            a1: -tau / (params.ts + tau),
            integral: 0.0,
            previous_error: 0.0,
            previous_filtered_derivative: 0.0,
        })
    }

    /// Reload the controller, clearing all state.
    ///
    /// On error nothing is modified.
    pub fn init(&mut self, params: PidParams) -> Result<(), ControlError> {
        *self = Self::new(params)?;
        Ok(())
    }

    /// Seed the integral so that, with no error, the next output is `output`.
    pub fn reset_to(&mut self, output: f32) {
        self.integral = self.ti * self.inverse_kp * output;
        self.ports.output = 0.0;
        self.previous_error = 0.0;
        self.previous_filtered_derivative = 0.0;
    }

    /// Integral accumulator, `∫e` without the `Kp/Ti` factor.
    pub fn integral(&self) -> f32 {
        self.integral
    }

    pub fn sample_time(&self) -> f32 {
        self.ts
    }
}

impl Controller for Pid {
    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn calculate(&mut self) {
        let error = self.ports.reference - self.ports.measurement;

        self.integral += self.ts * error;

        let derivative = self.inverse_ts * (error - self.previous_error);
        let filtered_derivative =
            self.b1 * derivative - self.a1 * self.previous_filtered_derivative;

        let unsaturated =
            self.kp * (error + self.inverse_ti * self.integral + self.td * filtered_derivative);
        let output = self.saturate(unsaturated);
        self.ports.output = output;

        if output != unsaturated {
            self.integral =
                self.ti * (self.inverse_kp * output - error - self.td * filtered_derivative);
        }

        self.previous_error = error;
        self.previous_filtered_derivative = filtered_derivative;
    }

    fn reset(&mut self) {
        self.reset_to(0.0);
    }
}
