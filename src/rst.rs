//! Polynomial RST controller.
//!
//! ```text
//! S(q⁻¹)·u = T(q⁻¹)·y_ref - R(q⁻¹)·y
//! ```
//!
//! Three [`Fir`]s evaluate the polynomials: `R` on the measurement, `T` on the
//! reference and `S'` (all of `S` but its leading coefficient `s0`) on the
//! previous outputs. The result is normalised by `1/s0`.
//!
//! The output is clamped to the bounds without any anti-windup correction: the
//! R/S/T design is expected to carry its own stability margins.

use crate::{
    controller::{Bounds, Ports},
    ControlError, Controller, Fir,
};

/// Smallest accepted leading coefficient of `S`.
pub const MIN_S0: f32 = 1e-6;

/// Polynomials and limits of an [`Rst`] controller.
///
/// Coefficients are ordered by increasing power of `q⁻¹`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RstParams<'a> {
    /// Sample time [s]
    pub ts: f32,
    pub r: &'a [f32],
    /// Needs at least two coefficients, `s[0]` is the normalisation term
    pub s: &'a [f32],
    pub t: &'a [f32],
    pub lower_bound: f32,
    pub upper_bound: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rst {
    ports: Ports,
    ts: f32,
    r: Fir,
    s_prime: Fir,
    t: Fir,
    inverse_s0: f32,
}

impl Rst {
    pub fn new(params: RstParams<'_>) -> Result<Self, ControlError> {
        if !(params.ts > 0.0) {
            log::error!("rst: Ts should be > 0");
            return Err(ControlError::SampleTime);
        }
        let bounds = Bounds::new(params.lower_bound, params.upper_bound)?;

        if params.r.is_empty() || params.t.is_empty() || params.s.len() < 2 {
            log::error!(
                "rst: nr = {}, nt = {} must be > 0 and ns = {} must be > 1",
                params.r.len(),
                params.t.len(),
                params.s.len()
            );
            return Err(ControlError::CoefficientCount);
        }

        let s0 = params.s[0];
        // also rejects NaN
        if !(s0 >= MIN_S0) {
            log::error!("rst: s0 = {} too low", s0);
            return Err(ControlError::LeadingCoefficient);
        }

        Ok(Self {
            ports: Ports::new(bounds),
            ts: params.ts,
            r: Fir::new(params.r)?,
            s_prime: Fir::new(&params.s[1..])?,
            t: Fir::new(params.t)?,
            inverse_s0: 1.0 / s0,
        })
    }

    /// Reload the controller, leaving it untouched on error.
    pub fn init(&mut self, params: RstParams<'_>) -> Result<(), ControlError> {
        *self = Self::new(params)?;
        Ok(())
    }

    pub fn sample_time(&self) -> f32 {
        self.ts
    }
}

impl Controller for Rst {
    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn calculate(&mut self) {
        let u = self.inverse_s0
            * (self.t.update(self.ports.reference)
                - self.r.update(self.ports.measurement)
                - self.s_prime.update(self.ports.output));
        self.ports.output = self.saturate(u);
    }

    fn reset(&mut self) {
        self.r.reset();
        self.s_prime.reset();
        self.t.reset();
        self.ports.output = 0.0;
    }
}
