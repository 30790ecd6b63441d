//! The shared controller contract.
//!
//! Every controller stores its last reference, last measurement, last output
//! and output bounds in a [`Ports`] record. The [`Controller`] trait provides
//! the setters, the saturation and the per tick entry point on top of that
//! record, so a concrete controller only supplies `calculate` and `reset`.
//!
//! [`AnyController`] closes the set of variants for callers that pick the
//! control law at run time.

use crate::{pid::PidParams, pr::PrParams, rst::RstParams, ControlError, Pid, Pr, Rst};

/// Output limits, `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    lower: f32,
    upper: f32,
}

impl Bounds {
    pub fn new(lower: f32, upper: f32) -> Result<Self, ControlError> {
        // also rejects NaN
        if !(lower <= upper) {
            log::error!("lower bound {} > upper bound {}", lower, upper);
            return Err(ControlError::Bounds);
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f32 {
        self.lower
    }

    pub fn upper(&self) -> f32 {
        self.upper
    }

    /// Limit `u` to `[lower, upper]`.
    #[inline]
    pub fn clamp(&self, u: f32) -> f32 {
        if u > self.upper {
            self.upper
        } else if u < self.lower {
            self.lower
        } else {
            u
        }
    }
}

impl Default for Bounds {
    /// Unbounded.
    fn default() -> Self {
        Self {
            lower: f32::NEG_INFINITY,
            upper: f32::INFINITY,
        }
    }
}

/// Inputs and output of one controller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ports {
    pub reference: f32,
    pub measurement: f32,
    pub output: f32,
    pub bounds: Bounds,
}

impl Ports {
    pub(crate) fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }
}

/// A sampled time controller driven once per control tick.
pub trait Controller {
    fn ports(&self) -> &Ports;

    fn ports_mut(&mut self) -> &mut Ports;

    /// Compute a new output from the stored reference and measurement.
    fn calculate(&mut self);

    /// Clear the accumulated state, coefficients are kept.
    fn reset(&mut self);

    fn set_reference(&mut self, reference: f32) {
        self.ports_mut().reference = reference;
    }

    fn set_measurement(&mut self, measurement: f32) {
        self.ports_mut().measurement = measurement;
    }

    /// Last computed output.
    fn output(&self) -> f32 {
        self.ports().output
    }

    fn saturate(&self, u: f32) -> f32 {
        self.ports().bounds.clamp(u)
    }

    /// Store both inputs, calculate and return the new output.
    #[inline]
    fn calculate_with_return(&mut self, reference: f32, measurement: f32) -> f32 {
        self.set_reference(reference);
        self.set_measurement(measurement);
        self.calculate();
        self.output()
    }
}

/// Parameters for any of the controller variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerParams<'a> {
    Pid(PidParams),
    Pr(PrParams),
    Rst(RstParams<'a>),
}

/// One of the controller variants, dispatched without a vtable.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyController {
    Pid(Pid),
    Pr(Pr),
    Rst(Rst),
}

impl AnyController {
    pub fn new(params: ControllerParams<'_>) -> Result<Self, ControlError> {
        Ok(match params {
            ControllerParams::Pid(p) => Self::Pid(Pid::new(p)?),
            ControllerParams::Pr(p) => Self::Pr(Pr::new(p)?),
            ControllerParams::Rst(p) => Self::Rst(Rst::new(p)?),
        })
    }
}

impl From<Pid> for AnyController {
    fn from(value: Pid) -> Self {
        Self::Pid(value)
    }
}

impl From<Pr> for AnyController {
    fn from(value: Pr) -> Self {
        Self::Pr(value)
    }
}

impl From<Rst> for AnyController {
    fn from(value: Rst) -> Self {
        Self::Rst(value)
    }
}

impl Controller for AnyController {
    fn ports(&self) -> &Ports {
        match self {
            Self::Pid(c) => c.ports(),
            Self::Pr(c) => c.ports(),
            Self::Rst(c) => c.ports(),
        }
    }

    fn ports_mut(&mut self) -> &mut Ports {
        match self {
            Self::Pid(c) => c.ports_mut(),
            Self::Pr(c) => c.ports_mut(),
            Self::Rst(c) => c.ports_mut(),
        }
    }

    fn calculate(&mut self) {
        match self {
            Self::Pid(c) => c.calculate(),
            Self::Pr(c) => c.calculate(),
            Self::Rst(c) => c.calculate(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Pid(c) => c.reset(),
            Self::Pr(c) => c.reset(),
            Self::Rst(c) => c.reset(),
        }
    }
}
