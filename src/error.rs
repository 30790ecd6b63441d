//! Errors reported when a component is initialised with parameters it cannot run with.

/// `errno` value used by C-style callers for an invalid argument.
pub const EINVAL: i8 = 22;

/// Reasons a controller, filter or PLL refuses its parameters.
///
/// Every variant is an "invalid argument": [`ControlError::code`] maps all of
/// them to `-EINVAL` for callers that keep the `0 / negative` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("sample time must be > 0")]
    SampleTime,
    #[error("proportional gain must not be 0")]
    ProportionalGain,
    #[error("integral time must not be 0")]
    IntegralTime,
    #[error("derivative filter time constant Td/N must be >= 0")]
    DerivativeFilter,
    #[error("resonant gain must not be 0")]
    ResonantGain,
    #[error("lower bound > upper bound")]
    Bounds,
    #[error("leading S coefficient must be >= 1e-6")]
    LeadingCoefficient,
    #[error("coefficient count out of range")]
    CoefficientCount,
    #[error("rise time must be > 1e-6")]
    RiseTime,
    #[error("amplitude must be > 1e-6")]
    Amplitude,
    #[error("frequency must be >= 0")]
    Frequency,
    #[error("bandwidth must be >= 0")]
    Bandwidth,
    #[error("time constant must be > 0")]
    TimeConstant,
}

impl ControlError {
    /// Negative result code, always `-EINVAL`.
    pub fn code(self) -> i8 {
        -EINVAL
    }
}
