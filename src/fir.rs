//! Finite impulse response engine.
//!
//! A [`Fir`] is a tapped delay line with one coefficient per tap. It is the
//! only convolution primitive in the crate: the notch filter, the resonant
//! stage of the PR controller and the three polynomials of the RST controller
//! are all built from it.

use crate::ControlError;

/// Maximum number of taps a [`Fir`] can hold.
pub const FIR_CAPACITY: usize = 32;

/// Fixed length FIR filter.
///
/// Storage is inline, so a `Fir` never allocates and can be copied like any
/// other value. The delay line always has exactly as many entries as there
/// are coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fir {
    len: usize,
    coeffs: [f32; FIR_CAPACITY],
    delay: [f32; FIR_CAPACITY],
}

impl Fir {
    /// Build a filter from its coefficients, newest sample first.
    ///
    /// Fails with [`ControlError::CoefficientCount`] when `coeffs` is empty or
    /// longer than [`FIR_CAPACITY`].
    pub fn new(coeffs: &[f32]) -> Result<Self, ControlError> {
        if coeffs.is_empty() || coeffs.len() > FIR_CAPACITY {
            log::error!(
                "fir needs between 1 and {} coefficients, got {}",
                FIR_CAPACITY,
                coeffs.len()
            );
            return Err(ControlError::CoefficientCount);
        }

        let mut fir = Self {
            len: coeffs.len(),
            coeffs: [0.0; FIR_CAPACITY],
            delay: [0.0; FIR_CAPACITY],
        };
        fir.coeffs[..coeffs.len()].copy_from_slice(coeffs);
        log::debug!("fir coefficients: {:?}", fir.coefficients());
        Ok(fir)
    }

    /// Shift `sample` into the delay line and return the new output.
    #[inline]
    pub fn update(&mut self, sample: f32) -> f32 {
        let n = self.len;
        self.delay.copy_within(0..n - 1, 1);
        self.delay[0] = sample;

        self.coeffs[..n]
            .iter()
            .zip(&self.delay[..n])
            .map(|(c, x)| c * x)
            .sum()
    }

    /// Zero the delay line. Coefficients are kept.
    pub fn reset(&mut self) {
        self.delay = [0.0; FIR_CAPACITY];
    }

    /// Replace coefficient `index`. Out of range indices are ignored.
    pub fn set_coeff(&mut self, index: usize, value: f32) {
        if index < self.len {
            self.coeffs[index] = value;
        }
    }

    pub fn coefficients(&self) -> &[f32] {
        &self.coeffs[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`, a filter has at least one tap.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
