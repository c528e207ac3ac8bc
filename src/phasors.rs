//! Precomputed twiddle factors ("phasors") for a maximum transform length.
//!
//! A [`PhasorTable`] stores the full circle of `N = base^max_order` unit
//! vectors at angles `-2π·k/N`. Shorter transforms of length `len` read the
//! same table with a stride of `N/len`, so one table serves every supported
//! length up to `N`.

use alloc::vec::Vec;

use crate::fft::FftError;
use crate::num::{Complex, Float};

/// Bases with a short kernel to terminate the recursion.
pub const SUPPORTED_BASES: [usize; 2] = [2, 3];

#[derive(Clone, Debug)]
pub struct PhasorTable<T: Float> {
    base: usize,
    max_order: u32,
    phasors: Vec<Complex<T>>,
}

impl<T: Float> PhasorTable<T> {
    /// Build the table for `base^max_order` samples.
    pub fn build(base: usize, max_order: u32) -> Result<Self, FftError> {
        if !SUPPORTED_BASES.contains(&base) {
            return Err(FftError::UnsupportedBase { base });
        }
        let n = base
            .checked_pow(max_order)
            .ok_or(FftError::OrderOverflow { base, order: max_order })?;
        Ok(Self::with_len(base, max_order, n))
    }

    /// Base-2 table; `max_order` must leave `1 << max_order` in range.
    #[cfg(feature = "std")]
    pub(crate) fn binary(max_order: u32) -> Self {
        Self::with_len(2, max_order, 1usize << max_order)
    }

    fn with_len(base: usize, max_order: u32, n: usize) -> Self {
        let step = -2.0 * core::f64::consts::PI / n as f64;
        let phasors: Vec<Complex<T>> = (0..n)
            .map(|k| Complex::expi_f64(step * k as f64))
            .collect();
        engine_debug!("built phasor table base={} order={} len={}", base, max_order, n);
        Self {
            base,
            max_order,
            phasors,
        }
    }

    /// Build the smallest table covering `min_length`.
    pub fn for_length(base: usize, min_length: usize) -> Result<Self, FftError> {
        if !SUPPORTED_BASES.contains(&base) {
            return Err(FftError::UnsupportedBase { base });
        }
        let n = ceil_power(base, min_length)?;
        Self::build(base, order_of(base, n))
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn max_order(&self) -> u32 {
        self.max_order
    }

    pub fn max_fft_length(&self) -> usize {
        self.phasors.len()
    }

    pub fn len(&self) -> usize {
        self.phasors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phasors.is_empty()
    }

    pub fn as_slice(&self) -> &[Complex<T>] {
        &self.phasors
    }

    /// `exp(-2πi·k/N)` for the table length `N`; `k` wraps around the circle.
    #[inline(always)]
    pub fn get(&self, k: usize) -> Complex<T> {
        self.phasors[k % self.phasors.len()]
    }

    /// True iff `len` is a multiple of the base.
    pub fn is_allowed_length(&self, len: usize) -> bool {
        len != 0 && len % self.base == 0
    }

    /// Stride into the table that reproduces the angles of a length-`len`
    /// transform.
    pub fn phasor_step_for_length(&self, len: usize) -> Result<usize, FftError> {
        let max = self.max_fft_length();
        if len > max {
            return Err(FftError::SizeExceedsMaximum { size: len, max });
        }
        if len == 0 || max % len != 0 {
            return Err(FftError::UnsupportedLength { size: len });
        }
        Ok(max / len)
    }

    /// Smallest supported length not below `n`.
    pub fn ceil_length(&self, n: usize) -> Result<usize, FftError> {
        ceil_power(self.base, n)
    }

    /// `exp(-2πi·k/len)` for a supported `len`.
    pub fn phasor(&self, len: usize, k: usize) -> Result<Complex<T>, FftError> {
        let step = self.phasor_step_for_length(len)?;
        Ok(self.get((k % len) * step))
    }
}

/// Smallest power of `base` that is `>= n` (with `n <= 1` mapping to 1).
pub(crate) fn ceil_power(base: usize, n: usize) -> Result<usize, FftError> {
    let mut len = 1usize;
    while len < n {
        len = len
            .checked_mul(base)
            .ok_or(FftError::LengthOverflow { requested: n })?;
    }
    Ok(len)
}

/// Exponent of an exact power of `base`.
fn order_of(base: usize, mut n: usize) -> u32 {
    let mut order = 0;
    while n > 1 {
        n /= base;
        order += 1;
    }
    order
}
