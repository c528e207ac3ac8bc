//! Direct-summation reference transform.
//!
//! O(N²) and valid for any length. Used to verify the fast engines and for
//! the occasional odd-sized transform that neither engine supports.

use alloc::vec;
use alloc::vec::Vec;

use crate::fft::{Direction, FftError};
use crate::num::{Complex, Float};

/// Unnormalized DFT of `input` into a new vector.
pub fn dft_unnormalized<T: Float>(input: &[Complex<T>], direction: Direction) -> Vec<Complex<T>> {
    let n = input.len();
    let mut output = vec![Complex::zero(); n];
    if n == 0 {
        return output;
    }
    let step = T::from_f64(direction.sign() * 2.0) * T::pi() / T::from_usize(n);
    for (k, out) in output.iter_mut().enumerate() {
        let mut sum = Complex::zero();
        for (j, x) in input.iter().enumerate() {
            // reduce k·j modulo n first to keep the angle small
            let angle = step * T::from_usize((k * j) % n);
            sum = sum.add(x.mul(Complex::expi(angle)));
        }
        *out = sum;
    }
    output
}

/// In-place reference transform with the engines' `1/√N` normalization.
pub fn ft<T: Float>(data: &mut [Complex<T>], direction: Direction) -> Result<(), FftError> {
    if data.is_empty() {
        return Err(FftError::EmptyInput);
    }
    let scale = T::one() / T::from_usize(data.len()).sqrt();
    let spectrum = dft_unnormalized(data, direction);
    for (dst, src) in data.iter_mut().zip(spectrum) {
        *dst = src.scale(scale);
    }
    Ok(())
}
