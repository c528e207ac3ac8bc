//! Closed-form transforms for the short lengths 2, 3, 4 and 8.
//!
//! Each kernel works in place on `len` samples spaced `stride` apart starting
//! at `data[0]`. Results are unnormalized; scaling belongs to the caller.

use crate::fft::Direction;
use crate::num::{Complex, Float};

/// Lengths with a closed-form kernel, largest radix last.
pub const SHORT_LENGTHS: [usize; 4] = [2, 3, 4, 8];

/// Signature shared by all short kernels.
pub type ShortKernel<T> = fn(&mut [Complex<T>], usize, Direction);

/// `cos(2π/3)`
const COS_2PI_3: f64 = -0.5;
/// `sin(2π/3)`
const SIN_2PI_3: f64 = 0.866_025_403_784_438_6;
/// `cos(2π/8)`
const COS_2PI_8: f64 = core::f64::consts::FRAC_1_SQRT_2;

/// Look up the kernel for `len`, if there is one.
pub fn short_kernel<T: Float>(len: usize) -> Option<ShortKernel<T>> {
    match len {
        2 => Some(fft2::<T>),
        3 => Some(fft3::<T>),
        4 => Some(fft4::<T>),
        8 => Some(fft8::<T>),
        _ => None,
    }
}

pub fn is_short_length(len: usize) -> bool {
    SHORT_LENGTHS.contains(&len)
}

/// `1/√n`
#[inline]
pub fn unitary_scale<T: Float>(n: usize) -> T {
    T::one() / T::from_usize(n).sqrt()
}

/// Multiply `len` samples spaced `stride` apart by `factor`.
pub fn scale_strided<T: Float>(data: &mut [Complex<T>], stride: usize, len: usize, factor: T) {
    for i in 0..len {
        let idx = i * stride;
        data[idx] = data[idx].scale(factor);
    }
}

/// Multiply by `-i` for the forward direction and by `+i` for the reverse one.
#[inline(always)]
fn rotate<T: Float>(z: Complex<T>, direction: Direction) -> Complex<T> {
    match direction {
        Direction::Forward => z.mul_neg_i(),
        Direction::Reverse => z.mul_i(),
    }
}

#[inline(always)]
pub fn fft2<T: Float>(data: &mut [Complex<T>], stride: usize, _direction: Direction) {
    debug_assert!(data.len() > stride);
    let a = data[0];
    let b = data[stride];
    data[0] = a.add(b);
    data[stride] = a.sub(b);
}

#[inline(always)]
pub fn fft3<T: Float>(data: &mut [Complex<T>], stride: usize, direction: Direction) {
    debug_assert!(data.len() > 2 * stride);
    let x0 = data[0];
    let x1 = data[stride];
    let x2 = data[2 * stride];

    let sum = x1.add(x2);
    let diff = x1.sub(x2);
    let t = x0.add(sum.scale(T::from_f64(COS_2PI_3)));
    let u = rotate(diff.scale(T::from_f64(SIN_2PI_3)), direction);

    data[0] = x0.add(sum);
    data[stride] = t.add(u);
    data[2 * stride] = t.sub(u);
}

#[inline(always)]
pub fn fft4<T: Float>(data: &mut [Complex<T>], stride: usize, direction: Direction) {
    debug_assert!(data.len() > 3 * stride);
    let a0 = data[0];
    let a1 = data[stride];
    let a2 = data[2 * stride];
    let a3 = data[3 * stride];
    let even0 = a0.add(a2);
    let even1 = a0.sub(a2);
    let odd0 = a1.add(a3);
    let t1 = rotate(a1.sub(a3), direction);
    data[0] = even0.add(odd0);
    data[2 * stride] = even0.sub(odd0);
    data[stride] = even1.add(t1);
    data[3 * stride] = even1.sub(t1);
}

#[inline(always)]
pub fn fft8<T: Float>(data: &mut [Complex<T>], stride: usize, direction: Direction) {
    debug_assert!(data.len() > 7 * stride);
    // Load inputs
    let x0 = data[0];
    let x1 = data[stride];
    let x2 = data[2 * stride];
    let x3 = data[3 * stride];
    let x4 = data[4 * stride];
    let x5 = data[5 * stride];
    let x6 = data[6 * stride];
    let x7 = data[7 * stride];

    // FFT4 on even indices (0,2,4,6)
    let a0 = x0.add(x4);
    let a1 = x0.sub(x4);
    let a2 = x2.add(x6);
    let t = rotate(x2.sub(x6), direction);
    let e0 = a0.add(a2);
    let e2 = a0.sub(a2);
    let e1 = a1.add(t);
    let e3 = a1.sub(t);

    // FFT4 on odd indices (1,3,5,7)
    let b0 = x1.add(x5);
    let b1 = x1.sub(x5);
    let b2 = x3.add(x7);
    let t = rotate(x3.sub(x7), direction);
    let o0 = b0.add(b2);
    let o2 = b0.sub(b2);
    let o1 = b1.add(t);
    let o3 = b1.sub(t);

    // W^1 = s·(1 ∓ i), W^2 = ∓i, W^3 = s·(-1 ∓ i)
    let s = T::from_f64(COS_2PI_8);
    let t1 = o1.add(rotate(o1, direction)).scale(s);
    let t2 = rotate(o2, direction);
    let t3 = rotate(o3, direction).sub(o3).scale(s);

    data[0] = e0.add(o0);
    data[4 * stride] = e0.sub(o0);
    data[stride] = e1.add(t1);
    data[5 * stride] = e1.sub(t1);
    data[2 * stride] = e2.add(t2);
    data[6 * stride] = e2.sub(t2);
    data[3 * stride] = e3.add(t3);
    data[7 * stride] = e3.sub(t3);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dft::dft_unnormalized;
    use crate::num::Complex64;
    use alloc::vec::Vec;

    fn check_kernel(n: usize, direction: Direction) {
        let data: Vec<Complex64> = (0..n)
            .map(|i| Complex64::new(i as f64 + 0.5, -(i as f64) * 0.25))
            .collect();
        let expected = dft_unnormalized(&data, direction);
        let mut out = data.clone();
        short_kernel::<f64>(n).unwrap()(&mut out, 1, direction);
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!((a.re - b.re).abs() < 1e-12, "n={} {:?}", n, direction);
            assert!((a.im - b.im).abs() < 1e-12, "n={} {:?}", n, direction);
        }
    }

    #[test]
    fn kernels_match_direct_summation() {
        for &n in &SHORT_LENGTHS {
            check_kernel(n, Direction::Forward);
            check_kernel(n, Direction::Reverse);
        }
    }

    #[test]
    fn strided_kernel_leaves_gaps_untouched() {
        let stride = 3;
        let mut data: Vec<Complex64> = (0..8 * stride)
            .map(|i| Complex64::new(i as f64, 1.0))
            .collect();
        let gathered: Vec<Complex64> = data.iter().step_by(stride).copied().collect();
        let expected = dft_unnormalized(&gathered, Direction::Forward);
        fft8(&mut data, stride, Direction::Forward);
        for (i, c) in data.iter().enumerate() {
            if i % stride == 0 {
                let e = expected[i / stride];
                assert!((c.re - e.re).abs() < 1e-12);
                assert!((c.im - e.im).abs() < 1e-12);
            } else {
                assert_eq!(*c, Complex64::new(i as f64, 1.0));
            }
        }
    }

    #[test]
    fn only_short_lengths_have_kernels() {
        assert!(short_kernel::<f32>(16).is_none());
        assert!(short_kernel::<f32>(1).is_none());
        assert!(is_short_length(3));
        assert!(!is_short_length(6));
    }

    #[test]
    fn scaling_respects_stride() {
        let mut data = [Complex64::new(2.0, 2.0); 6];
        scale_strided(&mut data, 2, 3, unitary_scale::<f64>(4));
        assert_eq!(data[0], Complex64::new(1.0, 1.0));
        assert_eq!(data[1], Complex64::new(2.0, 2.0));
        assert_eq!(data[4], Complex64::new(1.0, 1.0));
    }
}
