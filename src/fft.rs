//! Transform facade.
//!
//! [`fft`] routes a buffer to the engine chosen at build time: the iterative
//! decimation engine by default, or the recursive mixed-radix engine with the
//! `mixed-radix` cargo feature. Both engines stay available directly through
//! [`crate::decimation`] and [`crate::mixed_radix`]. Every transform is scaled
//! by `1/√N`, so a forward transform followed by a reverse one restores the
//! input.
//!
//! Buffers are anything implementing [`ComplexBuffer`]: slices, vectors, or a
//! [`StridedSlice`] view. Non-contiguous buffers are gathered into a
//! temporary, transformed, and scattered back.

use alloc::vec::Vec;
use core::fmt;

use crate::dft;
use crate::num::{Complex, Float};

#[cfg(feature = "std")]
use crate::decimation::{small_path_order, DecimationConfig, DecimationEngine};
#[cfg(feature = "std")]
use crate::fft_kernels::{scale_strided, short_kernel, unitary_scale};
#[cfg(feature = "std")]
use crate::mixed_radix::SharedTransformers;
#[cfg(feature = "std")]
use std::sync::OnceLock;

/// Transform direction.
///
/// `Forward` decomposes the input on the basis `exp(+iωt)`, computing
/// `X[k] = Σ x[n]·exp(-2πi·k·n/N) / √N`; `Reverse` uses the opposite exponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    /// Sign of the exponent used by this direction's kernel.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Reverse => 1.0,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Parse an exponent sign: `-1` is forward, `+1` is reverse.
impl TryFrom<i32> for Direction {
    type Error = FftError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Forward),
            1 => Ok(Direction::Reverse),
            other => Err(FftError::InvalidDirection { value: other }),
        }
    }
}

/// Direction plus optional half-length rolls around the transform.
///
/// `roll_before` undoes a centered layout (zero index in the middle) before
/// transforming; `roll_after` centers the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FftFlags {
    pub direction: Direction,
    pub roll_before: bool,
    pub roll_after: bool,
}

impl FftFlags {
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            roll_before: false,
            roll_after: false,
        }
    }

    pub const fn forward() -> Self {
        Self::new(Direction::Forward)
    }

    pub const fn reverse() -> Self {
        Self::new(Direction::Reverse)
    }

    pub const fn with_roll_before(mut self) -> Self {
        self.roll_before = true;
        self
    }

    pub const fn with_roll_after(mut self) -> Self {
        self.roll_after = true;
        self
    }

    /// Centered in, centered out.
    pub const fn centered(self) -> Self {
        self.with_roll_before().with_roll_after()
    }
}

impl From<Direction> for FftFlags {
    fn from(direction: Direction) -> Self {
        Self::new(direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    /// Zero-length buffer.
    EmptyInput,
    /// The iterative engine only handles powers of two.
    NotPowerOfTwo { size: usize },
    /// The length is not a chain of supported radices for the table.
    UnsupportedLength { size: usize },
    /// The length is larger than the tables were built for.
    SizeExceedsMaximum { size: usize, max: usize },
    /// Rounding the length up to a supported one overflows `usize`.
    LengthOverflow { requested: usize },
    /// `base^order` does not fit in `usize`.
    OrderOverflow { base: usize, order: u32 },
    /// Phasor tables only exist for bases with a short kernel.
    UnsupportedBase { base: usize },
    /// A pool or transformer set without any processors.
    EmptyPool,
    InvalidStride { stride: usize },
    MismatchedLengths,
    InvalidDirection { value: i32 },
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::EmptyInput => write!(f, "input buffer is empty"),
            FftError::NotPowerOfTwo { size } => {
                write!(f, "FFT length {} is not a power of two", size)
            }
            FftError::UnsupportedLength { size } => write!(
                f,
                "FFT length {} cannot be factored into the supported radices",
                size
            ),
            FftError::SizeExceedsMaximum { size, max } => write!(
                f,
                "FFT length {} exceeds the configured maximum {}; call initialize_fft with a larger length first",
                size, max
            ),
            FftError::LengthOverflow { requested } => {
                write!(f, "FFT length for {} overflows usize", requested)
            }
            FftError::OrderOverflow { base, order } => {
                write!(f, "phasor table {}^{} overflows usize", base, order)
            }
            FftError::UnsupportedBase { base } => {
                write!(f, "phasor table base {} is not supported (use 2 or 3)", base)
            }
            FftError::EmptyPool => write!(f, "processor pool has no processors"),
            FftError::InvalidStride { stride } => write!(f, "invalid stride {}", stride),
            FftError::MismatchedLengths => write!(f, "buffer lengths do not match"),
            FftError::InvalidDirection { value } => {
                write!(f, "invalid FFT direction {} (expected -1 or 1)", value)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

/// A mutable, indexable sequence of complex samples with a known stride.
pub trait ComplexBuffer<T: Float> {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Distance in samples between consecutive elements in memory.
    fn stride(&self) -> usize;
    fn get(&self, index: usize) -> Complex<T>;
    fn set(&mut self, index: usize, value: Complex<T>);
    /// Direct access when the elements are adjacent in memory.
    fn as_contiguous_mut(&mut self) -> Option<&mut [Complex<T>]> {
        None
    }
}

impl<T: Float> ComplexBuffer<T> for [Complex<T>] {
    fn len(&self) -> usize {
        <[Complex<T>]>::len(self)
    }
    fn stride(&self) -> usize {
        1
    }
    fn get(&self, index: usize) -> Complex<T> {
        self[index]
    }
    fn set(&mut self, index: usize, value: Complex<T>) {
        self[index] = value;
    }
    fn as_contiguous_mut(&mut self) -> Option<&mut [Complex<T>]> {
        Some(self)
    }
}

impl<T: Float> ComplexBuffer<T> for Vec<Complex<T>> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn stride(&self) -> usize {
        1
    }
    fn get(&self, index: usize) -> Complex<T> {
        self[index]
    }
    fn set(&mut self, index: usize, value: Complex<T>) {
        self[index] = value;
    }
    fn as_contiguous_mut(&mut self) -> Option<&mut [Complex<T>]> {
        Some(self.as_mut_slice())
    }
}

/// Every `stride`-th sample of a slice, viewed as one sequence.
#[derive(Debug)]
pub struct StridedSlice<'a, T: Float> {
    data: &'a mut [Complex<T>],
    stride: usize,
    len: usize,
}

impl<'a, T: Float> StridedSlice<'a, T> {
    /// View `data[0], data[stride], …` up to the end of the slice.
    pub fn new(data: &'a mut [Complex<T>], stride: usize) -> Result<Self, FftError> {
        if stride == 0 {
            return Err(FftError::InvalidStride { stride });
        }
        let len = data.len().div_ceil(stride);
        Ok(Self { data, stride, len })
    }

    /// View exactly `len` samples.
    pub fn with_len(data: &'a mut [Complex<T>], stride: usize, len: usize) -> Result<Self, FftError> {
        if stride == 0 {
            return Err(FftError::InvalidStride { stride });
        }
        if len > 0 && (len - 1) * stride >= data.len() {
            return Err(FftError::MismatchedLengths);
        }
        Ok(Self { data, stride, len })
    }
}

impl<T: Float> ComplexBuffer<T> for StridedSlice<'_, T> {
    fn len(&self) -> usize {
        self.len
    }
    fn stride(&self) -> usize {
        self.stride
    }
    fn get(&self, index: usize) -> Complex<T> {
        self.data[index * self.stride]
    }
    fn set(&mut self, index: usize, value: Complex<T>) {
        self.data[index * self.stride] = value;
    }
    fn as_contiguous_mut(&mut self) -> Option<&mut [Complex<T>]> {
        if self.stride == 1 {
            Some(&mut self.data[..self.len])
        } else {
            None
        }
    }
}

/// Run `f` on a contiguous view of `buffer`, copying through a temporary when
/// the buffer is strided.
pub fn with_contiguous<T, B, R, F>(buffer: &mut B, f: F) -> Result<R, FftError>
where
    T: Float,
    B: ComplexBuffer<T> + ?Sized,
    F: FnOnce(&mut [Complex<T>]) -> Result<R, FftError>,
{
    if let Some(data) = buffer.as_contiguous_mut() {
        return f(data);
    }
    let mut gathered: Vec<Complex<T>> = (0..buffer.len()).map(|i| buffer.get(i)).collect();
    let result = f(&mut gathered)?;
    for (i, value) in gathered.into_iter().enumerate() {
        buffer.set(i, value);
    }
    Ok(result)
}

/// Cyclic shift by `len/2` that moves index 0 to the middle.
pub fn roll_half<T: Float>(data: &mut [Complex<T>]) {
    let half = data.len() / 2;
    data.rotate_right(half);
}

/// Inverse of [`roll_half`], also for odd lengths.
pub fn unroll_half<T: Float>(data: &mut [Complex<T>]) {
    let half = data.len() / 2;
    data.rotate_left(half);
}

/// Slow direct-summation transform for any length, same scaling as [`fft`].
pub fn ft<T, B>(buffer: &mut B, direction: Direction) -> Result<(), FftError>
where
    T: Float,
    B: ComplexBuffer<T> + ?Sized,
{
    with_contiguous(buffer, |data| dft::ft(data, direction))
}

/// Scalar types with process-wide engine state.
///
/// Each implementation owns lazily built statics: the tables of the lock-free
/// small path, the shared decimation engine, and the shared mixed-radix
/// transformer set. Both shared engines start at
/// [`DEFAULT_MAX_FFT_LENGTH`](crate::decimation::DEFAULT_MAX_FFT_LENGTH).
#[cfg(feature = "std")]
pub trait EngineFloat: Float {
    fn small_tables() -> &'static DecimationConfig<Self>;
    fn shared_decimation() -> &'static DecimationEngine<Self>;
    fn shared_transformers() -> &'static SharedTransformers<Self>;
}

#[cfg(feature = "std")]
macro_rules! impl_engine_float {
    ($t:ty) => {
        impl EngineFloat for $t {
            fn small_tables() -> &'static DecimationConfig<$t> {
                static TABLES: OnceLock<DecimationConfig<$t>> = OnceLock::new();
                TABLES.get_or_init(|| DecimationConfig::with_order(small_path_order::<$t>()))
            }

            fn shared_decimation() -> &'static DecimationEngine<$t> {
                static ENGINE: OnceLock<DecimationEngine<$t>> = OnceLock::new();
                ENGINE.get_or_init(DecimationEngine::with_default_length)
            }

            fn shared_transformers() -> &'static SharedTransformers<$t> {
                static SET: OnceLock<SharedTransformers<$t>> = OnceLock::new();
                SET.get_or_init(SharedTransformers::with_default_length)
            }
        }
    };
}

#[cfg(feature = "std")]
impl_engine_float!(f32);
#[cfg(feature = "std")]
impl_engine_float!(f64);

/// Name of the engine the facade was built with.
#[cfg(feature = "std")]
pub const fn active_engine() -> &'static str {
    if cfg!(feature = "mixed-radix") {
        "mixed-radix"
    } else {
        "decimation"
    }
}

/// Fast in-place transform of `buffer` through the build-time engine.
#[cfg(feature = "std")]
pub fn fft<T, B>(buffer: &mut B, direction: Direction) -> Result<(), FftError>
where
    T: EngineFloat,
    B: ComplexBuffer<T> + ?Sized,
{
    with_contiguous(buffer, |data| fft_contiguous(data, direction))
}

#[cfg(feature = "std")]
fn fft_contiguous<T: EngineFloat>(data: &mut [Complex<T>], direction: Direction) -> Result<(), FftError> {
    let n = data.len();
    if n == 0 {
        return Err(FftError::EmptyInput);
    }
    if let Some(kernel) = short_kernel::<T>(n) {
        kernel(data, 1, direction);
        scale_strided(data, 1, n, unitary_scale::<T>(n));
        return Ok(());
    }
    if cfg!(feature = "mixed-radix") {
        T::shared_transformers().current().fft(data, direction)
    } else {
        T::shared_decimation().fft(data, direction)
    }
}

/// [`fft`] with optional half-length rolls before and after.
#[cfg(feature = "std")]
pub fn fft_with_flags<T, B>(buffer: &mut B, flags: FftFlags) -> Result<(), FftError>
where
    T: EngineFloat,
    B: ComplexBuffer<T> + ?Sized,
{
    with_contiguous(buffer, |data| {
        if data.is_empty() {
            return Err(FftError::EmptyInput);
        }
        if flags.roll_before {
            unroll_half(data);
        }
        fft_contiguous(data, flags.direction)?;
        if flags.roll_after {
            roll_half(data);
        }
        Ok(())
    })
}

/// Out-of-place convenience wrapper around [`fft`].
#[cfg(feature = "std")]
pub fn fft_vec<T: EngineFloat>(input: &[Complex<T>], direction: Direction) -> Result<Vec<Complex<T>>, FftError> {
    let mut out = Vec::from(input);
    fft_contiguous(&mut out, direction)?;
    Ok(out)
}

/// Make the build-time engine ready for lengths up to `max_length`.
///
/// Returns `true` when new tables were built. Requests already covered by
/// the current tables are no-ops, and calls in flight keep using the tables
/// they started with.
#[cfg(feature = "std")]
pub fn initialize_fft<T: EngineFloat>(max_length: usize) -> Result<bool, FftError> {
    if cfg!(feature = "mixed-radix") {
        T::shared_transformers().initialize_fft(max_length)
    } else {
        T::shared_decimation().initialize_fft(max_length)
    }
}

/// Largest length the build-time engine currently accepts.
#[cfg(feature = "std")]
pub fn max_fft_length<T: EngineFloat>() -> usize {
    if cfg!(feature = "mixed-radix") {
        T::shared_transformers().current().max_fft_length()
    } else {
        T::shared_decimation().max_fft_length()
    }
}
