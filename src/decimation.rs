//! Iterative radix-2 decimation-in-time engine.
//!
//! Power-of-two lengths only. Transforms small enough to fit
//! [`LOCAL_BUFFER_BYTES`] run lock-free on stack scratch with process-wide
//! tables; larger ones lease a [`DecimationProcessor`] from the engine's
//! [`ProcessorPool`]. The engine's tables can be swapped for larger ones at
//! any time with [`DecimationEngine::initialize_fft`] while other threads keep
//! transforming with the tables they already hold.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::vec;
use std::vec::Vec;

use crate::fft::{Direction, EngineFloat, FftError};
use crate::fft_kernels::{scale_strided, short_kernel, unitary_scale};
use crate::num::{Complex, Float};
use crate::pool::{default_processor_count, ProcessorPool};

/// Order of [`DEFAULT_MAX_FFT_LENGTH`].
pub const DEFAULT_FFT_ORDER: u32 = 16;

/// Length the shared engines are built for before any `initialize_fft` call.
pub const DEFAULT_MAX_FFT_LENGTH: usize = 1 << DEFAULT_FFT_ORDER;

/// Transforms whose samples fit in this many bytes take the lock-free path.
pub const LOCAL_BUFFER_BYTES: usize = 8192;

/// Stack scratch capacity: enough for the small path of any scalar type.
const LOCAL_SCRATCH_LEN: usize = LOCAL_BUFFER_BYTES / core::mem::size_of::<Complex<f32>>();

/// Smallest power of two `>= n`; `0` and `1` both map to `1`.
pub fn ceil_fft_length(n: usize) -> Result<usize, FftError> {
    if n <= 1 {
        return Ok(1);
    }
    n.checked_next_power_of_two()
        .ok_or(FftError::LengthOverflow { requested: n })
}

/// Largest length handled on the lock-free small path for `T`.
pub fn small_path_limit<T: Float>() -> usize {
    LOCAL_BUFFER_BYTES / core::mem::size_of::<Complex<T>>()
}

pub(crate) fn small_path_order<T: Float>() -> u32 {
    small_path_limit::<T>().trailing_zeros()
}

/// Tables for one power-of-two length.
#[derive(Clone, Debug)]
pub struct DecimationLevel<T: Float> {
    /// `exp(-2πi·j/len)` for `j < len/2`.
    twiddles: Vec<Complex<T>>,
    bit_reverse: Vec<usize>,
}

impl<T: Float> DecimationLevel<T> {
    pub fn len(&self) -> usize {
        self.bit_reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bit_reverse.is_empty()
    }

    pub fn twiddles(&self) -> &[Complex<T>] {
        &self.twiddles
    }

    pub fn bit_reverse(&self) -> &[usize] {
        &self.bit_reverse
    }
}

/// Twiddle and bit-reversal tables for every power of two up to a maximum.
#[derive(Clone, Debug)]
pub struct DecimationConfig<T: Float> {
    max_len: usize,
    levels: Vec<DecimationLevel<T>>,
}

impl<T: Float> DecimationConfig<T> {
    /// Tables for lengths up to `max_length` rounded up to a power of two.
    pub fn build(max_length: usize) -> Result<Self, FftError> {
        let len = ceil_fft_length(max_length)?;
        Ok(Self::with_order(len.trailing_zeros()))
    }

    pub(crate) fn with_order(order: u32) -> Self {
        let max_len = 1usize << order;
        let step = -2.0 * core::f64::consts::PI / max_len as f64;
        let mut twiddles: Vec<Complex<T>> = (0..max_len / 2)
            .map(|k| Complex::expi_f64(step * k as f64))
            .collect();

        let mut levels = Vec::with_capacity(order as usize + 1);
        for shift in (0..=order).rev() {
            let len = 1usize << shift;
            // each smaller table is every other entry of the larger one
            let halved = twiddles.iter().step_by(2).take(len / 4).copied().collect();
            levels.push(DecimationLevel {
                twiddles: core::mem::replace(&mut twiddles, halved),
                bit_reverse: bit_reversal_table(len),
            });
        }
        levels.reverse();
        engine_debug!("built decimation tables up to {}", max_len);
        Self { max_len, levels }
    }

    pub fn max_fft_length(&self) -> usize {
        self.max_len
    }

    /// Tables for `len`, if it is a power of two within range.
    pub fn level(&self, len: usize) -> Option<&DecimationLevel<T>> {
        if !len.is_power_of_two() {
            return None;
        }
        self.levels.get(len.trailing_zeros() as usize)
    }
}

fn bit_reversal_table(len: usize) -> Vec<usize> {
    let bits = len.trailing_zeros();
    if bits == 0 {
        return vec![0; len];
    }
    (0..len)
        .map(|i| i.reverse_bits() >> (usize::BITS - bits))
        .collect()
}

/// Scaled, reordered, butterflied transform of `data` using `level`.
///
/// The reverse direction reads its permuted input out of `scratch`, which
/// must hold at least `data.len()` samples; the forward direction ignores it.
fn transform<T: Float>(
    level: &DecimationLevel<T>,
    data: &mut [Complex<T>],
    scratch: &mut [Complex<T>],
    direction: Direction,
) {
    let n = data.len();
    debug_assert_eq!(level.len(), n);
    let scale = unitary_scale::<T>(n);
    let rev = &level.bit_reverse;

    match direction {
        Direction::Forward => {
            for j in 0..n {
                let k = rev[j];
                if k > j {
                    let a = data[j];
                    data[j] = data[k].scale(scale);
                    data[k] = a.scale(scale);
                } else if k == j {
                    data[j] = data[j].scale(scale);
                }
            }
        }
        Direction::Reverse => {
            // reversing the input index turns the forward kernel into the reverse one
            let scratch = &mut scratch[..n];
            for (dst, src) in scratch.iter_mut().zip(data.iter()) {
                *dst = src.scale(scale);
            }
            for (p, out) in data.iter_mut().enumerate() {
                *out = scratch[(n - rev[p]) & (n - 1)];
            }
        }
    }

    let tw = &level.twiddles;
    let mut half = 1;
    while half < n {
        let step = n / (2 * half);
        for start in (0..n).step_by(2 * half) {
            for j in 0..half {
                let w = tw[j * step];
                let u = data[start + j];
                let v = data[start + j + half].mul(w);
                data[start + j] = u.add(v);
                data[start + j + half] = u.sub(v);
            }
        }
        half <<= 1;
    }
}

/// Per-thread scratch for the pooled path.
#[derive(Debug)]
pub struct DecimationProcessor<T: Float> {
    scratch: Vec<Complex<T>>,
}

impl<T: Float> DecimationProcessor<T> {
    pub fn new() -> Self {
        Self {
            scratch: Vec::new(),
        }
    }

    pub fn scratch_len(&self) -> usize {
        self.scratch.len()
    }

    fn run(&mut self, level: &DecimationLevel<T>, data: &mut [Complex<T>], direction: Direction) {
        // only the reverse reorder reads through scratch
        if direction == Direction::Reverse && self.scratch.len() < data.len() {
            self.scratch.resize(data.len(), Complex::zero());
        }
        transform(level, data, &mut self.scratch, direction);
    }
}

impl<T: Float> Default for DecimationProcessor<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Power-of-two transforms of any size up to the current maximum.
pub struct DecimationEngine<T: Float> {
    config: Mutex<Arc<DecimationConfig<T>>>,
    /// Mirrors `config.max_fft_length()` so the small path can check it
    /// without locking.
    max_len: AtomicUsize,
    /// Serializes table rebuilds; readers only take `config`.
    init_lock: Mutex<()>,
    pool: ProcessorPool<DecimationProcessor<T>>,
}

impl<T: Float> DecimationEngine<T> {
    /// Engine for lengths up to `max_length`, one processor per CPU.
    pub fn new(max_length: usize) -> Result<Self, FftError> {
        Self::with_processors(max_length, default_processor_count())
    }

    pub fn with_processors(max_length: usize, processors: usize) -> Result<Self, FftError> {
        let config = DecimationConfig::build(max_length)?;
        Ok(Self::from_config(config, processors))
    }

    pub(crate) fn with_default_length() -> Self {
        Self::from_config(
            DecimationConfig::with_order(DEFAULT_FFT_ORDER),
            default_processor_count(),
        )
    }

    fn from_config(config: DecimationConfig<T>, processors: usize) -> Self {
        Self {
            max_len: AtomicUsize::new(config.max_fft_length()),
            config: Mutex::new(Arc::new(config)),
            init_lock: Mutex::new(()),
            pool: ProcessorPool::new(processors, |_| DecimationProcessor::new()),
        }
    }

    /// Snapshot of the tables in use right now.
    pub fn config(&self) -> Arc<DecimationConfig<T>> {
        Arc::clone(&self.config.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn max_fft_length(&self) -> usize {
        self.max_len.load(Ordering::Acquire)
    }

    pub fn processor_count(&self) -> usize {
        self.pool.processor_count()
    }

    /// Grow the tables to cover `max_length`. Returns `true` if they were
    /// rebuilt, `false` if the current ones already suffice.
    pub fn initialize_fft(&self, max_length: usize) -> Result<bool, FftError> {
        let len = ceil_fft_length(max_length)?;
        let _building = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.max_fft_length() >= len {
            return Ok(false);
        }
        let fresh = Arc::new(DecimationConfig::with_order(len.trailing_zeros()));
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = fresh;
        self.max_len.store(len, Ordering::Release);
        engine_debug!("decimation engine now accepts lengths up to {}", len);
        Ok(true)
    }

    /// In-place transform of a power-of-two length buffer.
    pub fn fft(&self, data: &mut [Complex<T>], direction: Direction) -> Result<(), FftError>
    where
        T: EngineFloat,
    {
        let n = data.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        if !n.is_power_of_two() {
            return Err(FftError::NotPowerOfTwo { size: n });
        }
        let max = self.max_fft_length();
        if n > max {
            return Err(FftError::SizeExceedsMaximum { size: n, max });
        }
        if n == 1 {
            return Ok(());
        }
        if let Some(kernel) = short_kernel::<T>(n) {
            kernel(data, 1, direction);
            scale_strided(data, 1, n, unitary_scale::<T>(n));
            return Ok(());
        }
        if n <= small_path_limit::<T>() {
            return fft_small(data, direction);
        }

        let config = self.config();
        let level = config.level(n).ok_or(FftError::SizeExceedsMaximum {
            size: n,
            max: config.max_fft_length(),
        })?;
        self.pool.perform(|processor| processor.run(level, data, direction))
    }
}

/// Lock-free path: shared static tables and stack scratch.
fn fft_small<T: EngineFloat>(data: &mut [Complex<T>], direction: Direction) -> Result<(), FftError> {
    let n = data.len();
    let tables = T::small_tables();
    let level = tables.level(n).ok_or(FftError::SizeExceedsMaximum {
        size: n,
        max: tables.max_fft_length(),
    })?;
    match direction {
        Direction::Forward => transform(level, data, &mut [], direction),
        Direction::Reverse => {
            let mut scratch = [Complex::<T>::zero(); LOCAL_SCRATCH_LEN];
            transform(level, data, &mut scratch, direction);
        }
    }
    Ok(())
}


#[cfg(all(feature = "internal-tests", test))]
mod proptests {
    use super::*;
    use proptest::prop_assert;
    use proptest::proptest;

    proptest! {
        #[test]
        fn prop_ceil_is_smallest_power_of_two(n in 2usize..(1usize << 40)) {
            let len = ceil_fft_length(n).unwrap();
            prop_assert!(len.is_power_of_two());
            prop_assert!(len >= n);
            prop_assert!(len / 2 < n);
        }

        #[test]
        fn prop_bit_reversal_is_an_involution(shift in 0u32..12) {
            let table = bit_reversal_table(1usize << shift);
            for (i, &r) in table.iter().enumerate() {
                prop_assert!(table[r] == i);
            }
        }
    }
}
