//! Recursive mixed-radix engine over a shared [`PhasorTable`].
//!
//! A length `N` is split as `N1·N2` with `N1` the first of 8, 4 or the table
//! base that divides it. The `N1` interleaved sub-sequences are transformed
//! recursively (in place, via strides), multiplied by twiddles read from the
//! table, finished with length-`N1` short kernels and transposed into natural
//! order through the transformer's scratch buffer.
//!
//! A [`Transformer`] is single-threaded state. [`TransformerSet`] holds one
//! per CPU behind mutexes; callers spin over `try_lock` until they claim one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, TryLockError};
use std::vec::Vec;

use crate::decimation::DEFAULT_FFT_ORDER;
use crate::fft::{Direction, FftError};
use crate::fft_kernels::{is_short_length, scale_strided, short_kernel, unitary_scale, ShortKernel};
use crate::num::{Complex, Float};
use crate::phasors::PhasorTable;
use crate::pool::default_processor_count;

pub struct Transformer<T: Float> {
    phasors: Arc<PhasorTable<T>>,
    scratch: Vec<Complex<T>>,
    /// Nesting depth of the call in progress; only depth 0 normalizes.
    recursion_level: usize,
}

impl<T: Float> Transformer<T> {
    pub fn new(phasors: Arc<PhasorTable<T>>) -> Self {
        Self {
            phasors,
            scratch: Vec::new(),
            recursion_level: 0,
        }
    }

    pub fn phasors(&self) -> &Arc<PhasorTable<T>> {
        &self.phasors
    }

    pub fn max_fft_length(&self) -> usize {
        self.phasors.max_fft_length()
    }

    pub fn recursion_level(&self) -> usize {
        self.recursion_level
    }

    /// Whether `size` can be transformed with this transformer's table.
    pub fn supports_length(&self, size: usize) -> bool {
        self.check_length(size).is_ok()
    }

    pub fn check_length(&self, size: usize) -> Result<(), FftError> {
        check_length(&self.phasors, size)
    }

    /// In-place transform of `data`, scaled by `1/√N`.
    pub fn fft(&mut self, data: &mut [Complex<T>], direction: Direction) -> Result<(), FftError> {
        let size = data.len();
        self.check_length(size)?;
        if self.scratch.len() < size {
            self.scratch.resize(size, Complex::zero());
        }
        self.recursion_level = 0;
        self.transform(data, 0, 1, size, direction)
    }

    /// Radix for the outer split of `size` and its kernel.
    fn split(&self, size: usize) -> Option<(usize, ShortKernel<T>)> {
        let radix = split_radix(self.phasors.base(), size)?;
        short_kernel::<T>(radix).map(|kernel| (radix, kernel))
    }

    /// Transform the `size` samples at `offset + i·stride`.
    fn transform(
        &mut self,
        data: &mut [Complex<T>],
        offset: usize,
        stride: usize,
        size: usize,
        direction: Direction,
    ) -> Result<(), FftError> {
        if size == 1 {
            return Ok(());
        }
        if let Some(kernel) = short_kernel::<T>(size) {
            kernel(&mut data[offset..], stride, direction);
            self.normalize_top_level(data, offset, stride, size);
            return Ok(());
        }
        let (n1, kernel) = self
            .split(size)
            .ok_or(FftError::UnsupportedLength { size })?;
        let n2 = size / n1;

        self.recursion_level += 1;
        // rows: x[r + n1·c] for fixed r
        for row in 0..n1 {
            self.transform(data, offset + row * stride, stride * n1, n2, direction)?;
        }

        let step = self.phasors.phasor_step_for_length(size)?;
        for row in 1..n1 {
            for col in 1..n2 {
                let w = self.phasors.get(row * col * step);
                let idx = offset + (row + n1 * col) * stride;
                data[idx] = match direction {
                    Direction::Forward => data[idx].mul(w),
                    Direction::Reverse => data[idx].mul_conj(w),
                };
            }
        }

        for col in 0..n2 {
            kernel(&mut data[offset + n1 * col * stride..], stride, direction);
        }
        self.recursion_level -= 1;

        // out[n2·k1 + k2] = in[k1 + n1·k2]
        for k1 in 0..n1 {
            for k2 in 0..n2 {
                self.scratch[n2 * k1 + k2] = data[offset + (k1 + n1 * k2) * stride];
            }
        }
        for (i, value) in self.scratch[..size].iter().enumerate() {
            data[offset + i * stride] = *value;
        }
        self.normalize_top_level(data, offset, stride, size);
        Ok(())
    }

    fn normalize_top_level(&self, data: &mut [Complex<T>], offset: usize, stride: usize, size: usize) {
        if self.recursion_level == 0 {
            scale_strided(&mut data[offset..], stride, size, unitary_scale::<T>(size));
        }
    }
}

/// First of 8, 4 and `base` that splits `size` into two factors.
fn split_radix(base: usize, size: usize) -> Option<usize> {
    [8, 4, base]
        .into_iter()
        .find(|&radix| size > radix && size % radix == 0)
}

/// Whether the recursion can take `size` all the way down to short kernels.
fn check_length<T: Float>(phasors: &PhasorTable<T>, size: usize) -> Result<(), FftError> {
    if size == 0 {
        return Err(FftError::EmptyInput);
    }
    let max = phasors.max_fft_length();
    if size > max {
        return Err(FftError::SizeExceedsMaximum { size, max });
    }
    if size == 1 || is_short_length(size) {
        return Ok(());
    }
    if max % size != 0 {
        return Err(FftError::UnsupportedLength { size });
    }
    let mut rest = size;
    while rest > 1 && !is_short_length(rest) {
        match split_radix(phasors.base(), rest) {
            Some(radix) => rest /= radix,
            None => return Err(FftError::UnsupportedLength { size }),
        }
    }
    Ok(())
}

/// One [`Transformer`] per worker over a single shared table.
pub struct TransformerSet<T: Float> {
    phasors: Arc<PhasorTable<T>>,
    transformers: Vec<Mutex<Transformer<T>>>,
    /// Where the next caller starts scanning, to spread contention.
    cursor: AtomicUsize,
}

impl<T: Float> TransformerSet<T> {
    /// Set sized by [`default_processor_count`].
    pub fn new(phasors: PhasorTable<T>) -> Self {
        Self::with_count(phasors, default_processor_count())
    }

    pub fn with_count(phasors: PhasorTable<T>, count: usize) -> Self {
        let phasors = Arc::new(phasors);
        let transformers = (0..count)
            .map(|_| Mutex::new(Transformer::new(Arc::clone(&phasors))))
            .collect();
        engine_debug!(
            "transformer set: {} transformers, base {}, max length {}",
            count,
            phasors.base(),
            phasors.max_fft_length()
        );
        Self {
            phasors,
            transformers,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Set whose table covers at least `min_length` with powers of `base`.
    pub fn with_capacity(base: usize, min_length: usize) -> Result<Self, FftError> {
        Ok(Self::new(PhasorTable::for_length(base, min_length)?))
    }

    pub fn phasors(&self) -> &PhasorTable<T> {
        &self.phasors
    }

    pub fn max_fft_length(&self) -> usize {
        self.phasors.max_fft_length()
    }

    pub fn transformer_count(&self) -> usize {
        self.transformers.len()
    }

    /// False for an empty set, which cannot transform anything.
    pub fn supports_length(&self, size: usize) -> bool {
        !self.transformers.is_empty() && check_length(&self.phasors, size).is_ok()
    }

    /// In-place transform on whichever transformer is free first.
    pub fn fft(&self, data: &mut [Complex<T>], direction: Direction) -> Result<(), FftError> {
        let count = self.transformers.len();
        if count == 0 {
            return Err(FftError::EmptyPool);
        }
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % count;
        loop {
            for i in 0..count {
                let slot = &self.transformers[(start + i) % count];
                let claimed = match slot.try_lock() {
                    Ok(guard) => Some(guard),
                    Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
                    Err(TryLockError::WouldBlock) => None,
                };
                if let Some(mut transformer) = claimed {
                    return transformer.fft(data, direction);
                }
                std::hint::spin_loop();
            }
            std::thread::yield_now();
        }
    }
}

/// Process-wide transformer set that can be swapped for a larger one.
pub struct SharedTransformers<T: Float> {
    current: Mutex<Arc<TransformerSet<T>>>,
    init_lock: Mutex<()>,
}

impl<T: Float> SharedTransformers<T> {
    pub fn new(set: TransformerSet<T>) -> Self {
        Self {
            current: Mutex::new(Arc::new(set)),
            init_lock: Mutex::new(()),
        }
    }

    pub(crate) fn with_default_length() -> Self {
        Self::new(TransformerSet::new(PhasorTable::binary(DEFAULT_FFT_ORDER)))
    }

    /// The set in use right now; callers keep it alive for their call.
    pub fn current(&self) -> Arc<TransformerSet<T>> {
        Arc::clone(&self.current.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the set with one covering `max_length` in the same base, unless
    /// the current one already does.
    pub fn initialize_fft(&self, max_length: usize) -> Result<bool, FftError> {
        let _building = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.current();
        let base = current.phasors().base();
        let wanted = current.phasors().ceil_length(max_length)?;
        if current.max_fft_length() >= wanted {
            return Ok(false);
        }
        let fresh = TransformerSet::with_count(
            PhasorTable::for_length(base, wanted)?,
            current.transformer_count(),
        );
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(fresh);
        engine_debug!("mixed-radix engine now accepts lengths up to {}", wanted);
        Ok(true)
    }
}
