//! # phasor-fft - shared-table FFT engines for Rust
//!
//! Complex-to-complex Fourier transforms over precomputed twiddle ("phasor")
//! tables that many threads reuse safely.
//!
//! ## Features
//!
//! - **Two engines**: an iterative radix-2 decimation engine and a recursive
//!   mixed-radix engine (bases 2 and 3) with closed-form kernels for lengths
//!   2, 3, 4 and 8
//! - **Unitary scaling**: every transform is scaled by `1/√N`, so forward then
//!   reverse restores the input
//! - **Thread-safe reuse**: tables are immutable and shared; per-call scratch is
//!   stack-local or leased from a FIFO processor pool
//! - **Strided buffers** through the [`ComplexBuffer`] trait
//! - **`no_std` + `alloc`** for the kernels, tables and reference transform
//!
//! ## Cargo Features
//!
//! - `std` (default): processor pool, both engines, facade functions
//! - `mixed-radix`: route [`fft()`] through the recursive engine instead of the
//!   decimation engine
//! - `verbose-logging`: `log::debug!` events on table builds, swaps and pool
//!   waits
//! - `internal-tests`: property tests with `proptest`
//!
//! ## Example
//!
//! ```
//! use phasor_fft::{fft, Complex64, Direction};
//!
//! let mut data: Vec<Complex64> = (0..64)
//!     .map(|i| Complex64::expi(2.0 * std::f64::consts::PI * 5.0 * i as f64 / 64.0))
//!     .collect();
//! fft(&mut data, Direction::Forward).unwrap();
//! assert!((data[5].re - 8.0).abs() < 1e-9);
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

/// `log::debug!` when `verbose-logging` is enabled, nothing otherwise.
macro_rules! engine_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        log::debug!($($arg)*);
    };
}

/// Complex samples and the float abstraction
pub mod num;

/// Closed-form kernels for lengths 2, 3, 4 and 8
pub mod fft_kernels;

pub mod phasors;

/// O(N²) reference transform
pub mod dft;

pub mod fft;

#[cfg(feature = "std")]
pub mod pool;

#[cfg(feature = "std")]
pub mod mixed_radix;

#[cfg(feature = "std")]
pub mod decimation;

pub use fft::{ft, roll_half, unroll_half, ComplexBuffer, Direction, FftError, FftFlags, StridedSlice};
pub use num::{Complex, Complex32, Complex64, Float};
pub use phasors::PhasorTable;

#[cfg(feature = "std")]
pub use decimation::{ceil_fft_length, DecimationEngine, DEFAULT_MAX_FFT_LENGTH, LOCAL_BUFFER_BYTES};
#[cfg(feature = "std")]
pub use fft::{
    active_engine, fft, fft_vec, fft_with_flags, initialize_fft, max_fft_length, EngineFloat,
};
#[cfg(feature = "std")]
pub use mixed_radix::{Transformer, TransformerSet};
#[cfg(feature = "std")]
pub use pool::{default_processor_count, set_processor_count, ProcessorPool};
