//! Basic usage example for phasor-fft
//!
//! Forward and reverse transforms through the facade, centered spectra,
//! strided columns, and the two engines used directly.

use phasor_fft::{
    active_engine, fft, fft_with_flags, ft, initialize_fft, max_fft_length, Complex64,
    DecimationEngine, Direction, FftFlags, PhasorTable, StridedSlice, TransformerSet,
};

fn fmt(data: &[Complex64]) -> Vec<String> {
    data.iter()
        .map(|c| format!("{:.2}{:+.2}i", c.re, c.im))
        .collect()
}

fn main() {
    println!("=== phasor-fft Basic Usage Example ===\n");
    println!("facade engine: {}\n", active_engine());

    // 1. Forward and reverse
    println!("1. Fast Fourier Transform");
    let mut data: Vec<Complex64> = (1..=8).map(|i| Complex64::new(i as f64, 0.0)).collect();
    println!("   Input: {:?}", data.iter().map(|c| c.re).collect::<Vec<_>>());
    fft(&mut data, Direction::Forward).unwrap();
    println!("   Forward: {:?}", fmt(&data));
    fft(&mut data, Direction::Reverse).unwrap();
    println!("   Reverse: {:?}", data.iter().map(|c| format!("{:.2}", c.re)).collect::<Vec<_>>());
    println!();

    // 2. Any length through the reference transform
    println!("2. Reference transform (length 6)");
    let mut odd: Vec<Complex64> = (0..6).map(|i| Complex64::new(i as f64, 0.0)).collect();
    ft(&mut odd, Direction::Forward).unwrap();
    println!("   {:?}\n", fmt(&odd));

    // 3. Centered spectrum
    println!("3. Centered spectrum");
    let mut pulse = vec![Complex64::new(1.0, 0.0); 8];
    fft_with_flags(&mut pulse, FftFlags::forward().with_roll_after()).unwrap();
    println!("   DC sits in the middle: {:?}\n", fmt(&pulse));

    // 4. Columns of a matrix
    println!("4. Strided columns");
    let cols = 3;
    let rows = 4;
    let mut matrix: Vec<Complex64> = (0..rows * cols).map(|i| Complex64::new(i as f64, 0.0)).collect();
    for col in 0..cols {
        let mut column = StridedSlice::with_len(&mut matrix[col..], cols, rows).unwrap();
        fft(&mut column, Direction::Forward).unwrap();
    }
    for row in matrix.chunks(cols) {
        println!("   {:?}", fmt(row));
    }
    println!();

    // 5. Larger transforms
    println!("5. Growing the shared engine");
    println!("   max length before: {}", max_fft_length::<f64>());
    initialize_fft::<f64>(1 << 18).unwrap();
    println!("   max length after:  {}", max_fft_length::<f64>());
    let mut long = vec![Complex64::new(1.0, 0.0); 1 << 18];
    fft(&mut long, Direction::Forward).unwrap();
    println!("   DC bin: {:.1}\n", long[0].re);

    // 6. Engines directly
    println!("6. Engines");
    let decimation = DecimationEngine::<f64>::new(1024).unwrap();
    let ternary = TransformerSet::new(PhasorTable::<f64>::build(3, 5).unwrap());
    let mut a = vec![Complex64::new(1.0, 0.0); 1024];
    let mut b = vec![Complex64::new(1.0, 0.0); 243];
    decimation.fft(&mut a, Direction::Forward).unwrap();
    ternary.fft(&mut b, Direction::Forward).unwrap();
    println!("   decimation 1024 DC: {:.3}", a[0].re);
    println!("   mixed-radix 243 DC: {:.3}", b[0].re);
}
