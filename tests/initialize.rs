use std::sync::Arc;

use phasor_fft::{
    ceil_fft_length, fft, initialize_fft, max_fft_length, Complex32, Complex64,
    DecimationEngine, Direction, FftError, DEFAULT_MAX_FFT_LENGTH,
};

// The shared engine starts at the default maximum and grows on request.
#[test]
fn facade_grows_past_default_length() {
    assert_eq!(max_fft_length::<f64>(), DEFAULT_MAX_FFT_LENGTH);

    let too_long = DEFAULT_MAX_FFT_LENGTH * 2;
    let mut data = vec![Complex64::new(1.0, 0.0); too_long];
    assert_eq!(
        fft(&mut data, Direction::Forward),
        Err(FftError::SizeExceedsMaximum {
            size: too_long,
            max: DEFAULT_MAX_FFT_LENGTH
        })
    );

    assert_eq!(initialize_fft::<f64>(too_long), Ok(true));
    assert_eq!(initialize_fft::<f64>(too_long), Ok(false));
    assert_eq!(initialize_fft::<f64>(1000), Ok(false));
    assert_eq!(max_fft_length::<f64>(), too_long);

    fft(&mut data, Direction::Forward).unwrap();
    let dc = (too_long as f64).sqrt();
    assert!((data[0].re - dc).abs() < 1e-6);
}

// Scalar types keep independent engines.
#[test]
fn scalar_types_have_separate_engines() {
    assert_eq!(initialize_fft::<f32>(DEFAULT_MAX_FFT_LENGTH), Ok(false));
    assert_eq!(initialize_fft::<f32>(100_000), Ok(true));
    assert_eq!(max_fft_length::<f32>(), 131072);
    let mut data = vec![Complex32::new(0.0, 1.0); 131072];
    fft(&mut data, Direction::Reverse).unwrap();
}

#[test]
fn same_length_keeps_the_same_tables() {
    let engine = DecimationEngine::<f64>::with_processors(4096, 1).unwrap();
    let before = engine.config();
    for _ in 0..3 {
        assert_eq!(engine.initialize_fft(4096), Ok(false));
        assert_eq!(engine.initialize_fft(3000), Ok(false));
    }
    assert!(Arc::ptr_eq(&before, &engine.config()));
}

// Snapshots taken before a swap stay valid and keep their size.
#[test]
fn inflight_snapshot_survives_swap() {
    let engine = DecimationEngine::<f64>::with_processors(2048, 1).unwrap();
    let snapshot = engine.config();
    assert_eq!(engine.initialize_fft(1 << 15), Ok(true));
    assert_eq!(snapshot.max_fft_length(), 2048);
    assert!(snapshot.level(2048).is_some());
    assert_eq!(engine.config().max_fft_length(), 1 << 15);
}

#[test]
fn concurrent_initializers_agree() {
    let engine = Arc::new(DecimationEngine::<f32>::with_processors(1024, 2).unwrap());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.initialize_fft(1 << 14).unwrap())
        })
        .collect();
    let rebuilt = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&r| r)
        .count();
    assert_eq!(rebuilt, 1);
    assert_eq!(engine.max_fft_length(), 1 << 14);
}

#[test]
fn ceil_fft_length_edges() {
    assert_eq!(ceil_fft_length(0), Ok(1));
    assert_eq!(ceil_fft_length(1), Ok(1));
    assert_eq!(ceil_fft_length(65536), Ok(65536));
    assert_eq!(ceil_fft_length(65537), Ok(131072));
    let top = 1usize << (usize::BITS - 1);
    assert_eq!(ceil_fft_length(top), Ok(top));
    assert_eq!(
        ceil_fft_length(top + 1),
        Err(FftError::LengthOverflow { requested: top + 1 })
    );
    assert_eq!(
        initialize_fft::<f64>(top + 1),
        Err(FftError::LengthOverflow { requested: top + 1 })
    );
}
