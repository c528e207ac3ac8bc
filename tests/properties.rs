#![cfg(feature = "internal-tests")]

use phasor_fft::{
    fft, ft, Complex64, DecimationEngine, Direction, PhasorTable, TransformerSet,
};
use proptest::prelude::*;

fn complex_vec(len: usize) -> impl Strategy<Value = Vec<Complex64>> {
    proptest::collection::vec((-100.0f64..100.0, -100.0f64..100.0), len)
        .prop_map(|pairs| pairs.into_iter().map(|(re, im)| Complex64::new(re, im)).collect())
}

fn pow2_signal() -> impl Strategy<Value = Vec<Complex64>> {
    (1u32..=11).prop_flat_map(|shift| complex_vec(1usize << shift))
}

fn pow3_signal() -> impl Strategy<Value = Vec<Complex64>> {
    (1u32..=6).prop_flat_map(|order| complex_vec(3usize.pow(order)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_facade_roundtrip(signal in pow2_signal()) {
        let mut data = signal.clone();
        fft(&mut data, Direction::Forward).unwrap();
        fft(&mut data, Direction::Reverse).unwrap();
        for (a, b) in data.iter().zip(signal.iter()) {
            prop_assert!((a.re - b.re).abs() < 1e-8);
            prop_assert!((a.im - b.im).abs() < 1e-8);
        }
    }

    #[test]
    fn prop_decimation_matches_reference(signal in pow2_signal(), reverse in any::<bool>()) {
        let direction = if reverse { Direction::Reverse } else { Direction::Forward };
        let engine = DecimationEngine::<f64>::with_processors(2048, 1).unwrap();
        let mut fast = signal.clone();
        engine.fft(&mut fast, direction).unwrap();
        let mut slow = signal;
        ft(&mut slow, direction).unwrap();
        for (a, b) in fast.iter().zip(slow.iter()) {
            prop_assert!((a.re - b.re).abs() < 1e-7);
            prop_assert!((a.im - b.im).abs() < 1e-7);
        }
    }

    #[test]
    fn prop_ternary_matches_reference(signal in pow3_signal(), reverse in any::<bool>()) {
        let direction = if reverse { Direction::Reverse } else { Direction::Forward };
        let set = TransformerSet::with_count(PhasorTable::<f64>::build(3, 6).unwrap(), 1);
        let mut fast = signal.clone();
        set.fft(&mut fast, direction).unwrap();
        let mut slow = signal;
        ft(&mut slow, direction).unwrap();
        for (a, b) in fast.iter().zip(slow.iter()) {
            prop_assert!((a.re - b.re).abs() < 1e-7);
            prop_assert!((a.im - b.im).abs() < 1e-7);
        }
    }

    #[test]
    fn prop_linearity(a in complex_vec(256), b in complex_vec(256), k in -4.0f64..4.0) {
        let combined: Vec<Complex64> = a.iter().zip(b.iter()).map(|(x, y)| x.scale(k).add(*y)).collect();
        let mut fa = a;
        let mut fb = b;
        let mut fc = combined;
        fft(&mut fa, Direction::Forward).unwrap();
        fft(&mut fb, Direction::Forward).unwrap();
        fft(&mut fc, Direction::Forward).unwrap();
        for ((x, y), z) in fa.iter().zip(fb.iter()).zip(fc.iter()) {
            let expected = x.scale(k).add(*y);
            prop_assert!((expected.re - z.re).abs() < 1e-8);
            prop_assert!((expected.im - z.im).abs() < 1e-8);
        }
    }
}
