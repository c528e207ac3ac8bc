use phasor_fft::{
    fft, Complex32, Complex64, DecimationEngine, Direction, PhasorTable, TransformerSet,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_f64(n: usize, seed: u64) -> Vec<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect()
}

fn max_error(a: &[Complex64], b: &[Complex64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x.re - y.re).abs().max((x.im - y.im).abs()))
        .fold(0.0, f64::max)
}

// Reverse after forward must restore the input on the facade.
#[test]
fn facade_roundtrip_f64() {
    for &n in &[2usize, 4, 8, 16, 256, 1024, 4096, 65536] {
        let orig = random_f64(n, n as u64);
        let mut data = orig.clone();
        fft(&mut data, Direction::Forward).unwrap();
        fft(&mut data, Direction::Reverse).unwrap();
        assert!(max_error(&data, &orig) < 1e-10, "n = {}", n);
    }
}

#[test]
fn facade_roundtrip_f32() {
    let mut rng = StdRng::seed_from_u64(7);
    let orig: Vec<Complex32> = (0..2048)
        .map(|_| Complex32::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let mut data = orig.clone();
    fft(&mut data, Direction::Forward).unwrap();
    fft(&mut data, Direction::Reverse).unwrap();
    for (a, b) in data.iter().zip(orig.iter()) {
        assert!((a.re - b.re).abs() < 1e-4, "re: {} vs {}", a.re, b.re);
        assert!((a.im - b.im).abs() < 1e-4, "im: {} vs {}", a.im, b.im);
    }
}

// Reverse first, forward second works just as well.
#[test]
fn decimation_roundtrip_reverse_first() {
    let engine = DecimationEngine::<f64>::with_processors(1 << 14, 2).unwrap();
    for shift in 1..=14 {
        let n = 1usize << shift;
        let orig = random_f64(n, 100 + shift as u64);
        let mut data = orig.clone();
        engine.fft(&mut data, Direction::Reverse).unwrap();
        engine.fft(&mut data, Direction::Forward).unwrap();
        assert!(max_error(&data, &orig) < 1e-10, "n = {}", n);
    }
}

#[test]
fn mixed_radix_roundtrip_both_bases() {
    let binary = TransformerSet::with_count(PhasorTable::<f64>::build(2, 12).unwrap(), 2);
    for shift in 0..=12 {
        let n = 1usize << shift;
        let orig = random_f64(n, 200 + shift as u64);
        let mut data = orig.clone();
        binary.fft(&mut data, Direction::Forward).unwrap();
        binary.fft(&mut data, Direction::Reverse).unwrap();
        assert!(max_error(&data, &orig) < 1e-10, "n = {}", n);
    }

    let ternary = TransformerSet::with_count(PhasorTable::<f64>::build(3, 7).unwrap(), 2);
    for order in 0..=7 {
        let n = 3usize.pow(order);
        let orig = random_f64(n, 300 + order as u64);
        let mut data = orig.clone();
        ternary.fft(&mut data, Direction::Forward).unwrap();
        ternary.fft(&mut data, Direction::Reverse).unwrap();
        assert!(max_error(&data, &orig) < 1e-10, "n = {}", n);
    }
}

// Parseval: the unitary scaling preserves energy.
#[test]
fn energy_is_preserved() {
    let orig = random_f64(4096, 11);
    let energy = |v: &[Complex64]| v.iter().map(|c| c.norm_sqr()).sum::<f64>();
    let mut data = orig.clone();
    fft(&mut data, Direction::Forward).unwrap();
    assert!((energy(&data) - energy(&orig)).abs() < 1e-8 * energy(&orig));
}
