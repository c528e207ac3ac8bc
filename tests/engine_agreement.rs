use phasor_fft::dft::dft_unnormalized;
use phasor_fft::fft_kernels::{short_kernel, SHORT_LENGTHS};
use phasor_fft::{
    ft, Complex64, DecimationEngine, Direction, PhasorTable, TransformerSet,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random(n: usize, seed: u64) -> Vec<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Complex64::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)))
        .collect()
}

fn assert_close(a: &[Complex64], b: &[Complex64], tol: f64) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert!(
            (x.re - y.re).abs() < tol && (x.im - y.im).abs() < tol,
            "index {}: {:?} vs {:?}",
            i,
            x,
            y
        );
    }
}

// Short kernels with 1/√N scaling equal the reference transform.
#[test]
fn short_kernels_match_reference() {
    for &n in &SHORT_LENGTHS {
        for direction in [Direction::Forward, Direction::Reverse] {
            let input = random(n, n as u64);
            let mut expected = input.clone();
            ft(&mut expected, direction).unwrap();
            let mut got = input.clone();
            short_kernel::<f64>(n).unwrap()(&mut got, 1, direction);
            let scale = 1.0 / (n as f64).sqrt();
            for c in got.iter_mut() {
                *c = c.scale(scale);
            }
            assert_close(&got, &expected, 1e-12);
        }
    }
}

#[test]
fn both_engines_match_reference_and_each_other() {
    let decimation = DecimationEngine::<f64>::with_processors(2048, 2).unwrap();
    let mixed = TransformerSet::with_count(PhasorTable::<f64>::build(2, 11).unwrap(), 2);
    for &n in &[16usize, 32, 128, 512, 2048] {
        for direction in [Direction::Forward, Direction::Reverse] {
            let input = random(n, 1000 + n as u64);
            let mut reference = input.clone();
            ft(&mut reference, direction).unwrap();

            let mut a = input.clone();
            decimation.fft(&mut a, direction).unwrap();
            let mut b = input.clone();
            mixed.fft(&mut b, direction).unwrap();

            assert_close(&a, &reference, 1e-9);
            assert_close(&b, &reference, 1e-9);
            assert_close(&a, &b, 1e-9);
        }
    }
}

#[test]
fn radix_three_matches_unnormalized_reference() {
    let mixed = TransformerSet::with_count(PhasorTable::<f64>::build(3, 5).unwrap(), 1);
    let n = 243;
    let input = random(n, 9);
    let scale = 1.0 / (n as f64).sqrt();
    let expected: Vec<Complex64> = dft_unnormalized(&input, Direction::Forward)
        .into_iter()
        .map(|c| c.scale(scale))
        .collect();
    let mut got = input;
    mixed.fft(&mut got, Direction::Forward).unwrap();
    assert_close(&got, &expected, 1e-9);
}

// A table built for a larger maximum serves shorter lengths through its stride.
#[test]
fn shorter_lengths_use_the_same_table() {
    let mixed = TransformerSet::with_count(PhasorTable::<f64>::build(2, 14).unwrap(), 1);
    let input = random(64, 3);
    let mut expected = input.clone();
    ft(&mut expected, Direction::Forward).unwrap();
    let mut got = input;
    mixed.fft(&mut got, Direction::Forward).unwrap();
    assert_close(&got, &expected, 1e-10);
}
