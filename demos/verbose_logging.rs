//! Demonstrates enabling verbose logging for phasor-fft.
use phasor_fft::{fft, initialize_fft, Complex32, DecimationEngine, Direction};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let engine = DecimationEngine::<f32>::with_processors(4096, 1).unwrap();
    engine.initialize_fft(1 << 15).unwrap();

    let mut data = vec![Complex32::new(1.0, 0.0); 1 << 15];
    engine.fft(&mut data, Direction::Forward).unwrap();

    initialize_fft::<f32>(1 << 17).unwrap();
    let mut data = vec![Complex32::new(1.0, 0.0); 1 << 17];
    fft(&mut data, Direction::Forward).unwrap();
}
