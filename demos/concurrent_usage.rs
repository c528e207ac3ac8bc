//! Many threads sharing one engine and one set of tables.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use phasor_fft::{fft, set_processor_count, Complex32, DecimationEngine, Direction};

fn main() {
    // four processors for engines created from now on
    set_processor_count(4);
    let engine = Arc::new(DecimationEngine::<f32>::new(1 << 16).unwrap());
    println!("engine processors: {}", engine.processor_count());

    let start = Instant::now();
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut data: Vec<Complex32> = (0..1 << 14)
                    .map(|i| Complex32::new(((i * (t + 1)) % 97) as f32, 0.0))
                    .collect();
                for _ in 0..50 {
                    engine.fft(&mut data, Direction::Forward).unwrap();
                    engine.fft(&mut data, Direction::Reverse).unwrap();
                }
                data[1].re
            })
        })
        .collect();
    for (t, h) in handles.into_iter().enumerate() {
        println!("thread {} sample[1] = {:.3}", t, h.join().unwrap());
    }
    println!("8 threads x 100 transforms: {:?}", start.elapsed());

    // the shared facade engine is safe to call from anywhere
    let results: Vec<f32> = thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut data = vec![Complex32::new(1.0, 0.0); 4096];
                    fft(&mut data, Direction::Forward).unwrap();
                    data[0].re
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });
    println!("facade DC bins: {:?}", results);
}
