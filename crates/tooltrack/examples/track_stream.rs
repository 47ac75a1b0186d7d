//! Synthetic end-to-end run: a producer thread stands in for the capture
//! source, the ingest loop publishes incremental poses, and a consumer
//! thread polls the channel on its own timer, as a render loop would.
//!
//! Raise the level to `Debug` below for per-frame output.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::LevelFilter;
use nalgebra::{Point3, Vector3};
use tooltrack::{init_with_level, run_ingest_loop, FrameIngestor, ReducedQuat, SharedPoseChannel};

fn main() {
    init_with_level(LevelFilter::Info).expect("install logger");

    let channel = SharedPoseChannel::new();
    let mut ingestor = FrameIngestor::new(channel.clone());
    let (tx, rx) = mpsc::channel();

    // Markers fixed to the tool, in tool coordinates (millimeters).
    let markers = vec![
        Point3::new(13.68, 0.65, 45.07),
        Point3::new(28.15, 42.21, -31.08),
        Point3::new(50.67, -44.29, -28.88),
        Point3::new(-92.50, 1.43, 14.89),
    ];

    let producer = thread::spawn(move || {
        let step_rot = ReducedQuat::new(0.0, 0.01, 0.0).to_rotation();
        let step_t = Vector3::new(0.5, 0.0, 0.2);
        let mut frame = markers;
        for _ in 0..200 {
            tx.send(frame.clone()).unwrap();
            frame = frame
                .iter()
                .map(|p| Point3::from(step_rot * p.coords + step_t))
                .collect();
            thread::sleep(Duration::from_millis(5));
        }
        // Dropping the sender disconnects the source and ends the loop.
    });

    let consumer = {
        let channel = channel.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                thread::sleep(Duration::from_millis(10));
                let pose = channel.read_snapshot();
                println!(
                    "pose increment: t = ({:+.3}, {:+.3}, {:+.3})",
                    pose[(0, 3)],
                    pose[(1, 3)],
                    pose[(2, 3)]
                );
            }
        })
    };

    run_ingest_loop(rx, &mut ingestor);
    producer.join().expect("producer thread");
    consumer.join().expect("consumer thread");

    println!("final pose:\n{:.4}", channel.read_snapshot());
}
