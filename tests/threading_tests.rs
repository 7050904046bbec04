use locus_engine::{LocusWorld, SimulationConfig, SimulationEngine};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;

#[test]
fn test_engine_and_world_are_sync_and_send() {
    fn assert_sync_send<T: Sync + Send>() {}
    assert_sync_send::<SimulationEngine>();
    assert_sync_send::<LocusWorld>();
}

#[test]
fn test_shared_world_across_threads() {
    let config = SimulationConfig {
        time_step: 1e-3,
        ..SimulationConfig::default()
    };
    let world = Arc::new(Mutex::new(LocusWorld::new()));

    let mut handles = vec![];
    for i in 0..4 {
        let world_clone = Arc::clone(&world);
        let config = config.clone();
        let handle = thread::spawn(move || {
            let mut world = world_clone.lock();
            world.push(
                locus_engine::Locus::at_rest(
                    locus_engine::DVec2::new(100.0 + i as f64 * 50.0, 100.0),
                    1e12,
                    config.time_step,
                )
                .unwrap(),
            );
            world.step(&config);
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
    let world = world.lock();
    assert_eq!(world.len(), 4);
    assert_eq!(world.steps(), 4);
}

#[test]
fn test_engine_shared_across_input_threads() {
    let config = SimulationConfig {
        time_step: 1e-4,
        seed: Some(7),
        ..SimulationConfig::default()
    };
    let engine = Arc::new(SimulationEngine::new(config).unwrap());
    engine.start().unwrap();

    let mut handles = vec![];
    for t in 0..4 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for i in 0..25 {
                engine
                    .add_particle(100.0 + t as f64 * 200.0, 100.0 + i as f64 * 20.0)
                    .unwrap();
                let _ = engine.pick(100.0, 100.0);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
    engine.stop_and_wait();
    assert_eq!(engine.len(), 100);
}
