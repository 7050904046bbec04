use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use locus_engine::{
    BoundaryMode, DVec2, EngineError, EngineState, InteractionMode, Locus, SimulationConfig,
    SimulationEngine,
};

fn test_config() -> SimulationConfig {
    SimulationConfig {
        time_step: 1e-4,
        seed: Some(42),
        boundary: BoundaryMode::Bounce,
        ..SimulationConfig::default()
    }
}

fn counting_engine(config: SimulationConfig) -> (SimulationEngine, Arc<AtomicU64>) {
    let refreshes = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&refreshes);
    let engine = SimulationEngine::with_refresh(config, move |step: u64| {
        counter.store(step, Ordering::SeqCst);
    })
    .expect("valid config");
    (engine, refreshes)
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let mut config = test_config();
    config.bounds.height = -1.0;
    assert!(matches!(
        SimulationEngine::new(config),
        Err(EngineError::InvalidConfig(_))
    ));
}

#[test]
fn first_click_creates_a_resting_anchor() {
    let engine = SimulationEngine::new(test_config()).unwrap();
    let config = engine.config();

    assert_eq!(engine.add_particle(300.0, 200.0).unwrap(), 0);
    assert_eq!(engine.add_particle(400.0, 200.0).unwrap(), 1);
    assert_eq!(engine.add_particle(500.0, 200.0).unwrap(), 2);

    let frame = engine.snapshot();
    assert_eq!(frame.len(), 3);
    let anchor = frame.anchor().expect("index 0 is the anchor");
    assert_eq!(anchor.mass, config.masses.anchor());
    assert_eq!(anchor.velocity.length(), 0.0);

    let range = config.masses.ordinary();
    for view in &frame.loci[1..] {
        assert!(!view.is_anchor);
        assert!(view.mass >= range.min && view.mass <= range.max);
    }
}

#[test]
fn without_anchor_every_click_is_ordinary() {
    let mut config = test_config();
    config.first_is_anchor = false;
    let engine = SimulationEngine::new(config).unwrap();

    engine.add_particle(300.0, 200.0).unwrap();
    let frame = engine.snapshot();
    assert!(frame.anchor().is_none());
    assert!(frame.loci[0].mass < engine.config().masses.anchor());
}

#[test]
fn seeded_engines_create_identical_loci() {
    let a = SimulationEngine::new(test_config()).unwrap();
    let b = SimulationEngine::new(test_config()).unwrap();
    for i in 0..5 {
        a.add_particle(100.0 + i as f64 * 20.0, 100.0).unwrap();
        b.add_particle(100.0 + i as f64 * 20.0, 100.0).unwrap();
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn manual_step_on_empty_engine_still_refreshes() {
    let (engine, refreshes) = counting_engine(test_config());

    let metrics = engine.step();
    assert_eq!(metrics.step, 1);
    assert_eq!(metrics.force_evaluations, 0);
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);

    engine.add_particle(10.0, 10.0).unwrap();
    engine.add_particle(20.0, 20.0).unwrap();
    assert_eq!(engine.step().force_evaluations, 1);

    engine.clear();
    let metrics = engine.step();
    assert_eq!(metrics.step, 3);
    assert_eq!(metrics.locus_count, 0);
    assert_eq!(refreshes.load(Ordering::SeqCst), 3);
}

#[test]
fn start_stop_transitions() {
    let engine = SimulationEngine::new(test_config()).unwrap();
    assert_eq!(engine.state(), EngineState::Stopped);

    engine.stop();
    assert_eq!(engine.state(), EngineState::Stopped);

    engine.start().unwrap();
    engine.start().unwrap();
    assert_eq!(engine.state(), EngineState::Running);

    engine.stop_and_wait();
    assert_eq!(engine.state(), EngineState::Stopped);
}

#[test]
fn clear_while_running_empties_the_collection() {
    let (engine, refreshes) = counting_engine(test_config());
    for i in 0..8 {
        engine.add_particle(200.0 + i as f64 * 30.0, 300.0).unwrap();
    }

    engine.start().unwrap();
    assert!(wait_until(|| refreshes.load(Ordering::SeqCst) > 5));

    engine.clear();
    let seen = refreshes.load(Ordering::SeqCst);
    assert!(wait_until(|| refreshes.load(Ordering::SeqCst) >= seen + 3));

    assert!(engine.is_empty());
    assert!(engine.snapshot().is_empty());
    assert_eq!(engine.last_metrics().locus_count, 0);
    assert_eq!(engine.last_metrics().force_evaluations, 0);

    engine.stop_and_wait();
}

#[test]
fn restart_keeps_every_locus() {
    let (engine, refreshes) = counting_engine(test_config());
    for i in 0..6 {
        engine.add_particle(300.0 + i as f64 * 40.0, 200.0 + i as f64 * 10.0).unwrap();
    }

    engine.start().unwrap();
    assert!(wait_until(|| refreshes.load(Ordering::SeqCst) > 10));
    engine.stop();
    let at_stop = engine.len();

    engine.start().unwrap();
    let resumed = refreshes.load(Ordering::SeqCst);
    assert!(wait_until(|| refreshes.load(Ordering::SeqCst) > resumed + 10));
    engine.stop_and_wait();

    assert_eq!(at_stop, 6);
    assert_eq!(engine.len(), at_stop);
}

#[test]
fn config_changes_apply_on_the_next_step() {
    let engine = SimulationEngine::new(test_config()).unwrap();
    for i in 0..5 {
        engine.add_particle(100.0 + i as f64 * 50.0, 100.0).unwrap();
    }
    assert_eq!(engine.step().force_evaluations, 10);

    let mut config = (*engine.config()).clone();
    config.interaction = InteractionMode::SingleSource;
    engine.set_config(config).unwrap();
    assert_eq!(engine.step().force_evaluations, 4);
}

#[test]
fn time_step_is_fixed_for_the_engine_lifetime() {
    let engine = SimulationEngine::new(test_config()).unwrap();
    let mut config = (*engine.config()).clone();
    config.time_step *= 2.0;

    assert!(matches!(
        engine.set_config(config),
        Err(EngineError::TimeStepChanged { .. })
    ));
    assert_eq!(engine.config().time_step, 1e-4);
}

#[test]
fn editing_api_targets_the_picked_locus() {
    let engine = SimulationEngine::new(test_config()).unwrap();
    engine.add_particle(100.0, 100.0).unwrap();
    engine.add_particle(200.0, 100.0).unwrap();
    engine.add_particle(300.0, 100.0).unwrap();

    let picked = engine.pick(201.0, 101.0).expect("within pick radius");
    assert_eq!(picked, 1);
    assert!(engine.pick(250.0, 250.0).is_none());

    assert!(engine.set_position(picked, 220.0, 140.0));
    assert_eq!(engine.snapshot().loci[1].position.x, 220.0);
    assert!(!engine.set_position(9, 0.0, 0.0));

    let removed = engine.remove_at(picked).unwrap();
    assert_eq!(removed.position().y, 140.0);
    assert_eq!(engine.len(), 2);

    assert!(engine.remove_last().is_some());
    assert!(engine.remove_last().is_some());
    assert!(engine.remove_last().is_none());
}

#[test]
fn input_thread_edits_race_the_loop_safely() {
    let config = SimulationConfig {
        boundary: BoundaryMode::Cull,
        ..test_config()
    };
    let (engine, refreshes) = counting_engine(config);
    let engine = Arc::new(engine);
    engine.start().unwrap();

    let input = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for i in 0..400 {
                let x = 50.0 + (i % 40) as f64 * 25.0;
                let y = 50.0 + (i % 20) as f64 * 25.0;
                engine.add_particle(x, y).unwrap();
                if i % 3 == 0 {
                    engine.set_position(0, 640.0, 360.0);
                }
                if i % 7 == 0 {
                    engine.remove_last();
                }
                if i % 97 == 0 {
                    engine.clear();
                }
                let _ = engine.snapshot();
            }
        })
    };
    input.join().expect("input thread must not panic");

    let seen = refreshes.load(Ordering::SeqCst);
    assert!(wait_until(|| refreshes.load(Ordering::SeqCst) > seen + 2));
    engine.stop_and_wait();

    let frame = engine.snapshot();
    assert!(frame.len() <= 400);
    assert!(frame.loci.iter().all(|view| view.position.is_finite()));
}

#[test]
fn added_loci_integrate_with_the_engine_time_step() {
    let build = |dt: f64| {
        let engine = SimulationEngine::new(test_config()).unwrap();
        engine
            .add_locus(Locus::at_rest(DVec2::new(300.0, 300.0), 1e14, dt).unwrap())
            .unwrap();
        engine
            .add_locus(Locus::at_rest(DVec2::new(400.0, 300.0), 1e12, dt).unwrap())
            .unwrap();
        engine.step();
        engine.snapshot().loci[1].velocity
    };

    let native = build(1e-4);
    let foreign = build(1.0);
    assert!(native.x < 0.0);
    assert_eq!(foreign, native);
}

#[test]
fn manual_step_while_running_does_not_step_again() {
    let (engine, refreshes) = counting_engine(test_config());
    for i in 0..4 {
        engine.add_particle(300.0 + i as f64 * 50.0, 300.0).unwrap();
    }

    engine.start().unwrap();
    assert!(wait_until(|| refreshes.load(Ordering::SeqCst) > 5));
    let reported = engine.step();
    assert!(reported.step <= refreshes.load(Ordering::SeqCst));

    engine.stop_and_wait();
    let last = refreshes.load(Ordering::SeqCst);
    assert_eq!(engine.step().step, last + 1);
}
