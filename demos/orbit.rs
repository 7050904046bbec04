use locus_engine::*;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimulationConfig {
        time_step: 1e-4,
        seed: Some(2024),
        ..SimulationConfig::default()
    };
    let engine = SimulationEngine::with_refresh(config, |step: u64| {
        if step % 20_000 == 0 {
            println!("step {step}");
        }
    })?;

    engine.add_particle(640.0, 360.0)?;
    for i in 0..12 {
        let angle = i as f64 * std::f64::consts::TAU / 12.0;
        engine.add_particle(640.0 + angle.cos() * 150.0, 360.0 + angle.sin() * 150.0)?;
    }

    engine.start()?;
    thread::sleep(Duration::from_millis(500));
    if let Some(index) = engine.pick(790.0, 360.0) {
        engine.set_position(index, 800.0, 300.0);
    }
    engine.remove_last();
    thread::sleep(Duration::from_millis(500));
    engine.stop_and_wait();

    let frame = engine.snapshot();
    println!(
        "{} loci after {} steps, {} in view",
        frame.len(),
        frame.step,
        frame.visible().count()
    );
    if let Some(anchor) = frame.anchor() {
        println!("anchor at {:?}", anchor.position);
    }
    println!("last step profile: {:?}", engine.last_profile());
    Ok(())
}
