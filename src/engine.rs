//! Threaded simulation engine.
//!
//! Two threads of control touch the locus collection: the caller's input
//! thread (edits, snapshots) and the loop thread spawned by
//! [`SimulationEngine::start`]. Each step copies the collection under the
//! lock, computes forces on the copy with the lock released, then re-takes
//! the lock for integration and boundary handling. Structural edits from the
//! input thread take the same lock, so they can land between those two
//! phases but never inside one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use glam::DVec2;
use log::{debug, error, info};
use parking_lot::{Mutex, RwLock};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::SimulationConfig,
    core::{locus::Locus, snapshot::FrameSnapshot},
    dynamics::forces::ForceField,
    error::{EngineError, Result},
    utils::{
        logging::{self, warn_if_step_budget_exceeded},
        profiling::{ScopedTimer, StepProfiler},
    },
    world::{LocusWorld, StepMetrics},
};

/// Name given to the loop thread.
pub const SIMULATION_THREAD_NAME: &str = "locus-simulation";

/// Hook the loop calls once per step, after boundary handling.
///
/// Implementations should only schedule a redraw; the renderer pulls
/// [`SimulationEngine::snapshot`] itself.
pub trait RefreshSink: Send + Sync {
    fn request_refresh(&self, step: u64);
}

impl<F> RefreshSink for F
where
    F: Fn(u64) + Send + Sync,
{
    fn request_refresh(&self, step: u64) {
        self(step)
    }
}

/// Sink for headless use.
#[derive(Debug, Default)]
pub struct NoopRefresh;

impl RefreshSink for NoopRefresh {
    fn request_refresh(&self, _step: u64) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Running,
}

/// State shared between the engine handle and its loop thread.
struct Shared {
    world: Mutex<LocusWorld>,
    config: RwLock<Arc<SimulationConfig>>,
    rng: Mutex<StdRng>,
    /// Held for a whole step so two steps never interleave their phases.
    stepping: Mutex<()>,
    refresh: Box<dyn RefreshSink>,
    last_metrics: Mutex<StepMetrics>,
    last_profile: Mutex<StepProfiler>,
}

impl Shared {
    fn step_once(&self) -> StepMetrics {
        let _stepping = self.stepping.lock();
        let started = Instant::now();
        let config = Arc::clone(&*self.config.read());
        let mut profile = StepProfiler::default();

        let snapshot = {
            let _timer = ScopedTimer::new(&mut profile.snapshot_time);
            let world = self.world.lock();
            if world.is_empty() {
                None
            } else {
                Some((world.loci().to_vec(), world.generation()))
            }
        };

        let metrics = match snapshot {
            Some((loci, generation)) => {
                let field = {
                    let _timer = ScopedTimer::new(&mut profile.force_time);
                    let _trace = logging::ScopedTimer::new("forces");
                    ForceField::compute(&loci, &config)
                };
                let _timer = ScopedTimer::new(&mut profile.integrate_time);
                self.world.lock().integrate(&field, generation, &config)
            }
            None => self.world.lock().record_empty_step(),
        };

        self.refresh.request_refresh(metrics.step);

        profile.total_step_time = started.elapsed();
        profile.locus_count = metrics.locus_count;
        profile.force_evaluations = metrics.force_evaluations;
        if warn_if_step_budget_exceeded(
            profile.total_step_time,
            config.step_budget_ms,
            metrics.locus_count,
        ) {
            profile.report();
        }

        *self.last_metrics.lock() = metrics;
        *self.last_profile.lock() = profile;
        metrics
    }
}

fn run_loop(shared: &Shared, token: &AtomicBool) {
    info!("simulation loop started");
    let mut steps = 0u64;
    while token.load(Ordering::Acquire) {
        shared.step_once();
        steps += 1;
        thread::yield_now();
    }
    info!("simulation loop stopped after {steps} steps");
}

/// Loop thread bookkeeping. Each run gets its own cancellation token so a
/// finishing loop can never observe the token of the run that replaced it.
#[derive(Default)]
struct Runner {
    token: Option<Arc<AtomicBool>>,
    handle: Option<JoinHandle<()>>,
}

impl Runner {
    fn is_running(&self) -> bool {
        let active = self
            .token
            .as_ref()
            .is_some_and(|token| token.load(Ordering::Acquire));
        let alive = self
            .handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished());
        active && alive
    }

    fn cancel(&self) {
        if let Some(token) = &self.token {
            token.store(false, Ordering::Release);
        }
    }

    /// Joins a loop that has been told to stop.
    fn reap(&mut self) {
        self.cancel();
        self.token = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("simulation thread panicked; its last step was discarded");
            }
        }
    }
}

/// Owns the locus collection and the loop thread that animates it.
pub struct SimulationEngine {
    shared: Arc<Shared>,
    runner: Mutex<Runner>,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_refresh(config, NoopRefresh)
    }

    pub fn with_refresh<R>(config: SimulationConfig, refresh: R) -> Result<Self>
    where
        R: RefreshSink + 'static,
    {
        config.validate()?;
        let rng = seeded_rng(config.seed);

        Ok(Self {
            shared: Arc::new(Shared {
                world: Mutex::new(LocusWorld::new()),
                config: RwLock::new(Arc::new(config)),
                rng: Mutex::new(rng),
                stepping: Mutex::new(()),
                refresh: Box::new(refresh),
                last_metrics: Mutex::new(StepMetrics::default()),
                last_profile: Mutex::new(StepProfiler::default()),
            }),
            runner: Mutex::new(Runner::default()),
        })
    }

    /// Spawns the loop thread. No-op while already running.
    ///
    /// A loop that was stopped but is still finishing its last step is joined
    /// first, so at most one loop thread exists at a time.
    pub fn start(&self) -> Result<()> {
        let mut runner = self.runner.lock();
        if runner.is_running() {
            return Ok(());
        }
        runner.reap();

        let token = Arc::new(AtomicBool::new(true));
        let shared = Arc::clone(&self.shared);
        let loop_token = Arc::clone(&token);
        let handle = thread::Builder::new()
            .name(SIMULATION_THREAD_NAME.to_string())
            .spawn(move || run_loop(&shared, &loop_token))
            .map_err(EngineError::ThreadSpawn)?;

        runner.token = Some(token);
        runner.handle = Some(handle);
        Ok(())
    }

    /// Asks the loop to exit at the top of its next iteration.
    ///
    /// Returns immediately; an in-flight step still completes.
    pub fn stop(&self) {
        self.runner.lock().cancel();
    }

    /// Stops the loop and blocks until its thread has exited.
    pub fn stop_and_wait(&self) {
        self.runner.lock().reap();
    }

    pub fn state(&self) -> EngineState {
        if self.runner.lock().is_running() {
            EngineState::Running
        } else {
            EngineState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == EngineState::Running
    }

    /// Runs one step on the calling thread while stopped.
    ///
    /// While the loop is running this does not step and returns the metrics of
    /// the loop's latest step instead.
    pub fn step(&self) -> StepMetrics {
        if self.is_running() {
            debug!("manual step ignored while the simulation loop is running");
            return self.last_metrics();
        }
        self.shared.step_once()
    }

    /// Adds a locus at a click position, drawing mass and velocity from the
    /// configured classes. Returns its index.
    pub fn add_particle(&self, x: f64, y: f64) -> Result<usize> {
        let config = self.config();
        let mut rng = self.shared.rng.lock();
        let mut world = self.shared.world.lock();
        let as_anchor = config.first_is_anchor && world.is_empty();
        let locus = Locus::spawn(DVec2::new(x, y), as_anchor, &config, &mut *rng)?;
        Ok(world.push(locus))
    }

    /// Adds a fully specified locus. Returns its index.
    ///
    /// The locus is rebuilt with the engine's time step, so a locus made for a
    /// different `dt` still integrates correctly.
    pub fn add_locus(&self, locus: Locus) -> Result<usize> {
        let locus = locus.with_time_step(self.config().time_step)?;
        Ok(self.shared.world.lock().push(locus))
    }

    pub fn remove_last(&self) -> Option<Locus> {
        self.shared.world.lock().pop()
    }

    pub fn remove_at(&self, index: usize) -> Option<Locus> {
        self.shared.world.lock().remove(index)
    }

    pub fn clear(&self) {
        self.shared.world.lock().clear();
    }

    /// Drag edit of an existing locus. Returns false if the index is gone.
    pub fn set_position(&self, index: usize, x: f64, y: f64) -> bool {
        self.shared
            .world
            .lock()
            .set_position(index, DVec2::new(x, y))
    }

    /// Index of the locus nearest `(x, y)` within the configured pick radius.
    pub fn pick(&self, x: f64, y: f64) -> Option<usize> {
        let radius = self.config().pick_radius;
        self.shared.world.lock().pick(DVec2::new(x, y), radius)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let config = self.config();
        self.shared.world.lock().frame(&config)
    }

    pub fn len(&self) -> usize {
        self.shared.world.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.world.lock().is_empty()
    }

    pub fn config(&self) -> Arc<SimulationConfig> {
        Arc::clone(&*self.shared.config.read())
    }

    /// Replaces the configuration; the loop picks it up on its next step.
    ///
    /// The time step is fixed for the engine's lifetime because every locus
    /// caches `dt / mass`.
    pub fn set_config(&self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        let mut slot = self.shared.config.write();
        if slot.time_step != config.time_step {
            return Err(EngineError::TimeStepChanged {
                current: slot.time_step,
                requested: config.time_step,
            });
        }
        if config.seed.is_some() && config.seed != slot.seed {
            *self.shared.rng.lock() = seeded_rng(config.seed);
        }
        debug!(
            "configuration replaced: {:?} interaction, {:?} boundary",
            config.interaction, config.boundary
        );
        *slot = Arc::new(config);
        Ok(())
    }

    pub fn last_metrics(&self) -> StepMetrics {
        *self.shared.last_metrics.lock()
    }

    pub fn last_profile(&self) -> StepProfiler {
        *self.shared.last_profile.lock()
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        self.runner.get_mut().reap();
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
