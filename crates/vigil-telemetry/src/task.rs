//! Owned, cancellable simulation tasks
//!
//! Each periodic simulator runs as a tokio task owned by a [`SimulationHandle`].
//! The handle is held by the view that consumes the data; dropping the handle
//! cancels the task, so a torn-down view never leaves a timer behind.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use vigil_core::{Error, Result};

/// State advanced by a periodic timer
pub trait Simulation: Send + 'static {
    /// Value published to observers after every change
    type Snapshot: Clone + Send + Sync + 'static;

    /// Name used in logs
    fn name(&self) -> &str;

    /// Advance the simulation by one tick
    fn step(&mut self, rng: &mut StdRng);

    /// Copy the observable state
    fn snapshot(&self) -> Self::Snapshot;
}

/// Build the RNG for one simulation stream.
///
/// With a seed every stream gets its own deterministic sequence; without one
/// the RNG is seeded from the OS.
pub fn rng_for(seed: Option<u64>, stream: &str) -> StdRng {
    match seed {
        Some(seed) => {
            // FNV-1a over the stream name keeps streams sharing a seed apart
            let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
            for byte in stream.bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
            StdRng::seed_from_u64(seed ^ hash)
        }
        None => StdRng::from_entropy(),
    }
}

/// Owner of a running simulation task
pub struct SimulationHandle<S: Simulation> {
    name: String,
    period: Duration,
    state: Arc<Mutex<S>>,
    publisher: Arc<watch::Sender<S::Snapshot>>,
    ticks: Arc<AtomicU64>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl<S: Simulation> std::fmt::Debug for SimulationHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationHandle")
            .field("name", &self.name)
            .field("period", &self.period)
            .field("ticks", &self.ticks.load(Ordering::Relaxed))
            .field("running", &self.is_running())
            .finish()
    }
}

impl<S: Simulation> SimulationHandle<S> {
    /// Start ticking `simulation` every `period`.
    ///
    /// The first tick fires one full period after spawning. A zero period
    /// is rejected before any task starts. Must be called from within a
    /// tokio runtime.
    pub fn spawn(simulation: S, period: Duration, mut rng: StdRng) -> Result<Self> {
        let name = simulation.name().to_string();
        if period.is_zero() {
            return Err(Error::Config(format!(
                "{name} simulation period must be non-zero"
            )));
        }
        let (sender, _) = watch::channel(simulation.snapshot());
        let publisher = Arc::new(sender);
        let state = Arc::new(Mutex::new(simulation));
        let ticks = Arc::new(AtomicU64::new(0));
        let cancel = CancellationToken::new();

        let task = {
            let state = Arc::clone(&state);
            let publisher = Arc::clone(&publisher);
            let ticks = Arc::clone(&ticks);
            let cancel = cancel.clone();
            let name = name.clone();

            tokio::spawn(async move {
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = interval.tick() => {
                            let snapshot = {
                                let mut state = state.lock();
                                state.step(&mut rng);
                                state.snapshot()
                            };
                            let tick = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                            publisher.send_replace(snapshot);
                            debug!(simulation = %name, tick, "Simulation tick");
                        }
                    }
                }

                debug!(simulation = %name, "Simulation task stopped");
            })
        };

        info!(simulation = %name, period_ms = period.as_millis() as u64, "Simulation started");

        Ok(Self {
            name,
            period,
            state,
            publisher,
            ticks,
            cancel,
            task: Some(task),
        })
    }

    /// Simulation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Observe snapshots as they are published
    pub fn subscribe(&self) -> watch::Receiver<S::Snapshot> {
        self.publisher.subscribe()
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> S::Snapshot {
        self.publisher.borrow().clone()
    }

    /// Read the live state
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.lock())
    }

    /// Mutate the live state and publish the result
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.state.lock();
            let result = f(&mut state);
            (result, state.snapshot())
        };
        self.publisher.send_replace(snapshot);
        result
    }

    /// Ticks applied so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Whether the timer task is still alive
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop ticking. The last snapshot stays readable.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stop ticking and wait for the task to exit
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        info!(simulation = %self.name, ticks = self.ticks(), "Simulation shut down");
    }
}

impl<S: Simulation> Drop for SimulationHandle<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(simulation = %self.name, "Simulation released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Counter {
        value: u64,
    }

    impl Simulation for Counter {
        type Snapshot = u64;

        fn name(&self) -> &str {
            "counter"
        }

        fn step(&mut self, _rng: &mut StdRng) {
            self.value += 1;
        }

        fn snapshot(&self) -> u64 {
            self.value
        }
    }

    fn counter() -> Counter {
        Counter { value: 0 }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_period() {
        let rng = rng_for(Some(1), "t");
        let handle = SimulationHandle::spawn(counter(), Duration::from_secs(5), rng).unwrap();
        assert_eq!(handle.latest(), 0);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(handle.ticks(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(handle.ticks(), 1);
        assert_eq!(handle.latest(), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.ticks(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let handle =
            SimulationHandle::spawn(counter(), Duration::from_secs(3), rng_for(None, "t")).unwrap();
        let mut rx = handle.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);

        handle.update(|c| c.value = 100);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 100);
        assert_eq!(handle.read(|c| c.value), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticking() {
        let rng = rng_for(Some(2), "t");
        let handle = SimulationHandle::spawn(counter(), Duration::from_secs(1), rng).unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(handle.ticks(), 2);

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.ticks(), 2);
        assert!(!handle.is_running());
        assert_eq!(handle.latest(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_releases_task() {
        let rng = rng_for(Some(3), "t");
        let handle = SimulationHandle::spawn(counter(), Duration::from_secs(1), rng).unwrap();
        let mut rx = handle.subscribe();
        rx.borrow_and_update();

        drop(handle);

        // Once the aborted task is gone every sender is dropped
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_waits_for_exit() {
        let rng = rng_for(Some(4), "t");
        let handle = SimulationHandle::spawn(counter(), Duration::from_secs(1), rng).unwrap();
        let mut rx = handle.subscribe();
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        handle.shutdown().await;
        rx.borrow_and_update();
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_is_rejected() {
        let err = SimulationHandle::spawn(counter(), Duration::ZERO, rng_for(Some(5), "t"))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("counter"));
    }

    #[test]
    fn test_seeded_streams_are_deterministic_and_distinct() {
        use rand::Rng;

        let a1: u64 = rng_for(Some(42), "fleet").gen();
        let a2: u64 = rng_for(Some(42), "fleet").gen();
        let b: u64 = rng_for(Some(42), "alerts").gen();
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
    }
}
