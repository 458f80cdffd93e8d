//! Background regen sweep.
//!
//! One dedicated thread calls [`CrackTracker::sweep_now`] on a fixed
//! cadence, independent of the event-arrival path. The thread sleeps on a
//! condvar so shutdown interrupts it immediately instead of waiting out
//! the interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info};

use fracture_core::{CrackBroadcast, CrackTracker, TimeSource, WorldAccess};

/// Interruptible sleep shared between the scheduler handle and its thread.
struct ShutdownSignal {
    flag: AtomicBool,
    mutex: Mutex<()>,
    condvar: Condvar,
}

impl ShutdownSignal {
    fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            mutex: Mutex::new(()),
            condvar: Condvar::new(),
        }
    }

    fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
        self.condvar.notify_all();
    }

    /// Sleeps up to `timeout`, returning early when shutdown fires.
    fn wait(&self, timeout: Duration) {
        let mut guard = self.mutex.lock();
        if !self.is_shutdown() {
            self.condvar.wait_for(&mut guard, timeout);
        }
    }
}

/// Owns the sweep thread. Dropping the scheduler stops the thread and
/// joins it; tracked records are left to the tracker's shutdown path.
pub struct RegenScheduler {
    signal: Arc<ShutdownSignal>,
    handle: Option<JoinHandle<()>>,
}

impl RegenScheduler {
    /// Spawns the sweep thread.
    ///
    /// The first sweep runs immediately (matching a zero-delay timer), the
    /// rest every `interval`.
    pub fn start<W, B, C>(tracker: Arc<CrackTracker<W, B, C>>, interval: Duration) -> Self
    where
        W: WorldAccess + 'static,
        B: CrackBroadcast + 'static,
        C: TimeSource + 'static,
    {
        let signal = Arc::new(ShutdownSignal::new());
        let thread_signal = Arc::clone(&signal);

        let handle = thread::spawn(move || {
            info!(interval_ms = interval.as_millis() as u64, "regen sweep started");
            loop {
                if thread_signal.is_shutdown() {
                    break;
                }
                let cleared = tracker.sweep_now();
                if !cleared.is_empty() {
                    debug!(count = cleared.len(), "sweep cleared cracks");
                }
                thread_signal.wait(interval);
            }
            info!("regen sweep stopped");
        });

        Self {
            signal,
            handle: Some(handle),
        }
    }

    /// Signals the thread and waits for it to exit.
    pub fn stop(mut self) {
        self.join();
    }

    fn join(&mut self) {
        self.signal.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RegenScheduler {
    fn drop(&mut self) {
        self.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fracture_core::{BlockPos, CrackUpdate, TrackerConfig};
    use std::sync::atomic::AtomicU64;

    struct OpenWorld;

    impl WorldAccess for OpenWorld {
        fn is_crackable(&self, _position: BlockPos) -> bool {
            true
        }

        fn break_block(&self, _position: BlockPos) {}
    }

    struct NullBroadcast;

    impl CrackBroadcast for NullBroadcast {
        fn send_crack(&self, _update: CrackUpdate) {}
    }

    #[derive(Clone, Default)]
    struct ManualClock {
        now: Arc<AtomicU64>,
    }

    impl ManualClock {
        fn set(&self, millis: u64) {
            self.now.store(millis, Ordering::SeqCst);
        }
    }

    impl TimeSource for ManualClock {
        fn now_millis(&self) -> u64 {
            self.now.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_scheduler_sweeps_expired_records() {
        let clock = ManualClock::default();
        let tracker = Arc::new(CrackTracker::new(
            TrackerConfig {
                regen_millis: 100,
                ..TrackerConfig::default()
            },
            OpenWorld,
            NullBroadcast,
            clock.clone(),
        ));

        clock.set(0);
        tracker.apply_damage(BlockPos::new(0, 0, 0), 1);
        assert_eq!(tracker.tracked_count(), 1);

        let scheduler = RegenScheduler::start(Arc::clone(&tracker), Duration::from_millis(5));
        clock.set(100);

        // Wait for a sweep pass to pick it up
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while tracker.tracked_count() > 0 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(tracker.tracked_count(), 0);

        scheduler.stop();
    }

    #[test]
    fn test_drop_joins_promptly_despite_long_interval() {
        let tracker = Arc::new(CrackTracker::new(
            TrackerConfig::default(),
            OpenWorld,
            NullBroadcast,
            ManualClock::default(),
        ));

        let start = std::time::Instant::now();
        let scheduler = RegenScheduler::start(tracker, Duration::from_secs(3600));
        drop(scheduler);

        // Shutdown must not wait out the hour-long interval
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
