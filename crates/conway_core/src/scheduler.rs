//! # Tick Scheduler
//!
//! A background thread that runs the registered tick callbacks (typically
//! render, then advance) once per cadence interval while running, and blocks
//! while paused.
//!
//! ## States
//!
//! ```text
//!            start()
//!   ┌────────┐ ───────> ┌─────────┐
//!   │ Paused │          │ Running │
//!   └────────┘ <─────── └─────────┘
//!            pause()
//! ```
//!
//! `Paused` is the initial state. The gate is checked before every callback,
//! so a pause takes effect before the next callback starts but never
//! interrupts one already running. Callbacks run in registration order on
//! the scheduler thread and never overlap.
//!
//! Resize and key-press handlers are not part of the cadence: they run
//! synchronously on whichever thread calls `dispatch_resize` /
//! `dispatch_key_press`, whether the scheduler is running or not.
//!
//! No lock is held while a callback runs or while the thread waits, so
//! callbacks may freely call `start`, `pause` or register more callbacks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Default pause between two ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// A callback run once per tick.
pub type TickCallback = Arc<dyn Fn() + Send + Sync>;

/// A callback run when the display area changes size, with `(width, height)`.
pub type ResizeCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// A callback run when a key is pressed.
pub type KeyCallback = Arc<dyn Fn(Key) + Send + Sync>;

/// A key press reported by the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character, including space.
    Char(char),
    /// Enter / return.
    Enter,
    /// Escape.
    Escape,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
}

/// Run state of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Blocked, no callbacks run.
    Paused,
    /// Callbacks run once per interval.
    Running,
}

/// State guarded by the control mutex.
struct Control {
    state: SchedulerState,
    interval: Duration,
    shutdown: bool,
}

/// Everything the scheduler thread shares with its owner.
struct Shared {
    control: Mutex<Control>,
    /// Signalled on start, pause, interval change and shutdown.
    changed: Condvar,
    /// Signalled after each completed tick.
    tick_completed: Condvar,
    ticks: AtomicU64,
    tick_callbacks: Mutex<Vec<TickCallback>>,
    resize_callbacks: Mutex<Vec<ResizeCallback>>,
    key_callbacks: Mutex<Vec<KeyCallback>>,
}

impl Shared {
    /// Blocks while paused. Returns false once shutdown is requested.
    fn wait_until_running(&self) -> bool {
        let mut control = self.control.lock();
        while control.state == SchedulerState::Paused && !control.shutdown {
            self.changed.wait(&mut control);
        }
        !control.shutdown
    }

    /// Sleeps for one interval. Returns false once shutdown is requested.
    ///
    /// The deadline follows the current interval, so a change made during
    /// the sleep shortens or stretches it.
    fn sleep_interval(&self) -> bool {
        let started = Instant::now();
        let mut control = self.control.lock();
        while !control.shutdown {
            let deadline = started + control.interval;
            if Instant::now() >= deadline {
                break;
            }
            if self.changed.wait_until(&mut control, deadline).timed_out() {
                break;
            }
        }
        !control.shutdown
    }

    fn finish_tick(&self) {
        self.ticks.fetch_add(1, Ordering::AcqRel);
        let _control = self.control.lock();
        self.tick_completed.notify_all();
    }

    fn run(&self) {
        loop {
            if !self.wait_until_running() {
                break;
            }

            let callbacks = self.tick_callbacks.lock().clone();
            for (i, callback) in callbacks.iter().enumerate() {
                if i > 0 && !self.wait_until_running() {
                    return;
                }
                callback();
            }
            self.finish_tick();

            if !self.sleep_interval() {
                break;
            }
        }
    }
}

/// Background cadence loop with run/pause gating.
///
/// ## Usage
///
/// ```rust,ignore
/// let scheduler = TickScheduler::new(DEFAULT_TICK_INTERVAL);
///
/// let grid = Arc::clone(&shared);
/// scheduler.on_tick(move || grid.read(|g| renderer.draw(g)));
/// let grid = Arc::clone(&shared);
/// scheduler.on_tick(move || grid.advance());
///
/// scheduler.start();
/// ```
pub struct TickScheduler {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl TickScheduler {
    /// Creates a paused scheduler and starts its background thread.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let shared = Arc::new(Shared {
            control: Mutex::new(Control {
                state: SchedulerState::Paused,
                interval,
                shutdown: false,
            }),
            changed: Condvar::new(),
            tick_completed: Condvar::new(),
            ticks: AtomicU64::new(0),
            tick_callbacks: Mutex::new(Vec::new()),
            resize_callbacks: Mutex::new(Vec::new()),
            key_callbacks: Mutex::new(Vec::new()),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || worker_shared.run());

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Registers a callback run once per tick, after those registered
    /// before it.
    pub fn on_tick(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.shared.tick_callbacks.lock().push(Arc::new(callback));
    }

    /// Registers a resize handler.
    pub fn on_resize(&self, callback: impl Fn(usize, usize) + Send + Sync + 'static) {
        self.shared.resize_callbacks.lock().push(Arc::new(callback));
    }

    /// Registers a key-press handler.
    pub fn on_key_press(&self, callback: impl Fn(Key) + Send + Sync + 'static) {
        self.shared.key_callbacks.lock().push(Arc::new(callback));
    }

    /// Runs every resize handler on the calling thread.
    pub fn dispatch_resize(&self, width: usize, height: usize) {
        let callbacks = self.shared.resize_callbacks.lock().clone();
        for callback in &callbacks {
            callback(width, height);
        }
    }

    /// Runs every key-press handler on the calling thread.
    pub fn dispatch_key_press(&self, key: Key) {
        let callbacks = self.shared.key_callbacks.lock().clone();
        for callback in &callbacks {
            callback(key);
        }
    }

    /// Switches to `Running`. Does nothing if already running.
    pub fn start(&self) {
        self.set_state(SchedulerState::Running);
    }

    /// Switches to `Paused`. Does nothing if already paused.
    pub fn pause(&self) {
        self.set_state(SchedulerState::Paused);
    }

    /// Flips between running and paused, returning the new state.
    pub fn toggle(&self) -> SchedulerState {
        let mut control = self.shared.control.lock();
        control.state = match control.state {
            SchedulerState::Paused => SchedulerState::Running,
            SchedulerState::Running => SchedulerState::Paused,
        };
        self.shared.changed.notify_all();
        tracing::debug!("Scheduler toggled to {:?}", control.state);
        control.state
    }

    fn set_state(&self, state: SchedulerState) {
        let mut control = self.shared.control.lock();
        if control.state == state {
            return;
        }
        control.state = state;
        self.shared.changed.notify_all();
        tracing::debug!("Scheduler {:?}", state);
    }

    /// Returns the current run state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.shared.control.lock().state
    }

    /// Returns true while running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Returns the pause between two ticks.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.shared.control.lock().interval
    }

    /// Changes the pause between two ticks.
    ///
    /// A sleep already in progress is measured against the new interval.
    pub fn set_interval(&self, interval: Duration) {
        self.shared.control.lock().interval = interval;
        self.shared.changed.notify_all();
    }

    /// Returns the number of completed ticks.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.load(Ordering::Acquire)
    }

    /// Blocks until at least `target` ticks have completed.
    ///
    /// Returns false if `timeout` elapses first.
    pub fn wait_for_ticks(&self, target: u64, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut control = self.shared.control.lock();
        while self.ticks() < target {
            if self
                .shared
                .tick_completed
                .wait_until(&mut control, deadline)
                .timed_out()
            {
                break;
            }
        }
        self.ticks() >= target
    }

    /// Stops the background thread and waits for it to exit.
    ///
    /// A callback already running is allowed to finish. Called on drop.
    pub fn shutdown(&mut self) {
        {
            let mut control = self.shared.control.lock();
            control.shutdown = true;
            self.shared.changed.notify_all();
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("Scheduler thread panicked");
            }
            tracing::debug!("Scheduler stopped after {} ticks", self.ticks());
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
