//! # Session
//!
//! One running simulation: a shared grid, a scheduler that renders and
//! advances it, and the key bindings that steer it.
//!
//! ## Tick Order
//!
//! ```text
//! tick n:  render (generation n)  ──>  advance (n -> n+1)  ──>  sleep
//! ```
//!
//! ## Key Bindings
//!
//! | Key     | Action                                   |
//! |---------|------------------------------------------|
//! | space   | toggle pause                             |
//! | `r`     | reseed randomly                          |
//! | `1`-`4` | still lifes, oscillators, spaceships, guns |
//! | `c`     | toggle age colors                        |
//! | `+`/`-` | faster / slower                          |
//! | `q`     | quit                                     |

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use conway_core::config::{MAX_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS};
use conway_core::{
    Grid, GridSeed, Key, LifeResult, PatternLibrary, SeedMode, SharedGrid, SimulationConfig,
    TickScheduler,
};
use parking_lot::Mutex;

use crate::events::{InputEvent, InputReceiver, Received};
use crate::render::{Status, TextRenderer};

/// Renderer writing to a boxed sink, shared by the tick and input paths.
type SharedRenderer = Arc<Mutex<TextRenderer<Box<dyn Write + Send>>>>;

/// How often the event loop re-checks the quit flag while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// State the key and resize handlers act on.
struct Controls {
    grid: Arc<SharedGrid>,
    library: Arc<PatternLibrary>,
    seed: GridSeed,
    /// Bumped on every reseed so each one draws a fresh sub-seed.
    reseeds: AtomicU64,
    /// Mirror of the scheduler interval for the status line.
    interval_ms: AtomicU64,
    quit: AtomicBool,
}

impl Controls {
    /// Replaces the grid with a newly seeded one of the same size, keeping
    /// the rule and color hint.
    fn reseed(&self, mode: SeedMode) {
        let n = self.reseeds.fetch_add(1, Ordering::Relaxed) + 1;
        let seed = self.seed.derive(n);
        let library = &self.library;
        self.grid.mutate(|current| {
            let mut next = Grid::create(current.width(), current.height(), mode, library, seed);
            next.set_rule(current.rule());
            next.set_colors(current.colors());
            next
        });
        tracing::info!("Reseeded with {} patterns", mode.category());
    }

    fn apply_key(&self, scheduler: &TickScheduler, key: Key) {
        match key {
            Key::Char(' ') => {
                scheduler.toggle();
            }
            Key::Char('r') => self.reseed(SeedMode::Random),
            Key::Char(digit @ '1'..='4') => {
                let index = (digit as usize) - ('1' as usize);
                self.reseed(SeedMode::PRESETS[index]);
            }
            Key::Char('c') => self.grid.update(|grid| grid.set_colors(!grid.colors())),
            Key::Char('+') => self.change_speed(scheduler, true),
            Key::Char('-') => self.change_speed(scheduler, false),
            Key::Char('q') | Key::Escape => {
                self.quit.store(true, Ordering::SeqCst);
            }
            _ => {}
        }
    }

    /// Halves (`faster`) or doubles the tick interval within the allowed
    /// range.
    fn change_speed(&self, scheduler: &TickScheduler, faster: bool) {
        let current = self.interval_ms.load(Ordering::Relaxed);
        let next = if faster { current / 2 } else { current.saturating_mul(2) };
        let next = next.clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);
        scheduler.set_interval(Duration::from_millis(next));
        self.interval_ms.store(next, Ordering::Relaxed);
        tracing::debug!("Tick interval {}ms -> {}ms", current, next);
    }
}

/// A running simulation and its input handling.
pub struct Session {
    controls: Arc<Controls>,
    scheduler: Arc<TickScheduler>,
    renderer: SharedRenderer,
}

impl Session {
    /// Builds the grid described by `config` and wires the scheduler.
    ///
    /// The scheduler starts paused unless `config.start_running` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured rule is invalid.
    pub fn new(
        config: &SimulationConfig,
        library: PatternLibrary,
        renderer: TextRenderer<Box<dyn Write + Send>>,
    ) -> LifeResult<Self> {
        config.validate()?;
        let rule = config.parsed_rule()?;
        let seed = config.grid_seed();
        let library = Arc::new(library);

        let mut grid = Grid::create(config.width, config.height, config.seed_mode, &library, seed);
        grid.set_rule(rule);
        grid.set_colors(config.colors);
        tracing::info!(
            "Session {}x{} rule {} seed {:#x} mode {}",
            config.width,
            config.height,
            rule,
            seed.value(),
            config.seed_mode.category()
        );

        let controls = Arc::new(Controls {
            grid: Arc::new(SharedGrid::new(grid)),
            library,
            seed,
            reseeds: AtomicU64::new(0),
            interval_ms: AtomicU64::new(config.tick_interval_ms),
            quit: AtomicBool::new(false),
        });
        let scheduler = Arc::new(TickScheduler::new(config.tick_interval()));
        let renderer: SharedRenderer = Arc::new(Mutex::new(renderer));

        Self::register_handlers(&controls, &scheduler, &renderer);

        if config.start_running {
            scheduler.start();
        }

        Ok(Self {
            controls,
            scheduler,
            renderer,
        })
    }

    fn register_handlers(
        controls: &Arc<Controls>,
        scheduler: &Arc<TickScheduler>,
        renderer: &SharedRenderer,
    ) {
        // Render first so the frame shows generation n, then advance.
        {
            let controls = Arc::clone(controls);
            let renderer = Arc::clone(renderer);
            scheduler.on_tick(move || {
                let status = Status {
                    running: true,
                    interval_ms: controls.interval_ms.load(Ordering::Relaxed),
                };
                controls.grid.read(|grid| {
                    if let Err(e) = renderer.lock().draw(grid, status) {
                        tracing::warn!("Render failed: {}", e);
                    }
                });
            });
        }
        {
            let grid = Arc::clone(&controls.grid);
            scheduler.on_tick(move || grid.advance());
        }
        {
            let grid = Arc::clone(&controls.grid);
            scheduler.on_resize(move |width, height| {
                grid.mutate(|mut grid| {
                    grid.resize(width, height);
                    grid
                });
                tracing::info!("Resized to {}x{}", width, height);
            });
        }
        {
            let controls = Arc::clone(controls);
            let weak = Arc::downgrade(scheduler);
            scheduler.on_key_press(move |key| {
                if let Some(scheduler) = weak.upgrade() {
                    controls.apply_key(&scheduler, key);
                }
            });
        }
    }

    /// Returns the shared grid.
    #[must_use]
    pub fn grid(&self) -> &Arc<SharedGrid> {
        &self.controls.grid
    }

    /// Returns the scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    /// Returns true once the user asked to quit.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.controls.quit.load(Ordering::SeqCst)
    }

    /// Handles one input event.
    ///
    /// Keys and resizes go through the scheduler's handler registry. While
    /// paused the frame is redrawn so the change is visible. Returns false
    /// once the session should end.
    pub fn handle(&self, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => self.scheduler.dispatch_key_press(key),
            InputEvent::Resize { width, height } => self.scheduler.dispatch_resize(width, height),
            InputEvent::Quit => self.controls.quit.store(true, Ordering::SeqCst),
        }

        if self.quit_requested() {
            return false;
        }
        if !self.scheduler.is_running() {
            self.redraw();
        }
        true
    }

    /// Draws the current generation once, outside the tick cadence.
    pub fn redraw(&self) {
        let status = Status {
            running: self.scheduler.is_running(),
            interval_ms: self.controls.interval_ms.load(Ordering::Relaxed),
        };
        self.controls.grid.read(|grid| {
            if let Err(e) = self.renderer.lock().draw(grid, status) {
                tracing::warn!("Render failed: {}", e);
            }
        });
    }

    /// Processes events until quit is requested or every sender is gone.
    pub fn run(&self, events: &InputReceiver) {
        self.redraw();
        while !self.quit_requested() {
            match events.recv_timeout(POLL_INTERVAL) {
                Received::Event(event) => {
                    if !self.handle(event) {
                        break;
                    }
                }
                Received::Timeout => {}
                Received::Disconnected => break,
            }
        }
        self.scheduler.pause();
        tracing::info!(
            "Session ended after {} ticks at generation {}",
            self.scheduler.ticks(),
            self.controls.grid.turns()
        );
    }
}
