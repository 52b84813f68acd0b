//! Integration tests for the session: key bindings, resize and the event loop.

use conway::core::{Key, PatternLibrary, SimulationConfig};
use conway::{InputEvent, InputQueue, Session, TextRenderer};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

/// A sink the test can read back while the session writes to it.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn config() -> SimulationConfig {
    SimulationConfig {
        width: 20,
        height: 10,
        tick_interval_ms: 1,
        seed: Some(7),
        ..SimulationConfig::default()
    }
}

fn library() -> PatternLibrary {
    PatternLibrary::load(concat!(env!("CARGO_MANIFEST_DIR"), "/data/patterns.toml")).unwrap()
}

fn session_with(config: &SimulationConfig, library: PatternLibrary) -> (Session, Capture) {
    let capture = Capture::default();
    let renderer = TextRenderer::new(Box::new(capture.clone()) as Box<dyn Write + Send>);
    let session = Session::new(config, library, renderer).unwrap();
    (session, capture)
}

fn key(c: char) -> InputEvent {
    InputEvent::Key(Key::Char(c))
}

#[test]
fn test_bundled_library_loads_every_category() {
    let library = library();
    assert_eq!(library.len(), 15);
    for mode in conway::core::SeedMode::PRESETS {
        assert!(!library.patterns(mode).is_empty(), "{mode:?} is empty");
    }
}

#[test]
fn test_space_toggles_running() {
    let (session, capture) = session_with(&config(), PatternLibrary::new());
    assert!(!session.scheduler().is_running());

    assert!(session.handle(key(' ')));
    assert!(session.scheduler().is_running());
    assert!(session.scheduler().wait_for_ticks(3, WAIT));
    assert!(session.grid().turns() >= 2);

    assert!(session.handle(key(' ')));
    assert!(!session.scheduler().is_running());

    let text = capture.text();
    assert!(text.contains("[running]"));
    assert!(text.contains("[paused]"));
}

#[test]
fn test_reseed_is_deterministic_and_keeps_rule() {
    let config = SimulationConfig {
        rule: "B36/S23".to_string(),
        ..config()
    };
    let (a, _) = session_with(&config, PatternLibrary::new());
    let (b, _) = session_with(&config, PatternLibrary::new());
    assert_eq!(a.grid().snapshot(), b.grid().snapshot());

    let before = a.grid().snapshot();
    a.handle(key('r'));
    b.handle(key('r'));
    let after = a.grid().snapshot();

    assert_ne!(after, before);
    assert_eq!(after, b.grid().snapshot());
    assert_eq!(after.turns(), 0);
    assert_eq!(after.rule().to_string(), "B36/S23");
}

#[test]
fn test_preset_keys_seed_from_library() {
    let config = SimulationConfig {
        width: 60,
        height: 30,
        ..config()
    };
    let (session, _) = session_with(&config, library());

    // Still lifes never change.
    session.handle(key('1'));
    let still = session.grid().snapshot();
    assert!(still.population() > 0);
    let next = still.clone().advanced();
    assert!(still
        .rows()
        .zip(next.rows())
        .all(|(a, b)| a.iter().map(|c| c.is_alive()).eq(b.iter().map(|c| c.is_alive()))));

    // The gun category holds only the 36x9 Gosper gun.
    session.handle(key('4'));
    assert_eq!(session.grid().population(), 36);
}

#[test]
fn test_colors_and_speed_keys() {
    let (session, capture) = session_with(&config(), PatternLibrary::new());
    assert!(session.grid().read(conway::core::Grid::colors));

    session.handle(key('c'));
    assert!(!session.grid().read(conway::core::Grid::colors));

    session.handle(key('-'));
    assert_eq!(session.scheduler().interval(), Duration::from_millis(2));
    session.handle(key('+'));
    session.handle(key('+'));
    assert_eq!(session.scheduler().interval(), Duration::from_millis(1));
    assert!(capture.text().contains("Speed: 1ms"));
}

#[test]
fn test_resize_reseeds_at_new_size() {
    let (session, _) = session_with(&config(), PatternLibrary::new());
    session.grid().advance();
    assert_eq!(session.grid().turns(), 1);

    session.handle(InputEvent::Resize { width: 33, height: 7 });
    assert_eq!(session.grid().dimensions(), (33, 7));
    assert_eq!(session.grid().turns(), 0);
}

#[test]
fn test_quit_key_ends_session() {
    let (session, _) = session_with(&config(), PatternLibrary::new());
    assert!(!session.quit_requested());
    assert!(!session.handle(key('q')));
    assert!(session.quit_requested());
}

#[test]
fn test_run_drains_events_until_disconnect() {
    let (session, _) = session_with(&config(), PatternLibrary::new());
    let queue = InputQueue::new(8);
    let sender = queue.sender();
    let receiver = queue.receiver();
    drop(queue);

    let producer = thread::spawn(move || {
        for event in InputEvent::parse_line(":resize 12 6") {
            assert!(sender.send_blocking(event));
        }
        assert!(sender.send_blocking(key('c')));
    });

    session.run(&receiver);
    producer.join().unwrap();

    assert_eq!(session.grid().dimensions(), (12, 6));
    assert!(!session.grid().read(conway::core::Grid::colors));
    assert!(!session.scheduler().is_running());
}

#[test]
fn test_run_stops_on_quit_event() {
    let (session, _) = session_with(&config(), PatternLibrary::new());
    let (sender, receiver) = InputQueue::create_pair(8);
    assert!(sender.send(key(' ')));
    assert!(sender.send(InputEvent::Quit));

    session.run(&receiver);
    assert!(session.quit_requested());
    // The loop pauses the scheduler on the way out.
    assert!(!session.scheduler().is_running());
}
