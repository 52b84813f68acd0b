//! Integration tests for the tick scheduler driving a shared grid.

use conway_core::{Grid, Key, SharedGrid, TickScheduler};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn test_render_then_advance_sees_every_generation() {
    let shared = Arc::new(SharedGrid::new(Grid::from_cells(5, 5, &[(1, 2), (2, 2), (3, 2)])));
    let scheduler = TickScheduler::new(Duration::from_millis(1));
    let frames = Arc::new(Mutex::new(Vec::new()));

    {
        let shared = Arc::clone(&shared);
        let frames = Arc::clone(&frames);
        scheduler.on_tick(move || {
            shared.read(|grid| frames.lock().push((grid.turns(), grid.population())));
        });
    }
    {
        let shared = Arc::clone(&shared);
        scheduler.on_tick(move || shared.advance());
    }

    scheduler.start();
    assert!(scheduler.wait_for_ticks(20, WAIT));
    scheduler.pause();
    thread::sleep(Duration::from_millis(20));

    let frames = frames.lock();
    assert!(frames.len() >= 20);
    for (expected_turn, &(turns, population)) in frames.iter().enumerate() {
        assert_eq!(turns, expected_turn as u64);
        assert_eq!(population, 3);
    }
}

#[test]
fn test_paused_scheduler_still_handles_input() {
    let shared = Arc::new(SharedGrid::new(Grid::empty(10, 10)));
    let scheduler = TickScheduler::new(Duration::from_millis(1));

    {
        let shared = Arc::clone(&shared);
        scheduler.on_tick(move || shared.advance());
    }
    {
        let shared = Arc::clone(&shared);
        scheduler.on_resize(move |width, height| {
            shared.update(|grid| grid.resize(width, height));
        });
    }
    {
        let shared = Arc::clone(&shared);
        scheduler.on_key_press(move |key| {
            if key == Key::Char('t') {
                shared.update(|grid| grid.set_alive(0, 0, true));
            }
        });
    }

    scheduler.dispatch_resize(30, 12);
    scheduler.dispatch_key_press(Key::Char('t'));
    scheduler.dispatch_key_press(Key::Char('x'));

    assert_eq!(shared.dimensions(), (30, 12));
    assert!(shared.read(|grid| grid.cell_at(0, 0).is_some_and(|c| c.is_alive())));
    assert_eq!(shared.turns(), 0);
}

#[test]
fn test_key_handler_can_toggle_pause() {
    let scheduler = Arc::new(TickScheduler::new(Duration::from_millis(1)));
    let weak = Arc::downgrade(&scheduler);
    scheduler.on_key_press(move |key| {
        if let (Key::Char(' '), Some(scheduler)) = (key, weak.upgrade()) {
            scheduler.toggle();
        }
    });

    scheduler.dispatch_key_press(Key::Char(' '));
    assert!(scheduler.is_running());
    assert!(scheduler.wait_for_ticks(3, WAIT));

    scheduler.dispatch_key_press(Key::Char(' '));
    assert!(!scheduler.is_running());
}
