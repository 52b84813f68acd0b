//! Integration tests for the shared grid under concurrent access.

use conway_core::{Grid, GridSeed, SharedGrid};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Two blinkers and a block on a 12x8 board: period two, population 10.
#[rustfmt::skip]
fn period_two_board() -> Grid {
    Grid::from_cells(
        12,
        8,
        &[
            (1, 2), (2, 2), (3, 2),
            (7, 1), (7, 2), (7, 3),
            (9, 5), (10, 5), (9, 6), (10, 6),
        ],
    )
}

fn alive_mask(grid: &Grid) -> Vec<bool> {
    grid.rows()
        .flat_map(|row| row.iter().map(|cell| cell.is_alive()))
        .collect()
}

#[test]
fn test_snapshots_are_never_torn() {
    let even = period_two_board();
    let odd = even.clone().advanced();
    let expected = [alive_mask(&even), alive_mask(&odd)];

    let shared = Arc::new(SharedGrid::new(even));
    let done = Arc::new(AtomicBool::new(false));
    let observed = Arc::new(AtomicUsize::new(0));

    let writer = {
        let shared = Arc::clone(&shared);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..2_000 {
                if i % 2 == 0 {
                    shared.advance();
                } else {
                    shared.mutate(Grid::advanced);
                }
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            let done = Arc::clone(&done);
            let observed = Arc::clone(&observed);
            let expected = expected.clone();
            thread::spawn(move || {
                while !done.load(Ordering::SeqCst) {
                    let snapshot = shared.snapshot();
                    let parity = usize::from(snapshot.turns() % 2 == 1);
                    assert_eq!(alive_mask(&snapshot), expected[parity]);
                    assert_eq!(snapshot.population(), 10);

                    shared.read(|grid| {
                        let parity = usize::from(grid.turns() % 2 == 1);
                        assert_eq!(alive_mask(grid), expected[parity]);
                    });
                    observed.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(shared.turns(), 2_000);
    println!("Observed {} consistent frames", observed.load(Ordering::Relaxed));
}

#[test]
fn test_opposite_order_exchanges_terminate() {
    let a = Arc::new(SharedGrid::new(Grid::empty(3, 3)));
    let b = Arc::new(SharedGrid::new(Grid::empty(9, 4)));
    let rounds = 5_000;

    let start = Instant::now();
    let handles: Vec<_> = [(Arc::clone(&a), Arc::clone(&b)), (Arc::clone(&b), Arc::clone(&a))]
        .into_iter()
        .map(|(left, right)| {
            thread::spawn(move || {
                for _ in 0..rounds {
                    left.exchange(&right);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    // An even number of swaps restores the original owners.
    assert_eq!(a.dimensions(), (3, 3));
    assert_eq!(b.dimensions(), (9, 4));
    assert!(start.elapsed() < Duration::from_secs(30));
}

#[test]
fn test_replace_races_with_advance() {
    let seed = GridSeed::new(99);
    let shared = Arc::new(SharedGrid::new(Grid::random(40, 20, seed)));

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..200 {
                    if i % 50 == 0 {
                        shared.replace(Grid::random(40, 20, seed.derive(t * 1_000 + i)));
                    } else {
                        shared.advance();
                    }
                    let (width, height) = shared.dimensions();
                    assert_eq!((width, height), (40, 20));
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert!(shared.population() <= 40 * 20);
}
