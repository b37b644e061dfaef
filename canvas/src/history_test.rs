#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::camera::Point;
use crate::doc::Wall;

/// A snapshot whose single wall has thickness `n`, so snapshots are distinguishable.
fn snap(n: usize) -> Snapshot {
    #[allow(clippy::cast_precision_loss)]
    let thickness = n as f64;
    Snapshot {
        walls: vec![Wall { id: Uuid::nil(), start: Point::new(0.0, 0.0), end: Point::new(1.0, 0.0), thickness }],
        ..Default::default()
    }
}

fn tag(s: &Snapshot) -> f64 {
    s.walls[0].thickness
}

// =============================================================
// Empty history
// =============================================================

#[test]
fn new_history_is_empty() {
    let h = History::new();
    assert!(h.is_empty());
    assert_eq!(h.index(), None);
    assert_eq!(h.cap(), HISTORY_CAP);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn undo_redo_on_empty_are_noops() {
    let mut h = History::new();
    assert!(h.undo().is_none());
    assert!(h.redo().is_none());
    assert_eq!(h.index(), None);
}

#[test]
fn zero_cap_is_raised_to_one() {
    let h = History::with_cap(0);
    assert_eq!(h.cap(), 1);
}

// =============================================================
// record
// =============================================================

#[test]
fn record_advances_cursor() {
    let mut h = History::new();
    h.record(snap(0));
    assert_eq!(h.index(), Some(0));
    h.record(snap(1));
    assert_eq!(h.index(), Some(1));
    assert_eq!(h.len(), 2);
    assert_eq!(tag(h.current().unwrap()), 1.0);
}

#[test]
fn single_entry_cannot_undo() {
    let mut h = History::new();
    h.record(snap(0));
    assert!(!h.can_undo());
    assert!(h.undo().is_none());
    assert_eq!(h.index(), Some(0));
}

#[test]
fn record_after_undo_discards_future() {
    let mut h = History::new();
    for n in 0..4 {
        h.record(snap(n));
    }
    h.undo();
    h.undo();
    assert_eq!(h.index(), Some(1));
    h.record(snap(9));
    assert_eq!(h.len(), 3);
    assert_eq!(h.index(), Some(2));
    assert!(!h.can_redo());
    assert_eq!(tag(h.current().unwrap()), 9.0);
}

// =============================================================
// undo / redo
// =============================================================

#[test]
fn undo_returns_previous_snapshot() {
    let mut h = History::new();
    h.record(snap(0));
    h.record(snap(1));
    let restored = h.undo().unwrap();
    assert_eq!(tag(restored), 0.0);
    assert!(h.can_redo());
}

#[test]
fn redo_returns_next_snapshot() {
    let mut h = History::new();
    h.record(snap(0));
    h.record(snap(1));
    h.undo();
    let restored = h.redo().unwrap();
    assert_eq!(tag(restored), 1.0);
    assert!(!h.can_redo());
    assert!(h.redo().is_none());
}

#[test]
fn undo_all_then_redo_all_returns_to_latest() {
    let mut h = History::new();
    for n in 0..=10 {
        h.record(snap(n));
    }
    for _ in 0..10 {
        assert!(h.undo().is_some());
    }
    assert!(h.undo().is_none());
    assert_eq!(tag(h.current().unwrap()), 0.0);
    for _ in 0..10 {
        assert!(h.redo().is_some());
    }
    assert_eq!(tag(h.current().unwrap()), 10.0);
}

// =============================================================
// cap
// =============================================================

#[test]
fn cap_evicts_oldest() {
    let mut h = History::new();
    for n in 0..(HISTORY_CAP + 20) {
        h.record(snap(n));
    }
    assert_eq!(h.len(), HISTORY_CAP);
    assert_eq!(h.index(), Some(HISTORY_CAP - 1));

    let mut steps = 0;
    while h.undo().is_some() {
        steps += 1;
    }
    assert_eq!(steps, HISTORY_CAP - 1);
    assert_eq!(tag(h.current().unwrap()), 20.0);
}

#[test]
fn small_cap_keeps_cursor_consistent() {
    let mut h = History::with_cap(3);
    for n in 0..5 {
        h.record(snap(n));
    }
    assert_eq!(h.len(), 3);
    assert_eq!(h.index(), Some(2));
    assert_eq!(tag(h.undo().unwrap()), 3.0);
    assert_eq!(tag(h.undo().unwrap()), 2.0);
    assert!(h.undo().is_none());
}

// =============================================================
// reset
// =============================================================

#[test]
fn reset_starts_from_baseline() {
    let mut h = History::new();
    for n in 0..5 {
        h.record(snap(n));
    }
    h.reset(snap(42));
    assert_eq!(h.len(), 1);
    assert_eq!(h.index(), Some(0));
    assert_eq!(tag(h.current().unwrap()), 42.0);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}
