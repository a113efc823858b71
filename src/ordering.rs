//! Position bookkeeping for records that live in an ordered parent scope
//! (slides in a presentation, answers in a question, presentations in an
//! organisation).
//!
//! Everything here is pure: callers load the siblings of a scope, ask this
//! module what the positions should be, and persist the result. The SQL
//! side lives in `models::scope`.

use std::cmp::Ordering;

/// Position value meaning "not assigned yet".
pub const UNSET_POSITION: i64 = 0;

/// A record with a stable identifier and a 1-based position within its scope.
pub trait Positioned {
    fn id(&self) -> i64;
    fn position(&self) -> i64;
}

/// A position change produced by [`resequence`] or [`swap_plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Reposition {
    pub id: i64,
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

fn by_position<T: Positioned>(a: &T, b: &T) -> Ordering {
    a.position()
        .cmp(&b.position())
        .then_with(|| a.id().cmp(&b.id()))
}

/// True when the position still carries the "unassigned" sentinel.
pub fn needs_position(position: i64) -> bool {
    position <= UNSET_POSITION
}

/// Position for a new record in a scope that currently holds `sibling_count` records.
pub fn next_position(sibling_count: i64) -> i64 {
    sibling_count.max(0) + 1
}

/// Resolve the position a record is created with: an explicit value wins,
/// otherwise it goes to the end of the scope.
pub fn assign_position(requested: Option<i64>, sibling_count: i64) -> i64 {
    match requested {
        Some(p) if !needs_position(p) => p,
        _ => next_position(sibling_count),
    }
}

/// Compute the renumbering that makes `siblings` dense (1..N) while keeping
/// their current relative order. Only records whose position actually changes
/// are returned, so an already-dense scope yields an empty plan.
pub fn resequence<T: Positioned>(siblings: &[T]) -> Vec<Reposition> {
    let mut ordered: Vec<&T> = siblings.iter().collect();
    ordered.sort_by(|a, b| by_position(*a, *b));

    ordered
        .into_iter()
        .zip(1_i64..)
        .filter(|(item, target)| item.position() != *target)
        .map(|(item, target)| Reposition {
            id: item.id(),
            from: item.position(),
            to: target,
        })
        .collect()
}

/// Sibling with the greatest position strictly below `current`.
pub fn previous_of<'a, T: Positioned>(siblings: &'a [T], current: &T) -> Option<&'a T> {
    siblings
        .iter()
        .filter(|s| s.id() != current.id() && s.position() < current.position())
        .max_by(|a, b| by_position(*a, *b))
}

/// Sibling with the smallest position strictly above `current`.
pub fn next_of<'a, T: Positioned>(siblings: &'a [T], current: &T) -> Option<&'a T> {
    siblings
        .iter()
        .filter(|s| s.id() != current.id() && s.position() > current.position())
        .min_by(|a, b| by_position(*a, *b))
}

/// Neighbour in the given direction.
pub fn neighbor_of<'a, T: Positioned>(
    siblings: &'a [T],
    current: &T,
    direction: Direction,
) -> Option<&'a T> {
    match direction {
        Direction::Up => previous_of(siblings, current),
        Direction::Down => next_of(siblings, current),
    }
}

/// Plan for moving `current` one step in `direction`: the two records trade
/// positions. `None` when `current` is already at that end of the scope.
pub fn swap_plan<T: Positioned>(
    siblings: &[T],
    current: &T,
    direction: Direction,
) -> Option<[Reposition; 2]> {
    let other = neighbor_of(siblings, current, direction)?;
    Some([
        Reposition {
            id: current.id(),
            from: current.position(),
            to: other.position(),
        },
        Reposition {
            id: other.id(),
            from: other.position(),
            to: current.position(),
        },
    ])
}
