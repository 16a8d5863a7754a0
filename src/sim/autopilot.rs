//! Demo autopilot
//!
//! Greedy steering toward the food that never picks an immediately fatal cell.
//! Used by the headless driver and for idle play.

use super::grid::{Coord, Direction, Grid};
use super::snake::Snake;

/// Pick the direction intent for the next step
///
/// Returns None when every move is fatal. With `inverted` set the intent is
/// pre-flipped so that the control inversion lands it on the chosen cell.
pub fn steer(snake: &Snake, target: Coord, grid: Grid, inverted: bool) -> Option<Direction> {
    let current = snake.direction();
    let head = snake.head();
    let tail = snake.tail();
    // The tail moves out of the way this step
    let safe = |c: Coord| grid.contains(c) && (c == tail || !snake.occupies(c));

    let candidates = std::iter::once(current).chain(
        Direction::ALL
            .into_iter()
            .filter(move |&d| d != current && !d.is_opposite(current)),
    );

    let mut best: Option<(i32, Direction)> = None;
    for dir in candidates {
        let next = head.step(dir);
        if !safe(next) {
            continue;
        }
        let dist = next.manhattan(target);
        // Strictly better only, so the current heading wins ties
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, dir));
        }
    }

    best.map(|(_, dir)| if inverted { dir.opposite() } else { dir })
}
