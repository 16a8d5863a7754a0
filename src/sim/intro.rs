//! Attract-mode demo path
//!
//! Outer perimeter, a sine wave across the board, a perimeter inset by two
//! cells, then the wave again. The demo snake follows it forever.

use serde::{Deserialize, Serialize};

use super::grid::{Coord, Grid};
use super::snake::SegmentTag;

/// Hue step between neighbouring segments (degrees)
const HUE_PER_SEGMENT: u64 = 30;
/// Hue rotation speed (degrees per 400 ms)
const HUE_PER_PERIOD: u64 = 180;
const HUE_PERIOD_MS: u64 = 400;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroPath {
    cells: Vec<Coord>,
    index: usize,
    target_len: usize,
}

impl IntroPath {
    pub fn new(grid: Grid) -> Self {
        let wave = wave(grid);
        let mut cells = perimeter(grid, 0);
        cells.extend_from_slice(&wave);
        if grid.width > 4 && grid.height > 4 {
            cells.extend(perimeter(grid, 2));
        }
        cells.extend_from_slice(&wave);

        Self {
            cells,
            index: 0,
            target_len: 6.max(((grid.width + grid.height) / 3) as usize),
        }
    }

    /// Next cell on the loop
    pub fn next_cell(&mut self) -> Coord {
        let cell = self.cells[self.index];
        self.index = (self.index + 1) % self.cells.len();
        cell
    }

    /// Length the demo snake grows to
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rainbow tag for segment `index` at time `now_ms`
pub fn hue_tag(index: usize, now_ms: u64) -> SegmentTag {
    let hue = (index as u64 * HUE_PER_SEGMENT + now_ms * HUE_PER_PERIOD / HUE_PERIOD_MS) % 360;
    SegmentTag::Hue(hue as u16)
}

/// Clockwise ring `inset` cells in from the edge, starting top-left
fn perimeter(grid: Grid, inset: i32) -> Vec<Coord> {
    let (x0, y0) = (inset, inset);
    let (x1, y1) = (grid.width - 1 - inset, grid.height - 1 - inset);
    let mut ring = Vec::new();
    ring.extend((x0..=x1).map(|x| Coord::new(x, y0)));
    ring.extend((y0 + 1..=y1).map(|y| Coord::new(x1, y)));
    ring.extend((x0..x1).rev().map(|x| Coord::new(x, y1)));
    ring.extend((y0 + 1..y1).rev().map(|y| Coord::new(x0, y)));
    ring
}

/// Sine across the board and a cosine on the way back
fn wave(grid: Grid) -> Vec<Coord> {
    let amp = (grid.height / 6).max(1) as f32;
    let mid = grid.height / 2;
    let w = grid.width as f32;
    let at = |x: i32, y: f32| grid.clamp(Coord::new(x, mid + y.round() as i32));

    let phase = |x: i32| x as f32 / w * std::f32::consts::TAU;
    let mut cells: Vec<Coord> = (0..grid.width)
        .map(|x| at(x, phase(x).sin() * amp))
        .collect();
    cells.extend((1..grid.width - 1).rev().map(|x| at(x, phase(x).cos() * amp)));
    cells
}
