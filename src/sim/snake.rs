//! The snake entity
//!
//! Head is `body[0]`; the rest is the trail of previous head positions.
//! Display tags stay with their index, so a color picked up at the tail
//! travels with the tail.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::food::{PowerUp, Rainbow};
use super::grid::{Coord, Direction};
use crate::consts::TURN_EMPHASIS_TICKS;

/// Display tag carried by a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SegmentTag {
    /// Plain food color
    Color(Rainbow),
    /// Power-up gradient
    PowerUp(PowerUp),
    /// Intro rainbow hue in degrees
    Hue(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub pos: Coord,
    pub tag: Option<SegmentTag>,
}

impl Segment {
    pub fn new(pos: Coord) -> Self {
        Self { pos, tag: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<Segment>,
    direction: Direction,
    /// Render-only highlight after a turn
    turn_emphasis: u8,
}

impl Snake {
    /// Straight snake on `row`, tail at x = 0, facing right
    pub fn new(length: usize, row: i32) -> Self {
        let length = length.max(1) as i32;
        Self::from_cells(
            (0..length).rev().map(|x| Coord::new(x, row)),
            Direction::Right,
        )
    }

    /// Snake from explicit cells, head first
    ///
    /// # Panics
    /// Panics if `cells` is empty.
    pub fn from_cells(cells: impl IntoIterator<Item = Coord>, direction: Direction) -> Self {
        let body: VecDeque<Segment> = cells.into_iter().map(Segment::new).collect();
        assert!(!body.is_empty(), "snake needs at least one segment");
        Self {
            body,
            direction,
            turn_emphasis: 0,
        }
    }

    pub fn head(&self) -> Coord {
        self.body[0].pos
    }

    pub fn tail(&self) -> Coord {
        self.body[self.body.len() - 1].pos
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn turn_emphasis(&self) -> u8 {
        self.turn_emphasis
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.body.iter()
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.body.iter().map(|s| s.pos)
    }

    pub fn occupies(&self, c: Coord) -> bool {
        self.body.iter().any(|s| s.pos == c)
    }

    /// Turn unless `dir` is the current heading or its reverse; returns whether it turned
    pub fn change_direction(&mut self, dir: Direction) -> bool {
        if dir == self.direction || dir.is_opposite(self.direction) {
            return false;
        }
        self.direction = dir;
        self.turn_emphasis = TURN_EMPHASIS_TICKS;
        true
    }

    /// Move one cell forward, keeping the length
    pub fn advance(&mut self) {
        let next = self.head().step(self.direction);
        for i in (1..self.body.len()).rev() {
            self.body[i].pos = self.body[i - 1].pos;
        }
        self.body[0].pos = next;
    }

    /// Append a copy of the tail, retagged with the eaten food when given
    pub fn grow(&mut self, tag: Option<SegmentTag>) {
        let mut tail = self.body[self.body.len() - 1];
        if tag.is_some() {
            tail.tag = tag;
        }
        self.body.push_back(tail);
    }

    /// Head shares a cell with any other segment
    pub fn hits_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|s| s.pos == head)
    }

    /// Relocate the head (portals, wall wrap)
    pub fn set_head(&mut self, c: Coord) {
        self.body[0].pos = c;
    }

    pub fn decay_emphasis(&mut self) {
        self.turn_emphasis = self.turn_emphasis.saturating_sub(1);
    }

    /// Push a new head cell and trim the tail down to `max_len` (intro demo path)
    pub(crate) fn push_head(&mut self, c: Coord, max_len: usize) {
        self.body.push_front(Segment::new(c));
        while self.body.len() > max_len.max(1) {
            self.body.pop_back();
        }
    }

    /// Recompute every segment tag from its index
    pub(crate) fn retag(&mut self, mut f: impl FnMut(usize) -> Option<SegmentTag>) {
        for (i, segment) in self.body.iter_mut().enumerate() {
            segment.tag = f(i);
        }
    }
}
