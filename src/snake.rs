use std::collections::VecDeque;

use crate::grid::{Direction, Grid, Position};
use MoveResult::*;

use rand::Rng;

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Position, old_head: Position, old_tail: Option<Position> },
    Crashed,
    /// The snake is dead and did not move.
    Stalled,
}

pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_growth: u32,
    score: u32,
    alive: bool,
    start: Position,
    initial_length: u32,
}

impl Snake {
    /// Creates a live snake on `start`. It occupies a single cell and reaches
    /// `initial_length` over its first moves.
    pub fn new(start: Position, initial_length: u32, direction: Direction) -> Self {
        let mut snake = Snake {
            body: VecDeque::new(),
            direction,
            pending_growth: 0,
            score: 0,
            alive: true,
            start,
            initial_length: initial_length.max(1),
        };
        snake.respawn(direction);
        snake
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.respawn(Direction::random(rng));
    }

    pub fn respawn(&mut self, direction: Direction) {
        self.body.clear();
        self.body.push_back(self.start);
        self.direction = direction;
        self.pending_growth = self.initial_length - 1;
        self.score = 0;
        self.alive = true;
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn head(&self) -> Position {
        // The body is never empty: respawn always seeds it and moves never shrink it
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn update(&mut self, grid: &Grid) -> MoveResult {
        if !self.alive {
            return Stalled;
        }

        let old_head = self.head();
        let new_head = grid.step(old_head, self.direction);

        if self.body.iter().skip(1).any(|&pos| pos == new_head) {
            self.alive = false;
            return Crashed;
        }

        self.body.push_front(new_head);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
            Moved { new_head, old_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_head, old_tail }
        }
    }

    /// Requests a new heading for the next move. Reversing onto the body is ignored.
    pub fn turn(&mut self, new_direction: Direction) {
        if new_direction != self.direction.opposite() {
            self.direction = new_direction;
        }
    }

    pub fn grow(&mut self, points: u32) {
        self.pending_growth += 1;
        self.score = self.score.saturating_add(points);
    }
}
