use std::collections::VecDeque;

use crate::grid::{Grid, Position};

use rand::seq::IteratorRandom;
use rand::Rng;

// Rejection sampling budget, as a multiple of the cell count, before
// falling back to scanning the free cells.
const SAMPLES_PER_CELL: usize = 4;

pub struct Food {
    position: Position,
}

impl Food {
    pub fn new<R: Rng + ?Sized>(grid: &Grid, excluded: &VecDeque<Position>, rng: &mut R) -> Self {
        let mut food = Food { position: grid.random_cell(rng) };
        if !food.randomize_position(grid, excluded, rng) {
            log::warn!("no free cell for the first food");
        }
        food
    }

    #[cfg(test)]
    pub(crate) fn at(position: Position) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the food onto a random cell not listed in `excluded`.
    /// Returns false, leaving the food where it was, when every cell is excluded.
    pub fn randomize_position<R: Rng + ?Sized>(&mut self, grid: &Grid, excluded: &VecDeque<Position>, rng: &mut R) -> bool {
        for _ in 0..grid.cell_count() * SAMPLES_PER_CELL {
            let candidate = grid.random_cell(rng);
            if !excluded.contains(&candidate) {
                self.position = candidate;
                return true;
            }
        }

        // Nearly full board, pick among what is left
        match grid.cells().filter(|pos| !excluded.contains(pos)).choose(rng) {
            Some(pos) => {
                self.position = pos;
                true
            },
            None => false,
        }
    }
}
