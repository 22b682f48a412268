use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Result};

use crate::grid::Grid;

pub const DEFAULT_COLUMNS: u16 = 40;
pub const DEFAULT_ROWS: u16 = 30;
pub const DEFAULT_CELL_SIZE: u16 = 20;
pub const DEFAULT_TICK_RATE: u32 = 10;
pub const POINTS_PER_FOOD: u32 = 10;
pub const INITIAL_SNAKE_LENGTH: u32 = 3;

/// Everything a session needs to know up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub columns: u16,
    pub rows: u16,
    pub cell_size: u16,
    /// Ticks per second.
    pub tick_rate: u32,
    pub points_per_food: u32,
    pub initial_length: u32,
    /// Fixed RNG seed, or entropy when absent.
    pub seed: Option<u64>,
    pub mute: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            cell_size: DEFAULT_CELL_SIZE,
            tick_rate: DEFAULT_TICK_RATE,
            points_per_food: POINTS_PER_FOOD,
            initial_length: INITIAL_SNAKE_LENGTH,
            seed: None,
            mute: false,
            log_file: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            bail!("grid must have at least one column and one row (got {}x{})", self.columns, self.rows);
        }
        if self.cell_size == 0 {
            bail!("cell size must be positive");
        }
        if self.tick_rate == 0 {
            bail!("tick rate must be positive");
        }
        if u32::from(self.columns) * u32::from(self.rows) < 2 {
            bail!("board needs at least two cells, one for the snake and one for the food");
        }
        if self.initial_length == 0 {
            bail!("initial snake length must be positive");
        }

        // Leave headroom so stepping past an edge cannot overflow before wrapping
        let fits = |cells: u16| {
            i32::from(cells)
                .checked_mul(i32::from(self.cell_size))
                .map_or(false, |extent| extent <= i32::MAX / 2)
        };
        if !fits(self.columns) || !fits(self.rows) {
            bail!("grid of {}x{} cells of size {} is too large", self.columns, self.rows, self.cell_size);
        }

        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.columns, self.rows, self.cell_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_board() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        let grid = config.grid();
        assert_eq!(grid.width(), 800);
        assert_eq!(grid.height(), 600);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_rejects_degenerate_values() {
        let bad = [
            Config { columns: 0, ..Config::default() },
            Config { rows: 0, ..Config::default() },
            Config { cell_size: 0, ..Config::default() },
            Config { tick_rate: 0, ..Config::default() },
            Config { initial_length: 0, ..Config::default() },
            Config { columns: 1, rows: 1, ..Config::default() },
        ];

        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let config = Config { columns: u16::MAX, rows: 10, cell_size: u16::MAX, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { columns: u16::MAX, rows: u16::MAX, cell_size: 1, ..Config::default() };
        assert!(config.validate().is_ok());
    }
}
