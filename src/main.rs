use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use torus_snake::config::{self, Config};
use torus_snake::{audio, game};

/// Snake on a wrap-around board, in the terminal.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board width in cells.
    #[arg(long, value_name = "CELLS", default_value_t = config::DEFAULT_COLUMNS,
          value_parser = clap::value_parser!(u16).range(1..=1000))]
    columns: u16,
    /// Board height in cells.
    #[arg(long, value_name = "CELLS", default_value_t = config::DEFAULT_ROWS,
          value_parser = clap::value_parser!(u16).range(1..=1000))]
    rows: u16,
    /// Size of one cell in board units.
    #[arg(long, value_name = "UNITS", default_value_t = config::DEFAULT_CELL_SIZE,
          value_parser = clap::value_parser!(u16).range(1..=1000))]
    cell_size: u16,
    /// Simulation ticks per second.
    #[arg(long, value_name = "HZ", default_value_t = config::DEFAULT_TICK_RATE,
          value_parser = clap::value_parser!(u32).range(1..=120))]
    tick_rate: u32,
    /// Seed for food placement and starting directions.
    #[arg(long)]
    seed: Option<u64>,
    /// Disable the terminal bell cues.
    #[arg(long)]
    mute: bool,
    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            columns: self.columns,
            rows: self.rows,
            cell_size: self.cell_size,
            tick_rate: self.tick_rate,
            seed: self.seed,
            mute: self.mute,
            log_file: self.log_file,
            ..Config::default()
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    // The game owns the screen, so logs only go somewhere when a file is given
    let default_filter = if config.log_file.is_some() { "info" } else { "off" };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));

    if let Some(path) = &config.log_file {
        let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let config = Args::parse().into_config();
    config.validate()?;
    init_logging(&config)?;

    log::info!(
        "starting: {}x{} cells of size {}, {} ticks/s, seed {:?}",
        config.columns, config.rows, config.cell_size, config.tick_rate, config.seed
    );

    let mut game = game::SnakeGame::new(&config, audio::select(config.mute))?;
    // The game loop takes care of restoring the terminal when it stops
    game.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_to_classic_config() {
        let config = Args::parse_from(["torus-snake"]).into_config();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_args_override_config() {
        let config = Args::parse_from([
            "torus-snake", "--columns", "20", "--rows", "10", "--tick-rate", "15", "--seed", "99", "--mute",
        ])
        .into_config();

        assert_eq!(config.columns, 20);
        assert_eq!(config.rows, 10);
        assert_eq!(config.tick_rate, 15);
        assert_eq!(config.seed, Some(99));
        assert!(config.mute);
        assert_eq!(config.points_per_food, config::POINTS_PER_FOOD);
    }

    #[test]
    fn test_args_reject_zero_sizes() {
        assert!(Args::try_parse_from(["torus-snake", "--columns", "0"]).is_err());
        assert!(Args::try_parse_from(["torus-snake", "--tick-rate", "0"]).is_err());
    }
}
