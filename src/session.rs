use std::collections::VecDeque;

use crate::audio::AudioSink;
use crate::config::Config;
use crate::food::Food;
use crate::grid::{Direction, Grid, Position};
use crate::snake::{MoveResult, Snake};

use rand::{rngs::StdRng, SeedableRng};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Start,
    Playing,
    GameOver,
}

/// Discrete player intents, already decoded from raw key events.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Turn(Direction),
    /// Starts the first game and restarts after a game over.
    Start,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What a single tick did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing, nothing simulated.
    Idle,
    Moved,
    Ate { score: u32 },
    Died { score: u32 },
    /// Food had nowhere left to go.
    BoardFilled { score: u32 },
}

/// Read-only view of the session handed to the renderer once per tick.
pub struct Frame<'a> {
    pub phase: Phase,
    pub grid: &'a Grid,
    pub body: &'a VecDeque<Position>,
    pub direction: Direction,
    pub alive: bool,
    pub food: Position,
    pub score: u32,
    pub high_score: u32,
}

pub struct Session<A: AudioSink> {
    phase: Phase,
    grid: Grid,
    snake: Snake,
    food: Food,
    high_score: u32,
    points_per_food: u32,
    rng: StdRng,
    audio: A,
}

impl<A: AudioSink> Session<A> {
    pub fn new(config: &Config, audio: A) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = config.grid();

        let mut snake = Snake::new(grid.center(), config.initial_length, Direction::Right);
        snake.reset(&mut rng);
        let food = Food::new(&grid, snake.body(), &mut rng);

        Session {
            phase: Phase::Start,
            grid,
            snake,
            food,
            high_score: 0,
            points_per_food: config.points_per_food,
            rng,
            audio,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn handle_input(&mut self, input: Input) -> Flow {
        match (input, self.phase) {
            (Input::Quit, _) => return Flow::Quit,
            (Input::Start, Phase::Start) | (Input::Start, Phase::GameOver) => self.new_game(),
            (Input::Turn(direction), Phase::Playing) => self.snake.turn(direction),
            _ => {},
        }

        Flow::Continue
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Playing {
            return TickOutcome::Idle;
        }

        match self.snake.update(&self.grid) {
            MoveResult::Crashed => {
                self.audio.play_crash();
                self.game_over();
                TickOutcome::Died { score: self.snake.score() }
            },
            MoveResult::Stalled => {
                self.game_over();
                TickOutcome::Died { score: self.snake.score() }
            },
            MoveResult::Moved { new_head, .. } => {
                if new_head != self.food.position() {
                    return TickOutcome::Moved;
                }

                self.snake.grow(self.points_per_food);
                self.audio.play_eat();

                let score = self.snake.score();
                if self.food.randomize_position(&self.grid, self.snake.body(), &mut self.rng) {
                    log::debug!("food eaten, respawned at {:?}", self.food.position());
                    TickOutcome::Ate { score }
                } else {
                    self.game_over();
                    TickOutcome::BoardFilled { score }
                }
            },
        }
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            phase: self.phase,
            grid: &self.grid,
            body: self.snake.body(),
            direction: self.snake.direction(),
            alive: self.snake.is_alive(),
            food: self.food.position(),
            score: self.snake.score(),
            high_score: self.high_score,
        }
    }

    fn new_game(&mut self) {
        self.snake.reset(&mut self.rng);
        if !self.food.randomize_position(&self.grid, self.snake.body(), &mut self.rng) {
            log::warn!("no free cell for food on a {}x{} board", self.grid.columns(), self.grid.rows());
            self.game_over();
            return;
        }
        self.phase = Phase::Playing;
        log::info!("new game, heading {:?}", self.snake.direction());
    }

    fn game_over(&mut self) {
        self.high_score = self.high_score.max(self.snake.score());
        self.phase = Phase::GameOver;
        log::info!("game over with score {} (high score {})", self.snake.score(), self.high_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{Cue, Recorder};
    use crate::grid::Direction::*;

    fn session() -> Session<Recorder> {
        let config = Config { seed: Some(42), ..Config::default() };
        Session::new(&config, Recorder::default())
    }

    fn playing(direction: Direction) -> Session<Recorder> {
        let mut s = session();
        assert_eq!(s.handle_input(Input::Start), Flow::Continue);
        s.snake.respawn(direction);
        s.food = Food::at(Position::new(0, 0));
        s
    }

    /// Eats `meals` times, then boxes the snake back into its own body.
    fn crash(s: &mut Session<Recorder>, meals: u32) {
        s.food = Food::at(Position::new(0, 0));
        s.snake.respawn(Right);
        for _ in 0..meals {
            s.snake.grow(10);
        }
        for _ in 0..4 {
            assert_eq!(s.tick(), TickOutcome::Moved);
        }
        for dir in [Down, Left] {
            s.handle_input(Input::Turn(dir));
            assert_eq!(s.tick(), TickOutcome::Moved);
        }
        s.handle_input(Input::Turn(Up));
        assert_eq!(s.tick(), TickOutcome::Died { score: meals * 10 });
    }

    fn perpendicular(direction: Direction) -> Direction {
        match direction {
            Up | Down => Left,
            Left | Right => Up,
        }
    }

    #[test]
    fn test_starts_on_start_screen() {
        let s = session();
        assert_eq!(s.phase(), Phase::Start);
        assert_eq!(s.frame().phase, Phase::Start);
        assert_eq!(s.high_score(), 0);
        assert!(!s.snake().body().contains(&s.food().position()));
    }

    #[test]
    fn test_start_screen_does_not_simulate() {
        let mut s = session();
        let head = s.snake().head();
        for _ in 0..5 {
            assert_eq!(s.tick(), TickOutcome::Idle);
        }
        assert_eq!(s.snake().head(), head);
    }

    #[test]
    fn test_three_ticks_move_three_cells() {
        let mut s = playing(Right);
        let center = s.grid().center();

        for _ in 0..3 {
            assert_eq!(s.tick(), TickOutcome::Moved);
        }

        assert_eq!(s.snake().head(), Position::new(center.x + 60, center.y));
        assert_eq!(s.snake().len(), 3);
        assert_eq!(s.snake().score(), 0);
        assert_eq!(s.phase(), Phase::Playing);
    }

    #[test]
    fn test_three_ticks_wrap_at_edge() {
        let config = Config { columns: 4, rows: 4, seed: Some(9), ..Config::default() };
        let mut s = Session::new(&config, Recorder::default());
        s.handle_input(Input::Start);
        s.snake.respawn(Right);
        s.food = Food::at(Position::new(0, 0));

        // Centre is column 2 of 4: right, wrap to 0, then 1
        for _ in 0..3 {
            s.tick();
        }
        assert_eq!(s.snake().head(), Position::new(20, 40));
        assert_eq!(s.snake().len(), 3);
    }

    #[test]
    fn test_directional_input_is_phase_gated() {
        let mut s = session();
        let before = s.snake().direction();
        s.handle_input(Input::Turn(perpendicular(before)));
        assert_eq!(s.snake().direction(), before);

        let mut s = playing(Right);
        crash(&mut s, 3);
        assert_eq!(s.phase(), Phase::GameOver);
        let before = s.snake().direction();
        s.handle_input(Input::Turn(perpendicular(before)));
        assert_eq!(s.snake().direction(), before);
    }

    #[test]
    fn test_turn_while_playing() {
        let mut s = playing(Right);
        s.handle_input(Input::Turn(Left));
        assert_eq!(s.snake().direction(), Right);
        s.handle_input(Input::Turn(Up));
        assert_eq!(s.snake().direction(), Up);
    }

    #[test]
    fn test_death_commits_higher_score() {
        let mut s = playing(Right);
        s.high_score = 50;
        crash(&mut s, 7);
        assert_eq!(s.phase(), Phase::GameOver);
        assert_eq!(s.high_score(), 70);
        assert_eq!(s.audio.cues, vec![Cue::Crash]);
    }

    #[test]
    fn test_death_keeps_higher_high_score() {
        let mut s = playing(Right);
        s.high_score = 50;
        crash(&mut s, 3);
        assert_eq!(s.snake().score(), 30);
        assert_eq!(s.high_score(), 50);
    }

    #[test]
    fn test_score_passes_high_score_while_playing() {
        let mut s = playing(Right);
        s.high_score = 10;
        s.snake.grow(10);
        s.snake.grow(10);
        s.tick();
        assert_eq!(s.frame().score, 20);
        assert_eq!(s.frame().high_score, 10);
    }

    #[test]
    fn test_eating_grows_and_respawns_food() {
        let mut s = playing(Right);
        s.food = Food::at(s.grid().step(s.snake().head(), Right));

        assert_eq!(s.tick(), TickOutcome::Ate { score: 10 });
        assert_eq!(s.snake().score(), 10);
        assert_eq!(s.snake().pending_growth(), 2);
        assert!(!s.snake().body().contains(&s.food().position()));
        assert_eq!(s.audio.cues, vec![Cue::Eat]);
        assert_eq!(s.phase(), Phase::Playing);
    }

    #[test]
    fn test_restart_resets_snake() {
        let mut s = playing(Right);
        crash(&mut s, 3);
        assert_eq!(s.high_score(), 30);

        s.handle_input(Input::Start);
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.snake().score(), 0);
        assert_eq!(s.snake().len(), 1);
        assert!(s.snake().is_alive());
        assert!(!s.snake().body().contains(&s.food().position()));
        assert_eq!(s.high_score(), 30);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut s = playing(Right);
        s.tick();
        let head = s.snake().head();
        s.handle_input(Input::Start);
        assert_eq!(s.snake().head(), head);
        assert_eq!(s.phase(), Phase::Playing);
    }

    #[test]
    fn test_game_over_does_not_simulate() {
        let mut s = playing(Right);
        crash(&mut s, 3);
        let body = s.snake().body().clone();
        assert_eq!(s.tick(), TickOutcome::Idle);
        assert_eq!(s.snake().body(), &body);
        assert_eq!(s.audio.cues, vec![Cue::Crash]);
    }

    #[test]
    fn test_quit_from_every_phase() {
        let mut s = session();
        assert_eq!(s.handle_input(Input::Quit), Flow::Quit);
        s.handle_input(Input::Start);
        assert_eq!(s.handle_input(Input::Quit), Flow::Quit);
        crash(&mut s, 3);
        assert_eq!(s.handle_input(Input::Quit), Flow::Quit);
    }

    #[test]
    fn test_board_filled_ends_game() {
        let config = Config { columns: 2, rows: 1, initial_length: 2, seed: Some(3), ..Config::default() };
        let mut s = Session::new(&config, Recorder::default());
        s.handle_input(Input::Start);
        s.snake.respawn(Right);

        // The only free cell holds the food, eating it fills the board
        s.food = Food::at(s.grid().step(s.snake().head(), Right));
        assert_eq!(s.tick(), TickOutcome::BoardFilled { score: 10 });
        assert_eq!(s.phase(), Phase::GameOver);
        assert_eq!(s.high_score(), 10);
    }

    #[test]
    fn test_single_cell_board_never_plays() {
        let config = Config { columns: 1, rows: 1, seed: Some(1), ..Config::default() };
        assert!(config.validate().is_err());

        // Even unvalidated, starting cannot put the food under the snake
        let mut s = Session::new(&config, Recorder::default());
        s.handle_input(Input::Start);
        assert_eq!(s.phase(), Phase::GameOver);
        assert_eq!(s.tick(), TickOutcome::Idle);
        assert_eq!(s.high_score(), 0);
        assert!(s.audio.cues.is_empty());
    }
}
