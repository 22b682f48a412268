use std::{io, time::{Duration, Instant}};

use crate::audio::AudioSink;
use crate::config::Config;
use crate::grid::Direction::{self, *};
use crate::render::{self, Renderer};
use crate::session::{Flow, Input, Session, TickOutcome};
use crate::term::TermManager;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Delivers the player's inputs gathered while waiting for the next tick.
pub trait InputSource {
    fn inputs_until(&mut self, deadline: Instant) -> io::Result<Vec<Input>>;
}

impl InputSource for TermManager {
    fn inputs_until(&mut self, deadline: Instant) -> io::Result<Vec<Input>> {
        let events = self.read_key_events_until(deadline)?;
        Ok(events.iter().filter_map(decode_key).collect())
    }
}

pub struct SnakeGame<A: AudioSink> {
    session: Session<A>,
    term: TermManager,
    tick_interval: Duration,
}

impl<A: AudioSink> SnakeGame<A> {
    pub fn new(config: &Config, audio: A) -> Result<Self> {
        let term = TermManager::new().context("failed to read the terminal size")?;
        let session = Session::new(config, audio);
        render::check_fits(term.get_terminal_size(), session.grid())?;

        Ok(SnakeGame { session, term, tick_interval: config.tick_interval() })
    }

    /// Plays until the player quits. The terminal is restored on every exit path.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup().context("failed to set up the terminal")?;

        let res = run_loop(&mut self.session, &mut self.term, self.tick_interval);

        if let Err(err) = self.term.restore() {
            log::error!("failed to restore the terminal: {}", err);
        }
        res
    }
}

/// Fixed-rate loop: gather input until the tick is due, apply it in arrival
/// order, advance the session, then draw.
pub fn run_loop<A, T>(session: &mut Session<A>, term: &mut T, tick_interval: Duration) -> Result<()>
where
    A: AudioSink,
    T: Renderer + InputSource,
{
    term.render(&session.frame()).context("failed to draw the start screen")?;
    let mut next_tick = Instant::now() + tick_interval;

    loop {
        for input in term.inputs_until(next_tick).context("failed to read input")? {
            if session.handle_input(input) == Flow::Quit {
                log::info!("quit requested");
                return Ok(());
            }
        }

        match session.tick() {
            TickOutcome::Idle | TickOutcome::Moved => {},
            TickOutcome::Ate { score } => log::debug!("ate, score now {}", score),
            TickOutcome::Died { score } => log::debug!("crashed with score {}", score),
            TickOutcome::BoardFilled { score } => log::info!("board filled with score {}", score),
        }
        log::trace!("tick: {:?}, head at {:?}", session.phase(), session.snake().head());

        term.render(&session.frame()).context("failed to draw the board")?;

        // Fall behind gracefully instead of replaying missed ticks
        next_tick = (next_tick + tick_interval).max(Instant::now());
    }
}

fn decode_key(ev: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(ev) {
        return Some(Input::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Input::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Input::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Input::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Input::Turn(Right)),
        KeyCode::Char(' ') => Some(Input::Start),
        KeyCode::Esc | KeyCode::Char('q') => Some(Input::Quit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
