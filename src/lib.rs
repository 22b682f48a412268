//! Snake on a toroidal grid: the simulation core (`grid`, `food`, `snake`,
//! `session`) and the crossterm front end that drives it (`term`, `render`,
//! `game`, `audio`).

pub mod audio;
pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod render;
pub mod session;
pub mod snake;
pub mod term;

pub type TermInt = u16;
pub type Coords = (u16, u16);
