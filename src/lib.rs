#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cards;
pub mod cli;
pub mod game;
pub mod players;
pub mod save;
pub mod types;

pub use board::{Location, LocationId, MapTemplate, WorldMap};
pub use game::{Game, GameConfig, GameError, GameState, GameStatus, Step, StepResult};
pub use save::{JsonFileRepository, Repository, SaveError, SaveGame};
