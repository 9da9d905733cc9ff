pub mod action;
pub mod config;
pub mod epidemic;
pub mod game;
pub mod infection;
pub mod objectives;
pub mod players;
pub mod required;
pub mod resolve;
pub mod sink;
pub mod state;
pub mod turn_flow;

pub use action::{ActionKind, PlayerAction, Step, StepPayload};
pub use config::GameConfig;
pub use game::{Game, StepResult};
pub use infection::{Incidents, InfectionRate};
pub use objectives::Objective;
pub use players::{PlayerId, PlayerState};
pub use required::{acting_player, required_step};
pub use sink::{GameLog, LogSink};
pub use state::{GameError, GameEvent, GameState, GameStatus, Handled, LossCause, StepOutcome};
pub use turn_flow::TurnFlow;
