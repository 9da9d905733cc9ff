use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::GameConfig;
use crate::game::action::Step;
use crate::game::objectives::check_objectives;
use crate::game::required::{acting_player, intercept};
use crate::game::sink::{GameLog, LogSink};
use crate::game::state::{GameError, GameEvent, GameState, GameStatus, Handled, StepOutcome};
use crate::game::turn_flow::{TurnFlow, dispatch};
use crate::players::BasePlayer;

const TURNS_LIMIT: u32 = 1000;
const STEPS_LIMIT: usize = 50_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepResult {
    NoEffect {
        cause: String,
    },
    /// `next_turn_flow` is set only when the step moved the turn flow.
    StateChanged {
        next_turn_flow: Option<TurnFlow>,
        events: Vec<GameEvent>,
    },
}

impl StepResult {
    pub fn is_no_effect(&self) -> bool {
        matches!(self, StepResult::NoEffect { .. })
    }
}

pub struct Game<L: GameLog = LogSink> {
    pub id: Uuid,
    pub state: GameState,
    sink: L,
}

impl Game<LogSink> {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_log(config, LogSink)
    }
}

impl<L: GameLog> Game<L> {
    pub fn with_log(config: GameConfig, sink: L) -> Result<Self, GameError> {
        Ok(Self::from_state(GameState::new(config)?, sink))
    }

    pub fn from_state(state: GameState, sink: L) -> Self {
        Self {
            id: Uuid::new_v4(),
            state,
            sink,
        }
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Applies one step. Rejected steps come back as `NoEffect` and leave the
    /// state as it was; errors mean the game can no longer be trusted.
    pub fn take_step(&mut self, step: Step) -> Result<StepResult, GameError> {
        if !self.state.is_playing() {
            return Err(GameError::GameFinished(self.state.status));
        }

        let mut outcome = StepOutcome::default();
        let handled = match intercept(&mut self.state, &step, &mut outcome)? {
            Some(handled) => handled,
            None => dispatch(&mut self.state, &step, &mut outcome)?,
        };
        let next = match handled {
            Handled::NoEffect(cause) => {
                log::debug!("{step} had no effect: {cause}");
                return Ok(StepResult::NoEffect { cause });
            }
            Handled::Changed { next } => next,
        };

        if let Some(next) = next {
            self.advance(next, &mut outcome);
        }
        self.state.history.push(step);
        check_objectives(&mut self.state, &mut outcome);
        if self.state.status == GameStatus::Won {
            log::warn!("game {} won on turn {}", self.id, self.state.turn);
        }

        for event in &outcome.events {
            let line = event.to_string();
            self.sink.log(&line);
            self.state.log.push(line);
        }
        Ok(StepResult::StateChanged {
            next_turn_flow: next,
            events: outcome.events,
        })
    }

    fn advance(&mut self, next: TurnFlow, outcome: &mut StepOutcome) {
        let previous = std::mem::replace(&mut self.state.turn_flow, next);
        if previous.player() != next.player() {
            outcome.emit(GameEvent::TurnPassed {
                player: self.state.players[next.player()].name.clone(),
            });
        }
        if previous.phase() != next.phase() {
            outcome.emit(GameEvent::PhaseChanged {
                player: self.state.players[next.player()].name.clone(),
                phase: next.phase(),
            });
        }
    }

    /// Lets the bots play until the game ends or the turn limit is hit.
    pub fn play<P: BasePlayer>(&mut self, players: &[P]) -> Result<GameStatus, GameError> {
        let mut steps = 0;
        while self.state.is_playing() && self.state.turn < TURNS_LIMIT && steps < STEPS_LIMIT {
            self.play_tick(players)?;
            steps += 1;
        }
        Ok(self.state.status)
    }

    pub fn play_tick<P: BasePlayer>(
        &mut self,
        players: &[P],
    ) -> Result<Option<StepResult>, GameError> {
        let Some(player) = players.get(acting_player(&self.state)) else {
            return Ok(None);
        };
        let step = player.decide(&self.state);
        self.take_step(step).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TurnPhase;

    #[test]
    fn phase_change_is_logged_to_the_sink() {
        let mut lines = Vec::new();
        {
            let sink = |line: &str| lines.push(line.to_string());
            let mut game = Game::with_log(GameConfig::default(), sink).unwrap();
            let result = game.take_step(Step::check_for_exposure("Ana")).unwrap();
            let StepResult::StateChanged {
                next_turn_flow,
                events,
            } = result
            else {
                panic!("exposure check should change the state");
            };
            assert_eq!(
                next_turn_flow.map(|flow| flow.phase()),
                Some(TurnPhase::Take4Actions)
            );
            assert!(events.iter().any(|event| matches!(
                event,
                GameEvent::PhaseChanged {
                    phase: TurnPhase::Take4Actions,
                    ..
                }
            )));
            assert_eq!(game.state.history.len(), 1);
            assert_eq!(game.state.log.len(), events.len());
        }
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Ana checked for exposure in New York"));
    }

    #[test]
    fn no_effect_leaves_history_and_log_alone() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let result = game.take_step(Step::draw_player_card("Ana")).unwrap();
        assert!(result.is_no_effect());
        assert!(game.state.history.is_empty());
        assert!(game.state.log.is_empty());
        assert_eq!(game.state.turn_flow, TurnFlow::ExposureCheck { player: 0 });
    }

    #[test]
    fn finished_games_refuse_steps() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.state.status = GameStatus::Won;
        assert!(matches!(
            game.take_step(Step::check_for_exposure("Ana")),
            Err(GameError::GameFinished(GameStatus::Won))
        ));
    }
}
