use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::TurnPhase;

use super::action::{PlayerAction, Step, StepPayload};
use super::epidemic::{ensure_infection_cards, resolve_epidemic};
use super::infection::draw_infection_card;
use super::players::{PlayerId, next_turn_order};
use super::resolve::resolve_action;
use super::state::{GameError, GameEvent, GameState, Handled, LossCause, StepOutcome};

pub const ACTIONS_PER_TURN: u8 = 4;
pub const PLAYER_CARDS_PER_TURN: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase")]
pub enum TurnFlow {
    #[serde(rename = "exposure_check")]
    ExposureCheck { player: PlayerId },
    #[serde(rename = "take_4_actions")]
    Take4Actions {
        player: PlayerId,
        remaining_actions: u8,
    },
    #[serde(rename = "draw_2_cards")]
    Draw2Cards {
        player: PlayerId,
        remaining_cards: u8,
    },
    #[serde(rename = "infect_cities")]
    InfectCities {
        player: PlayerId,
        remaining_cards: u8,
    },
}

impl TurnFlow {
    pub fn player(&self) -> PlayerId {
        match *self {
            TurnFlow::ExposureCheck { player }
            | TurnFlow::Take4Actions { player, .. }
            | TurnFlow::Draw2Cards { player, .. }
            | TurnFlow::InfectCities { player, .. } => player,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        match self {
            TurnFlow::ExposureCheck { .. } => TurnPhase::ExposureCheck,
            TurnFlow::Take4Actions { .. } => TurnPhase::Take4Actions,
            TurnFlow::Draw2Cards { .. } => TurnPhase::Draw2Cards,
            TurnFlow::InfectCities { .. } => TurnPhase::InfectCities,
        }
    }

    /// Actions, player cards or infection cards still owed in this phase.
    pub fn remaining(&self) -> Option<u8> {
        match *self {
            TurnFlow::ExposureCheck { .. } => None,
            TurnFlow::Take4Actions {
                remaining_actions, ..
            } => Some(remaining_actions),
            TurnFlow::Draw2Cards {
                remaining_cards, ..
            }
            | TurnFlow::InfectCities {
                remaining_cards, ..
            } => Some(remaining_cards),
        }
    }
}

impl fmt::Display for TurnFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.remaining() {
            Some(remaining) => write!(f, "{} ({remaining} remaining)", self.phase()),
            None => write!(f, "{}", self.phase()),
        }
    }
}

/// Routes a step to the handler for the current phase.
pub fn dispatch(
    state: &mut GameState,
    step: &Step,
    outcome: &mut StepOutcome,
) -> Result<Handled, GameError> {
    let Some(player) = state.player_index(&step.player) else {
        return Ok(Handled::no_effect(format!("unknown player {}", step.player)));
    };
    let active = state.turn_flow.player();
    if player != active {
        return Ok(Handled::no_effect(format!(
            "it is {}'s turn, not {}",
            state.players[active].name, step.player
        )));
    }

    match (state.turn_flow, &step.payload) {
        (TurnFlow::ExposureCheck { player }, StepPayload::CheckForExposure) => {
            Ok(check_for_exposure(state, player, outcome))
        }
        (
            TurnFlow::Take4Actions {
                player,
                remaining_actions,
            },
            StepPayload::PlayerAction { action },
        ) => Ok(take_action(state, player, remaining_actions, action, outcome)),
        (
            TurnFlow::Draw2Cards {
                player,
                remaining_cards,
            },
            StepPayload::DrawPlayerCard,
        ) => draw_player_card(state, player, remaining_cards, outcome),
        (
            TurnFlow::InfectCities {
                player,
                remaining_cards,
            },
            StepPayload::DrawInfectionCard,
        ) => infect_cities(state, player, remaining_cards, outcome),
        (_, StepPayload::PlayEventCard { .. }) => Ok(Handled::no_effect(format!(
            "{} is not implemented yet",
            step.step_type()
        ))),
        (flow, payload) => Ok(Handled::no_effect(format!(
            "{} is not allowed during {}; {} is expected",
            payload.step_type(),
            flow.phase(),
            flow.phase().expected_step()
        ))),
    }
}

fn check_for_exposure(
    state: &mut GameState,
    player: PlayerId,
    outcome: &mut StepOutcome,
) -> Handled {
    let location = state.player_location(player);
    outcome.emit(GameEvent::ExposureChecked {
        player: state.players[player].name.clone(),
        location: location.name.clone(),
        plague_cubes: location.plague_cubes,
    });
    Handled::changed(Some(TurnFlow::Take4Actions {
        player,
        remaining_actions: ACTIONS_PER_TURN,
    }))
}

fn take_action(
    state: &mut GameState,
    player: PlayerId,
    remaining_actions: u8,
    action: &PlayerAction,
    outcome: &mut StepOutcome,
) -> Handled {
    if !action.is_free && remaining_actions == 0 {
        return Handled::no_effect("no actions remaining this turn");
    }
    match resolve_action(state, player, action, outcome) {
        Handled::Changed { .. } if !action.is_free => {
            let next = if remaining_actions <= 1 {
                TurnFlow::Draw2Cards {
                    player,
                    remaining_cards: PLAYER_CARDS_PER_TURN,
                }
            } else {
                TurnFlow::Take4Actions {
                    player,
                    remaining_actions: remaining_actions - 1,
                }
            };
            Handled::changed(Some(next))
        }
        handled => handled,
    }
}

fn draw_player_card(
    state: &mut GameState,
    player: PlayerId,
    remaining_cards: u8,
    outcome: &mut StepOutcome,
) -> Result<Handled, GameError> {
    let epidemic_on_top = state
        .player_deck
        .draw_pile()
        .last()
        .is_some_and(|&top| state.cards.player_card(top).is_epidemic());
    if epidemic_on_top {
        ensure_infection_cards(state)?;
    }
    let Some(card) = state.player_deck.draw() else {
        state.lose(LossCause::PlayerDeckEmpty, outcome);
        return Ok(Handled::changed(None));
    };
    let name = state.players[player].name.clone();
    if state.cards.player_card(card).is_epidemic() {
        outcome.emit(GameEvent::EpidemicDrawn { player: name });
        state.player_deck.discard(card);
        resolve_epidemic(state, outcome)?;
    } else {
        outcome.emit(GameEvent::PlayerCardDrawn {
            player: name,
            card: state.card_label(card),
        });
        state.players[player].hand.push(card);
    }

    let next = if remaining_cards <= 1 {
        TurnFlow::InfectCities {
            player,
            remaining_cards: state.infection_rate.cards(),
        }
    } else {
        TurnFlow::Draw2Cards {
            player,
            remaining_cards: remaining_cards - 1,
        }
    };
    Ok(Handled::changed(Some(next)))
}

fn infect_cities(
    state: &mut GameState,
    player: PlayerId,
    remaining_cards: u8,
    outcome: &mut StepOutcome,
) -> Result<Handled, GameError> {
    let next_order = next_turn_order(state.players[player].turn_order);
    let next_player = state
        .player_by_turn_order(next_order)
        .ok_or(GameError::MissingTurnOrder(next_order))?;

    draw_infection_card(state, outcome)?;
    if !state.is_playing() {
        return Ok(Handled::changed(None));
    }
    if remaining_cards > 1 {
        return Ok(Handled::changed(Some(TurnFlow::InfectCities {
            player,
            remaining_cards: remaining_cards - 1,
        })));
    }
    state.turn += 1;
    Ok(Handled::changed(Some(TurnFlow::ExposureCheck {
        player: next_player,
    })))
}
