use crate::types::StepType;

use super::action::{Step, StepPayload};
use super::epidemic::{ensure_infection_cards, resolve_epidemic};
use super::players::PlayerId;
use super::state::{GameError, GameEvent, GameState, Handled, StepOutcome};

type Handler = fn(&mut GameState, &Step, &mut StepOutcome) -> Result<Handled, GameError>;

/// A step that must be taken before normal play resumes, whatever the phase.
struct RequiredRule {
    step_type: StepType,
    reason: &'static str,
    pending: fn(&GameState) -> Option<PlayerId>,
    handle: Handler,
}

/// Checked in order; the first pending rule decides the step.
const RULES: [RequiredRule; 2] = [
    RequiredRule {
        step_type: StepType::ResolveEpidemic,
        reason: "holds an epidemic card",
        pending: epidemic_holder,
        handle: handle_resolve_epidemic,
    },
    RequiredRule {
        step_type: StepType::DiscardPlayerCard,
        reason: "holds too many cards",
        pending: overloaded_hand,
        handle: handle_discard,
    },
];

fn epidemic_holder(state: &GameState) -> Option<PlayerId> {
    state
        .players
        .iter()
        .position(|player| player.holds_epidemic(&state.cards))
}

fn overloaded_hand(state: &GameState) -> Option<PlayerId> {
    state
        .players
        .iter()
        .position(|player| player.exceeds_hand_limit())
}

/// The step type the interceptor chain currently forces, and who is expected to take it.
pub fn required_step(state: &GameState) -> Option<(StepType, PlayerId)> {
    RULES
        .iter()
        .find_map(|rule| (rule.pending)(state).map(|player| (rule.step_type, player)))
}

/// The player expected to act next: whoever a required step names, else the
/// turn-flow player.
pub fn acting_player(state: &GameState) -> PlayerId {
    required_step(state)
        .map(|(_, player)| player)
        .unwrap_or_else(|| state.turn_flow.player())
}

/// Runs the interceptor chain. `None` means no rule is pending and the step
/// goes on to the turn flow.
pub fn intercept(
    state: &mut GameState,
    step: &Step,
    outcome: &mut StepOutcome,
) -> Result<Option<Handled>, GameError> {
    for rule in &RULES {
        let Some(player) = (rule.pending)(state) else {
            continue;
        };
        if step.step_type() != rule.step_type {
            log::debug!("{} intercepted, {} is pending", step.step_type(), rule.step_type);
            return Ok(Some(Handled::no_effect(format!(
                "{} is required: {} {}",
                rule.step_type, state.players[player].name, rule.reason
            ))));
        }
        return (rule.handle)(state, step, outcome).map(Some);
    }
    Ok(None)
}

fn handle_resolve_epidemic(
    state: &mut GameState,
    step: &Step,
    outcome: &mut StepOutcome,
) -> Result<Handled, GameError> {
    let held = state
        .player_index(&step.player)
        .and_then(|player| Some((player, state.players[player].epidemic_index(&state.cards)?)));
    let Some((player, idx)) = held else {
        return Ok(Handled::no_effect(format!(
            "{} holds no epidemic card",
            step.player
        )));
    };
    ensure_infection_cards(state)?;

    let card = state.players[player].hand.remove(idx);
    state.player_deck.discard(card);
    outcome.emit(GameEvent::PlayerCardDiscarded {
        player: step.player.clone(),
        card: state.card_label(card),
    });
    resolve_epidemic(state, outcome)?;
    Ok(Handled::changed(None))
}

fn handle_discard(
    state: &mut GameState,
    step: &Step,
    outcome: &mut StepOutcome,
) -> Result<Handled, GameError> {
    let StepPayload::DiscardPlayerCard { card_index } = step.payload else {
        return Ok(Handled::no_effect(format!(
            "{} is required",
            StepType::DiscardPlayerCard
        )));
    };
    let Some(player) = state
        .player_index(&step.player)
        .filter(|player| state.players[*player].exceeds_hand_limit())
    else {
        return Ok(Handled::no_effect(format!(
            "{} does not need to discard",
            step.player
        )));
    };
    let hand = &mut state.players[player].hand;
    if card_index >= hand.len() {
        return Ok(Handled::no_effect(format!(
            "card index {card_index} is out of range; the hand holds {} cards",
            hand.len()
        )));
    }

    let card = hand.remove(card_index);
    state.player_deck.discard(card);
    outcome.emit(GameEvent::PlayerCardDiscarded {
        player: step.player.clone(),
        card: state.card_label(card),
    });
    Ok(Handled::changed(None))
}
