use crate::game::action::Step;
use crate::game::required::required_step;
use crate::game::state::GameState;
use crate::game::turn_flow::TurnFlow;
use crate::game::PlayerId;
use crate::types::StepType;

pub trait BasePlayer {
    /// Picks the next step for whoever is expected to act in `state`.
    fn decide(&self, state: &GameState) -> Step;
}

/// The step forced on the table by a pending epidemic or an oversized hand.
/// `pick_discard` chooses which hand index goes when cards must be discarded.
pub fn forced_step(
    state: &GameState,
    pick_discard: impl FnOnce(PlayerId) -> usize,
) -> Option<Step> {
    let (step_type, player) = required_step(state)?;
    let name = state.players[player].name.clone();
    match step_type {
        StepType::ResolveEpidemic => Some(Step::resolve_epidemic(name)),
        StepType::DiscardPlayerCard => Some(Step::discard(name, pick_discard(player))),
        _ => None,
    }
}

/// The only step a phase without choices accepts. `None` while actions are due.
pub fn phase_step(state: &GameState) -> Option<Step> {
    let name = state.active_player().name.clone();
    match state.turn_flow {
        TurnFlow::ExposureCheck { .. } => Some(Step::check_for_exposure(name)),
        TurnFlow::Take4Actions { .. } => None,
        TurnFlow::Draw2Cards { .. } => Some(Step::draw_player_card(name)),
        TurnFlow::InfectCities { .. } => Some(Step::draw_infection_card(name)),
    }
}

/// Hand indices of the city cards sharing the colour of the player's location,
/// with the local city card first. Empty when no supply centre can be built there.
pub fn supply_centre_cards(state: &GameState, player: PlayerId) -> Vec<usize> {
    let here = state.player_location(player);
    if here.has_supply_centre || !here.color.is_coloured() {
        return Vec::new();
    }
    let mut local = None;
    let mut others = Vec::new();
    for (idx, card) in state.players[player].hand.iter().enumerate() {
        match state.cards.player_card(*card).city() {
            Some(city) if city == here.id => local = Some(idx),
            Some(city) if state.map.location(city).color == here.color => others.push(idx),
            _ => {}
        }
    }
    match local {
        Some(local) => std::iter::once(local).chain(others).collect(),
        None => Vec::new(),
    }
}
