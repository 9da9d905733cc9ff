use rand::Rng;
use rand::seq::IteratorRandom;

use crate::game::action::{PlayerAction, Step};
use crate::game::state::GameState;
use crate::game::PlayerId;
use crate::players::BasePlayer;
use crate::players::base::{forced_step, phase_step, supply_centre_cards};

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPlayer;

fn random_action(state: &GameState, player: PlayerId, rng: &mut impl Rng) -> PlayerAction {
    let carried = state.players[player].supply_cubes;
    match rng.gen_range(0..4) {
        0 => {
            let cards = supply_centre_cards(state, player);
            if cards.is_empty() {
                PlayerAction::make_supplies()
            } else {
                PlayerAction::make_supply_centre(cards)
            }
        }
        1 if carried > 0 => PlayerAction::drop_supplies(rng.gen_range(1..=carried)),
        2 => PlayerAction::make_supplies(),
        _ => state
            .player_location(player)
            .neighbours()
            .choose(rng)
            .map(|id| PlayerAction::move_to(state.map.name(id)))
            .unwrap_or_else(PlayerAction::make_supplies),
    }
}

impl BasePlayer for RandomPlayer {
    fn decide(&self, state: &GameState) -> Step {
        let mut rng = rand::thread_rng();
        if let Some(step) = forced_step(state, |player| {
            rng.gen_range(0..state.players[player].hand.len())
        }) {
            return step;
        }
        if let Some(step) = phase_step(state) {
            return step;
        }
        let player = state.turn_flow.player();
        Step::action(
            state.players[player].name.clone(),
            random_action(state, player, &mut rng),
        )
    }
}
