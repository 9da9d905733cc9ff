use crate::game::action::{PlayerAction, Step};
use crate::game::state::GameState;
use crate::game::PlayerId;
use crate::game::resolve::SUPPLY_CENTRE_CARDS;
use crate::players::BasePlayer;
use crate::players::base::{forced_step, phase_step, supply_centre_cards};

const SUPPLIES_TO_CARRY: u32 = 2;

/// Plays a fixed routine: build when possible, carry supplies to infected
/// cities and head for the worst neighbour.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumbPlayer;

impl DumbPlayer {
    fn choose_action(&self, state: &GameState, player: PlayerId) -> PlayerAction {
        let cards = supply_centre_cards(state, player);
        if cards.len() >= SUPPLY_CENTRE_CARDS {
            return PlayerAction::make_supply_centre(cards[..SUPPLY_CENTRE_CARDS].to_vec());
        }

        let here = state.player_location(player);
        let carried = state.players[player].supply_cubes;
        if here.plague_cubes > 0 && carried > 0 {
            return PlayerAction::drop_supplies(carried);
        }
        if carried < SUPPLIES_TO_CARRY {
            return PlayerAction::make_supplies();
        }

        here.neighbours()
            .map(|id| state.map.location(id))
            .max_by_key(|location| (location.plague_cubes, std::cmp::Reverse(location.id)))
            .map(|target| PlayerAction::move_to(target.name.clone()))
            .unwrap_or_else(PlayerAction::make_supplies)
    }
}

/// Discards the first card that is not a city, falling back to the oldest card.
fn least_useful_card(state: &GameState, player: PlayerId) -> usize {
    state.players[player]
        .hand
        .iter()
        .position(|card| state.cards.player_card(*card).city().is_none())
        .unwrap_or(0)
}

impl BasePlayer for DumbPlayer {
    fn decide(&self, state: &GameState) -> Step {
        if let Some(step) = forced_step(state, |player| least_useful_card(state, player)) {
            return step;
        }
        if let Some(step) = phase_step(state) {
            return step;
        }
        let player = state.turn_flow.player();
        Step::action(
            state.players[player].name.clone(),
            self.choose_action(state, player),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::PlayerCard;
    use crate::game::{Game, GameConfig, StepPayload};
    use crate::game::action::ActionKind;

    #[test]
    fn checks_exposure_first() {
        let game = Game::new(GameConfig::default()).unwrap();
        let step = DumbPlayer.decide(&game.state);
        assert_eq!(step, Step::check_for_exposure("Ana"));
    }

    #[test]
    fn builds_when_holding_five_matching_cards() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.take_step(Step::check_for_exposure("Ana")).unwrap();
        for city in ["Chicago", "New York", "London", "Toronto", "Washington"] {
            let location = game.state.map.find(city).unwrap();
            let card = game.state.cards.add_player_card(PlayerCard::City { location });
            game.state.players[0].hand.push(card);
        }
        game.state.players[0].hand.drain(..2);

        let step = DumbPlayer.decide(&game.state);
        let StepPayload::PlayerAction { action } = &step.payload else {
            panic!("expected an action, got {step}");
        };
        let ActionKind::MakeSupplyCentre { card_indices } = &action.kind else {
            panic!("expected a supply centre, got {action}");
        };
        assert_eq!(card_indices[0], 1);
        assert!(!game.take_step(step).unwrap().is_no_effect());
        assert!(game.state.map.by_name("New York").unwrap().has_supply_centre);
    }

    #[test]
    fn dumb_games_terminate() {
        let mut game = Game::new(GameConfig::default().with_seed(11)).unwrap();
        let bots = [DumbPlayer; 4];
        let status = game.play(&bots).unwrap();
        assert!(!game.state.history.is_empty());
        assert_eq!(status, game.state.status);
    }
}
