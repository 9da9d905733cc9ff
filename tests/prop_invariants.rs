//! Property-based tests for the engine invariants.

use proptest::prelude::*;

use pandemic_rs::board::MAX_PLAGUE_CUBES;
use pandemic_rs::cards::PlayerCard;
use pandemic_rs::game::infection::MAX_INCIDENTS;
use pandemic_rs::game::{Game, GameConfig, GameEvent, PlayerAction, Step, StepResult, TurnFlow};
use pandemic_rs::players::{BasePlayer, DumbPlayer, RandomPlayer};

fn quiet(_: &str) {}

fn new_game(seed: u64) -> Game<fn(&str)> {
    Game::with_log(GameConfig::default().with_seed(seed), quiet as fn(&str)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Plague and incident counters stay bounded for any game the bots play.
    #[test]
    fn prop_counters_stay_bounded(seed in any::<u64>(), random in any::<bool>()) {
        let mut game = new_game(seed);
        for _ in 0..2_000 {
            if !game.state.is_playing() {
                break;
            }
            let step = if random {
                RandomPlayer.decide(&game.state)
            } else {
                DumbPlayer.decide(&game.state)
            };
            game.take_step(step).unwrap();
            prop_assert!(game.state.incidents.count() <= MAX_INCIDENTS);
            for location in game.state.map.locations() {
                prop_assert!(location.plague_cubes <= MAX_PLAGUE_CUBES);
            }
        }
    }

    /// Each outbreak cascade visits a location at most once.
    #[test]
    fn prop_outbreaks_never_repeat_within_a_draw(seed in any::<u64>(), loaded in 0usize..18) {
        let mut game = new_game(seed);
        let ids: Vec<_> = game.state.map.locations().iter().map(|l| l.id).collect();
        for id in ids.into_iter().take(loaded + 2) {
            let location = game.state.map.location_mut(id);
            location.supply_cubes = 0;
            location.plague_cubes = MAX_PLAGUE_CUBES;
        }
        game.state.turn_flow = TurnFlow::InfectCities { player: 0, remaining_cards: 2 };

        let result = game.take_step(Step::draw_infection_card("Ana")).unwrap();
        let StepResult::StateChanged { events, .. } = result else {
            return Err(TestCaseError::fail("infection draw had no effect"));
        };
        let mut outbroken = std::collections::HashSet::new();
        for event in &events {
            if let GameEvent::Outbreak { location } = event {
                prop_assert!(outbroken.insert(location.clone()), "{} outbroke twice", location);
            }
        }
    }

    /// Turn order always moves to the next seat and wraps after the fourth.
    #[test]
    fn prop_turns_cycle_through_the_seats(seed in any::<u64>()) {
        let mut game = new_game(seed);
        let mut previous = game.state.active_player().turn_order;
        for _ in 0..600 {
            if !game.state.is_playing() {
                break;
            }
            let step = DumbPlayer.decide(&game.state);
            game.take_step(step).unwrap();
            let current = game.state.active_player().turn_order;
            if current != previous {
                prop_assert_eq!(current, previous % 4 + 1);
                prop_assert!(matches!(game.state.turn_flow, TurnFlow::ExposureCheck { .. }), "expected TurnFlow::ExposureCheck");
                previous = current;
            }
        }
    }

    /// Dropping supplies conserves cubes and is refused exactly when too many are asked for.
    #[test]
    fn prop_drop_supplies_conserves_cubes(carried in 0u32..12, amount in 0u32..16) {
        let mut game = new_game(1);
        game.take_step(Step::check_for_exposure("Ana")).unwrap();
        game.state.players[0].supply_cubes = carried;
        let here = game.state.players[0].location;
        let before = game.state.map.location(here).supply_cubes;

        let result = game
            .take_step(Step::action("Ana", PlayerAction::drop_supplies(amount)))
            .unwrap();
        prop_assert_eq!(result.is_no_effect(), amount > carried);
        let after = game.state.map.location(here).supply_cubes;
        prop_assert_eq!(after + game.state.players[0].supply_cubes, before + carried);
    }

    /// Resolving an epidemic keeps every infection card and empties the discard pile.
    #[test]
    fn prop_epidemic_restacks_the_discard_pile(seed in any::<u64>(), drawn in 0usize..17) {
        let mut game = new_game(seed);
        for _ in 0..drawn {
            let card = game.state.infection_deck.draw().unwrap();
            game.state.infection_deck.discard(card);
        }
        let epidemic = game.state.cards.add_player_card(PlayerCard::Epidemic);
        game.state.players[0].hand.push(epidemic);
        let bottom = game.state.infection_deck.draw_pile()[0];
        let struck = game.state.cards.infection_card(bottom).location;
        let draw_before = game.state.infection_deck.draw_pile().len();
        let discard_before = game.state.infection_deck.discard_pile().len();
        let rate_before = game.state.infection_rate.position();

        game.take_step(Step::resolve_epidemic("Ana")).unwrap();
        prop_assert_eq!(game.state.infection_rate.position(), rate_before + 1);
        prop_assert_eq!(game.state.map.location(struck).supply_cubes, 0);
        prop_assert!(game.state.infection_deck.discard_pile().is_empty());
        prop_assert_eq!(
            game.state.infection_deck.draw_pile().len(),
            draw_before - 1 + discard_before + 1
        );
    }
}
