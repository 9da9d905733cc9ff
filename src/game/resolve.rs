use std::collections::HashSet;

use itertools::Itertools;

use crate::board::LocationId;
use crate::cards::PlayerCardId;

use super::action::{ActionKind, PlayerAction};
use super::players::PlayerId;
use super::state::{GameEvent, GameState, Handled, StepOutcome};

/// Matching city cards needed to build a supply centre.
pub const SUPPLY_CENTRE_CARDS: usize = 5;

/// Applies one player action. Every check runs before the first mutation, so a
/// `NoEffect` leaves the state untouched. Action points are the caller's concern.
pub fn resolve_action(
    state: &mut GameState,
    player: PlayerId,
    action: &PlayerAction,
    outcome: &mut StepOutcome,
) -> Handled {
    match &action.kind {
        ActionKind::Move { to } => move_player(state, player, to, outcome),
        ActionKind::MakeSupplies => make_supplies(state, player, outcome),
        ActionKind::DropSupplies { amount } => drop_supplies(state, player, *amount, outcome),
        ActionKind::MakeSupplyCentre { card_indices } => {
            make_supply_centre(state, player, card_indices, outcome)
        }
    }
}

fn move_player(
    state: &mut GameState,
    player: PlayerId,
    to: &str,
    outcome: &mut StepOutcome,
) -> Handled {
    let from = state.players[player].location;
    let current = state.map.location(from);
    let target = state
        .map
        .find(to)
        .filter(|target| current.is_connected_to(*target));
    let Some(target) = target else {
        let destinations = current
            .neighbours()
            .map(|id| state.map.name(id))
            .join(", ");
        return Handled::no_effect(format!(
            "cannot move from {} to {to}; possible destinations: {destinations}",
            current.name
        ));
    };

    relocate(state, player, from, target);
    outcome.emit(GameEvent::PlayerMoved {
        player: state.players[player].name.clone(),
        from: state.map.name(from).to_string(),
        to: state.map.name(target).to_string(),
    });
    Handled::changed(None)
}

fn relocate(state: &mut GameState, player: PlayerId, from: LocationId, to: LocationId) {
    state
        .map
        .location_mut(from)
        .players
        .retain(|occupant| *occupant != player);
    state.players[player].location = to;
    state.map.location_mut(to).players.push(player);
}

fn make_supplies(state: &mut GameState, player: PlayerId, outcome: &mut StepOutcome) -> Handled {
    let carrier = &mut state.players[player];
    carrier.supply_cubes += 1;
    outcome.emit(GameEvent::SuppliesMade {
        player: carrier.name.clone(),
        carried: carrier.supply_cubes,
    });
    Handled::changed(None)
}

fn drop_supplies(
    state: &mut GameState,
    player: PlayerId,
    amount: u32,
    outcome: &mut StepOutcome,
) -> Handled {
    let carried = state.players[player].supply_cubes;
    if amount > carried {
        return Handled::no_effect(format!(
            "cannot drop {amount} supplies; {} carries {carried}",
            state.players[player].name
        ));
    }
    let location = state.players[player].location;
    state.players[player].supply_cubes -= amount;
    state.map.location_mut(location).supply_cubes += amount;
    outcome.emit(GameEvent::SuppliesDropped {
        player: state.players[player].name.clone(),
        location: state.map.name(location).to_string(),
        amount,
    });
    Handled::changed(None)
}

fn make_supply_centre(
    state: &mut GameState,
    player: PlayerId,
    card_indices: &[usize],
    outcome: &mut StepOutcome,
) -> Handled {
    let location_id = state.players[player].location;
    let location = state.map.location(location_id);
    if location.has_supply_centre {
        return Handled::no_effect(format!("{} already has a supply centre", location.name));
    }
    if !location.color.is_coloured() {
        return Handled::no_effect(format!(
            "a supply centre cannot be built in {}; it has no colour",
            location.name
        ));
    }

    let hand = &state.players[player].hand;
    let mut unique = HashSet::new();
    if let Some(bad) = card_indices
        .iter()
        .find(|idx| **idx >= hand.len() || !unique.insert(**idx))
    {
        return Handled::no_effect(format!(
            "card index {bad} is invalid or repeated; the hand holds {} cards",
            hand.len()
        ));
    }
    let selected: Vec<PlayerCardId> = card_indices.iter().map(|idx| hand[*idx]).collect();

    let matching: Vec<LocationId> = selected
        .iter()
        .filter_map(|card| state.cards.player_card(*card).city())
        .filter(|city| state.map.location(*city).color == location.color)
        .collect();
    if matching.len() < SUPPLY_CENTRE_CARDS {
        return Handled::no_effect(format!(
            "{SUPPLY_CENTRE_CARDS} {} city cards are needed, {} selected",
            location.color,
            matching.len()
        ));
    }
    if !matching.contains(&location_id) {
        return Handled::no_effect(format!(
            "the {} city card must be among the selected cards",
            location.name
        ));
    }

    let mut removal: Vec<usize> = card_indices.to_vec();
    removal.sort_unstable_by(|a, b| b.cmp(a));
    let hand = &mut state.players[player].hand;
    for idx in removal {
        hand.remove(idx);
    }
    for card in selected {
        state.player_deck.discard(card);
    }
    state.map.location_mut(location_id).has_supply_centre = true;
    outcome.emit(GameEvent::SupplyCentreBuilt {
        player: state.players[player].name.clone(),
        location: state.map.name(location_id).to_string(),
    });
    Handled::changed(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::PlayerCard;
    use crate::game::config::GameConfig;

    fn fresh_state() -> GameState {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        for player in state.players.iter_mut() {
            player.hand.clear();
        }
        state
    }

    fn give_city(state: &mut GameState, player: PlayerId, city: &str) -> PlayerCardId {
        let location = state.map.find(city).unwrap();
        let card = state.cards.add_player_card(PlayerCard::City { location });
        state.players[player].hand.push(card);
        card
    }

    #[test]
    fn move_updates_both_occupant_lists() {
        let mut state = fresh_state();
        let mut outcome = StepOutcome::default();
        let handled = resolve_action(&mut state, 0, &PlayerAction::move_to("London"), &mut outcome);
        assert_eq!(handled, Handled::changed(None));
        let london = state.map.find("London").unwrap();
        assert_eq!(state.players[0].location, london);
        assert_eq!(state.map.location(london).players, vec![0]);
        assert_eq!(state.map.by_name("New York").unwrap().players, vec![1, 2, 3]);
    }

    #[test]
    fn move_to_unconnected_location_lists_destinations() {
        let mut state = fresh_state();
        let mut outcome = StepOutcome::default();
        let handled = resolve_action(&mut state, 0, &PlayerAction::move_to("Cairo"), &mut outcome);
        let Handled::NoEffect(cause) = handled else {
            panic!("expected no effect");
        };
        for neighbour in ["Toronto", "Washington", "London", "North Atlantic Haven"] {
            assert!(cause.contains(neighbour), "{cause}");
        }
        assert!(!cause.contains("Lagos"));
        assert!(outcome.events.is_empty());
        assert_eq!(state.map.name(state.players[0].location), "New York");
    }

    #[test]
    fn dropping_more_than_carried_is_rejected() {
        let mut state = fresh_state();
        state.players[0].supply_cubes = 2;
        let mut outcome = StepOutcome::default();
        let handled =
            resolve_action(&mut state, 0, &PlayerAction::drop_supplies(3), &mut outcome);
        assert!(matches!(handled, Handled::NoEffect(_)));
        assert_eq!(state.players[0].supply_cubes, 2);

        let before = state.map.by_name("New York").unwrap().supply_cubes;
        let handled =
            resolve_action(&mut state, 0, &PlayerAction::drop_supplies(2), &mut outcome);
        assert_eq!(handled, Handled::changed(None));
        assert_eq!(state.players[0].supply_cubes, 0);
        assert_eq!(state.map.by_name("New York").unwrap().supply_cubes, before + 2);
    }

    #[test]
    fn supply_centre_discards_every_selected_card() {
        let mut state = fresh_state();
        let cards: Vec<PlayerCardId> = ["Washington", "New York", "London", "Chicago", "Toronto"]
            .iter()
            .map(|city| give_city(&mut state, 0, city))
            .collect();
        let mut outcome = StepOutcome::default();
        let action = PlayerAction::make_supply_centre(vec![0, 1, 2, 3, 4]);
        assert_eq!(
            resolve_action(&mut state, 0, &action, &mut outcome),
            Handled::changed(None)
        );
        assert!(state.map.by_name("New York").unwrap().has_supply_centre);
        assert!(state.players[0].hand.is_empty());
        assert_eq!(state.player_deck.discard_pile(), cards.as_slice());

        let again = resolve_action(&mut state, 0, &action, &mut outcome);
        assert!(matches!(again, Handled::NoEffect(cause) if cause.contains("already")));
        assert_eq!(state.player_deck.discard_pile().len(), 5);
    }

    #[test]
    fn supply_centre_requires_the_local_card() {
        let mut state = fresh_state();
        for city in ["Washington", "London", "Chicago", "Toronto", "Frankfurt"] {
            give_city(&mut state, 0, city);
        }
        let mut outcome = StepOutcome::default();
        let action = PlayerAction::make_supply_centre(vec![0, 1, 2, 3, 4]);
        let handled = resolve_action(&mut state, 0, &action, &mut outcome);
        assert!(matches!(handled, Handled::NoEffect(cause) if cause.contains("New York")));
        assert_eq!(state.players[0].hand.len(), 5);
        assert!(state.player_deck.discard_pile().is_empty());
    }

    #[test]
    fn supply_centre_ignores_off_colour_cards() {
        let mut state = fresh_state();
        for city in ["New York", "London", "Chicago", "Toronto", "Cairo", "Lagos"] {
            give_city(&mut state, 0, city);
        }
        let mut outcome = StepOutcome::default();
        let action = PlayerAction::make_supply_centre(vec![0, 1, 2, 3, 4, 5]);
        let handled = resolve_action(&mut state, 0, &action, &mut outcome);
        assert!(matches!(handled, Handled::NoEffect(cause) if cause.contains("4 selected")));
        assert!(!state.map.by_name("New York").unwrap().has_supply_centre);
    }

    #[test]
    fn supply_centre_rejects_repeated_indices() {
        let mut state = fresh_state();
        for city in ["New York", "London", "Chicago", "Toronto", "Washington"] {
            give_city(&mut state, 0, city);
        }
        let mut outcome = StepOutcome::default();
        let action = PlayerAction::make_supply_centre(vec![0, 1, 2, 3, 3]);
        let handled = resolve_action(&mut state, 0, &action, &mut outcome);
        assert!(matches!(handled, Handled::NoEffect(_)));
        assert_eq!(state.players[0].hand.len(), 5);
    }

    #[test]
    fn havens_cannot_host_supply_centres() {
        let mut state = fresh_state();
        let mut outcome = StepOutcome::default();
        resolve_action(
            &mut state,
            0,
            &PlayerAction::move_to("North Atlantic Haven"),
            &mut outcome,
        );
        let handled = resolve_action(
            &mut state,
            0,
            &PlayerAction::make_supply_centre(Vec::new()),
            &mut outcome,
        );
        assert!(matches!(handled, Handled::NoEffect(cause) if cause.contains("no colour")));
    }
}
