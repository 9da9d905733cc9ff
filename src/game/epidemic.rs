use super::infection::increase_infection_rate;
use super::state::{GameError, GameEvent, GameState, StepOutcome};

/// Fails when neither infection pile holds a card. Runs before any mutation.
pub(crate) fn ensure_infection_cards(state: &GameState) -> Result<(), GameError> {
    let deck = &state.infection_deck;
    if deck.draw_pile().is_empty() && deck.discard_pile().is_empty() {
        return Err(GameError::InfectionDeckExhausted);
    }
    Ok(())
}

/// Raises the infection rate, strips the supplies from the city on the bottom
/// infection card and stacks the shuffled discard pile back on top.
pub fn resolve_epidemic(
    state: &mut GameState,
    outcome: &mut StepOutcome,
) -> Result<(), GameError> {
    ensure_infection_cards(state)?;
    increase_infection_rate(state, outcome);

    if state.infection_deck.draw_pile().is_empty() {
        let cards = state.infection_deck.reshuffle_discard_into_draw(&mut state.rng);
        if cards > 0 {
            outcome.emit(GameEvent::InfectionDeckReshuffled { cards });
        }
    }
    let card = state
        .infection_deck
        .draw_bottom()
        .ok_or(GameError::InfectionDeckExhausted)?;
    let location = state.infection_card_location(card);
    let struck = state.map.location_mut(location);
    struck.supply_cubes = 0;
    outcome.emit(GameEvent::EpidemicStruck {
        location: struck.name.clone(),
    });
    state.infection_deck.discard(card);

    let cards = state.infection_deck.intensify(&mut state.rng);
    outcome.emit(GameEvent::InfectionDeckIntensified { cards });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Deck;
    use crate::game::config::GameConfig;

    #[test]
    fn epidemic_clears_supplies_and_intensifies() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        for _ in 0..3 {
            let card = state.infection_deck.draw().unwrap();
            state.infection_deck.discard(card);
        }
        let bottom = state.infection_deck.draw_pile()[0];
        let location = state.infection_card_location(bottom);
        state.map.location_mut(location).supply_cubes = 4;
        let draw_before = state.infection_deck.draw_pile().len();
        let discard_before = state.infection_deck.discard_pile().len();

        let mut outcome = StepOutcome::default();
        resolve_epidemic(&mut state, &mut outcome).unwrap();

        assert_eq!(state.infection_rate.position(), 2);
        assert_eq!(state.map.location(location).supply_cubes, 0);
        assert!(state.infection_deck.discard_pile().is_empty());
        assert_eq!(
            state.infection_deck.draw_pile().len(),
            draw_before + discard_before
        );
        // the struck city resurfaces among the intensified cards
        let top = &state.infection_deck.draw_pile()[draw_before - 1..];
        assert_eq!(top.len(), discard_before + 1);
        assert!(top.contains(&bottom));
    }

    #[test]
    fn plague_cubes_survive_an_epidemic() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        let bottom = state.infection_deck.draw_pile()[0];
        let location = state.infection_card_location(bottom);
        state.map.location_mut(location).plague_cubes = 2;
        let mut outcome = StepOutcome::default();
        resolve_epidemic(&mut state, &mut outcome).unwrap();
        assert_eq!(state.map.location(location).plague_cubes, 2);
    }

    #[test]
    fn empty_draw_pile_is_refilled_first() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        let cards = state.infection_deck.draw_pile().to_vec();
        state.infection_deck = Deck::from_piles(Vec::new(), cards);
        let mut outcome = StepOutcome::default();
        resolve_epidemic(&mut state, &mut outcome).unwrap();
        assert_eq!(state.infection_deck.draw_pile().len(), 18);
        assert!(state.infection_deck.discard_pile().is_empty());
        assert_eq!(state.infection_rate.position(), 2);
    }

    #[test]
    fn exhausted_infection_deck_is_fatal() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        state.infection_deck = Deck::default();
        let mut outcome = StepOutcome::default();
        assert!(matches!(
            resolve_epidemic(&mut state, &mut outcome),
            Err(GameError::InfectionDeckExhausted)
        ));
        assert_eq!(state.infection_rate.position(), 1);
        assert!(outcome.events.is_empty());
    }
}
