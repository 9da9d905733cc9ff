use std::collections::HashSet;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::board::{LocationId, MAX_PLAGUE_CUBES};

use super::state::{GameError, GameEvent, GameState, LossCause, StepOutcome};

/// Cards drawn per infection phase, indexed by rate position - 1.
pub const INFECTION_RATE_CARDS: [u8; 8] = [2, 2, 2, 3, 3, 4, 4, 5];
pub const MAX_INFECTION_RATE: u8 = INFECTION_RATE_CARDS.len() as u8;
pub const MAX_INFECTION_CARDS: u8 = INFECTION_RATE_CARDS[INFECTION_RATE_CARDS.len() - 1];
pub const MAX_INCIDENTS: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfectionRate {
    position: u8,
}

impl Default for InfectionRate {
    fn default() -> Self {
        Self { position: 1 }
    }
}

impl InfectionRate {
    pub fn from_position(position: u8) -> Option<Self> {
        (1..=MAX_INFECTION_RATE)
            .contains(&position)
            .then_some(Self { position })
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn cards(&self) -> u8 {
        INFECTION_RATE_CARDS[usize::from(self.position - 1)]
    }

    /// Moves one step up the track. Returns false when already at the top.
    pub fn increase(&mut self) -> bool {
        if self.position < MAX_INFECTION_RATE {
            self.position += 1;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incidents {
    count: u8,
}

impl Incidents {
    pub fn from_count(count: u8) -> Option<Self> {
        (count <= MAX_INCIDENTS).then_some(Self { count })
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn is_critical(&self) -> bool {
        self.count >= MAX_INCIDENTS
    }

    /// Counts one incident and reports whether the limit has been reached.
    pub fn record(&mut self) -> bool {
        self.count = (self.count + 1).min(MAX_INCIDENTS);
        self.is_critical()
    }
}

pub(crate) fn increase_infection_rate(state: &mut GameState, outcome: &mut StepOutcome) {
    state.infection_rate.increase();
    outcome.emit(GameEvent::InfectionRateIncreased {
        position: state.infection_rate.position(),
        cards: state.infection_rate.cards(),
    });
}

/// Draws the top infection card, discards it and infects its location.
///
/// An empty draw pile is refilled from the shuffled discard pile, which also
/// raises the infection rate. Losing the game during the cascade is not an
/// error; callers check `state.status` afterwards.
pub fn draw_infection_card(
    state: &mut GameState,
    outcome: &mut StepOutcome,
) -> Result<(), GameError> {
    if state.infection_deck.draw_pile().is_empty() {
        if state.infection_deck.discard_pile().is_empty() {
            return Err(GameError::InfectionDeckExhausted);
        }
        let cards = state.infection_deck.reshuffle_discard_into_draw(&mut state.rng);
        outcome.emit(GameEvent::InfectionDeckReshuffled { cards });
        increase_infection_rate(state, outcome);
    }

    let card = state
        .infection_deck
        .draw()
        .ok_or(GameError::InfectionDeckExhausted)?;
    state.infection_deck.discard(card);
    let location = state.infection_card_location(card);
    outcome.emit(GameEvent::InfectionCardDrawn {
        location: state.map.name(location).to_string(),
    });

    let mut outbroken = HashSet::new();
    let _ = infect_city(state, location, &mut outbroken, outcome);
    Ok(())
}

/// Infects one location. Breaks as soon as the game is lost so the rest of
/// the cascade is abandoned.
pub(crate) fn infect_city(
    state: &mut GameState,
    id: LocationId,
    outbroken: &mut HashSet<LocationId>,
    outcome: &mut StepOutcome,
) -> ControlFlow<()> {
    if outbroken.contains(&id) {
        return ControlFlow::Continue(());
    }

    let location = state.map.location_mut(id);
    if location.supply_cubes > 0 {
        location.supply_cubes -= 1;
        outcome.emit(GameEvent::SupplyCubeConsumed {
            location: location.name.clone(),
            remaining: location.supply_cubes,
        });
        return ControlFlow::Continue(());
    }

    if location.plague_cubes < MAX_PLAGUE_CUBES {
        location.plague_cubes += 1;
        outcome.emit(GameEvent::PlagueCubeAdded {
            location: location.name.clone(),
            plague_cubes: location.plague_cubes,
        });
        let critical = state.incidents.record();
        outcome.emit(GameEvent::IncidentRecorded {
            incidents: state.incidents.count(),
        });
        if critical {
            state.lose(LossCause::TooManyIncidents, outcome);
            return ControlFlow::Break(());
        }
        return ControlFlow::Continue(());
    }

    outbroken.insert(id);
    outcome.emit(GameEvent::Outbreak {
        location: location.name.clone(),
    });
    let neighbours: Vec<LocationId> = location.neighbours().collect();
    for neighbour in neighbours {
        if infect_city(state, neighbour, outbroken, outcome).is_break() {
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}
