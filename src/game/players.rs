use serde::{Deserialize, Serialize};

use crate::board::LocationId;
use crate::cards::{CardCatalog, PlayerCardId};

pub type PlayerId = usize;

pub const MAX_PLAYERS: usize = 4;
pub const HAND_LIMIT: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub location: LocationId,
    pub turn_order: u8,
    pub supply_cubes: u32,
    pub hand: Vec<PlayerCardId>,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, turn_order: u8, location: LocationId) -> Self {
        Self {
            name: name.into(),
            location,
            turn_order,
            supply_cubes: 0,
            hand: Vec::new(),
        }
    }

    pub fn exceeds_hand_limit(&self) -> bool {
        self.hand.len() > HAND_LIMIT
    }

    pub fn epidemic_index(&self, cards: &CardCatalog) -> Option<usize> {
        self.hand
            .iter()
            .position(|card| cards.player_card(*card).is_epidemic())
    }

    pub fn holds_epidemic(&self, cards: &CardCatalog) -> bool {
        self.epidemic_index(cards).is_some()
    }
}

/// Turn orders run 1..=4 and wrap around.
pub fn next_turn_order(turn_order: u8) -> u8 {
    turn_order % MAX_PLAYERS as u8 + 1
}
