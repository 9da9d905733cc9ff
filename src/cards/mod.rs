use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{LocationId, WorldMap};

mod deck;

pub use deck::Deck;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerCardId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InfectionCardId(pub u16);

impl fmt::Display for PlayerCardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl fmt::Display for InfectionCardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCard {
    City { location: LocationId },
    ProduceSupplies,
    PortableAntiviralLab,
    Event { name: String },
    Epidemic,
}

impl PlayerCard {
    pub fn is_epidemic(&self) -> bool {
        matches!(self, PlayerCard::Epidemic)
    }

    pub fn city(&self) -> Option<LocationId> {
        match self {
            PlayerCard::City { location } => Some(*location),
            _ => None,
        }
    }

    pub fn label(&self, map: &WorldMap) -> String {
        match self {
            PlayerCard::City { location } => map.name(*location).to_string(),
            PlayerCard::ProduceSupplies => "Produce Supplies".to_string(),
            PlayerCard::PortableAntiviralLab => "Portable Antiviral Lab".to_string(),
            PlayerCard::Event { name } => format!("Event: {name}"),
            PlayerCard::Epidemic => "Epidemic".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfectionCard {
    pub location: LocationId,
}

/// Owns every card of a game. Piles and hands hold handles into this arena,
/// so moving a handle moves the card itself.
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    player_cards: Vec<PlayerCard>,
    infection_cards: Vec<InfectionCard>,
}

impl CardCatalog {
    pub fn add_player_card(&mut self, card: PlayerCard) -> PlayerCardId {
        self.player_cards.push(card);
        PlayerCardId((self.player_cards.len() - 1) as u16)
    }

    pub fn add_infection_card(&mut self, card: InfectionCard) -> InfectionCardId {
        self.infection_cards.push(card);
        InfectionCardId((self.infection_cards.len() - 1) as u16)
    }

    pub fn player_card(&self, id: PlayerCardId) -> &PlayerCard {
        &self.player_cards[id.0 as usize]
    }

    pub fn infection_card(&self, id: InfectionCardId) -> &InfectionCard {
        &self.infection_cards[id.0 as usize]
    }

    pub fn player_card_label(&self, id: PlayerCardId, map: &WorldMap) -> String {
        self.player_card(id).label(map)
    }

    pub fn player_card_count(&self) -> usize {
        self.player_cards.len()
    }
}
