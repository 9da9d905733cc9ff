//! Name-based snapshots of a game, for storing between steps.
//!
//! Cards and locations are referenced by name on disk and turned back into
//! handles on load. Loading checks every reference and invariant and refuses
//! broken documents instead of repairing them.

use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::board::{LocationId, LocationTemplate, MAX_PLAGUE_CUBES, WorldMap};
use crate::cards::{CardCatalog, Deck, InfectionCard, InfectionCardId, PlayerCard, PlayerCardId};
use crate::game::infection::{Incidents, InfectionRate, MAX_INFECTION_CARDS, MAX_INFECTION_RATE};
use crate::game::players::{MAX_PLAYERS, PlayerState};
use crate::game::turn_flow::{ACTIONS_PER_TURN, PLAYER_CARDS_PER_TURN, TurnFlow};
use crate::game::{GameConfig, GameError, GameState, GameStatus, Objective, Step};
use crate::types::{LocationColor, LocationType, TurnPhase};

mod repository;

pub use repository::{JsonFileRepository, Repository, apply_saved_step};

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no saved game named {0}")]
    NotFound(String),
    #[error("invalid saved game: {0}")]
    Invalid(String),
    #[error(transparent)]
    Game(#[from] GameError),
}

fn invalid(message: impl Into<String>) -> SaveError {
    SaveError::Invalid(message.into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub name: String,
    pub kind: LocationType,
    pub color: LocationColor,
    pub supply_cubes: u32,
    pub plague_cubes: u8,
    pub has_supply_centre: bool,
    pub connections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SavedCard {
    City { city: String },
    ProduceSupplies,
    PortableAntiviralLab,
    Event { name: String },
    Epidemic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPlayer {
    pub name: String,
    pub location: String,
    pub turn_order: u8,
    pub supply_cubes: u32,
    pub hand: Vec<SavedCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedDeck<T> {
    pub draw_pile: Vec<T>,
    pub discard_pile: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTurnFlow {
    pub phase: TurnPhase,
    pub player: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    pub config: GameConfig,
    pub locations: Vec<SavedLocation>,
    pub players: Vec<SavedPlayer>,
    pub player_deck: SavedDeck<SavedCard>,
    pub infection_deck: SavedDeck<String>,
    pub infection_rate: u8,
    pub incidents: u8,
    pub objectives: Vec<Objective>,
    pub turn_flow: SavedTurnFlow,
    pub status: GameStatus,
    pub turn: u32,
    #[serde(default)]
    pub log: Vec<String>,
    #[serde(default)]
    pub history: Vec<Step>,
}

impl SaveGame {
    pub fn from_state(state: &GameState) -> Self {
        let map = &state.map;
        let saved_card = |id: &PlayerCardId| match state.cards.player_card(*id) {
            PlayerCard::City { location } => SavedCard::City {
                city: map.name(*location).to_string(),
            },
            PlayerCard::ProduceSupplies => SavedCard::ProduceSupplies,
            PlayerCard::PortableAntiviralLab => SavedCard::PortableAntiviralLab,
            PlayerCard::Event { name } => SavedCard::Event { name: name.clone() },
            PlayerCard::Epidemic => SavedCard::Epidemic,
        };
        let infection_name =
            |id: &InfectionCardId| map.name(state.infection_card_location(*id)).to_string();

        Self {
            config: state.config.clone(),
            locations: map
                .locations()
                .iter()
                .map(|location| SavedLocation {
                    name: location.name.clone(),
                    kind: location.kind,
                    color: location.color,
                    supply_cubes: location.supply_cubes,
                    plague_cubes: location.plague_cubes,
                    has_supply_centre: location.has_supply_centre,
                    connections: location
                        .neighbours()
                        .map(|id| map.name(id).to_string())
                        .collect(),
                })
                .collect(),
            players: state
                .players
                .iter()
                .map(|player| SavedPlayer {
                    name: player.name.clone(),
                    location: map.name(player.location).to_string(),
                    turn_order: player.turn_order,
                    supply_cubes: player.supply_cubes,
                    hand: player.hand.iter().map(saved_card).collect(),
                })
                .collect(),
            player_deck: SavedDeck {
                draw_pile: state.player_deck.draw_pile().iter().map(saved_card).collect(),
                discard_pile: state.player_deck.discard_pile().iter().map(saved_card).collect(),
            },
            infection_deck: SavedDeck {
                draw_pile: state.infection_deck.draw_pile().iter().map(infection_name).collect(),
                discard_pile: state
                    .infection_deck
                    .discard_pile()
                    .iter()
                    .map(infection_name)
                    .collect(),
            },
            infection_rate: state.infection_rate.position(),
            incidents: state.incidents.count(),
            objectives: state.objectives.clone(),
            turn_flow: SavedTurnFlow {
                phase: state.turn_flow.phase(),
                player: state.active_player().name.clone(),
                remaining: state.turn_flow.remaining(),
            },
            status: state.status,
            turn: state.turn,
            log: state.log.clone(),
            history: state.history.clone(),
        }
    }

    /// Rebuilds a playable state. The RNG is reseeded from the configured seed
    /// and the number of steps taken so far.
    pub fn into_state(self) -> Result<GameState, SaveError> {
        let map = self.restore_map()?;
        let mut cards = CardCatalog::default();
        let mut cities_seen = HashSet::new();

        let mut players = Vec::with_capacity(self.players.len());
        for saved in &self.players {
            let location = map.find(&saved.location).ok_or_else(|| {
                invalid(format!("{} stands in unknown {}", saved.name, saved.location))
            })?;
            let mut player = PlayerState::new(saved.name.clone(), saved.turn_order, location);
            player.supply_cubes = saved.supply_cubes;
            for card in &saved.hand {
                player
                    .hand
                    .push(restore_card(card, &map, &mut cards, &mut cities_seen)?);
            }
            players.push(player);
        }
        validate_players(&players)?;

        let mut map = map;
        for (idx, player) in players.iter().enumerate() {
            map.location_mut(player.location).players.push(idx);
        }

        let mut restore_pile = |pile: &[SavedCard]| -> Result<Vec<PlayerCardId>, SaveError> {
            pile.iter()
                .map(|card| restore_card(card, &map, &mut cards, &mut cities_seen))
                .collect()
        };
        let player_deck = Deck::from_piles(
            restore_pile(&self.player_deck.draw_pile)?,
            restore_pile(&self.player_deck.discard_pile)?,
        );

        let mut infected_seen = HashSet::new();
        let mut restore_infection = |pile: &[String]| -> Result<Vec<InfectionCardId>, SaveError> {
            pile.iter()
                .map(|name| {
                    let location = map
                        .find(name)
                        .ok_or_else(|| invalid(format!("infection card for unknown {name}")))?;
                    if !infected_seen.insert(location) {
                        return Err(invalid(format!("two infection cards for {name}")));
                    }
                    Ok(cards.add_infection_card(InfectionCard { location }))
                })
                .collect()
        };
        let infection_deck = Deck::from_piles(
            restore_infection(&self.infection_deck.draw_pile)?,
            restore_infection(&self.infection_deck.discard_pile)?,
        );

        let infection_rate = InfectionRate::from_position(self.infection_rate).ok_or_else(|| {
            invalid(format!(
                "infection rate {} is outside 1..={MAX_INFECTION_RATE}",
                self.infection_rate
            ))
        })?;
        let incidents = Incidents::from_count(self.incidents)
            .ok_or_else(|| invalid(format!("{} incidents is over the limit", self.incidents)))?;
        if incidents.is_critical() && self.status == GameStatus::Playing {
            return Err(invalid("incident limit reached but the game is still playing"));
        }
        let turn_flow = restore_turn_flow(&self.turn_flow, &players)?;

        let rng = StdRng::seed_from_u64(mix_seed(self.config.seed, self.history.len()));
        Ok(GameState {
            config: self.config,
            map,
            players,
            cards,
            player_deck,
            infection_deck,
            infection_rate,
            incidents,
            objectives: self.objectives,
            turn_flow,
            status: self.status,
            turn: self.turn,
            log: self.log,
            history: self.history,
            rng,
        })
    }

    fn restore_map(&self) -> Result<WorldMap, SaveError> {
        let mut map = WorldMap::default();
        for saved in &self.locations {
            if saved.plague_cubes > MAX_PLAGUE_CUBES {
                return Err(invalid(format!(
                    "{} holds {} plague cubes",
                    saved.name, saved.plague_cubes
                )));
            }
            if saved.has_supply_centre && !saved.color.is_coloured() {
                return Err(invalid(format!("{} cannot host a supply centre", saved.name)));
            }
            let id = map.add_location(&LocationTemplate::new(
                &saved.name,
                saved.kind,
                saved.color,
                saved.supply_cubes,
            ))?;
            let location = map.location_mut(id);
            location.plague_cubes = saved.plague_cubes;
            location.has_supply_centre = saved.has_supply_centre;
        }

        let links: HashSet<(&str, &str)> = self
            .locations
            .iter()
            .flat_map(|saved| {
                saved
                    .connections
                    .iter()
                    .map(move |to| (saved.name.as_str(), to.as_str()))
            })
            .collect();
        for saved in &self.locations {
            let from = map.require(&saved.name)?;
            for to in &saved.connections {
                if !links.contains(&(to.as_str(), saved.name.as_str())) {
                    return Err(invalid(format!("{} links to {to} but not back", saved.name)));
                }
                let to = map
                    .find(to)
                    .ok_or_else(|| invalid(format!("{} links to unknown {to}", saved.name)))?;
                if to == from {
                    return Err(invalid(format!("{} links to itself", saved.name)));
                }
                map.connect_one_way(from, to);
            }
        }
        Ok(map)
    }
}

fn mix_seed(seed: u64, steps: usize) -> u64 {
    seed.rotate_left(17) ^ (steps as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn restore_card(
    card: &SavedCard,
    map: &WorldMap,
    cards: &mut CardCatalog,
    cities_seen: &mut HashSet<LocationId>,
) -> Result<PlayerCardId, SaveError> {
    let card = match card {
        SavedCard::City { city } => {
            let location = map
                .find(city)
                .ok_or_else(|| invalid(format!("city card for unknown {city}")))?;
            if !cities_seen.insert(location) {
                return Err(invalid(format!("two city cards for {city}")));
            }
            PlayerCard::City { location }
        }
        SavedCard::ProduceSupplies => PlayerCard::ProduceSupplies,
        SavedCard::PortableAntiviralLab => PlayerCard::PortableAntiviralLab,
        SavedCard::Event { name } => PlayerCard::Event { name: name.clone() },
        SavedCard::Epidemic => PlayerCard::Epidemic,
    };
    Ok(cards.add_player_card(card))
}

fn validate_players(players: &[PlayerState]) -> Result<(), SaveError> {
    if players.len() != MAX_PLAYERS {
        return Err(invalid(format!(
            "{} players saved, {MAX_PLAYERS} expected",
            players.len()
        )));
    }
    let names: HashSet<&str> = players.iter().map(|player| player.name.as_str()).collect();
    if names.len() != players.len() {
        return Err(invalid("player names are not unique"));
    }
    let mut orders: Vec<u8> = players.iter().map(|player| player.turn_order).collect();
    orders.sort_unstable();
    if orders != [1, 2, 3, 4] {
        return Err(invalid(format!("turn orders {orders:?} are not 1 to 4")));
    }
    Ok(())
}

fn restore_turn_flow(
    saved: &SavedTurnFlow,
    players: &[PlayerState],
) -> Result<TurnFlow, SaveError> {
    let by_name: HashMap<&str, usize> = players
        .iter()
        .enumerate()
        .map(|(idx, player)| (player.name.as_str(), idx))
        .collect();
    let player = *by_name
        .get(saved.player.as_str())
        .ok_or_else(|| invalid(format!("turn belongs to unknown {}", saved.player)))?;

    let countdown = |max: u8| -> Result<u8, SaveError> {
        match saved.remaining {
            Some(remaining) if (1..=max).contains(&remaining) => Ok(remaining),
            other => Err(invalid(format!(
                "{} countdown {other:?} is outside 1..={max}",
                saved.phase
            ))),
        }
    };
    let flow = match saved.phase {
        TurnPhase::ExposureCheck => TurnFlow::ExposureCheck { player },
        TurnPhase::Take4Actions => TurnFlow::Take4Actions {
            player,
            remaining_actions: countdown(ACTIONS_PER_TURN)?,
        },
        TurnPhase::Draw2Cards => TurnFlow::Draw2Cards {
            player,
            remaining_cards: countdown(PLAYER_CARDS_PER_TURN)?,
        },
        TurnPhase::InfectCities => TurnFlow::InfectCities {
            player,
            remaining_cards: countdown(MAX_INFECTION_CARDS)?,
        },
    };
    Ok(flow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    fn played_state() -> GameState {
        let mut game = Game::new(GameConfig::default().with_seed(5)).unwrap();
        game.take_step(Step::check_for_exposure("Ana")).unwrap();
        game.take_step(Step::action(
            "Ana",
            crate::game::PlayerAction::move_to("London"),
        ))
        .unwrap();
        game.into_state()
    }

    #[test]
    fn snapshot_survives_a_reload() {
        let state = played_state();
        let save = SaveGame::from_state(&state);
        let json = serde_json::to_string(&save).unwrap();
        let restored: SaveGame = serde_json::from_str(&json).unwrap();
        let restored = restored.into_state().unwrap();

        assert_eq!(restored.turn_flow, state.turn_flow);
        assert_eq!(restored.history, state.history);
        assert_eq!(restored.map.name(restored.players[0].location), "London");
        assert_eq!(restored.map.by_name("London").unwrap().players, vec![0]);
        assert_eq!(
            restored.player_deck.draw_pile().len(),
            state.player_deck.draw_pile().len()
        );
        assert_eq!(SaveGame::from_state(&restored).players, save.players);
    }

    #[test]
    fn duplicate_city_cards_are_rejected() {
        let mut save = SaveGame::from_state(&played_state());
        let card = SavedCard::City {
            city: "Cairo".to_string(),
        };
        save.players[0].hand.push(card.clone());
        save.players[1].hand.push(card);
        assert!(matches!(save.into_state(), Err(SaveError::Invalid(_))));
    }

    #[test]
    fn one_way_links_are_rejected() {
        let mut save = SaveGame::from_state(&played_state());
        save.locations[0].connections.push("Riyadh".to_string());
        assert!(matches!(save.into_state(), Err(SaveError::Invalid(_))));
    }

    #[test]
    fn broken_turn_order_is_rejected() {
        let mut save = SaveGame::from_state(&played_state());
        save.players[3].turn_order = 1;
        assert!(matches!(save.into_state(), Err(SaveError::Invalid(_))));
    }

    #[test]
    fn out_of_range_counters_are_rejected() {
        let mut save = SaveGame::from_state(&played_state());
        save.infection_rate = 9;
        assert!(save.into_state().is_err());

        let mut save = SaveGame::from_state(&played_state());
        save.turn_flow.remaining = Some(5);
        assert!(save.into_state().is_err());

        let mut save = SaveGame::from_state(&played_state());
        save.locations[2].plague_cubes = 4;
        assert!(save.into_state().is_err());
    }
}
