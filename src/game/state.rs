use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::board::{Location, LocationId, WorldMap};
use crate::cards::{CardCatalog, Deck, InfectionCard, InfectionCardId, PlayerCard, PlayerCardId};
use crate::types::TurnPhase;

use super::action::Step;
use super::config::GameConfig;
use super::infection::{Incidents, InfectionRate};
use super::objectives::Objective;
use super::players::{HAND_LIMIT, MAX_PLAYERS, PlayerId, PlayerState};
use super::turn_flow::TurnFlow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum LossCause {
    #[strum(to_string = "player deck is empty")]
    PlayerDeckEmpty,
    #[strum(to_string = "Too many incidents.")]
    TooManyIncidents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    Won,
    Lost { cause: LossCause },
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Playing => write!(f, "playing"),
            GameStatus::Won => write!(f, "won"),
            GameStatus::Lost { cause } => write!(f, "lost ({cause})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ExposureChecked {
        player: String,
        location: String,
        plague_cubes: u8,
    },
    PlayerMoved {
        player: String,
        from: String,
        to: String,
    },
    SuppliesMade {
        player: String,
        carried: u32,
    },
    SuppliesDropped {
        player: String,
        location: String,
        amount: u32,
    },
    SupplyCentreBuilt {
        player: String,
        location: String,
    },
    PlayerCardDrawn {
        player: String,
        card: String,
    },
    PlayerCardDiscarded {
        player: String,
        card: String,
    },
    EpidemicDrawn {
        player: String,
    },
    InfectionRateIncreased {
        position: u8,
        cards: u8,
    },
    EpidemicStruck {
        location: String,
    },
    InfectionDeckIntensified {
        cards: usize,
    },
    InfectionDeckReshuffled {
        cards: usize,
    },
    InfectionCardDrawn {
        location: String,
    },
    SupplyCubeConsumed {
        location: String,
        remaining: u32,
    },
    PlagueCubeAdded {
        location: String,
        plague_cubes: u8,
    },
    Outbreak {
        location: String,
    },
    IncidentRecorded {
        incidents: u8,
    },
    PhaseChanged {
        player: String,
        phase: TurnPhase,
    },
    TurnPassed {
        player: String,
    },
    GameLost {
        cause: LossCause,
    },
    GameWon,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::ExposureChecked {
                player,
                location,
                plague_cubes,
            } => write!(
                f,
                "{player} checked for exposure in {location} ({plague_cubes} plague cubes)"
            ),
            GameEvent::PlayerMoved { player, from, to } => {
                write!(f, "{player} moved from {from} to {to}")
            }
            GameEvent::SuppliesMade { player, carried } => {
                write!(f, "{player} made supplies (carrying {carried})")
            }
            GameEvent::SuppliesDropped {
                player,
                location,
                amount,
            } => write!(f, "{player} dropped {amount} supplies in {location}"),
            GameEvent::SupplyCentreBuilt { player, location } => {
                write!(f, "{player} built a supply centre in {location}")
            }
            GameEvent::PlayerCardDrawn { player, card } => write!(f, "{player} drew {card}"),
            GameEvent::PlayerCardDiscarded { player, card } => {
                write!(f, "{player} discarded {card}")
            }
            GameEvent::EpidemicDrawn { player } => write!(f, "{player} drew an epidemic"),
            GameEvent::InfectionRateIncreased { position, cards } => write!(
                f,
                "Infection rate increased to {position} ({cards} cards per turn)"
            ),
            GameEvent::EpidemicStruck { location } => {
                write!(f, "Epidemic in {location}: all supplies lost")
            }
            GameEvent::InfectionDeckIntensified { cards } => write!(
                f,
                "Intensify: {cards} infection cards returned to the top of the deck"
            ),
            GameEvent::InfectionDeckReshuffled { cards } => write!(
                f,
                "Infection deck empty: reshuffled {cards} discarded cards"
            ),
            GameEvent::InfectionCardDrawn { location } => {
                write!(f, "Infection card drawn: {location}")
            }
            GameEvent::SupplyCubeConsumed {
                location,
                remaining,
            } => write!(
                f,
                "Supplies in {location} held off the plague ({remaining} left)"
            ),
            GameEvent::PlagueCubeAdded {
                location,
                plague_cubes,
            } => write!(f, "{location} now has {plague_cubes} plague cubes"),
            GameEvent::Outbreak { location } => write!(f, "Outbreak in {location}!"),
            GameEvent::IncidentRecorded { incidents } => {
                write!(f, "Incident recorded ({incidents} total)")
            }
            GameEvent::PhaseChanged { player, phase } => write!(f, "{player}: {phase}"),
            GameEvent::TurnPassed { player } => write!(f, "Turn passed to {player}"),
            GameEvent::GameLost { cause } => write!(f, "Game lost: {cause}"),
            GameEvent::GameWon => write!(f, "All objectives met: the game is won"),
        }
    }
}

/// Events collected while a step is being handled.
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub events: Vec<GameEvent>,
}

impl StepOutcome {
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// What a handler did with a step. `NoEffect` is only ever returned before any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    NoEffect(String),
    Changed { next: Option<TurnFlow> },
}

impl Handled {
    pub fn no_effect(cause: impl Into<String>) -> Self {
        Handled::NoEffect(cause.into())
    }

    pub fn changed(next: Option<TurnFlow>) -> Self {
        Handled::Changed { next }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("game is no longer being played: {0}")]
    GameFinished(GameStatus),
    #[error("infection deck is empty and there is no discard pile to reshuffle")]
    InfectionDeckExhausted,
    #[error("no player holds turn order {0}")]
    MissingTurnOrder(u8),
    #[error("unknown location {0}")]
    UnknownLocation(String),
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub map: WorldMap,
    pub players: Vec<PlayerState>,
    pub cards: CardCatalog,
    pub player_deck: Deck<PlayerCardId>,
    pub infection_deck: Deck<InfectionCardId>,
    pub infection_rate: InfectionRate,
    pub incidents: Incidents,
    pub objectives: Vec<Objective>,
    pub turn_flow: TurnFlow,
    pub status: GameStatus,
    pub turn: u32,
    pub log: Vec<String>,
    pub history: Vec<Step>,
    pub(crate) rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        validate_config(&config)?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut map = WorldMap::from_template(&config.map)?;
        let start = map.require(&config.start_location)?;

        let mut cards = CardCatalog::default();
        let coloured: Vec<LocationId> = map
            .locations()
            .iter()
            .filter(|location| location.color.is_coloured())
            .map(|location| location.id)
            .collect();
        if coloured.is_empty() {
            return Err(GameError::InvalidConfig(
                "the map has no coloured locations to infect".to_string(),
            ));
        }

        let mut player_cards: Vec<PlayerCardId> = coloured
            .iter()
            .map(|location| cards.add_player_card(PlayerCard::City { location: *location }))
            .collect();
        for _ in 0..config.produce_supplies_cards {
            player_cards.push(cards.add_player_card(PlayerCard::ProduceSupplies));
        }
        player_cards.push(cards.add_player_card(PlayerCard::PortableAntiviralLab));
        for name in &config.event_cards {
            player_cards.push(cards.add_player_card(PlayerCard::Event { name: name.clone() }));
        }
        player_cards.shuffle(&mut rng);

        let mut players = Vec::with_capacity(config.player_names.len());
        for (idx, name) in config.player_names.iter().enumerate() {
            let mut player = PlayerState::new(name.clone(), idx as u8 + 1, start);
            for _ in 0..config.initial_hand_size {
                if let Some(card) = player_cards.pop() {
                    player.hand.push(card);
                }
            }
            map.location_mut(start).players.push(idx);
            players.push(player);
        }

        let epidemics: Vec<PlayerCardId> = (0..config.epidemic_cards)
            .map(|_| cards.add_player_card(PlayerCard::Epidemic))
            .collect();
        let player_deck = Deck::new(seed_epidemics(player_cards, epidemics, &mut rng));

        let mut infection_deck: Deck<InfectionCardId> = Deck::new(
            coloured
                .iter()
                .map(|location| cards.add_infection_card(InfectionCard { location: *location }))
                .collect(),
        );
        infection_deck.shuffle_draw_pile(&mut rng);

        let objectives = config.objectives.clone();
        Ok(Self {
            config,
            map,
            players,
            cards,
            player_deck,
            infection_deck,
            infection_rate: InfectionRate::default(),
            incidents: Incidents::default(),
            objectives,
            turn_flow: TurnFlow::ExposureCheck { player: 0 },
            status: GameStatus::Playing,
            turn: 0,
            log: Vec::new(),
            history: Vec::new(),
            rng,
        })
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn player_index(&self, name: &str) -> Option<PlayerId> {
        self.players.iter().position(|player| player.name == name)
    }

    pub fn active_player(&self) -> &PlayerState {
        &self.players[self.turn_flow.player()]
    }

    pub fn player_location(&self, id: PlayerId) -> &Location {
        self.map.location(self.players[id].location)
    }

    pub fn player_by_turn_order(&self, turn_order: u8) -> Option<PlayerId> {
        self.players
            .iter()
            .position(|player| player.turn_order == turn_order)
    }

    pub fn card_label(&self, card: PlayerCardId) -> String {
        self.cards.player_card_label(card, &self.map)
    }

    pub fn infection_card_location(&self, card: InfectionCardId) -> LocationId {
        self.cards.infection_card(card).location
    }

    pub(crate) fn lose(&mut self, cause: LossCause, outcome: &mut StepOutcome) {
        log::warn!("game lost: {cause}");
        self.status = GameStatus::Lost { cause };
        outcome.emit(GameEvent::GameLost { cause });
    }
}

fn validate_config(config: &GameConfig) -> Result<(), GameError> {
    if config.player_names.len() != MAX_PLAYERS {
        return Err(GameError::InvalidConfig(format!(
            "exactly {MAX_PLAYERS} players are required, got {}",
            config.player_names.len()
        )));
    }
    let mut seen = HashSet::new();
    for name in &config.player_names {
        if name.is_empty() || !seen.insert(name.as_str()) {
            return Err(GameError::InvalidConfig(format!(
                "player names must be unique and non-empty: {name:?}"
            )));
        }
    }
    if config.initial_hand_size > HAND_LIMIT {
        return Err(GameError::InvalidConfig(format!(
            "initial hand size {} exceeds the hand limit of {HAND_LIMIT}",
            config.initial_hand_size
        )));
    }
    Ok(())
}

/// Splits the deck into one near-equal pile per epidemic, shuffles an epidemic
/// into each pile and stacks the piles back together.
fn seed_epidemics(
    cards: Vec<PlayerCardId>,
    epidemics: Vec<PlayerCardId>,
    rng: &mut impl Rng,
) -> Vec<PlayerCardId> {
    if epidemics.is_empty() {
        return cards;
    }
    let piles = epidemics.len();
    let base = cards.len() / piles;
    let extra = cards.len() % piles;
    let mut remaining = cards.into_iter();
    let mut draw_pile = Vec::with_capacity(base * piles + extra + piles);
    for (idx, epidemic) in epidemics.into_iter().enumerate() {
        let size = base + usize::from(idx < extra);
        let mut pile: Vec<PlayerCardId> = remaining.by_ref().take(size).collect();
        pile.push(epidemic);
        pile.shuffle(rng);
        draw_pile.extend(pile);
    }
    draw_pile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{LocationTemplate, MapTemplate};
    use crate::types::{LocationColor, LocationType};

    #[test]
    fn setup_deals_hands_and_seeds_epidemics() {
        let state = GameState::new(GameConfig::default()).unwrap();
        assert_eq!(state.players.len(), 4);
        for (idx, player) in state.players.iter().enumerate() {
            assert_eq!(player.turn_order as usize, idx + 1);
            assert_eq!(player.hand.len(), 2);
            assert_eq!(state.map.name(player.location), "New York");
        }
        let new_york = state.map.by_name("New York").unwrap();
        assert_eq!(new_york.players, vec![0, 1, 2, 3]);

        let epidemics = state
            .player_deck
            .draw_pile()
            .iter()
            .filter(|card| state.cards.player_card(**card).is_epidemic())
            .count();
        assert_eq!(epidemics, 5);
        // 18 cities + 4 produce supplies + 1 lab + 2 events - 8 dealt + 5 epidemics
        assert_eq!(state.player_deck.draw_pile().len(), 22);
        assert!(state.player_deck.discard_pile().is_empty());
    }

    #[test]
    fn every_card_has_a_single_home() {
        let state = GameState::new(GameConfig::default()).unwrap();
        let mut seen = HashSet::new();
        let in_hands = state.players.iter().flat_map(|p| p.hand.iter());
        for card in state.player_deck.draw_pile().iter().chain(in_hands) {
            assert!(seen.insert(*card), "card {card} appears twice");
        }
        assert_eq!(seen.len(), state.cards.player_card_count());
    }

    #[test]
    fn infection_deck_covers_coloured_locations_only() {
        let state = GameState::new(GameConfig::default()).unwrap();
        assert_eq!(state.infection_deck.draw_pile().len(), 18);
        for card in state.infection_deck.draw_pile() {
            let location = state.map.location(state.infection_card_location(*card));
            assert_ne!(location.color, LocationColor::None);
        }
    }

    #[test]
    fn same_seed_same_setup() {
        let a = GameState::new(GameConfig::default().with_seed(9)).unwrap();
        let b = GameState::new(GameConfig::default().with_seed(9)).unwrap();
        assert_eq!(a.player_deck, b.player_deck);
        assert_eq!(a.infection_deck, b.infection_deck);
    }

    #[test]
    fn rejects_bad_player_lists() {
        let mut config = GameConfig::default();
        config.player_names.pop();
        assert!(matches!(
            GameState::new(config),
            Err(GameError::InvalidConfig(_))
        ));

        let mut config = GameConfig::default();
        config.player_names[1] = config.player_names[0].clone();
        assert!(GameState::new(config).is_err());
    }

    #[test]
    fn rejects_unknown_start_location() {
        let config = GameConfig {
            start_location: "Atlantis".to_string(),
            ..GameConfig::default()
        };
        assert!(matches!(
            GameState::new(config),
            Err(GameError::UnknownLocation(_))
        ));
    }

    #[test]
    fn rejects_a_map_without_coloured_locations() {
        fn haven(name: &str) -> LocationTemplate {
            LocationTemplate::new(name, LocationType::Haven, LocationColor::None, 0)
        }
        let config = GameConfig {
            map: MapTemplate {
                locations: vec![haven("North Haven"), haven("South Haven")],
                links: vec![("North Haven".to_string(), "South Haven".to_string())],
            },
            start_location: "North Haven".to_string(),
            ..GameConfig::default()
        };
        assert!(matches!(
            GameState::new(config),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn seeding_spreads_epidemics_across_piles() {
        let mut rng = StdRng::seed_from_u64(3);
        let cards: Vec<PlayerCardId> = (0..10).map(PlayerCardId).collect();
        let epidemics = vec![PlayerCardId(100), PlayerCardId(101), PlayerCardId(102)];
        let pile = seed_epidemics(cards, epidemics, &mut rng);
        assert_eq!(pile.len(), 13);
        // piles of 4+1, 3+1, 3+1
        let positions: Vec<usize> = pile
            .iter()
            .enumerate()
            .filter(|(_, card)| card.0 >= 100)
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(positions.len(), 3);
        assert!(positions[0] < 5);
        assert!((5..9).contains(&positions[1]));
        assert!((9..13).contains(&positions[2]));
    }
}
