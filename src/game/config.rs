use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::MapTemplate;
use crate::game::GameError;
use crate::game::objectives::{Objective, default_objectives};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player_names: Vec<String>,
    pub seed: u64,
    pub map: MapTemplate,
    pub start_location: String,
    pub initial_hand_size: usize,
    pub epidemic_cards: usize,
    pub produce_supplies_cards: usize,
    pub event_cards: Vec<String>,
    pub objectives: Vec<Objective>,
    /// Completed objectives needed to win, mandatory ones included.
    pub required_objectives: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_names: ["Ana", "Ben", "Cleo", "Dev"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            seed: 42,
            map: MapTemplate::default(),
            start_location: "New York".to_string(),
            initial_hand_size: 2,
            epidemic_cards: 5,
            produce_supplies_cards: 4,
            event_cards: vec!["Airlift".to_string(), "Resilient Population".to_string()],
            objectives: default_objectives(),
            required_objectives: 1,
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|err| GameError::InvalidConfig(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = fs::read_to_string(path).map_err(|err| {
            GameError::InvalidConfig(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_json(&json)
    }
}
