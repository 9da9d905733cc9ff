use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::state::{GameEvent, GameState, GameStatus, StepOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Objective {
    BuildSupplyCentres {
        has_built: u32,
        must_build: u32,
        mandatory: bool,
    },
    ConnectCities {
        has_connected: u32,
        must_connect: u32,
        mandatory: bool,
    },
}

impl Objective {
    pub fn build_supply_centres(must_build: u32, mandatory: bool) -> Self {
        Objective::BuildSupplyCentres {
            has_built: 0,
            must_build,
            mandatory,
        }
    }

    pub fn connect_cities(must_connect: u32, mandatory: bool) -> Self {
        Objective::ConnectCities {
            has_connected: 0,
            must_connect,
            mandatory,
        }
    }

    pub fn is_completed(&self) -> bool {
        match self {
            Objective::BuildSupplyCentres {
                has_built,
                must_build,
                ..
            } => has_built >= must_build,
            Objective::ConnectCities {
                has_connected,
                must_connect,
                ..
            } => has_connected >= must_connect,
        }
    }

    pub fn is_mandatory(&self) -> bool {
        match self {
            Objective::BuildSupplyCentres { mandatory, .. }
            | Objective::ConnectCities { mandatory, .. } => *mandatory,
        }
    }

    fn record(&mut self, event: &GameEvent) {
        if let (
            Objective::BuildSupplyCentres { has_built, .. },
            GameEvent::SupplyCentreBuilt { .. },
        ) = (self, event)
        {
            *has_built += 1;
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let required = if self.is_mandatory() { "mandatory" } else { "optional" };
        match self {
            Objective::BuildSupplyCentres {
                has_built,
                must_build,
                ..
            } => write!(f, "build supply centres {has_built}/{must_build} ({required})"),
            Objective::ConnectCities {
                has_connected,
                must_connect,
                ..
            } => write!(f, "connect cities {has_connected}/{must_connect} ({required})"),
        }
    }
}

pub fn default_objectives() -> Vec<Objective> {
    vec![
        Objective::build_supply_centres(1, true),
        Objective::connect_cities(3, false),
    ]
}

/// Won once no mandatory objective is open and enough objectives are complete.
pub fn objectives_met(objectives: &[Objective], required_completed: usize) -> bool {
    let mandatory_open = objectives
        .iter()
        .any(|objective| objective.is_mandatory() && !objective.is_completed());
    let completed = objectives
        .iter()
        .filter(|objective| objective.is_completed())
        .count();
    !mandatory_open && completed >= required_completed
}

/// Folds the step's events into objective progress and declares a win when met.
pub fn check_objectives(state: &mut GameState, outcome: &mut StepOutcome) {
    if state.status != GameStatus::Playing {
        return;
    }
    for event in &outcome.events {
        for objective in state.objectives.iter_mut() {
            objective.record(event);
        }
    }
    if objectives_met(&state.objectives, state.config.required_objectives) {
        state.status = GameStatus::Won;
        outcome.events.push(GameEvent::GameWon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mandatory_objectives_gate_the_win() {
        let mut objectives = vec![
            Objective::build_supply_centres(2, true),
            Objective::connect_cities(1, false),
        ];
        if let Objective::ConnectCities { has_connected, .. } = &mut objectives[1] {
            *has_connected = 1;
        }
        assert!(!objectives_met(&objectives, 1));

        if let Objective::BuildSupplyCentres { has_built, .. } = &mut objectives[0] {
            *has_built = 2;
        }
        assert!(objectives_met(&objectives, 1));
        assert!(objectives_met(&objectives, 2));
        assert!(!objectives_met(&objectives, 3));
    }

    #[test]
    fn supply_centre_events_advance_build_objectives() {
        let mut objective = Objective::build_supply_centres(1, true);
        objective.record(&GameEvent::SupplyCentreBuilt {
            player: "Ana".to_string(),
            location: "London".to_string(),
        });
        assert!(objective.is_completed());

        let mut connect = Objective::connect_cities(1, false);
        connect.record(&GameEvent::SupplyCentreBuilt {
            player: "Ana".to_string(),
            location: "London".to_string(),
        });
        assert!(!connect.is_completed());
    }
}
