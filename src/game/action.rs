use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::StepType;

/// One atomic request against the engine, made on behalf of a named player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    pub player: String,
    pub payload: StepPayload,
}

impl Step {
    pub fn new(player: impl Into<String>, payload: StepPayload) -> Self {
        Self {
            player: player.into(),
            payload,
        }
    }

    pub fn check_for_exposure(player: impl Into<String>) -> Self {
        Self::new(player, StepPayload::CheckForExposure)
    }

    pub fn action(player: impl Into<String>, action: PlayerAction) -> Self {
        Self::new(player, StepPayload::PlayerAction { action })
    }

    pub fn draw_player_card(player: impl Into<String>) -> Self {
        Self::new(player, StepPayload::DrawPlayerCard)
    }

    pub fn draw_infection_card(player: impl Into<String>) -> Self {
        Self::new(player, StepPayload::DrawInfectionCard)
    }

    pub fn discard(player: impl Into<String>, card_index: usize) -> Self {
        Self::new(player, StepPayload::DiscardPlayerCard { card_index })
    }

    pub fn resolve_epidemic(player: impl Into<String>) -> Self {
        Self::new(player, StepPayload::ResolveEpidemic)
    }

    pub fn step_type(&self) -> StepType {
        self.payload.step_type()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            StepPayload::PlayerAction { action } => {
                write!(f, "{} {} ({})", self.player, self.step_type(), action)
            }
            _ => write!(f, "{} {}", self.player, self.step_type()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepPayload {
    CheckForExposure,
    PlayerAction { action: PlayerAction },
    DrawPlayerCard,
    DrawInfectionCard,
    DiscardPlayerCard { card_index: usize },
    ResolveEpidemic,
    PlayEventCard { card_index: usize },
}

impl StepPayload {
    pub fn step_type(&self) -> StepType {
        match self {
            StepPayload::CheckForExposure => StepType::CheckForExposure,
            StepPayload::PlayerAction { .. } => StepType::PlayerAction,
            StepPayload::DrawPlayerCard => StepType::DrawPlayerCard,
            StepPayload::DrawInfectionCard => StepType::DrawInfectionCard,
            StepPayload::DiscardPlayerCard { .. } => StepType::DiscardPlayerCard,
            StepPayload::ResolveEpidemic => StepType::ResolveEpidemic,
            StepPayload::PlayEventCard { .. } => StepType::PlayEventCard,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    #[serde(default)]
    pub is_free: bool,
    pub kind: ActionKind,
}

impl PlayerAction {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            is_free: false,
            kind,
        }
    }

    pub fn free(kind: ActionKind) -> Self {
        Self {
            is_free: true,
            kind,
        }
    }

    pub fn move_to(location: impl Into<String>) -> Self {
        Self::new(ActionKind::Move {
            to: location.into(),
        })
    }

    pub fn make_supplies() -> Self {
        Self::new(ActionKind::MakeSupplies)
    }

    pub fn drop_supplies(amount: u32) -> Self {
        Self::new(ActionKind::DropSupplies { amount })
    }

    pub fn make_supply_centre(card_indices: Vec<usize>) -> Self {
        Self::new(ActionKind::MakeSupplyCentre { card_indices })
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ActionKind::Move { to } => write!(f, "move to {to}")?,
            ActionKind::MakeSupplies => write!(f, "make supplies")?,
            ActionKind::DropSupplies { amount } => write!(f, "drop {amount} supplies")?,
            ActionKind::MakeSupplyCentre { card_indices } => {
                write!(f, "make supply centre with cards {card_indices:?}")?
            }
        }
        if self.is_free {
            write!(f, ", free")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    Move { to: String },
    MakeSupplies,
    DropSupplies { amount: u32 },
    MakeSupplyCentre { card_indices: Vec<usize> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_parse_from_tagged_json() {
        let json = r#"{
            "player": "Ana",
            "payload": {
                "type": "player_action",
                "action": { "kind": { "type": "move", "to": "London" } }
            }
        }"#;
        let step: Step = serde_json::from_str(json).unwrap();
        assert_eq!(step, Step::action("Ana", PlayerAction::move_to("London")));
        assert_eq!(step.step_type(), StepType::PlayerAction);

        let discard: Step = serde_json::from_str(
            r#"{"player":"Ana","payload":{"type":"discard_player_card","card_index":3}}"#,
        )
        .unwrap();
        assert_eq!(discard, Step::discard("Ana", 3));
    }
}
