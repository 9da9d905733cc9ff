use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LocationType {
    Inland,
    Port,
    Haven,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LocationColor {
    Blue,
    Yellow,
    Black,
    None,
}

impl LocationColor {
    pub fn is_coloured(self) -> bool {
        self != LocationColor::None
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionKind {
    Land,
    Sea,
}

impl ConnectionKind {
    /// Any edge touching an inland location is travelled over land.
    pub fn between(a: LocationType, b: LocationType) -> Self {
        if a == LocationType::Inland || b == LocationType::Inland {
            ConnectionKind::Land
        } else {
            ConnectionKind::Sea
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepType {
    CheckForExposure,
    PlayerAction,
    DrawPlayerCard,
    DrawInfectionCard,
    DiscardPlayerCard,
    ResolveEpidemic,
    PlayEventCard,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
pub enum TurnPhase {
    #[serde(rename = "exposure_check")]
    #[strum(serialize = "exposure_check")]
    ExposureCheck,
    #[serde(rename = "take_4_actions")]
    #[strum(serialize = "take_4_actions")]
    Take4Actions,
    #[serde(rename = "draw_2_cards")]
    #[strum(serialize = "draw_2_cards")]
    Draw2Cards,
    #[serde(rename = "infect_cities")]
    #[strum(serialize = "infect_cities")]
    InfectCities,
}

impl TurnPhase {
    /// The only step type the phase dispatch table accepts in this phase.
    pub fn expected_step(self) -> StepType {
        match self {
            TurnPhase::ExposureCheck => StepType::CheckForExposure,
            TurnPhase::Take4Actions => StepType::PlayerAction,
            TurnPhase::Draw2Cards => StepType::DrawPlayerCard,
            TurnPhase::InfectCities => StepType::DrawInfectionCard,
        }
    }
}
