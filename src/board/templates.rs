use once_cell::sync::Lazy;

use super::{LocationTemplate, MapTemplate};
use crate::types::LocationColor::{self, Black, Blue, Yellow};
use crate::types::LocationType::{self, Haven, Inland, Port};

const SEASON_LOCATIONS: &[(&str, LocationType, LocationColor, u32)] = &[
    ("New York", Port, Blue, 2),
    ("Washington", Port, Blue, 1),
    ("London", Port, Blue, 2),
    ("Chicago", Inland, Blue, 1),
    ("Toronto", Inland, Blue, 0),
    ("Frankfurt", Inland, Blue, 1),
    ("Jacksonville", Port, Yellow, 1),
    ("Sao Paulo", Port, Yellow, 2),
    ("Lagos", Port, Yellow, 2),
    ("Bogota", Inland, Yellow, 1),
    ("Lima", Port, Yellow, 0),
    ("Kinshasa", Inland, Yellow, 0),
    ("Cairo", Port, Black, 2),
    ("Istanbul", Port, Black, 1),
    ("Tripoli", Port, Black, 1),
    ("Baghdad", Inland, Black, 0),
    ("Riyadh", Inland, Black, 0),
    ("Moscow", Inland, Black, 1),
    ("North Atlantic Haven", Haven, LocationColor::None, 0),
    ("South Atlantic Haven", Haven, LocationColor::None, 0),
];

const SEASON_LINKS: &[(&str, &str)] = &[
    ("Chicago", "Toronto"),
    ("Chicago", "Washington"),
    ("Toronto", "New York"),
    ("New York", "Washington"),
    ("New York", "London"),
    ("New York", "North Atlantic Haven"),
    ("London", "North Atlantic Haven"),
    ("London", "Frankfurt"),
    ("Washington", "Jacksonville"),
    ("Jacksonville", "North Atlantic Haven"),
    ("Jacksonville", "Bogota"),
    ("Bogota", "Lima"),
    ("Bogota", "Sao Paulo"),
    ("Lima", "Sao Paulo"),
    ("Sao Paulo", "South Atlantic Haven"),
    ("Lagos", "South Atlantic Haven"),
    ("Lagos", "Kinshasa"),
    ("Lagos", "Tripoli"),
    ("Kinshasa", "Cairo"),
    ("Frankfurt", "Moscow"),
    ("Moscow", "Istanbul"),
    ("Moscow", "Baghdad"),
    ("Istanbul", "Baghdad"),
    ("Istanbul", "Tripoli"),
    ("Istanbul", "Cairo"),
    ("Tripoli", "Cairo"),
    ("Cairo", "Riyadh"),
    ("Baghdad", "Riyadh"),
];

pub(super) static SEASON_TEMPLATE: Lazy<MapTemplate> = Lazy::new(|| MapTemplate {
    locations: SEASON_LOCATIONS
        .iter()
        .map(|(name, kind, color, supplies)| LocationTemplate::new(name, *kind, *color, *supplies))
        .collect(),
    links: SEASON_LINKS
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect(),
});
