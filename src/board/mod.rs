use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::game::GameError;
use crate::game::players::PlayerId;
use crate::types::{ConnectionKind, LocationColor, LocationType};

mod templates;

pub type LocationId = u16;

pub const MAX_PLAGUE_CUBES: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub to: LocationId,
    pub kind: ConnectionKind,
}

#[derive(Debug, Clone)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub kind: LocationType,
    pub color: LocationColor,
    pub supply_cubes: u32,
    pub plague_cubes: u8,
    pub has_supply_centre: bool,
    pub connections: SmallVec<[Connection; 6]>,
    pub players: Vec<PlayerId>,
}

impl Location {
    fn from_template(id: LocationId, template: &LocationTemplate) -> Self {
        Self {
            id,
            name: template.name.clone(),
            kind: template.kind,
            color: template.color,
            supply_cubes: template.supply_cubes,
            plague_cubes: 0,
            has_supply_centre: false,
            connections: SmallVec::new(),
            players: Vec::new(),
        }
    }

    pub fn neighbours(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.connections.iter().map(|connection| connection.to)
    }

    pub fn is_connected_to(&self, other: LocationId) -> bool {
        self.connections.iter().any(|connection| connection.to == other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTemplate {
    pub name: String,
    pub kind: LocationType,
    pub color: LocationColor,
    #[serde(default)]
    pub supply_cubes: u32,
}

impl LocationTemplate {
    pub fn new(name: &str, kind: LocationType, color: LocationColor, supply_cubes: u32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            color,
            supply_cubes,
        }
    }
}

/// Static description of a map: locations plus undirected links between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTemplate {
    pub locations: Vec<LocationTemplate>,
    pub links: Vec<(String, String)>,
}

impl MapTemplate {
    pub fn season() -> &'static MapTemplate {
        &templates::SEASON_TEMPLATE
    }
}

impl Default for MapTemplate {
    fn default() -> Self {
        Self::season().clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorldMap {
    locations: Vec<Location>,
    by_name: HashMap<String, LocationId>,
}

impl WorldMap {
    pub fn from_template(template: &MapTemplate) -> Result<Self, GameError> {
        let mut map = WorldMap::default();
        for location in &template.locations {
            map.add_location(location)?;
        }
        for (a, b) in &template.links {
            let a = map.require(a)?;
            let b = map.require(b)?;
            map.connect(a, b)?;
        }
        Ok(map)
    }

    pub fn add_location(&mut self, template: &LocationTemplate) -> Result<LocationId, GameError> {
        if self.by_name.contains_key(&template.name) {
            return Err(GameError::InvalidConfig(format!(
                "duplicate location {}",
                template.name
            )));
        }
        let id = LocationId::try_from(self.locations.len())
            .map_err(|_| GameError::InvalidConfig("too many locations".to_string()))?;
        self.locations.push(Location::from_template(id, template));
        self.by_name.insert(template.name.clone(), id);
        Ok(id)
    }

    /// Links two locations in both directions. Linking twice is a no-op.
    pub fn connect(&mut self, a: LocationId, b: LocationId) -> Result<(), GameError> {
        if a == b {
            return Err(GameError::InvalidConfig(format!(
                "location {} cannot connect to itself",
                self.name(a)
            )));
        }
        self.connect_one_way(a, b);
        self.connect_one_way(b, a);
        Ok(())
    }

    /// Appends `to` to the connection list of `from` only. Callers keep the
    /// graph symmetric.
    pub(crate) fn connect_one_way(&mut self, from: LocationId, to: LocationId) {
        if self.location(from).is_connected_to(to) {
            return;
        }
        let kind = ConnectionKind::between(self.location(from).kind, self.location(to).kind);
        self.locations[from as usize]
            .connections
            .push(Connection { to, kind });
    }

    pub fn find(&self, name: &str) -> Option<LocationId> {
        self.by_name.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<LocationId, GameError> {
        self.find(name)
            .ok_or_else(|| GameError::UnknownLocation(name.to_string()))
    }

    pub fn by_name(&self, name: &str) -> Option<&Location> {
        self.find(name).map(|id| self.location(id))
    }

    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id as usize]
    }

    pub fn location_mut(&mut self, id: LocationId) -> &mut Location {
        &mut self.locations[id as usize]
    }

    pub fn name(&self, id: LocationId) -> &str {
        &self.locations[id as usize].name
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
