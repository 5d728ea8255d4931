//! Buildings, map cells and suburbs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::barricade::BarricadeBand;
use crate::constants::{ap, BuildingId, SuburbId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingState {
    #[default]
    Normal,
    Ransacked,
    Ruined,
}

/// How a building speeds up AP regeneration for those inside or resting in it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApRegeneration {
    /// Base bonus in AP/hour (0..=5), halved while unpowered.
    pub bonus: f32,
    /// Extra AP/hour keyed by class group ("military", "civilian", ...).
    #[serde(default)]
    pub class_bonuses: BTreeMap<String, f32>,
    /// Resting slots; 0 means unlimited (and occupancy is not tracked).
    #[serde(default)]
    pub max_capacity: u32,
    #[serde(default)]
    pub current_occupancy: u32,
}

impl ApRegeneration {
    pub fn new(bonus: f32, max_capacity: u32) -> Self {
        Self {
            bonus: bonus.clamp(0.0, ap::MAX_BUILDING_BONUS),
            class_bonuses: BTreeMap::new(),
            max_capacity,
            current_occupancy: 0,
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.max_capacity > 0
    }

    /// Class bonus for `key`, matched case-insensitively.
    pub fn class_bonus(&self, key: &str) -> f32 {
        self.class_bonuses
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub state: BuildingState,
    #[serde(default)]
    pub barricade_level: u32,
    #[serde(default = "default_doors_open")]
    pub doors_open: bool,
    #[serde(default)]
    pub is_powered: bool,
    #[serde(default)]
    pub ap_regeneration: ApRegeneration,
}

fn default_doors_open() -> bool {
    true
}

impl Building {
    pub fn new(id: BuildingId, name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            id,
            name: name.into(),
            x,
            y,
            state: BuildingState::Normal,
            barricade_level: 0,
            doors_open: true,
            is_powered: false,
            ap_regeneration: ApRegeneration::default(),
        }
    }

    pub fn barricade_band(&self) -> BarricadeBand {
        BarricadeBand::from_level(self.barricade_level)
    }

    /// Display text, e.g. "heavily barricaded".
    pub fn barricade_status(&self) -> &'static str {
        self.barricade_band().description()
    }

    pub fn add_barricade(&mut self, amount: u32) {
        self.barricade_level = self.barricade_level.saturating_add(amount);
    }

    pub fn reduce_barricade(&mut self, amount: u32) {
        self.barricade_level = self.barricade_level.saturating_sub(amount);
    }

    /// Ransacking tears down barricades and leaves the doors hanging open.
    pub fn ransack(&mut self) {
        self.state = BuildingState::Ransacked;
        self.barricade_level = 0;
        self.doors_open = true;
    }

    pub fn can_accept_resting(&self) -> bool {
        let regen = &self.ap_regeneration;
        !regen.is_bounded() || regen.current_occupancy < regen.max_capacity
    }

    /// Take a resting slot. Unbounded buildings don't count occupants.
    /// Returns whether a slot was recorded.
    pub fn add_resting_character(&mut self) -> bool {
        let regen = &mut self.ap_regeneration;
        if !regen.is_bounded() {
            return false;
        }
        regen.current_occupancy = (regen.current_occupancy + 1).min(regen.max_capacity);
        true
    }

    pub fn remove_resting_character(&mut self) {
        let regen = &mut self.ap_regeneration;
        if regen.is_bounded() {
            regen.current_occupancy = regen.current_occupancy.saturating_sub(1);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Street,
    Building,
}

/// One square of the city grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCell {
    pub x: i32,
    pub y: i32,
    pub kind: CellKind,
    #[serde(default)]
    pub building_id: Option<BuildingId>,
    pub suburb_id: SuburbId,
    #[serde(default = "default_passable")]
    pub passable: bool,
}

fn default_passable() -> bool {
    true
}

impl MapCell {
    pub fn street(x: i32, y: i32, suburb_id: SuburbId) -> Self {
        Self {
            x,
            y,
            kind: CellKind::Street,
            building_id: None,
            suburb_id,
            passable: true,
        }
    }

    pub fn building(x: i32, y: i32, building_id: BuildingId, suburb_id: SuburbId) -> Self {
        Self {
            x,
            y,
            kind: CellKind::Building,
            building_id: Some(building_id),
            suburb_id,
            passable: true,
        }
    }

    /// The building on this cell, if the cell is a building cell.
    pub fn building_ref(&self) -> Option<BuildingId> {
        match self.kind {
            CellKind::Building => self.building_id,
            CellKind::Street => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suburb {
    pub id: SuburbId,
    pub name: String,
}

/// "Suburb - Building" or "Suburb - Street".
pub fn area_name(suburb: &Suburb, building: Option<&Building>) -> String {
    match building {
        Some(b) => format!("{} - {}", suburb.name, b.name),
        None => format!("{} - Street", suburb.name),
    }
}
