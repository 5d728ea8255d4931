//! Persistence seam.
//!
//! The engine reads characters, buildings, map cells and suburbs through
//! [`GameStore`] and writes back whole records. Each save replaces one
//! document atomically; there are no multi-record transactions, so the
//! engine's locks are what keep read-modify-write sequences consistent.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use deadcity_logic::building::{Building, MapCell, Suburb};
use deadcity_logic::character::Character;
use deadcity_logic::constants::{BuildingId, CharacterId, SuburbId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub trait GameStore: Send + Sync {
    fn character(&self, id: CharacterId) -> Result<Option<Character>, StoreError>;
    fn save_character(&self, character: &Character) -> Result<(), StoreError>;

    fn building(&self, id: BuildingId) -> Result<Option<Building>, StoreError>;
    fn save_building(&self, building: &Building) -> Result<(), StoreError>;

    fn cell(&self, x: i32, y: i32) -> Result<Option<MapCell>, StoreError>;
    fn suburb(&self, id: SuburbId) -> Result<Option<Suburb>, StoreError>;

    /// Ids of characters active at or after `since` with AP below max.
    fn regenerating_characters(&self, since: Timestamp) -> Result<Vec<CharacterId>, StoreError>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Default)]
struct Tables {
    characters: HashMap<CharacterId, Character>,
    buildings: HashMap<BuildingId, Building>,
    cells: HashMap<(i32, i32), MapCell>,
    suburbs: HashMap<SuburbId, Suburb>,
}

/// Serialized form of a [`MemoryStore`]. Records are sorted by key.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub characters: Vec<Character>,
    pub buildings: Vec<Building>,
    pub cells: Vec<MapCell>,
    pub suburbs: Vec<Suburb>,
}

/// `HashMap`s behind a `RwLock`. Used by tests and the simulation harness.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_character(&self, character: Character) {
        self.write().characters.insert(character.id, character);
    }

    pub fn insert_building(&self, building: Building) {
        self.write().buildings.insert(building.id, building);
    }

    pub fn insert_cell(&self, cell: MapCell) {
        self.write().cells.insert((cell.x, cell.y), cell);
    }

    pub fn insert_suburb(&self, suburb: Suburb) {
        self.write().suburbs.insert(suburb.id, suburb);
    }

    pub fn character_count(&self) -> usize {
        self.read().characters.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        let tables = self.read();
        let mut snap = Snapshot {
            characters: tables.characters.values().cloned().collect(),
            buildings: tables.buildings.values().cloned().collect(),
            cells: tables.cells.values().cloned().collect(),
            suburbs: tables.suburbs.values().cloned().collect(),
        };
        snap.characters.sort_by_key(|c| c.id);
        snap.buildings.sort_by_key(|b| b.id);
        snap.cells.sort_by_key(|c| (c.x, c.y));
        snap.suburbs.sort_by_key(|s| s.id);
        snap
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let store = Self::new();
        {
            let mut tables = store.write();
            tables.characters = snapshot.characters.into_iter().map(|c| (c.id, c)).collect();
            tables.buildings = snapshot.buildings.into_iter().map(|b| (b.id, b)).collect();
            tables.cells = snapshot
                .cells
                .into_iter()
                .map(|c| ((c.x, c.y), c))
                .collect();
            tables.suburbs = snapshot.suburbs.into_iter().map(|s| (s.id, s)).collect();
        }
        store
    }

    pub fn snapshot_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn from_snapshot_json(json: &str) -> Result<Self, StoreError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }
}

impl GameStore for MemoryStore {
    fn character(&self, id: CharacterId) -> Result<Option<Character>, StoreError> {
        Ok(self.read().characters.get(&id).cloned())
    }

    fn save_character(&self, character: &Character) -> Result<(), StoreError> {
        self.write()
            .characters
            .insert(character.id, character.clone());
        Ok(())
    }

    fn building(&self, id: BuildingId) -> Result<Option<Building>, StoreError> {
        Ok(self.read().buildings.get(&id).cloned())
    }

    fn save_building(&self, building: &Building) -> Result<(), StoreError> {
        self.write().buildings.insert(building.id, building.clone());
        Ok(())
    }

    fn cell(&self, x: i32, y: i32) -> Result<Option<MapCell>, StoreError> {
        Ok(self.read().cells.get(&(x, y)).cloned())
    }

    fn suburb(&self, id: SuburbId) -> Result<Option<Suburb>, StoreError> {
        Ok(self.read().suburbs.get(&id).cloned())
    }

    fn regenerating_characters(&self, since: Timestamp) -> Result<Vec<CharacterId>, StoreError> {
        let mut ids: Vec<CharacterId> = self
            .read()
            .characters
            .values()
            .filter(|c| c.last_active >= since && !c.actions.is_full())
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
