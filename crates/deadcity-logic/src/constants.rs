//! Game constants: grid size, skill names, AP defaults and timing.
//!
//! Plain constants with no database dependency. Both the engine crate and
//! the native simtest use these.

/// Width and height of the city grid. Valid coordinates are `0..GRID_SIZE`.
pub const GRID_SIZE: i32 = 100;

/// Milliseconds per hour, the unit AP regeneration rates are expressed in.
pub const MILLIS_PER_HOUR: u64 = 3_600_000;

/// Seconds per hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

pub type CharacterId = u64;
pub type BuildingId = u64;
pub type SuburbId = u64;

/// Action point defaults for freshly created characters.
pub mod ap {
    /// Starting and maximum AP.
    pub const DEFAULT_MAX: u32 = 50;
    /// Base regeneration in AP per hour.
    pub const DEFAULT_RATE: f32 = 1.0;
    /// No character ever regenerates slower than this.
    pub const MIN_RATE: f32 = 0.5;
    /// Reads within this many hours of the last action (with AP left)
    /// return the stored value without recomputing (~57.6 seconds).
    pub const DEBOUNCE_HOURS: f64 = 0.016;
    /// Extra rate from Scout Safehouse while in a building.
    pub const SCOUT_SAFEHOUSE_BONUS: f32 = 0.5;
    /// Zombies without Lurching Gait regenerate at this fraction.
    pub const ZOMBIE_SLOW_FACTOR: f32 = 0.5;
    /// Resting multiplier.
    pub const RESTING_FACTOR: f32 = 1.5;
    /// Infection multiplier on regeneration.
    pub const INFECTED_RATE_FACTOR: f32 = 0.75;
    /// Infection multiplier on action cost (ceiling-rounded).
    pub const INFECTED_COST_FACTOR: f64 = 1.25;
    /// Unpowered buildings give this fraction of their base bonus.
    pub const UNPOWERED_BONUS_FACTOR: f32 = 0.5;
    /// Upper bound of a building's base regeneration bonus.
    pub const MAX_BUILDING_BONUS: f32 = 5.0;
}

/// Skill names as they appear on character records.
pub mod skill_names {
    // Military
    pub const BASIC_FIREARMS_TRAINING: &str = "Basic Firearms Training";
    pub const FREE_RUNNING: &str = "Free Running";
    pub const PISTOL_TRAINING: &str = "Pistol Training";
    pub const SHOTGUN_TRAINING: &str = "Shotgun Training";
    pub const HAND_TO_HAND_COMBAT: &str = "Hand-to-Hand Combat";
    pub const AXE_PROFICIENCY: &str = "Axe Proficiency";
    pub const SCOUT_SAFEHOUSE: &str = "Scout Safehouse";
    // Science
    pub const FIRST_AID: &str = "First Aid";
    pub const DIAGNOSIS: &str = "Diagnosis";
    pub const SURGERY: &str = "Surgery";
    pub const NECROTECH_EMPLOYMENT: &str = "NecroTech Employment";
    pub const LAB_EXPERIENCE: &str = "Lab Experience";
    // Civilian
    pub const SHOPPING: &str = "Shopping";
    pub const CONSTRUCTION: &str = "Construction";
    pub const BODY_BUILDING: &str = "Body Building";
    // Zombie
    pub const VIGOUR_MORTIS: &str = "Vigour Mortis";
    pub const LURCHING_GAIT: &str = "Lurching Gait";
    pub const DEATH_GRIP: &str = "Death Grip";
    pub const MEMORIES_OF_LIFE: &str = "Memories of Life";
}

/// Whether `(x, y)` lies on the city grid.
pub fn in_bounds(x: i32, y: i32) -> bool {
    (0..GRID_SIZE).contains(&x) && (0..GRID_SIZE).contains(&y)
}
