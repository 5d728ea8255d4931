//! Barricade bands.
//!
//! A building's barricade level is an unbounded non-negative integer. One
//! banding scheme is used everywhere: display text, entry gating and exit
//! gating all read [`BarricadeBand`].
//!
//! | Level | Band | Text |
//! |-------|------|------|
//! | 0 | None | not barricaded |
//! | 1–9 | Loose | loosely barricaded |
//! | 10–19 | Light | lightly barricaded |
//! | 20–39 | QuiteStrong | quite strongly barricaded |
//! | 40–59 | VeryStrong | very strongly barricaded |
//! | 60–79 | Heavy | heavily barricaded |
//! | 80–99 | VeryHeavy | very heavily barricaded |
//! | 100+ | Extreme | extremely heavily barricaded |
//!
//! ```
//! use deadcity_logic::barricade::BarricadeBand;
//!
//! assert_eq!(BarricadeBand::from_level(65), BarricadeBand::Heavy);
//! assert!(BarricadeBand::from_level(65).blocks_entry_from_outside());
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BarricadeBand {
    None,
    Loose,
    Light,
    QuiteStrong,
    VeryStrong,
    Heavy,
    VeryHeavy,
    Extreme,
}

impl BarricadeBand {
    pub fn from_level(level: u32) -> Self {
        match level {
            0 => Self::None,
            1..=9 => Self::Loose,
            10..=19 => Self::Light,
            20..=39 => Self::QuiteStrong,
            40..=59 => Self::VeryStrong,
            60..=79 => Self::Heavy,
            80..=99 => Self::VeryHeavy,
            _ => Self::Extreme,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::None => "not barricaded",
            Self::Loose => "loosely barricaded",
            Self::Light => "lightly barricaded",
            Self::QuiteStrong => "quite strongly barricaded",
            Self::VeryStrong => "very strongly barricaded",
            Self::Heavy => "heavily barricaded",
            Self::VeryHeavy => "very heavily barricaded",
            Self::Extreme => "extremely heavily barricaded",
        }
    }

    pub fn is_barricaded(self) -> bool {
        self != Self::None
    }

    /// Nobody gets in from the street at this level, Free Running or not.
    pub fn blocks_entry_from_outside(self) -> bool {
        self >= Self::Heavy
    }

    /// Survivors need Free Running to climb out at this level.
    pub fn blocks_exit_without_free_running(self) -> bool {
        self >= Self::VeryHeavy
    }
}

impl std::fmt::Display for BarricadeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
