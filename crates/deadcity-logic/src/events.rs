//! Events the engine publishes for whoever is listening (socket layer,
//! tests, logs).

use serde::{Deserialize, Serialize};

use crate::action_costs::ActionKind;
use crate::constants::{BuildingId, CharacterId};
use crate::movement::Transition;
use crate::regeneration::NextAp;

pub mod topics {
    pub const AP_CHANGED: &str = "character:ap";
    pub const AP_CONSUMED: &str = "character:ap_consumed";
    pub const AP_INSUFFICIENT: &str = "character:ap_insufficient";
    pub const LOCATION_CHANGED: &str = "character:location";
    pub const RESTING_CHANGED: &str = "character:resting";
}

/// A cell plus whether the character was inside the building on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub x: i32,
    pub y: i32,
    pub building_id: Option<BuildingId>,
    pub inside: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    ApChanged {
        character_id: CharacterId,
        current: u32,
        max: u32,
        rate: f32,
        next_ap_in: NextAp,
    },
    /// `action` is `None` for raw AP spends that aren't a named action.
    ApConsumed {
        character_id: CharacterId,
        amount: u32,
        action: Option<ActionKind>,
    },
    ApInsufficient {
        character_id: CharacterId,
        required: u32,
        available: u32,
        action: Option<ActionKind>,
    },
    LocationChanged {
        character_id: CharacterId,
        from: Place,
        to: Place,
        transition: Transition,
    },
    RestingChanged {
        character_id: CharacterId,
        resting: bool,
        building_id: Option<BuildingId>,
    },
}

impl Event {
    pub fn topic(&self) -> &'static str {
        match self {
            Event::ApChanged { .. } => topics::AP_CHANGED,
            Event::ApConsumed { .. } => topics::AP_CONSUMED,
            Event::ApInsufficient { .. } => topics::AP_INSUFFICIENT,
            Event::LocationChanged { .. } => topics::LOCATION_CHANGED,
            Event::RestingChanged { .. } => topics::RESTING_CHANGED,
        }
    }

    pub fn character_id(&self) -> CharacterId {
        match *self {
            Event::ApChanged { character_id, .. }
            | Event::ApConsumed { character_id, .. }
            | Event::ApInsufficient { character_id, .. }
            | Event::LocationChanged { character_id, .. }
            | Event::RestingChanged { character_id, .. } => character_id,
        }
    }
}
