//! Pure game rules for DeadCity.
//!
//! This crate holds the action point economy and the movement / building
//! state machine. Functions take plain data (characters, buildings, map
//! cells, a timestamp) and return results. There is no database, clock or
//! transport here, so everything is unit-testable and the engine crate can
//! wrap it with whatever persistence it likes.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`action_costs`] | Base AP cost per action kind, skill/infection modifiers |
//! | [`barricade`] | Barricade level bands and the gates they imply |
//! | [`building`] | Buildings, map cells, suburbs, resting occupancy |
//! | [`character`] | Character records, type switching, skill capability query |
//! | [`constants`] | Grid size, skill names, AP defaults and timing |
//! | [`events`] | Notifications the engine publishes |
//! | [`movement`] | Walk / enter / exit / Free Running transitions |
//! | [`regeneration`] | Lazy AP regeneration, consumption, next-AP timing |
//! | [`resting`] | Capacity-limited resting sessions |
//! | [`skills`] | Skill catalog and per-character skill records |

pub mod action_costs;
pub mod barricade;
pub mod building;
pub mod character;
pub mod constants;
pub mod events;
pub mod movement;
pub mod regeneration;
pub mod resting;
pub mod skills;
