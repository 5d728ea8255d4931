//! DeadCity engine.
//!
//! Wraps the pure rules in `deadcity_logic` with persistence, locking,
//! notifications and a clock. Collaborators are traits so the engine can
//! run against a real database or the in-memory store used in tests.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`clock`] | Time source trait, system and manual clocks |
//! | [`config`] | TOML engine configuration |
//! | [`engine`] | The operations: AP, movement, resting, action gate |
//! | [`error`] | Engine and store errors |
//! | [`locks`] | Per-character / per-building lock registry |
//! | [`notify`] | Notifier trait and implementations |
//! | [`store`] | Store trait and in-memory store |
//! | [`sweep`] | Background regeneration sweep |

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod locks;
pub mod notify;
pub mod store;
pub mod sweep;

pub use config::EngineConfig;
pub use engine::{Engine, EngineContext};
pub use error::{EngineError, StoreError};
