//! Engine and store errors.

use deadcity_logic::action_costs::RequirementError;
use deadcity_logic::character::CharacterError;
use deadcity_logic::constants::{BuildingId, CharacterId};
use deadcity_logic::movement::{ErrorClass, MoveError};
use deadcity_logic::resting::RestError;
use thiserror::Error;

/// A collaborator (persistence) failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("character {0} not found")]
    CharacterNotFound(CharacterId),
    #[error("building {0} not found")]
    BuildingNotFound(BuildingId),
    #[error("no map cell at ({x}, {y})")]
    CellNotFound { x: i32, y: i32 },
    #[error("unknown action type: {0}")]
    UnknownAction(String),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Rest(#[from] RestError),
    #[error(transparent)]
    Requirement(#[from] RequirementError),
    #[error(transparent)]
    Character(#[from] CharacterError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn class(&self) -> ErrorClass {
        match self {
            EngineError::CharacterNotFound(_)
            | EngineError::BuildingNotFound(_)
            | EngineError::CellNotFound { .. } => ErrorClass::NotFound,
            EngineError::UnknownAction(_) => ErrorClass::Validation,
            EngineError::Move(e) => e.class(),
            EngineError::Character(CharacterError::UnknownSkill(_)) => ErrorClass::Validation,
            EngineError::Rest(_) | EngineError::Requirement(_) | EngineError::Character(_) => {
                ErrorClass::RuleViolation
            }
            EngineError::Store(_) => ErrorClass::External,
        }
    }

    /// The movement rejection, if this is one.
    pub fn move_error(&self) -> Option<MoveError> {
        match self {
            EngineError::Move(e) => Some(*e),
            _ => None,
        }
    }
}
