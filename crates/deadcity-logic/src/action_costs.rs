//! Action cost table: base AP cost per action kind plus modifier rules.
//!
//! Pure functions; every other rule module asks this one what an action
//! costs, and what a character must be before trying it (see
//! [`check_requirements`]).
//!
//! Modifiers, applied in order by [`modified_cost`]:
//! 1. Zombie `MOVE` doubles unless Lurching Gait is active
//! 2. `BARRICADE` is one cheaper with Construction
//! 3. `HEAL` / `REVIVE` are one cheaper with Surgery
//! 4. Infection multiplies by 1.25, rounding up
//! 5. The result is never below 1
//!
//! ```
//! use deadcity_logic::action_costs::{modified_cost, ActionKind, CostTable};
//! use deadcity_logic::character::{Character, ClassGroup};
//!
//! let zombie = Character::new(1, "Rot", ClassGroup::Zombie, 0, 0, 0);
//! let base = CostTable::default().base_cost(ActionKind::Move);
//! assert_eq!(modified_cost(base, &zombie, ActionKind::Move), 2);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::character::{Character, CharacterKind};
use crate::constants::{ap, skill_names};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    // Movement
    Move,
    EnterBuilding,
    ExitBuilding,
    // Combat
    Attack,
    BiteAttack,
    MeleeAttack,
    FirearmAttack,
    // Building interaction
    Search,
    Barricade,
    Repair,
    DestroyBarricade,
    Ransack,
    // Items and healing
    UseItem,
    Heal,
    Revive,
    ExtractDna,
    // Communication
    RadioBroadcast,
    SprayGraffiti,
    Speak,
    // Special
    Rest,
    LearnSkill,
    Stand,
}

impl ActionKind {
    pub const ALL: [ActionKind; 22] = [
        ActionKind::Move,
        ActionKind::EnterBuilding,
        ActionKind::ExitBuilding,
        ActionKind::Attack,
        ActionKind::BiteAttack,
        ActionKind::MeleeAttack,
        ActionKind::FirearmAttack,
        ActionKind::Search,
        ActionKind::Barricade,
        ActionKind::Repair,
        ActionKind::DestroyBarricade,
        ActionKind::Ransack,
        ActionKind::UseItem,
        ActionKind::Heal,
        ActionKind::Revive,
        ActionKind::ExtractDna,
        ActionKind::RadioBroadcast,
        ActionKind::SprayGraffiti,
        ActionKind::Speak,
        ActionKind::Rest,
        ActionKind::LearnSkill,
        ActionKind::Stand,
    ];

    /// Wire name, e.g. `"ENTER_BUILDING"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Move => "MOVE",
            ActionKind::EnterBuilding => "ENTER_BUILDING",
            ActionKind::ExitBuilding => "EXIT_BUILDING",
            ActionKind::Attack => "ATTACK",
            ActionKind::BiteAttack => "BITE_ATTACK",
            ActionKind::MeleeAttack => "MELEE_ATTACK",
            ActionKind::FirearmAttack => "FIREARM_ATTACK",
            ActionKind::Search => "SEARCH",
            ActionKind::Barricade => "BARRICADE",
            ActionKind::Repair => "REPAIR",
            ActionKind::DestroyBarricade => "DESTROY_BARRICADE",
            ActionKind::Ransack => "RANSACK",
            ActionKind::UseItem => "USE_ITEM",
            ActionKind::Heal => "HEAL",
            ActionKind::Revive => "REVIVE",
            ActionKind::ExtractDna => "EXTRACT_DNA",
            ActionKind::RadioBroadcast => "RADIO_BROADCAST",
            ActionKind::SprayGraffiti => "SPRAY_GRAFFITI",
            ActionKind::Speak => "SPEAK",
            ActionKind::Rest => "REST",
            ActionKind::LearnSkill => "LEARN_SKILL",
            ActionKind::Stand => "STAND",
        }
    }

    pub fn parse(name: &str) -> Option<ActionKind> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    fn default_cost(self) -> u32 {
        match self {
            ActionKind::RadioBroadcast | ActionKind::Speak | ActionKind::LearnSkill => 0,
            ActionKind::Revive => 2,
            ActionKind::Stand => 3,
            _ => 1,
        }
    }
}

/// Which side of a building's walls an action needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whereabouts {
    Inside,
    Outside,
}

impl std::fmt::Display for Whereabouts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Whereabouts::Inside => "inside",
            Whereabouts::Outside => "outside",
        })
    }
}

/// Preconditions on the acting character, checked before any AP is spent.
/// Item requirements belong to the inventory rules and are not listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirements {
    pub state: Option<CharacterKind>,
    pub location: Option<Whereabouts>,
    /// Skills that must all be active.
    pub skills: &'static [&'static str],
}

impl ActionKind {
    pub fn requirements(self) -> Requirements {
        use skill_names::*;
        let survivor = Some(CharacterKind::Survivor);
        match self {
            ActionKind::Attack | ActionKind::MeleeAttack => Requirements {
                state: survivor,
                ..Requirements::default()
            },
            ActionKind::FirearmAttack => Requirements {
                state: survivor,
                skills: &[BASIC_FIREARMS_TRAINING],
                ..Requirements::default()
            },
            ActionKind::BiteAttack => Requirements {
                state: Some(CharacterKind::Zombie),
                ..Requirements::default()
            },
            ActionKind::Search => Requirements {
                location: Some(Whereabouts::Inside),
                ..Requirements::default()
            },
            ActionKind::Barricade => Requirements {
                state: survivor,
                location: Some(Whereabouts::Inside),
                skills: &[CONSTRUCTION],
            },
            ActionKind::Heal => Requirements {
                state: survivor,
                skills: &[FIRST_AID],
                ..Requirements::default()
            },
            ActionKind::Revive => Requirements {
                state: survivor,
                skills: &[LAB_EXPERIENCE],
                ..Requirements::default()
            },
            _ => Requirements::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementError {
    #[error("{action} requires being a {required:?}")]
    WrongState {
        action: ActionKind,
        required: CharacterKind,
    },
    #[error("must be {0} to perform {1}")]
    WrongPlace(Whereabouts, ActionKind),
    #[error("{action} requires the skill \"{skill}\"")]
    MissingSkill {
        action: ActionKind,
        skill: &'static str,
    },
}

/// Check state, then skills, then location.
pub fn check_requirements(character: &Character, kind: ActionKind) -> Result<(), RequirementError> {
    let req = kind.requirements();
    if let Some(required) = req.state {
        if character.kind != required {
            return Err(RequirementError::WrongState {
                action: kind,
                required,
            });
        }
    }
    if let Some(skill) = req
        .skills
        .iter()
        .copied()
        .find(|s| !character.has_active_skill(s))
    {
        return Err(RequirementError::MissingSkill {
            action: kind,
            skill,
        });
    }
    if let Some(place) = req.location {
        let inside = character.location.is_inside;
        if inside != (place == Whereabouts::Inside) {
            return Err(RequirementError::WrongPlace(place, kind));
        }
    }
    Ok(())
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cost charged for action names the table doesn't know.
pub const UNKNOWN_ACTION_COST: u32 = 1;

/// Base AP cost per action kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    costs: BTreeMap<ActionKind, u32>,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            costs: ActionKind::ALL
                .iter()
                .map(|k| (*k, k.default_cost()))
                .collect(),
        }
    }
}

impl CostTable {
    /// Replace the base cost of one action.
    pub fn set(&mut self, kind: ActionKind, cost: u32) {
        self.costs.insert(kind, cost);
    }

    pub fn base_cost(&self, kind: ActionKind) -> u32 {
        self.costs
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_cost())
    }

    /// Base cost by wire name. Unknown names cost 1 and log a warning.
    pub fn base_cost_by_name(&self, name: &str) -> u32 {
        match ActionKind::parse(name) {
            Some(kind) => self.base_cost(kind),
            None => {
                log::warn!("No defined AP cost for action type: {}", name);
                UNKNOWN_ACTION_COST
            }
        }
    }
}

/// Apply skill and status modifiers to a base cost. Never returns less than 1.
pub fn modified_cost(base: u32, character: &Character, kind: ActionKind) -> u32 {
    let mut cost = i64::from(base);

    if kind == ActionKind::Move
        && character.is_zombie()
        && !character.has_active_skill(skill_names::LURCHING_GAIT)
    {
        cost *= 2;
    }

    if kind == ActionKind::Barricade && character.has_active_skill(skill_names::CONSTRUCTION) {
        cost -= 1;
    }

    if matches!(kind, ActionKind::Heal | ActionKind::Revive)
        && character.has_active_skill(skill_names::SURGERY)
    {
        cost -= 1;
    }

    if character.infected {
        cost = (cost as f64 * ap::INFECTED_COST_FACTOR).ceil() as i64;
    }

    cost.clamp(1, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::ClassGroup;
    use crate::constants::skill_names::*;

    fn survivor() -> Character {
        Character::new(1, "Ada", ClassGroup::Civilian, 0, 0, 0)
    }

    fn zombie() -> Character {
        Character::new(2, "Rot", ClassGroup::Zombie, 0, 0, 0)
    }

    #[test]
    fn test_wire_names_round_trip() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ActionKind::parse("move"), None);
    }

    #[test]
    fn test_default_costs() {
        let t = CostTable::default();
        assert_eq!(t.base_cost(ActionKind::Move), 1);
        assert_eq!(t.base_cost(ActionKind::EnterBuilding), 1);
        assert_eq!(t.base_cost(ActionKind::Speak), 0);
        assert_eq!(t.base_cost(ActionKind::Revive), 2);
        assert_eq!(t.base_cost(ActionKind::Stand), 3);
    }

    #[test]
    fn test_unknown_action_falls_back_to_one() {
        let t = CostTable::default();
        assert_eq!(t.base_cost_by_name("DANCE"), 1);
        assert_eq!(t.base_cost_by_name("STAND"), 3);
    }

    #[test]
    fn test_override() {
        let mut t = CostTable::default();
        t.set(ActionKind::Search, 4);
        assert_eq!(t.base_cost(ActionKind::Search), 4);
    }

    #[test]
    fn test_zombie_move_penalty() {
        assert_eq!(modified_cost(1, &zombie(), ActionKind::Move), 2);
        let gait = zombie().with_skill(LURCHING_GAIT);
        assert_eq!(modified_cost(1, &gait, ActionKind::Move), 1);
        assert_eq!(modified_cost(1, &survivor(), ActionKind::Move), 1);
        // Penalty only on movement
        assert_eq!(modified_cost(1, &zombie(), ActionKind::BiteAttack), 1);
    }

    #[test]
    fn test_skill_discounts() {
        let builder = survivor().with_skill(CONSTRUCTION);
        assert_eq!(modified_cost(3, &builder, ActionKind::Barricade), 2);
        let surgeon = survivor().with_skill(FIRST_AID).with_skill(SURGERY);
        assert_eq!(modified_cost(2, &surgeon, ActionKind::Revive), 1);
        assert_eq!(modified_cost(3, &surgeon, ActionKind::Heal), 2);
        assert_eq!(modified_cost(3, &surgeon, ActionKind::Search), 3);
    }

    #[test]
    fn test_infection_rounds_up() {
        let mut c = survivor();
        c.infected = true;
        assert_eq!(modified_cost(3, &c, ActionKind::Stand), 4);
        assert_eq!(modified_cost(4, &c, ActionKind::Search), 5);
        assert_eq!(modified_cost(1, &c, ActionKind::Move), 2);
    }

    #[test]
    fn test_floor_at_one() {
        let builder = survivor().with_skill(CONSTRUCTION);
        assert_eq!(modified_cost(1, &builder, ActionKind::Barricade), 1);
        assert_eq!(modified_cost(0, &survivor(), ActionKind::Speak), 1);
    }

    #[test]
    fn test_requirements_state_skill_place() {
        let zombie = zombie();
        assert!(matches!(
            check_requirements(&zombie, ActionKind::Barricade),
            Err(RequirementError::WrongState {
                required: CharacterKind::Survivor,
                ..
            })
        ));
        assert_eq!(
            check_requirements(&survivor(), ActionKind::Barricade),
            Err(RequirementError::MissingSkill {
                action: ActionKind::Barricade,
                skill: CONSTRUCTION
            })
        );
        let builder = survivor().with_skill(CONSTRUCTION);
        assert_eq!(
            check_requirements(&builder, ActionKind::Barricade),
            Err(RequirementError::WrongPlace(
                Whereabouts::Inside,
                ActionKind::Barricade
            ))
        );
        let mut indoors = builder;
        indoors.location.building_id = Some(3);
        indoors.location.is_inside = true;
        assert_eq!(check_requirements(&indoors, ActionKind::Barricade), Ok(()));
    }

    #[test]
    fn test_unrestricted_actions_pass() {
        assert_eq!(check_requirements(&zombie(), ActionKind::BiteAttack), Ok(()));
        assert_eq!(check_requirements(&zombie(), ActionKind::Speak), Ok(()));
        assert_eq!(check_requirements(&survivor(), ActionKind::Stand), Ok(()));
        assert!(check_requirements(&survivor(), ActionKind::BiteAttack).is_err());
        let msg = check_requirements(&survivor(), ActionKind::Search)
            .unwrap_err()
            .to_string();
        assert_eq!(msg, "must be inside to perform SEARCH");
    }

    #[test]
    fn test_inactive_skill_gives_no_discount() {
        let mut c = survivor().with_skill(CONSTRUCTION);
        c.die().unwrap();
        assert_eq!(modified_cost(3, &c, ActionKind::Barricade), 3);
    }
}
