//! Skill catalog and per-character skill records.
//!
//! Every skill belongs to a category. Zombie-category skills only work
//! while the character is a zombie; every other category only works while
//! the character is a survivor. The `active` flag on a [`SkillRecord`] is
//! derived from that rule whenever the character changes type.
//!
//! ```
//! use deadcity_logic::skills::{lookup, SkillCategory};
//!
//! let info = lookup("Lurching Gait").unwrap();
//! assert_eq!(info.category, SkillCategory::Zombie);
//! ```

use serde::{Deserialize, Serialize};

use crate::character::CharacterKind;
use crate::constants::skill_names::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Military,
    Science,
    Civilian,
    Zombie,
}

impl SkillCategory {
    /// Whether skills of this category work for a character of `kind`.
    pub fn active_for(self, kind: CharacterKind) -> bool {
        match self {
            SkillCategory::Zombie => kind == CharacterKind::Zombie,
            _ => kind == CharacterKind::Survivor,
        }
    }
}

/// Static description of a learnable skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillInfo {
    pub name: &'static str,
    pub category: SkillCategory,
    pub prerequisite: Option<&'static str>,
}

const fn skill(
    name: &'static str,
    category: SkillCategory,
    prerequisite: Option<&'static str>,
) -> SkillInfo {
    SkillInfo {
        name,
        category,
        prerequisite,
    }
}

/// All skills known to the game.
pub const CATALOG: &[SkillInfo] = &[
    skill(BASIC_FIREARMS_TRAINING, SkillCategory::Military, None),
    skill(FREE_RUNNING, SkillCategory::Military, None),
    skill(
        PISTOL_TRAINING,
        SkillCategory::Military,
        Some(BASIC_FIREARMS_TRAINING),
    ),
    skill(
        SHOTGUN_TRAINING,
        SkillCategory::Military,
        Some(BASIC_FIREARMS_TRAINING),
    ),
    skill(HAND_TO_HAND_COMBAT, SkillCategory::Military, None),
    skill(
        AXE_PROFICIENCY,
        SkillCategory::Military,
        Some(HAND_TO_HAND_COMBAT),
    ),
    skill(SCOUT_SAFEHOUSE, SkillCategory::Military, Some(FREE_RUNNING)),
    skill(FIRST_AID, SkillCategory::Science, None),
    skill(DIAGNOSIS, SkillCategory::Science, None),
    skill(SURGERY, SkillCategory::Science, Some(FIRST_AID)),
    skill(NECROTECH_EMPLOYMENT, SkillCategory::Science, None),
    skill(
        LAB_EXPERIENCE,
        SkillCategory::Science,
        Some(NECROTECH_EMPLOYMENT),
    ),
    skill(SHOPPING, SkillCategory::Civilian, None),
    skill(CONSTRUCTION, SkillCategory::Civilian, None),
    skill(BODY_BUILDING, SkillCategory::Civilian, None),
    skill(VIGOUR_MORTIS, SkillCategory::Zombie, None),
    skill(LURCHING_GAIT, SkillCategory::Zombie, None),
    skill(DEATH_GRIP, SkillCategory::Zombie, Some(VIGOUR_MORTIS)),
    skill(MEMORIES_OF_LIFE, SkillCategory::Zombie, None),
];

/// Find a skill in the catalog by its display name.
pub fn lookup(name: &str) -> Option<&'static SkillInfo> {
    CATALOG.iter().find(|s| s.name == name)
}

/// A skill held by a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    pub active: bool,
}

impl SkillRecord {
    /// Build a record whose `active` flag matches the character's type.
    /// Skills missing from the catalog are treated as survivor skills.
    pub fn for_kind(name: &str, kind: CharacterKind) -> Self {
        let category = lookup(name)
            .map(|s| s.category)
            .unwrap_or(SkillCategory::Civilian);
        Self {
            name: name.to_string(),
            active: category.active_for(kind),
        }
    }
}
