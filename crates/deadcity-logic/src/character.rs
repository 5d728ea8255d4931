//! Character records: the aggregate the AP and movement rules act on.
//!
//! A character is plain data. Every rule in this crate reads it through
//! a handful of queries ([`Character::has_active_skill`],
//! [`Character::position`]) so skill checks live in one place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ap, skill_names, BuildingId, CharacterId, Timestamp};
use crate::skills::{self, SkillCategory, SkillRecord};

/// Survivor or zombie. Decides which skills work and which penalties apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    Survivor,
    Zombie,
}

/// Class group chosen at creation. Buildings may grant per-group bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassGroup {
    Military,
    Civilian,
    Scientist,
    Zombie,
}

impl ClassGroup {
    /// Key used in building class-bonus tables.
    pub fn key(self) -> &'static str {
        match self {
            ClassGroup::Military => "military",
            ClassGroup::Civilian => "civilian",
            ClassGroup::Scientist => "scientist",
            ClassGroup::Zombie => "zombie",
        }
    }
}

/// XP price of one skill per category. Set from the class group at
/// creation; records without one pay the flat default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpCosts {
    pub military: u32,
    pub science: u32,
    pub civilian: u32,
    pub zombie: u32,
}

impl Default for XpCosts {
    fn default() -> Self {
        Self {
            military: DEFAULT_XP_COST,
            science: DEFAULT_XP_COST,
            civilian: DEFAULT_XP_COST,
            zombie: DEFAULT_XP_COST,
        }
    }
}

/// Price of a skill when nothing cheaper applies.
pub const DEFAULT_XP_COST: u32 = 100;

impl XpCosts {
    /// Military trains its own skills cheaply and science dearly, scientists
    /// the other way round. Everyone else pays the default.
    pub fn for_class(class_group: ClassGroup) -> Self {
        match class_group {
            ClassGroup::Military => Self {
                military: 75,
                science: 150,
                ..Self::default()
            },
            ClassGroup::Scientist => Self {
                military: 150,
                science: 75,
                ..Self::default()
            },
            ClassGroup::Civilian | ClassGroup::Zombie => Self::default(),
        }
    }

    /// A zero entry means "unset" and costs the default.
    pub fn cost(&self, category: SkillCategory) -> u32 {
        let cost = match category {
            SkillCategory::Military => self.military,
            SkillCategory::Science => self.science,
            SkillCategory::Civilian => self.civilian,
            SkillCategory::Zombie => self.zombie,
        };
        if cost == 0 {
            DEFAULT_XP_COST
        } else {
            cost
        }
    }
}

/// Where a character stands. `building_id` is the building on the current
/// cell (if any); `is_inside` says whether the character is within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
    pub building_id: Option<BuildingId>,
    pub is_inside: bool,
    /// Display name such as "Ridleybank - Street".
    #[serde(default)]
    pub area_name: Option<String>,
}

impl Location {
    pub fn street(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            building_id: None,
            is_inside: false,
            area_name: None,
        }
    }
}

/// The two states of the movement state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Outside { x: i32, y: i32 },
    Inside { building_id: BuildingId, x: i32, y: i32 },
}

impl Position {
    pub fn cell(&self) -> (i32, i32) {
        match *self {
            Position::Outside { x, y } | Position::Inside { x, y, .. } => (x, y),
        }
    }

    pub fn is_inside(&self) -> bool {
        matches!(self, Position::Inside { .. })
    }
}

/// Action point bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPoints {
    /// Stored AP as of `last_action_time` (0..=max).
    pub available: u32,
    pub max: u32,
    /// Base regeneration in AP/hour.
    pub regeneration_rate: f32,
    /// Flat bonus from status effects.
    #[serde(default)]
    pub bonus_regeneration: f32,
    /// Reference point for lazy regeneration.
    pub last_action_time: Timestamp,
    #[serde(default)]
    pub is_resting: bool,
    /// Building whose bonus applies while not physically inside another.
    #[serde(default)]
    pub recovery_location_id: Option<BuildingId>,
    /// When AP last hit exactly zero.
    #[serde(default)]
    pub last_empty_time: Option<Timestamp>,
}

impl ActionPoints {
    pub fn new(now: Timestamp) -> Self {
        Self {
            available: ap::DEFAULT_MAX,
            max: ap::DEFAULT_MAX,
            regeneration_rate: ap::DEFAULT_RATE,
            bonus_regeneration: 0.0,
            last_action_time: now,
            is_resting: false,
            recovery_location_id: None,
            last_empty_time: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.available >= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterError {
    #[error("character is already dead")]
    AlreadyDead,
    #[error("character is already alive")]
    AlreadyAlive,
    #[error("skill \"{0}\" does not exist")]
    UnknownSkill(String),
    #[error("character already has the skill \"{0}\"")]
    AlreadyKnown(String),
    #[error("prerequisite skill \"{prerequisite}\" required for \"{skill}\"")]
    MissingPrerequisite { skill: String, prerequisite: String },
    #[error("not enough XP to learn \"{skill}\" ({required} XP required)")]
    NotEnoughXp {
        skill: String,
        required: u32,
        available: u32,
    },
}

fn first_level() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub kind: CharacterKind,
    pub class_group: ClassGroup,
    #[serde(default = "first_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub xp_costs: XpCosts,
    #[serde(default)]
    pub infected: bool,
    pub health: Health,
    pub location: Location,
    pub actions: ActionPoints,
    #[serde(default)]
    pub skills: Vec<SkillRecord>,
    /// Last time the character did anything; feeds the regeneration sweep.
    pub last_active: Timestamp,
}

impl Character {
    /// A new character standing on the street at `(x, y)` with full AP.
    /// Only the zombie class group starts out dead.
    pub fn new(
        id: CharacterId,
        name: impl Into<String>,
        class_group: ClassGroup,
        x: i32,
        y: i32,
        now: Timestamp,
    ) -> Self {
        let kind = if class_group == ClassGroup::Zombie {
            CharacterKind::Zombie
        } else {
            CharacterKind::Survivor
        };
        Self {
            id,
            name: name.into(),
            kind,
            class_group,
            level: 1,
            experience: 0,
            xp_costs: XpCosts::for_class(class_group),
            infected: false,
            health: Health {
                current: if kind == CharacterKind::Survivor { 50 } else { 0 },
                max: 50,
            },
            location: Location::street(x, y),
            actions: ActionPoints::new(now),
            skills: Vec::new(),
            last_active: now,
        }
    }

    /// Add a skill without XP or prerequisite checks (character creation,
    /// fixtures). Re-adding an existing skill is a no-op.
    pub fn with_skill(mut self, name: &str) -> Self {
        if !self.has_skill(name) {
            self.skills.push(SkillRecord::for_kind(name, self.kind));
        }
        self
    }

    pub fn is_zombie(&self) -> bool {
        self.kind == CharacterKind::Zombie
    }

    pub fn is_survivor(&self) -> bool {
        self.kind == CharacterKind::Survivor
    }

    pub fn has_skill(&self, name: &str) -> bool {
        self.skills.iter().any(|s| s.name == name)
    }

    /// The one capability query every rule uses: does the character hold
    /// `name` and is it currently working for their type?
    pub fn has_active_skill(&self, name: &str) -> bool {
        self.skills.iter().any(|s| s.name == name && s.active)
    }

    pub fn can_free_run(&self) -> bool {
        self.has_active_skill(skill_names::FREE_RUNNING)
    }

    pub fn position(&self) -> Position {
        match (self.location.is_inside, self.location.building_id) {
            (true, Some(building_id)) => Position::Inside {
                building_id,
                x: self.location.x,
                y: self.location.y,
            },
            _ => Position::Outside {
                x: self.location.x,
                y: self.location.y,
            },
        }
    }

    /// Whether the data-model invariants hold.
    pub fn is_consistent(&self) -> bool {
        self.actions.available <= self.actions.max
            && (!self.location.is_inside || self.location.building_id.is_some())
            && self.actions.regeneration_rate >= 0.0
    }

    /// Switch survivor/zombie and re-derive every skill's active flag.
    pub fn change_type(&mut self, kind: CharacterKind) {
        self.kind = kind;
        for record in &mut self.skills {
            if let Some(info) = skills::lookup(&record.name) {
                record.active = info.category.active_for(kind);
            }
        }
    }

    pub fn die(&mut self) -> Result<(), CharacterError> {
        if self.is_zombie() {
            return Err(CharacterError::AlreadyDead);
        }
        self.health.current = 0;
        self.change_type(CharacterKind::Zombie);
        Ok(())
    }

    /// Bring a zombie back at half health (Body Building raises max HP).
    pub fn revive(&mut self) -> Result<(), CharacterError> {
        if self.is_survivor() {
            return Err(CharacterError::AlreadyAlive);
        }
        self.health.max = if self.has_skill(skill_names::BODY_BUILDING) {
            60
        } else {
            50
        };
        self.health.current = self.health.max / 2;
        self.change_type(CharacterKind::Survivor);
        Ok(())
    }

    /// Learn a catalog skill, paying its XP price for this character's
    /// class. Level tracks the number of skills held. Returns the XP spent.
    pub fn learn_skill(&mut self, name: &str) -> Result<u32, CharacterError> {
        let info =
            skills::lookup(name).ok_or_else(|| CharacterError::UnknownSkill(name.to_string()))?;
        if self.has_skill(name) {
            return Err(CharacterError::AlreadyKnown(name.to_string()));
        }
        if let Some(pre) = info.prerequisite {
            if !self.has_skill(pre) {
                return Err(CharacterError::MissingPrerequisite {
                    skill: name.to_string(),
                    prerequisite: pre.to_string(),
                });
            }
        }
        let cost = self.xp_costs.cost(info.category);
        if self.experience < cost {
            return Err(CharacterError::NotEnoughXp {
                skill: name.to_string(),
                required: cost,
                available: self.experience,
            });
        }
        self.skills.push(SkillRecord::for_kind(name, self.kind));
        self.experience -= cost;
        self.level = self.level.max(self.skills.len() as u32);
        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::skill_names::*;

    fn survivor() -> Character {
        Character::new(1, "Ada", ClassGroup::Military, 5, 5, 0)
    }

    #[test]
    fn test_new_character_defaults() {
        let c = survivor();
        assert_eq!(c.kind, CharacterKind::Survivor);
        assert_eq!(c.actions.available, 50);
        assert_eq!(c.actions.max, 50);
        assert_eq!(c.position(), Position::Outside { x: 5, y: 5 });
        assert!(c.is_consistent());

        let z = Character::new(2, "Rot", ClassGroup::Zombie, 0, 0, 0);
        assert!(z.is_zombie());
        assert_eq!(z.health.current, 0);
    }

    #[test]
    fn test_active_skill_query() {
        let c = survivor().with_skill(FREE_RUNNING).with_skill(LURCHING_GAIT);
        assert!(c.has_active_skill(FREE_RUNNING));
        assert!(c.has_skill(LURCHING_GAIT));
        assert!(!c.has_active_skill(LURCHING_GAIT));
    }

    #[test]
    fn test_die_flips_skill_activity() {
        let mut c = survivor().with_skill(FREE_RUNNING).with_skill(LURCHING_GAIT);
        c.die().unwrap();
        assert!(c.is_zombie());
        assert!(!c.has_active_skill(FREE_RUNNING));
        assert!(c.has_active_skill(LURCHING_GAIT));
        assert_eq!(c.die(), Err(CharacterError::AlreadyDead));
    }

    #[test]
    fn test_revive_restores_half_health() {
        let mut c = survivor().with_skill(BODY_BUILDING);
        c.die().unwrap();
        c.revive().unwrap();
        assert_eq!(c.health.max, 60);
        assert_eq!(c.health.current, 30);
        assert!(c.has_active_skill(BODY_BUILDING));
        assert_eq!(c.revive(), Err(CharacterError::AlreadyAlive));
    }

    #[test]
    fn test_learn_skill_rules() {
        let mut c = survivor();
        c.experience = 1_000;
        assert!(matches!(
            c.learn_skill(SURGERY),
            Err(CharacterError::MissingPrerequisite { .. })
        ));
        c.learn_skill(FIRST_AID).unwrap();
        c.learn_skill(SURGERY).unwrap();
        assert!(c.has_active_skill(SURGERY));
        assert_eq!(
            c.learn_skill(SURGERY),
            Err(CharacterError::AlreadyKnown(SURGERY.into()))
        );
        assert_eq!(
            c.learn_skill("Juggling"),
            Err(CharacterError::UnknownSkill("Juggling".into()))
        );
    }

    #[test]
    fn test_learn_skill_charges_class_xp() {
        let mut soldier = survivor();
        soldier.experience = 200;
        assert_eq!(soldier.learn_skill(FREE_RUNNING), Ok(75));
        assert_eq!(soldier.experience, 125);
        assert_eq!(
            soldier.learn_skill(FIRST_AID),
            Err(CharacterError::NotEnoughXp {
                skill: FIRST_AID.into(),
                required: 150,
                available: 125
            })
        );
        assert!(!soldier.has_skill(FIRST_AID));
        assert_eq!(soldier.experience, 125);

        let mut doctor = Character::new(3, "Lin", ClassGroup::Scientist, 0, 0, 0);
        doctor.experience = 75;
        assert_eq!(doctor.learn_skill(FIRST_AID), Ok(75));
        assert_eq!(doctor.experience, 0);
    }

    #[test]
    fn test_level_follows_skill_count() {
        let mut c = Character::new(4, "Bo", ClassGroup::Civilian, 0, 0, 0)
            .with_skill(SHOPPING)
            .with_skill(FREE_RUNNING);
        c.experience = 100;
        assert_eq!(c.level, 1);
        c.learn_skill(CONSTRUCTION).unwrap();
        assert_eq!(c.level, 3);
        assert_eq!(c.experience, 0);
    }

    #[test]
    fn test_unset_xp_cost_uses_default() {
        let mut c = Character::new(5, "Rot", ClassGroup::Zombie, 0, 0, 0);
        c.xp_costs.military = 0;
        assert_eq!(c.xp_costs.cost(SkillCategory::Military), DEFAULT_XP_COST);
        assert_eq!(XpCosts::for_class(ClassGroup::Zombie), XpCosts::default());
    }

    #[test]
    fn test_inside_without_building_reads_as_outside() {
        let mut c = survivor();
        c.location.is_inside = true;
        assert!(!c.is_consistent());
        assert!(!c.position().is_inside());
    }
}
