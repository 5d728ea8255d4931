//! Movement / building state machine.
//!
//! A character is either `Outside(x, y)` or `Inside(building)`. Four
//! transitions exist:
//!
//! | Transition | From | To | Cost |
//! |------------|------|----|------|
//! | Walk | Outside | Outside, orthogonal neighbour | modified `MOVE` |
//! | Enter | Outside on a building cell | Inside that building | base `ENTER_BUILDING` |
//! | Exit | Inside | Outside on the same cell | base `EXIT_BUILDING` |
//! | FreeRun | Inside | Inside a neighbouring building (diagonals allowed) | modified `MOVE` |
//!
//! Entry gates, first failure wins:
//! 1. Heavy barricades or worse keep everyone out, Free Running included
//! 2. Any lighter barricade keeps zombies out
//! 3. Closed doors on an unbarricaded building keep out zombies without
//!    Memories of Life
//!
//! Exit gate: from very heavy barricades up, survivors need Free Running.
//!
//! Free Running moves between interiors and never looks at the
//! destination's barricades or doors. Diagonal steps are only possible as a
//! Free Running hop; on the street every step is orthogonal.
//!
//! Planning is pure. [`execute`] applies a plan: it spends AP through
//! [`regeneration::consume`] and only moves the character if that succeeds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action_costs::{modified_cost, ActionKind, CostTable};
use crate::barricade::BarricadeBand;
use crate::building::{Building, MapCell};
use crate::character::{Character, Position};
use crate::constants::{in_bounds, skill_names, BuildingId, Timestamp};
use crate::regeneration::{self, ConsumeOutcome};

/// How a rejection should be surfaced to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Malformed request (bad coordinates, unknown action).
    Validation,
    /// The game rules said no (AP, barricades, doors, adjacency).
    RuleViolation,
    /// A referenced character, building or cell does not exist.
    NotFound,
    /// The request doesn't fit the character's current state.
    Invariant,
    /// A collaborator (store, transport) failed.
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MoveError {
    #[error("target location ({x}, {y}) is out of bounds")]
    OutOfBounds { x: i32, y: i32 },
    #[error("target location is not adjacent")]
    NotAdjacent,
    #[error("target location is impassable")]
    Impassable,
    #[error("not enough action points: {required} required, {available} available")]
    InsufficientAp { required: u32, available: u32 },
    #[error("building is {band}")]
    Barricaded { band: BarricadeBand },
    #[error("doors are closed and cannot be opened without Memories of Life")]
    DoorsClosed,
    #[error("character is not inside a building")]
    NotInsideABuilding,
    #[error("character is already inside a building")]
    AlreadyInside,
    #[error("there is no building here")]
    BuildingNotFound,
}

impl MoveError {
    pub fn class(&self) -> ErrorClass {
        match self {
            MoveError::OutOfBounds { .. } => ErrorClass::Validation,
            MoveError::NotAdjacent
            | MoveError::Impassable
            | MoveError::InsufficientAp { .. }
            | MoveError::Barricaded { .. }
            | MoveError::DoorsClosed => ErrorClass::RuleViolation,
            MoveError::BuildingNotFound => ErrorClass::NotFound,
            MoveError::NotInsideABuilding | MoveError::AlreadyInside => ErrorClass::Invariant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Walk,
    Enter,
    Exit,
    FreeRun,
}

/// Where a character ends up after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub x: i32,
    pub y: i32,
    pub building_id: Option<BuildingId>,
    pub is_inside: bool,
}

/// A validated transition, ready to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub transition: Transition,
    pub action: ActionKind,
    pub ap_cost: u32,
    pub from: Position,
    pub destination: Destination,
}

/// `{valid, ap_cost, reason}` answer for "could I do this?" queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub valid: bool,
    pub ap_cost: u32,
    pub reason: Option<MoveError>,
}

impl From<&Result<Plan, MoveError>> for Check {
    fn from(result: &Result<Plan, MoveError>) -> Self {
        match result {
            Ok(plan) => Check {
                valid: true,
                ap_cost: plan.ap_cost,
                reason: None,
            },
            Err(err) => Check {
                valid: false,
                ap_cost: match err {
                    MoveError::InsufficientAp { required, .. } => *required,
                    _ => 0,
                },
                reason: Some(*err),
            },
        }
    }
}

fn is_orthogonal_step(from: (i32, i32), to: (i32, i32)) -> bool {
    (from.0 - to.0).abs() + (from.1 - to.1).abs() == 1
}

fn is_king_step(from: (i32, i32), to: (i32, i32)) -> bool {
    from != to && (from.0 - to.0).abs() <= 1 && (from.1 - to.1).abs() <= 1
}

fn require_ap(cost: u32, available: u32) -> Result<(), MoveError> {
    if available < cost {
        return Err(MoveError::InsufficientAp {
            required: cost,
            available,
        });
    }
    Ok(())
}

/// Reject coordinates off the grid before anything is looked up.
pub fn check_bounds(x: i32, y: i32) -> Result<(), MoveError> {
    if in_bounds(x, y) {
        Ok(())
    } else {
        Err(MoveError::OutOfBounds { x, y })
    }
}

/// Plan a step onto `target`. Outside this is a walk; inside with Free
/// Running it is a hop to a neighbouring building.
pub fn plan_move(
    character: &Character,
    available: u32,
    target: &MapCell,
    costs: &CostTable,
) -> Result<Plan, MoveError> {
    check_bounds(target.x, target.y)?;
    let from = character.position();
    let here = from.cell();
    let there = (target.x, target.y);

    let (transition, destination) = match from {
        Position::Outside { .. } => {
            if !is_orthogonal_step(here, there) {
                return Err(MoveError::NotAdjacent);
            }
            (
                Transition::Walk,
                Destination {
                    x: target.x,
                    y: target.y,
                    building_id: target.building_ref(),
                    is_inside: false,
                },
            )
        }
        Position::Inside { .. } => {
            if !character.can_free_run() {
                return Err(MoveError::AlreadyInside);
            }
            if !is_king_step(here, there) {
                return Err(MoveError::NotAdjacent);
            }
            let Some(building_id) = target.building_ref() else {
                // Free Running only connects interiors; the street needs an exit.
                return Err(MoveError::AlreadyInside);
            };
            (
                Transition::FreeRun,
                Destination {
                    x: target.x,
                    y: target.y,
                    building_id: Some(building_id),
                    is_inside: true,
                },
            )
        }
    };

    if !target.passable {
        return Err(MoveError::Impassable);
    }

    let ap_cost = modified_cost(costs.base_cost(ActionKind::Move), character, ActionKind::Move);
    require_ap(ap_cost, available)?;

    Ok(Plan {
        transition,
        action: ActionKind::Move,
        ap_cost,
        from,
        destination,
    })
}

/// The three entry gates, in order.
pub fn check_entry(character: &Character, building: &Building) -> Result<(), MoveError> {
    let band = building.barricade_band();
    if band.blocks_entry_from_outside() {
        return Err(MoveError::Barricaded { band });
    }
    if band.is_barricaded() {
        if character.is_zombie() {
            return Err(MoveError::Barricaded { band });
        }
        return Ok(());
    }
    if !building.doors_open
        && character.is_zombie()
        && !character.has_active_skill(skill_names::MEMORIES_OF_LIFE)
    {
        return Err(MoveError::DoorsClosed);
    }
    Ok(())
}

/// Plan entering the building on the character's current cell.
pub fn plan_enter(
    character: &Character,
    available: u32,
    cell: &MapCell,
    building: Option<&Building>,
    costs: &CostTable,
) -> Result<Plan, MoveError> {
    let from = character.position();
    if from.is_inside() {
        return Err(MoveError::AlreadyInside);
    }
    let building = match (cell.building_ref(), building) {
        (Some(id), Some(b)) if b.id == id => b,
        _ => return Err(MoveError::BuildingNotFound),
    };
    check_entry(character, building)?;

    let ap_cost = costs.base_cost(ActionKind::EnterBuilding);
    require_ap(ap_cost, available)?;

    Ok(Plan {
        transition: Transition::Enter,
        action: ActionKind::EnterBuilding,
        ap_cost,
        from,
        destination: Destination {
            x: cell.x,
            y: cell.y,
            building_id: Some(building.id),
            is_inside: true,
        },
    })
}

/// Exit gate. Zombies are never held in: they could not have got past
/// the barricades in the first place.
pub fn check_exit(character: &Character, building: &Building) -> Result<(), MoveError> {
    let band = building.barricade_band();
    if band.blocks_exit_without_free_running()
        && character.is_survivor()
        && !character.can_free_run()
    {
        return Err(MoveError::Barricaded { band });
    }
    Ok(())
}

/// Plan leaving the building the character is in.
pub fn plan_exit(
    character: &Character,
    available: u32,
    building: Option<&Building>,
    costs: &CostTable,
) -> Result<Plan, MoveError> {
    let from = character.position();
    let Position::Inside { building_id, x, y } = from else {
        return Err(MoveError::NotInsideABuilding);
    };
    let building = match building {
        Some(b) if b.id == building_id => b,
        _ => return Err(MoveError::BuildingNotFound),
    };
    check_exit(character, building)?;

    let ap_cost = costs.base_cost(ActionKind::ExitBuilding);
    require_ap(ap_cost, available)?;

    Ok(Plan {
        transition: Transition::Exit,
        action: ActionKind::ExitBuilding,
        ap_cost,
        from,
        destination: Destination {
            x,
            y,
            building_id: Some(building_id),
            is_inside: false,
        },
    })
}

/// Spend the plan's AP and move the character. Nothing changes if the AP
/// is no longer there.
pub fn execute(
    character: &mut Character,
    plan: &Plan,
    rate: f32,
    now: Timestamp,
) -> Result<ConsumeOutcome, MoveError> {
    let outcome = regeneration::consume(character, plan.ap_cost, rate, now);
    if let ConsumeOutcome::Insufficient {
        required,
        available,
    } = outcome
    {
        return Err(MoveError::InsufficientAp {
            required,
            available,
        });
    }

    let loc = &mut character.location;
    loc.x = plan.destination.x;
    loc.y = plan.destination.y;
    loc.building_id = plan.destination.building_id;
    loc.is_inside = plan.destination.is_inside;
    character.last_active = now;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::ClassGroup;
    use crate::constants::skill_names::*;

    fn survivor_at(x: i32, y: i32) -> Character {
        Character::new(1, "Ada", ClassGroup::Military, x, y, 0)
    }

    fn zombie_at(x: i32, y: i32) -> Character {
        Character::new(2, "Rot", ClassGroup::Zombie, x, y, 0)
    }

    fn building(id: BuildingId, x: i32, y: i32, barricade: u32) -> Building {
        let mut b = Building::new(id, "Mall", x, y);
        b.barricade_level = barricade;
        b
    }

    fn put_inside(c: &mut Character, id: BuildingId) {
        c.location.building_id = Some(id);
        c.location.is_inside = true;
    }

    #[test]
    fn test_walk_orthogonal() {
        let c = survivor_at(5, 5);
        let plan = plan_move(&c, 50, &MapCell::street(5, 6, 1), &CostTable::default()).unwrap();
        assert_eq!(plan.transition, Transition::Walk);
        assert_eq!(plan.ap_cost, 1);
        assert!(!plan.destination.is_inside);
    }

    #[test]
    fn test_walk_rejects_diagonal_and_far() {
        let costs = CostTable::default();
        let c = survivor_at(5, 5).with_skill(FREE_RUNNING);
        assert_eq!(
            plan_move(&c, 50, &MapCell::building(6, 6, 9, 1), &costs),
            Err(MoveError::NotAdjacent)
        );
        assert_eq!(
            plan_move(&c, 50, &MapCell::street(5, 7, 1), &costs),
            Err(MoveError::NotAdjacent)
        );
        assert_eq!(
            plan_move(&c, 50, &MapCell::street(5, 5, 1), &costs),
            Err(MoveError::NotAdjacent)
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let c = survivor_at(0, 0);
        let err = plan_move(&c, 50, &MapCell::street(-1, 0, 1), &CostTable::default());
        assert_eq!(err, Err(MoveError::OutOfBounds { x: -1, y: 0 }));
        assert_eq!(err.unwrap_err().class(), ErrorClass::Validation);
    }

    #[test]
    fn test_walk_onto_building_cell_stays_outside() {
        let c = survivor_at(5, 5);
        let plan = plan_move(&c, 50, &MapCell::building(6, 5, 9, 1), &CostTable::default())
            .unwrap();
        assert_eq!(plan.destination.building_id, Some(9));
        assert!(!plan.destination.is_inside);
    }

    #[test]
    fn test_impassable_cell() {
        let c = survivor_at(5, 5);
        let mut cell = MapCell::street(5, 4, 1);
        cell.passable = false;
        assert_eq!(
            plan_move(&c, 50, &cell, &CostTable::default()),
            Err(MoveError::Impassable)
        );
    }

    #[test]
    fn test_zombie_move_cost() {
        let costs = CostTable::default();
        let z = zombie_at(5, 5);
        let cell = MapCell::street(4, 5, 1);
        assert_eq!(plan_move(&z, 50, &cell, &costs).unwrap().ap_cost, 2);
        let gait = zombie_at(5, 5).with_skill(LURCHING_GAIT);
        assert_eq!(plan_move(&gait, 50, &cell, &costs).unwrap().ap_cost, 1);
        assert_eq!(
            plan_move(&z, 1, &cell, &costs),
            Err(MoveError::InsufficientAp {
                required: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_inside_without_free_running_cannot_move() {
        let mut c = survivor_at(5, 5);
        put_inside(&mut c, 9);
        assert_eq!(
            plan_move(&c, 50, &MapCell::street(5, 6, 1), &CostTable::default()),
            Err(MoveError::AlreadyInside)
        );
    }

    #[test]
    fn test_free_run_hop_diagonal() {
        let mut c = survivor_at(5, 5).with_skill(FREE_RUNNING);
        put_inside(&mut c, 9);
        let plan = plan_move(&c, 50, &MapCell::building(6, 6, 10, 1), &CostTable::default())
            .unwrap();
        assert_eq!(plan.transition, Transition::FreeRun);
        assert_eq!(plan.destination.building_id, Some(10));
        assert!(plan.destination.is_inside);
    }

    #[test]
    fn test_free_run_needs_building_destination() {
        let mut c = survivor_at(5, 5).with_skill(FREE_RUNNING);
        put_inside(&mut c, 9);
        assert_eq!(
            plan_move(&c, 50, &MapCell::street(5, 6, 1), &CostTable::default()),
            Err(MoveError::AlreadyInside)
        );
        assert_eq!(
            plan_move(&c, 50, &MapCell::building(7, 5, 11, 1), &CostTable::default()),
            Err(MoveError::NotAdjacent)
        );
    }

    #[test]
    fn test_entry_gates_order() {
        let s = survivor_at(5, 5).with_skill(FREE_RUNNING);
        let z = zombie_at(5, 5).with_skill(MEMORIES_OF_LIFE);

        let heavy = building(9, 5, 5, 65);
        assert_eq!(
            check_entry(&s, &heavy),
            Err(MoveError::Barricaded {
                band: BarricadeBand::Heavy
            })
        );

        let loose = building(9, 5, 5, 5);
        assert!(check_entry(&s, &loose).is_ok());
        assert!(matches!(
            check_entry(&z, &loose),
            Err(MoveError::Barricaded { .. })
        ));

        let mut closed = building(9, 5, 5, 0);
        closed.doors_open = false;
        assert!(check_entry(&s, &closed).is_ok());
        assert!(check_entry(&z, &closed).is_ok());
        assert_eq!(
            check_entry(&zombie_at(5, 5), &closed),
            Err(MoveError::DoorsClosed)
        );
    }

    #[test]
    fn test_barricade_reason_mentions_barricaded() {
        let z = zombie_at(5, 5).with_skill(FREE_RUNNING);
        let err = check_entry(&z, &building(9, 5, 5, 65)).unwrap_err();
        assert!(err.to_string().contains("barricaded"));
        assert_eq!(err.class(), ErrorClass::RuleViolation);
    }

    #[test]
    fn test_plan_enter() {
        let costs = CostTable::default();
        let c = survivor_at(5, 5);
        let cell = MapCell::building(5, 5, 9, 1);
        let b = building(9, 5, 5, 0);
        let plan = plan_enter(&c, 50, &cell, Some(&b), &costs).unwrap();
        assert_eq!(plan.ap_cost, 1);
        assert!(plan.destination.is_inside);

        assert_eq!(
            plan_enter(&c, 50, &MapCell::street(5, 5, 1), None, &costs),
            Err(MoveError::BuildingNotFound)
        );
        assert_eq!(
            plan_enter(&c, 0, &cell, Some(&b), &costs),
            Err(MoveError::InsufficientAp {
                required: 1,
                available: 0
            })
        );

        let mut inside = c.clone();
        put_inside(&mut inside, 9);
        assert_eq!(
            plan_enter(&inside, 50, &cell, Some(&b), &costs),
            Err(MoveError::AlreadyInside)
        );
    }

    #[test]
    fn test_plan_exit() {
        let costs = CostTable::default();
        let outside = survivor_at(5, 5);
        assert_eq!(
            plan_exit(&outside, 50, None, &costs),
            Err(MoveError::NotInsideABuilding)
        );

        let mut c = survivor_at(5, 5);
        put_inside(&mut c, 9);
        let plan = plan_exit(&c, 50, Some(&building(9, 5, 5, 70)), &costs).unwrap();
        assert!(!plan.destination.is_inside);
        assert_eq!(plan.destination.building_id, Some(9));

        assert!(matches!(
            plan_exit(&c, 50, Some(&building(9, 5, 5, 85)), &costs),
            Err(MoveError::Barricaded {
                band: BarricadeBand::VeryHeavy
            })
        ));

        let mut runner = survivor_at(5, 5).with_skill(FREE_RUNNING);
        put_inside(&mut runner, 9);
        assert!(plan_exit(&runner, 50, Some(&building(9, 5, 5, 150)), &costs).is_ok());

        let mut z = zombie_at(5, 5);
        put_inside(&mut z, 9);
        assert!(plan_exit(&z, 50, Some(&building(9, 5, 5, 150)), &costs).is_ok());
    }

    #[test]
    fn test_check_from_result() {
        let ok = Check::from(&plan_move(
            &survivor_at(5, 5),
            50,
            &MapCell::street(5, 6, 1),
            &CostTable::default(),
        ));
        assert!(ok.valid);
        assert_eq!(ok.ap_cost, 1);

        let short: Result<Plan, MoveError> = Err(MoveError::InsufficientAp {
            required: 2,
            available: 0,
        });
        let check = Check::from(&short);
        assert!(!check.valid);
        assert_eq!(check.ap_cost, 2);
    }

    #[test]
    fn test_execute_moves_and_spends() {
        let mut c = survivor_at(5, 5);
        let plan = plan_move(&c, 50, &MapCell::street(5, 6, 1), &CostTable::default()).unwrap();
        let out = execute(&mut c, &plan, 1.0, 1000).unwrap();
        assert_eq!(out.remaining(), 49);
        assert_eq!((c.location.x, c.location.y), (5, 6));
        assert_eq!(c.last_active, 1000);
    }

    #[test]
    fn test_execute_without_ap_leaves_character() {
        let mut c = survivor_at(5, 5);
        let plan = plan_move(&c, 50, &MapCell::street(5, 6, 1), &CostTable::default()).unwrap();
        c.actions.available = 0;
        c.actions.last_action_time = 1000;
        let before = c.clone();
        assert!(matches!(
            execute(&mut c, &plan, 1.0, 1000),
            Err(MoveError::InsufficientAp { .. })
        ));
        assert_eq!(c, before);
    }
}
