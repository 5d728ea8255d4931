//! Resting sessions.
//!
//! Resting binds a character to a building: their rate gets the building's
//! bonus and a ×1.5 multiplier. Buildings with a bounded capacity count
//! their resting occupants; unbounded ones (capacity 0) don't track them.
//!
//! Resting is not a durable toggle. Any successful AP spend ends it (see
//! [`crate::regeneration::consume`]), and whoever persists the building
//! must then release the slot with [`release_slot`].

use thiserror::Error;

use crate::building::Building;
use crate::character::Character;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RestError {
    #[error("this location is at capacity")]
    AtCapacity,
}

/// Start resting in `building`. Fails without touching either record when
/// the building is full. Resting again in the same building is a no-op.
pub fn start_resting(character: &mut Character, building: &mut Building) -> Result<(), RestError> {
    let actions = &character.actions;
    if actions.is_resting && actions.recovery_location_id == Some(building.id) {
        return Ok(());
    }
    if !building.can_accept_resting() {
        return Err(RestError::AtCapacity);
    }
    building.add_resting_character();
    character.actions.is_resting = true;
    character.actions.recovery_location_id = Some(building.id);
    Ok(())
}

/// Stop resting. `building` should be the record named by
/// `recovery_location_id`; its slot is only released if the character was
/// still resting there. Returns whether a rest was actually ended.
pub fn stop_resting(character: &mut Character, building: Option<&mut Building>) -> bool {
    let was_resting = character.actions.is_resting;
    if was_resting {
        if let Some(b) = building {
            if character.actions.recovery_location_id == Some(b.id) {
                release_slot(b);
            }
        }
    }
    character.actions.is_resting = false;
    character.actions.recovery_location_id = None;
    was_resting
}

/// Give back a resting slot after a rest ended some other way.
pub fn release_slot(building: &mut Building) {
    building.remove_resting_character();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::ApRegeneration;
    use crate::character::ClassGroup;

    fn character() -> Character {
        Character::new(1, "Ada", ClassGroup::Civilian, 2, 2, 0)
    }

    fn hotel(capacity: u32, occupancy: u32) -> Building {
        let mut b = Building::new(4, "Hotel", 2, 2);
        b.ap_regeneration = ApRegeneration::new(1.0, capacity);
        b.ap_regeneration.current_occupancy = occupancy;
        b
    }

    #[test]
    fn test_start_resting_takes_slot() {
        let mut c = character();
        let mut b = hotel(2, 0);
        start_resting(&mut c, &mut b).unwrap();
        assert!(c.actions.is_resting);
        assert_eq!(c.actions.recovery_location_id, Some(4));
        assert_eq!(b.ap_regeneration.current_occupancy, 1);
    }

    #[test]
    fn test_start_resting_at_capacity_changes_nothing() {
        let mut c = character();
        let mut b = hotel(1, 1);
        let before = (c.clone(), b.clone());
        assert_eq!(start_resting(&mut c, &mut b), Err(RestError::AtCapacity));
        assert_eq!((c, b), before);
    }

    #[test]
    fn test_unbounded_building_not_counted() {
        let mut c = character();
        let mut b = hotel(0, 0);
        start_resting(&mut c, &mut b).unwrap();
        assert_eq!(b.ap_regeneration.current_occupancy, 0);
        assert!(stop_resting(&mut c, Some(&mut b)));
        assert_eq!(b.ap_regeneration.current_occupancy, 0);
    }

    #[test]
    fn test_resting_twice_same_building_counts_once() {
        let mut c = character();
        let mut b = hotel(3, 0);
        start_resting(&mut c, &mut b).unwrap();
        start_resting(&mut c, &mut b).unwrap();
        assert_eq!(b.ap_regeneration.current_occupancy, 1);
    }

    #[test]
    fn test_stop_resting_releases_slot() {
        let mut c = character();
        let mut b = hotel(2, 0);
        start_resting(&mut c, &mut b).unwrap();
        assert!(stop_resting(&mut c, Some(&mut b)));
        assert!(!c.actions.is_resting);
        assert_eq!(c.actions.recovery_location_id, None);
        assert_eq!(b.ap_regeneration.current_occupancy, 0);
    }

    #[test]
    fn test_stop_after_interruption_does_not_release_twice() {
        let mut c = character();
        let mut b = hotel(2, 1);
        start_resting(&mut c, &mut b).unwrap();
        assert_eq!(b.ap_regeneration.current_occupancy, 2);
        // Spending AP ended the rest and the slot was handed back
        c.actions.is_resting = false;
        release_slot(&mut b);
        assert!(!stop_resting(&mut c, Some(&mut b)));
        assert_eq!(b.ap_regeneration.current_occupancy, 1);
        assert_eq!(c.actions.recovery_location_id, None);
    }
}
