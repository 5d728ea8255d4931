//! Lazy AP regeneration.
//!
//! There is no clock tick. A character's AP is stored as of
//! `last_action_time` and pulled forward whenever it is read or spent:
//!
//! ```text
//! regenerated = floor(elapsed_hours * effective_rate)
//! available   = min(max, stored + regenerated)
//! ```
//!
//! Reads within ~1 minute of the last action return the stored value
//! unchanged (unless the character is at zero), so rapid successive calls
//! cannot thrash.
//!
//! Effective rate (AP/hour), in order:
//! 1. `regeneration_rate + bonus_regeneration`
//! 2. +0.5 with Scout Safehouse while inside a building
//! 3. ×0.5 for zombies without Lurching Gait
//! 4. + building bonus (occupied building, else recovery building)
//! 5. ×1.5 while resting
//! 6. ×0.75 while infected
//! 7. floor at 0.5

use serde::{Deserialize, Serialize};

use crate::building::Building;
use crate::character::Character;
use crate::constants::{ap, skill_names, Timestamp, MILLIS_PER_HOUR, SECONDS_PER_HOUR};

/// Buildings that can contribute to a character's rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegenContext<'a> {
    /// Building the character is physically inside.
    pub occupied: Option<&'a Building>,
    /// Building named by `recovery_location_id`; only used when `occupied`
    /// is `None`.
    pub recovery: Option<&'a Building>,
}

impl<'a> RegenContext<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn inside(building: &'a Building) -> Self {
        Self {
            occupied: Some(building),
            recovery: None,
        }
    }
}

/// Bonus AP/hour a building grants this character: the base bonus (halved
/// when unpowered) plus the character's class-group bonus.
pub fn building_bonus(character: &Character, building: &Building) -> f32 {
    let regen = &building.ap_regeneration;
    let base = if building.is_powered {
        regen.bonus
    } else {
        regen.bonus * ap::UNPOWERED_BONUS_FACTOR
    };
    base + regen.class_bonus(character.class_group.key())
}

pub fn effective_rate(character: &Character, ctx: &RegenContext<'_>) -> f32 {
    let actions = &character.actions;
    let mut rate = actions.regeneration_rate + actions.bonus_regeneration;

    if ctx.occupied.is_some() && character.has_active_skill(skill_names::SCOUT_SAFEHOUSE) {
        rate += ap::SCOUT_SAFEHOUSE_BONUS;
    }

    if character.is_zombie() && !character.has_active_skill(skill_names::LURCHING_GAIT) {
        rate *= ap::ZOMBIE_SLOW_FACTOR;
    }

    if let Some(building) = ctx.occupied.or(ctx.recovery) {
        rate += building_bonus(character, building);
    }

    if actions.is_resting {
        rate *= ap::RESTING_FACTOR;
    }

    if character.infected {
        rate *= ap::INFECTED_RATE_FACTOR;
    }

    rate.max(ap::MIN_RATE)
}

fn elapsed_hours(since: Timestamp, now: Timestamp) -> f64 {
    now.saturating_sub(since) as f64 / MILLIS_PER_HOUR as f64
}

/// Whole AP earned since `last_action_time`, ignoring the cap.
fn regenerated_points(character: &Character, rate: f32, now: Timestamp) -> u32 {
    let hours = elapsed_hours(character.actions.last_action_time, now);
    (hours * f64::from(rate)).floor().min(f64::from(u32::MAX)) as u32
}

/// Current AP without touching the record.
pub fn available_ap(character: &Character, rate: f32, now: Timestamp) -> u32 {
    let actions = &character.actions;
    if actions.is_full() {
        return actions.available;
    }
    let hours = elapsed_hours(actions.last_action_time, now);
    if hours < ap::DEBOUNCE_HOURS && actions.available > 0 {
        return actions.available;
    }
    let regenerated = regenerated_points(character, rate, now);
    actions.available.saturating_add(regenerated).min(actions.max)
}

/// Pull stored AP forward to `now` and return it.
///
/// When the result is still below max, `last_action_time` advances only by
/// the time that paid for the new points, so partial progress toward the
/// next point carries over.
pub fn refresh(character: &mut Character, rate: f32, now: Timestamp) -> u32 {
    let current = available_ap(character, rate, now);
    let actions = &mut character.actions;
    if current > actions.available {
        let gained = current - actions.available;
        actions.available = current;
        if current >= actions.max {
            actions.last_action_time = now;
        } else {
            let paid_ms = (f64::from(gained) / f64::from(rate) * MILLIS_PER_HOUR as f64) as u64;
            actions.last_action_time = actions
                .last_action_time
                .saturating_add(paid_ms)
                .min(now);
        }
    }
    current
}

/// Outcome of spending AP. Running short is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumeOutcome {
    Spent {
        consumed: u32,
        remaining: u32,
        /// The character was resting and spending AP ended it.
        interrupted_rest: bool,
    },
    Insufficient { required: u32, available: u32 },
}

impl ConsumeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConsumeOutcome::Spent { .. })
    }

    /// AP left after the attempt.
    pub fn remaining(&self) -> u32 {
        match *self {
            ConsumeOutcome::Spent { remaining, .. } => remaining,
            ConsumeOutcome::Insufficient { available, .. } => available,
        }
    }
}

/// Refresh, then spend `amount` AP if the character has it.
///
/// Spending stamps `last_action_time`, records `last_empty_time` when AP
/// reaches exactly zero, and always ends a rest.
pub fn consume(character: &mut Character, amount: u32, rate: f32, now: Timestamp) -> ConsumeOutcome {
    let current = refresh(character, rate, now);
    if current < amount {
        return ConsumeOutcome::Insufficient {
            required: amount,
            available: current,
        };
    }

    let actions = &mut character.actions;
    actions.available = current - amount;
    actions.last_action_time = now;
    if actions.available == 0 {
        actions.last_empty_time = Some(now);
    }
    let interrupted_rest = actions.is_resting;
    actions.is_resting = false;

    ConsumeOutcome::Spent {
        consumed: amount,
        remaining: actions.available,
        interrupted_rest,
    }
}

/// When the next AP point arrives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextAp {
    pub at_maximum: bool,
    pub seconds_until_next: u64,
    pub minutes_until_next: u64,
    pub next_ap_at: Timestamp,
    pub rate: f32,
}

pub fn time_until_next_ap(character: &Character, rate: f32, now: Timestamp) -> NextAp {
    if character.actions.is_full() {
        return NextAp {
            at_maximum: true,
            seconds_until_next: 0,
            minutes_until_next: 0,
            next_ap_at: now,
            rate,
        };
    }
    let rate_f = f64::from(rate);
    let seconds = (SECONDS_PER_HOUR / rate_f).floor() as u64;
    NextAp {
        at_maximum: false,
        seconds_until_next: seconds,
        minutes_until_next: (60.0 / rate_f).floor() as u64,
        next_ap_at: now.saturating_add(seconds * 1000),
        rate,
    }
}
