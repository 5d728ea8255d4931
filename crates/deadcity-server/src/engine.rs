//! The engine: AP, movement and resting operations over a [`GameStore`].
//!
//! [`Engine`] is the explicit context every operation runs in. It owns the
//! store, notifier, clock, cost table and the per-character locks. Each
//! public operation:
//!
//! 1. takes the character's lock
//! 2. loads the character and pulls its AP forward to `now`
//! 3. plans with the pure rules in `deadcity_logic`
//! 4. on success, saves every touched record and publishes events
//!
//! Rejections never write anything. Running out of AP is reported to the
//! character's listeners as an `ApInsufficient` event in addition to the
//! returned error or outcome.

use std::sync::Arc;

use deadcity_logic::action_costs::{check_requirements, modified_cost, ActionKind, CostTable};
use deadcity_logic::building::{self, Building, MapCell};
use deadcity_logic::character::Character;
use deadcity_logic::constants::{BuildingId, CharacterId, Timestamp};
use deadcity_logic::events::{Event, Place};
use deadcity_logic::movement::{self, Check, MoveError, Plan, Transition};
use deadcity_logic::regeneration::{self, ConsumeOutcome, NextAp, RegenContext};
use deadcity_logic::resting;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::{ConfigError, EngineConfig};
use crate::error::EngineError;
use crate::locks::{LockKey, LockRegistry};
use crate::notify::Notifier;
use crate::store::GameStore;

/// Everything the engine needs from the outside world.
pub struct EngineContext {
    pub store: Arc<dyn GameStore>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApStatus {
    pub current: u32,
    pub max: u32,
    pub rate: f32,
    pub next: NextAp,
}

/// A completed transition: the updated character and what it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub character: Character,
    pub ap_spent: u32,
    pub transition: Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: ActionKind,
    pub ap_cost: u32,
    pub outcome: ConsumeOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestOutcome {
    pub character: Character,
    /// Regeneration rate with the resting bonus applied.
    pub rate: f32,
}

fn place_of(character: &Character) -> Place {
    Place {
        x: character.location.x,
        y: character.location.y,
        building_id: character.location.building_id,
        inside: character.location.is_inside,
    }
}

pub struct Engine {
    store: Arc<dyn GameStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    costs: CostTable,
    locks: LockRegistry,
}

impl Engine {
    pub fn new(ctx: EngineContext) -> Result<Self, ConfigError> {
        ctx.config.validate()?;
        let costs = ctx.config.cost_table()?;
        Ok(Self {
            store: ctx.store,
            notifier: ctx.notifier,
            clock: ctx.clock,
            config: ctx.config,
            costs,
            locks: LockRegistry::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn costs(&self) -> &CostTable {
        &self.costs
    }

    pub fn store(&self) -> &dyn GameStore {
        self.store.as_ref()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ========================================================================
    // AP
    // ========================================================================

    /// Current AP. Persists and announces the value if regeneration moved it.
    pub fn get_available_ap(&self, id: CharacterId) -> Result<u32, EngineError> {
        self.with_character(id, |c, now| {
            let (current, _) = self.pull_forward(c, now)?;
            Ok(current)
        })
    }

    /// Spend `amount` AP outside any named action. Running short is an
    /// `Insufficient` outcome, not an error.
    pub fn consume_ap(&self, id: CharacterId, amount: u32) -> Result<ConsumeOutcome, EngineError> {
        self.with_character(id, |c, now| {
            let rate = self.rate_of(c)?;
            self.spend(c, amount, None, rate, now)
        })
    }

    pub fn get_regeneration_rate(&self, id: CharacterId) -> Result<f32, EngineError> {
        self.with_character(id, |c, _| self.rate_of(c))
    }

    pub fn get_time_until_next_ap(&self, id: CharacterId) -> Result<NextAp, EngineError> {
        self.with_character(id, |c, now| {
            let (_, rate) = self.pull_forward(c, now)?;
            Ok(regeneration::time_until_next_ap(c, rate, now))
        })
    }

    pub fn ap_status(&self, id: CharacterId) -> Result<ApStatus, EngineError> {
        self.with_character(id, |c, now| {
            let (current, rate) = self.pull_forward(c, now)?;
            Ok(ApStatus {
                current,
                max: c.actions.max,
                rate,
                next: regeneration::time_until_next_ap(c, rate, now),
            })
        })
    }

    /// AP gate for any named action: parse, check the action's
    /// preconditions, price with the character's modifiers, spend.
    pub fn perform_action(
        &self,
        id: CharacterId,
        action_name: &str,
    ) -> Result<ActionOutcome, EngineError> {
        let action = ActionKind::parse(action_name)
            .ok_or_else(|| EngineError::UnknownAction(action_name.to_string()))?;
        self.with_character(id, |c, now| {
            check_requirements(c, action).map_err(|e| {
                log::debug!("Character {} {} rejected: {}", c.id, action, e);
                EngineError::from(e)
            })?;
            let ap_cost = modified_cost(self.costs.base_cost(action), c, action);
            let rate = self.rate_of(c)?;
            let outcome = self.spend(c, ap_cost, Some(action), rate, now)?;
            Ok(ActionOutcome {
                action,
                ap_cost,
                outcome,
            })
        })
    }

    // ========================================================================
    // MOVEMENT
    // ========================================================================

    /// Could the character step onto `(x, y)` right now?
    pub fn is_valid_move(&self, id: CharacterId, x: i32, y: i32) -> Result<Check, EngineError> {
        self.with_character(id, |c, now| {
            if let Err(e) = movement::check_bounds(x, y) {
                return Ok(Check::from(&Err::<Plan, _>(e)));
            }
            let cell = self.cell_at(x, y)?;
            let available = self.peek_ap(c, now)?;
            Ok(Check::from(&movement::plan_move(
                c,
                available,
                &cell,
                &self.costs,
            )))
        })
    }

    /// Walk to an adjacent street or building cell, or Free Run into a
    /// neighbouring building when already inside one.
    pub fn move_character(
        &self,
        id: CharacterId,
        x: i32,
        y: i32,
    ) -> Result<MoveOutcome, EngineError> {
        self.with_character(id, |c, now| {
            movement::check_bounds(x, y).map_err(|e| self.reject(c, ActionKind::Move, e))?;
            let cell = self.cell_at(x, y)?;
            let rate = self.rate_of(c)?;
            let available = regeneration::refresh(c, rate, now);
            let plan = movement::plan_move(c, available, &cell, &self.costs)
                .map_err(|e| self.reject(c, ActionKind::Move, e))?;
            self.apply(c, &plan, rate, now, Some(&cell))
        })
    }

    pub fn can_enter_building(&self, id: CharacterId) -> Result<Check, EngineError> {
        self.with_character(id, |c, now| {
            if c.location.is_inside {
                return Ok(Check::from(&Err::<Plan, _>(MoveError::AlreadyInside)));
            }
            let (cell, building) = self.building_here(c)?;
            let available = self.peek_ap(c, now)?;
            Ok(Check::from(&movement::plan_enter(
                c,
                available,
                &cell,
                building.as_ref(),
                &self.costs,
            )))
        })
    }

    pub fn enter_building(&self, id: CharacterId) -> Result<MoveOutcome, EngineError> {
        self.with_character(id, |c, now| {
            if c.location.is_inside {
                return Err(self.reject(c, ActionKind::EnterBuilding, MoveError::AlreadyInside));
            }
            let (cell, building) = self.building_here(c)?;
            let rate = self.rate_of(c)?;
            let available = regeneration::refresh(c, rate, now);
            let plan = movement::plan_enter(c, available, &cell, building.as_ref(), &self.costs)
                .map_err(|e| self.reject(c, ActionKind::EnterBuilding, e))?;
            self.apply(c, &plan, rate, now, Some(&cell))
        })
    }

    pub fn can_exit_building(&self, id: CharacterId) -> Result<Check, EngineError> {
        self.with_character(id, |c, now| {
            let building = self.occupied_building(c)?;
            let available = self.peek_ap(c, now)?;
            Ok(Check::from(&movement::plan_exit(
                c,
                available,
                building.as_ref(),
                &self.costs,
            )))
        })
    }

    pub fn exit_building(&self, id: CharacterId) -> Result<MoveOutcome, EngineError> {
        self.with_character(id, |c, now| {
            let building = self.occupied_building(c)?;
            let rate = self.rate_of(c)?;
            let available = regeneration::refresh(c, rate, now);
            let plan = movement::plan_exit(c, available, building.as_ref(), &self.costs)
                .map_err(|e| self.reject(c, ActionKind::ExitBuilding, e))?;
            let cell = self.store.cell(plan.destination.x, plan.destination.y)?;
            self.apply(c, &plan, rate, now, cell.as_ref())
        })
    }

    // ========================================================================
    // RESTING
    // ========================================================================

    /// Rest in `building_id`. A rest already running elsewhere ends once
    /// the new slot is secured; nothing changes if the building is full.
    pub fn start_resting(
        &self,
        id: CharacterId,
        building_id: BuildingId,
    ) -> Result<RestOutcome, EngineError> {
        self.with_character(id, |c, now| {
            // Credit time spent so far at the old rate
            let old_rate = self.rate_of(c)?;
            regeneration::refresh(c, old_rate, now);

            let previous = c
                .actions
                .recovery_location_id
                .filter(|&prev| c.actions.is_resting && prev != building_id);
            let fresh =
                !(c.actions.is_resting && c.actions.recovery_location_id == Some(building_id));

            self.locks.with(LockKey::Building(building_id), || {
                let mut b = self
                    .store
                    .building(building_id)?
                    .ok_or(EngineError::BuildingNotFound(building_id))?;
                resting::start_resting(c, &mut b).map_err(|e| {
                    log::debug!("Character {} cannot rest in {}: {}", c.id, b.name, e);
                    EngineError::from(e)
                })?;
                self.store.save_building(&b)?;
                Ok::<_, EngineError>(())
            })?;

            // Buildings first, the character last; undo the slots if a
            // later write fails.
            c.last_active = now;
            let mut released = None;
            let committed = (|| {
                if let Some(prev) = previous {
                    self.release_slot(prev)?;
                    released = Some(prev);
                }
                let rate = self.rate_of(c)?;
                self.store.save_character(c)?;
                Ok::<_, EngineError>(rate)
            })();
            let rate = match committed {
                Ok(rate) => rate,
                Err(e) => {
                    if fresh {
                        self.undo(self.release_slot(building_id));
                    }
                    if let Some(prev) = released {
                        self.undo(self.retake_slot(prev));
                    }
                    return Err(e);
                }
            };

            log::info!("Character {} started resting in building {}", c.id, building_id);
            self.publish(Event::RestingChanged {
                character_id: c.id,
                resting: true,
                building_id: Some(building_id),
            });
            self.announce_ap(c, rate, now);
            Ok(RestOutcome {
                character: c.clone(),
                rate,
            })
        })
    }

    /// End a rest. Always succeeds for an existing character; a character
    /// who wasn't resting just loses its recovery building.
    pub fn stop_resting(&self, id: CharacterId) -> Result<Character, EngineError> {
        self.with_character(id, |c, now| {
            let old_rate = self.rate_of(c)?;
            regeneration::refresh(c, old_rate, now);

            let recovery = c.actions.recovery_location_id;
            let was_resting = match recovery {
                Some(bid) => self.locks.with(LockKey::Building(bid), || {
                    let mut b = self.store.building(bid)?;
                    let ended = resting::stop_resting(c, b.as_mut());
                    if let (true, Some(b)) = (ended, b.as_ref()) {
                        self.store.save_building(b)?;
                    }
                    Ok::<_, EngineError>(ended)
                })?,
                None => resting::stop_resting(c, None),
            };
            c.last_active = now;
            let committed = self.rate_of(c).and_then(|rate| {
                self.store.save_character(c)?;
                Ok(rate)
            });
            let rate = match committed {
                Ok(rate) => rate,
                Err(e) => {
                    if let (true, Some(bid)) = (was_resting, recovery) {
                        self.undo(self.retake_slot(bid));
                    }
                    return Err(e);
                }
            };

            if was_resting {
                log::info!("Character {} stopped resting", c.id);
                self.publish(Event::RestingChanged {
                    character_id: c.id,
                    resting: false,
                    building_id: recovery,
                });
                self.announce_ap(c, rate, now);
            }
            Ok(c.clone())
        })
    }

    // ========================================================================
    // SKILLS
    // ========================================================================

    /// Learn a skill with the character's XP. Costs no AP.
    pub fn learn_skill(&self, id: CharacterId, skill: &str) -> Result<Character, EngineError> {
        self.with_character(id, |c, now| {
            let xp = c.learn_skill(skill).map_err(|e| {
                log::debug!("Character {} cannot learn {}: {}", c.id, skill, e);
                EngineError::from(e)
            })?;
            c.last_active = now;
            self.store.save_character(c)?;
            log::info!(
                "Character {} learned {} for {} XP (level {})",
                c.id,
                skill,
                xp,
                c.level
            );
            Ok(c.clone())
        })
    }

    // ========================================================================
    // SWEEP SUPPORT
    // ========================================================================

    /// Pull one character's AP forward unless someone else holds its lock.
    /// `None` means busy; `Some(Ok(true))` means the value moved.
    pub(crate) fn sweep_character(
        &self,
        id: CharacterId,
        now: Timestamp,
    ) -> Option<Result<bool, EngineError>> {
        self.locks.try_with(LockKey::Character(id), || {
            let Some(mut c) = self.store.character(id)? else {
                return Ok(false);
            };
            let before = c.actions.available;
            let (current, _) = self.pull_forward(&mut c, now)?;
            Ok::<_, EngineError>(current != before)
        })
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn with_character<R>(
        &self,
        id: CharacterId,
        f: impl FnOnce(&mut Character, Timestamp) -> Result<R, EngineError>,
    ) -> Result<R, EngineError> {
        self.locks.with(LockKey::Character(id), || {
            let mut character = self
                .store
                .character(id)?
                .ok_or(EngineError::CharacterNotFound(id))?;
            let now = self.clock.now();
            f(&mut character, now)
        })
    }

    fn publish(&self, event: Event) {
        self.notifier.publish(event.topic(), &event);
    }

    fn announce_ap(&self, c: &Character, rate: f32, now: Timestamp) {
        self.publish(Event::ApChanged {
            character_id: c.id,
            current: c.actions.available,
            max: c.actions.max,
            rate,
            next_ap_in: regeneration::time_until_next_ap(c, rate, now),
        });
    }

    /// Effective rate with the occupied (or recovery) building looked up.
    fn rate_of(&self, c: &Character) -> Result<f32, EngineError> {
        let occupied = self.occupied_building(c)?;
        let recovery = match (&occupied, c.actions.recovery_location_id) {
            (None, Some(bid)) => self.store.building(bid)?,
            _ => None,
        };
        let ctx = RegenContext {
            occupied: occupied.as_ref(),
            recovery: recovery.as_ref(),
        };
        Ok(regeneration::effective_rate(c, &ctx))
    }

    /// AP as of `now` without writing anything.
    fn peek_ap(&self, c: &Character, now: Timestamp) -> Result<u32, EngineError> {
        let rate = self.rate_of(c)?;
        Ok(regeneration::available_ap(c, rate, now))
    }

    /// Refresh stored AP; save and announce if it changed.
    fn pull_forward(&self, c: &mut Character, now: Timestamp) -> Result<(u32, f32), EngineError> {
        let rate = self.rate_of(c)?;
        let before = c.actions.available;
        let current = regeneration::refresh(c, rate, now);
        if current != before {
            self.store.save_character(c)?;
            self.announce_ap(c, rate, now);
        }
        Ok((current, rate))
    }

    fn occupied_building(&self, c: &Character) -> Result<Option<Building>, EngineError> {
        match (c.location.is_inside, c.location.building_id) {
            (true, Some(bid)) => Ok(self.store.building(bid)?),
            _ => Ok(None),
        }
    }

    fn cell_at(&self, x: i32, y: i32) -> Result<MapCell, EngineError> {
        self.store
            .cell(x, y)?
            .ok_or(EngineError::CellNotFound { x, y })
    }

    /// The cell the character stands on and the building record on it.
    fn building_here(&self, c: &Character) -> Result<(MapCell, Option<Building>), EngineError> {
        let cell = self.cell_at(c.location.x, c.location.y)?;
        let building = match cell.building_ref() {
            Some(bid) => self.store.building(bid)?,
            None => None,
        };
        Ok((cell, building))
    }

    fn area_for(&self, cell: &MapCell) -> Result<Option<String>, EngineError> {
        let Some(suburb) = self.store.suburb(cell.suburb_id)? else {
            return Ok(None);
        };
        let on_cell = match cell.building_ref() {
            Some(bid) => self.store.building(bid)?,
            None => None,
        };
        Ok(Some(building::area_name(&suburb, on_cell.as_ref())))
    }

    fn release_slot(&self, building_id: BuildingId) -> Result<(), EngineError> {
        self.locks.with(LockKey::Building(building_id), || {
            if let Some(mut b) = self.store.building(building_id)? {
                resting::release_slot(&mut b);
                self.store.save_building(&b)?;
            }
            Ok(())
        })
    }

    /// Put back a slot released earlier in a write that then failed.
    fn retake_slot(&self, building_id: BuildingId) -> Result<(), EngineError> {
        self.locks.with(LockKey::Building(building_id), || {
            if let Some(mut b) = self.store.building(building_id)? {
                b.add_resting_character();
                self.store.save_building(&b)?;
            }
            Ok(())
        })
    }

    fn undo(&self, result: Result<(), EngineError>) {
        if let Err(e) = result {
            log::warn!("Could not roll back resting slot: {}", e);
        }
    }

    /// Log a rejection, tell listeners about AP shortfalls, wrap it.
    fn reject(&self, c: &Character, action: ActionKind, err: MoveError) -> EngineError {
        log::debug!("Character {} {} rejected: {}", c.id, action.as_str(), err);
        if let MoveError::InsufficientAp {
            required,
            available,
        } = err
        {
            self.publish(Event::ApInsufficient {
                character_id: c.id,
                required,
                available,
                action: Some(action),
            });
        }
        EngineError::Move(err)
    }

    /// Spend AP for a non-movement action and record the result.
    fn spend(
        &self,
        c: &mut Character,
        amount: u32,
        action: Option<ActionKind>,
        rate: f32,
        now: Timestamp,
    ) -> Result<ConsumeOutcome, EngineError> {
        let outcome = regeneration::consume(c, amount, rate, now);
        match outcome {
            ConsumeOutcome::Spent { .. } => {
                c.last_active = now;
                self.settle(c, outcome, amount, action, now)?;
            }
            ConsumeOutcome::Insufficient {
                required,
                available,
            } => {
                log::debug!(
                    "Character {} short on AP: {} required, {} available",
                    c.id,
                    required,
                    available
                );
                self.publish(Event::ApInsufficient {
                    character_id: c.id,
                    required,
                    available,
                    action,
                });
            }
        }
        Ok(outcome)
    }

    /// Persist a successful spend and publish `ApConsumed` and `ApChanged`.
    /// An interrupted rest gives its slot back before the character is
    /// saved, so a failed write leaves both records as they were.
    fn settle(
        &self,
        c: &Character,
        outcome: ConsumeOutcome,
        amount: u32,
        action: Option<ActionKind>,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let released = match outcome {
            ConsumeOutcome::Spent {
                interrupted_rest: true,
                ..
            } => c.actions.recovery_location_id,
            _ => None,
        };
        if let Some(bid) = released {
            self.release_slot(bid)?;
        }
        let committed = self.rate_of(c).and_then(|rate| {
            self.store.save_character(c)?;
            Ok(rate)
        });
        let rate = match committed {
            Ok(rate) => rate,
            Err(e) => {
                if let Some(bid) = released {
                    self.undo(self.retake_slot(bid));
                }
                return Err(e);
            }
        };

        if let Some(bid) = released {
            log::info!("Character {} stopped resting (spent AP)", c.id);
            self.publish(Event::RestingChanged {
                character_id: c.id,
                resting: false,
                building_id: Some(bid),
            });
        }
        self.publish(Event::ApConsumed {
            character_id: c.id,
            amount,
            action,
        });
        self.announce_ap(c, rate, now);
        Ok(())
    }

    /// Execute a validated plan and record the move.
    fn apply(
        &self,
        c: &mut Character,
        plan: &Plan,
        rate: f32,
        now: Timestamp,
        cell: Option<&MapCell>,
    ) -> Result<MoveOutcome, EngineError> {
        let from = place_of(c);
        let outcome =
            movement::execute(c, plan, rate, now).map_err(|e| self.reject(c, plan.action, e))?;
        if let Some(cell) = cell {
            c.location.area_name = self.area_for(cell)?;
        }
        self.settle(c, outcome, plan.ap_cost, Some(plan.action), now)?;

        log::debug!(
            "Character {} {:?} ({}, {}) -> ({}, {})",
            c.id,
            plan.transition,
            from.x,
            from.y,
            c.location.x,
            c.location.y
        );
        self.publish(Event::LocationChanged {
            character_id: c.id,
            from,
            to: place_of(c),
            transition: plan.transition,
        });
        Ok(MoveOutcome {
            character: c.clone(),
            ap_spent: plan.ap_cost,
            transition: plan.transition,
        })
    }
}
