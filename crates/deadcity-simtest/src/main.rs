//! DeadCity Headless Simulation Harness
//!
//! Validates the pure rules and the engine without a database.
//! Runs entirely in-process against the in-memory store on a seeded
//! synthetic city: no networking, no sockets.
//!
//! Usage:
//!   cargo run -p deadcity-simtest
//!   cargo run -p deadcity-simtest -- --verbose

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use deadcity_logic::action_costs::{check_requirements, modified_cost, ActionKind, CostTable};
use deadcity_logic::barricade::BarricadeBand;
use deadcity_logic::building::{ApRegeneration, Building, MapCell, Suburb};
use deadcity_logic::character::{Character, ClassGroup};
use deadcity_logic::constants::{skill_names, MILLIS_PER_HOUR};
use deadcity_logic::movement::{self, ErrorClass};
use deadcity_logic::regeneration::{self, RegenContext};
use deadcity_server::clock::{Clock, ManualClock};
use deadcity_server::notify::RecordingNotifier;
use deadcity_server::store::{GameStore, MemoryStore};
use deadcity_server::sweep::RegenSweep;
use deadcity_server::{Engine, EngineConfig, EngineContext};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// ── City manifest ───────────────────────────────────────────────────────
const CITY_JSON: &str = include_str!("../../../data/city.json");
const ENGINE_TOML: &str = include_str!("../../../data/engine.toml");

#[derive(Debug, Deserialize)]
struct CityManifest {
    suburbs: Vec<String>,
    landmarks: Vec<Landmark>,
}

#[derive(Debug, Deserialize)]
struct Landmark {
    name: String,
    bonus: f32,
    capacity: u32,
    powered: bool,
    #[serde(default)]
    class_bonuses: BTreeMap<String, f32>,
}

const SEED: u64 = 0xDEAD_C17E;
/// Suburbs are 10×10 blocks laid out 3×3.
const CITY_SIZE: i32 = 30;
const SUBURB_SIZE: i32 = 10;
const SURVIVORS: u64 = 40;
const ZOMBIES: u64 = 20;
const TICKS: usize = 300;
const TICK_MS: u64 = 5 * 60 * 1000;
const START: u64 = 1_000 * MILLIS_PER_HOUR;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();
    println!("=== DeadCity Simulation Harness ===\n");

    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(SEED);

    // 1. City manifest validation
    let manifest = match serde_json::from_str::<CityManifest>(CITY_JSON) {
        Ok(m) => m,
        Err(e) => {
            println!("  ✗ city_manifest_parse: {}", e);
            std::process::exit(1);
        }
    };
    results.extend(validate_city_manifest(&manifest, verbose));

    // 2. Engine config
    results.extend(validate_engine_config(verbose));

    // 3. Action cost sweep
    results.extend(validate_action_costs(&mut rng, verbose));

    // 4. Barricade bands
    results.extend(validate_barricades(verbose));

    // 5. Regeneration properties
    results.extend(validate_regeneration(&mut rng, verbose));

    // 6-8. Engine on the synthetic city
    let sim = Sim::build(&manifest, &mut rng);
    results.extend(validate_city_walk(&sim, &mut rng, verbose));
    results.extend(validate_sweep(&sim, verbose));
    results.extend(validate_snapshot(&sim, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. City Manifest ────────────────────────────────────────────────────

fn validate_city_manifest(manifest: &CityManifest, _verbose: bool) -> Vec<TestResult> {
    println!("--- City Manifest ---");
    let mut results = Vec::new();

    let blocks = (CITY_SIZE / SUBURB_SIZE) * (CITY_SIZE / SUBURB_SIZE);
    results.push(TestResult {
        name: "manifest_suburbs_cover_grid".into(),
        passed: manifest.suburbs.len() >= blocks as usize,
        detail: format!("{} suburbs for {} blocks", manifest.suburbs.len(), blocks),
    });

    let bad_bonus: Vec<_> = manifest
        .landmarks
        .iter()
        .filter(|l| !(0.0..=5.0).contains(&l.bonus))
        .map(|l| l.name.as_str())
        .collect();
    results.push(TestResult {
        name: "manifest_bonus_range".into(),
        passed: bad_bonus.is_empty(),
        detail: if bad_bonus.is_empty() {
            "all landmark bonuses within 0..=5".into()
        } else {
            format!("out of range: {:?}", bad_bonus)
        },
    });

    let names: HashSet<_> = manifest.landmarks.iter().map(|l| &l.name).collect();
    results.push(TestResult {
        name: "manifest_unique_landmarks".into(),
        passed: names.len() == manifest.landmarks.len(),
        detail: format!("{} landmarks", manifest.landmarks.len()),
    });

    let known_keys = ["military", "civilian", "scientist", "zombie"];
    let bad_keys: Vec<_> = manifest
        .landmarks
        .iter()
        .flat_map(|l| l.class_bonuses.keys())
        .filter(|k| !known_keys.contains(&k.to_ascii_lowercase().as_str()))
        .collect();
    results.push(TestResult {
        name: "manifest_class_bonus_keys".into(),
        passed: bad_keys.is_empty(),
        detail: format!("unknown keys: {:?}", bad_keys),
    });

    results
}

// ── 2. Engine Config ────────────────────────────────────────────────────

fn validate_engine_config(_verbose: bool) -> Vec<TestResult> {
    println!("--- Engine Config ---");
    let mut results = Vec::new();

    match EngineConfig::from_toml_str(ENGINE_TOML) {
        Ok(config) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: true,
                detail: format!("{} cost overrides", config.costs.len()),
            });
            let table = config.cost_table().unwrap_or_default();
            let defaults = CostTable::default();
            let differing: Vec<_> = ActionKind::ALL
                .iter()
                .filter(|k| table.base_cost(**k) != defaults.base_cost(**k))
                .map(|k| k.as_str())
                .collect();
            results.push(TestResult {
                name: "config_matches_defaults".into(),
                passed: differing.is_empty(),
                detail: if differing.is_empty() {
                    "shipped config restates the defaults".into()
                } else {
                    format!("differs for {:?}", differing)
                },
            });
        }
        Err(e) => results.push(TestResult {
            name: "config_parse".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 3. Action Costs ─────────────────────────────────────────────────────

fn random_character(rng: &mut StdRng, id: u64) -> Character {
    let class = match rng.gen_range(0..4) {
        0 => ClassGroup::Military,
        1 => ClassGroup::Civilian,
        2 => ClassGroup::Scientist,
        _ => ClassGroup::Zombie,
    };
    let x = rng.gen_range(0..CITY_SIZE);
    let y = rng.gen_range(0..CITY_SIZE);
    let mut c = Character::new(id, format!("Sim {}", id), class, x, y, START);
    for skill in [
        skill_names::FREE_RUNNING,
        skill_names::LURCHING_GAIT,
        skill_names::MEMORIES_OF_LIFE,
        skill_names::CONSTRUCTION,
        skill_names::SURGERY,
        skill_names::SCOUT_SAFEHOUSE,
    ] {
        if rng.gen_bool(0.3) {
            c = c.with_skill(skill);
        }
    }
    c.infected = rng.gen_bool(0.2);
    c
}

fn validate_action_costs(rng: &mut StdRng, verbose: bool) -> Vec<TestResult> {
    println!("--- Action Costs ---");
    let mut results = Vec::new();

    let round_trip = ActionKind::ALL
        .iter()
        .all(|k| ActionKind::parse(k.as_str()) == Some(*k));
    results.push(TestResult {
        name: "cost_names_round_trip".into(),
        passed: round_trip,
        detail: format!("{} action kinds", ActionKind::ALL.len()),
    });

    let table = CostTable::default();
    let mut below_one = 0;
    let mut max_seen = 0;
    for id in 0..500 {
        let c = random_character(rng, id);
        for kind in ActionKind::ALL {
            let cost = modified_cost(table.base_cost(kind), &c, kind);
            if cost < 1 {
                below_one += 1;
            }
            max_seen = max_seen.max(cost);
        }
    }
    if verbose {
        println!("  highest modified cost seen: {}", max_seen);
    }
    results.push(TestResult {
        name: "cost_floor_one".into(),
        passed: below_one == 0,
        detail: format!("{} costs below 1, max {}", below_one, max_seen),
    });

    let zombie = Character::new(1, "Z", ClassGroup::Zombie, 0, 0, START);
    let gait = zombie.clone().with_skill(skill_names::LURCHING_GAIT);
    let base = table.base_cost(ActionKind::Move);
    results.push(TestResult {
        name: "cost_zombie_move".into(),
        passed: modified_cost(base, &zombie, ActionKind::Move) == 2
            && modified_cost(base, &gait, ActionKind::Move) == 1,
        detail: "2 AP without Lurching Gait, 1 with".into(),
    });

    let by_name_ok = ActionKind::ALL
        .iter()
        .all(|k| table.base_cost_by_name(k.as_str()) == table.base_cost(*k))
        && table.base_cost_by_name("JUGGLE") == 1;
    results.push(TestResult {
        name: "cost_by_name_fallback".into(),
        passed: by_name_ok,
        detail: "wire names priced as kinds, unknown names cost 1".into(),
    });

    let mut gate_leaks = Vec::new();
    for id in 0..200 {
        let c = random_character(rng, id);
        for kind in ActionKind::ALL {
            let req = kind.requirements();
            if check_requirements(&c, kind).is_ok() && req.state.is_some_and(|s| s != c.kind) {
                gate_leaks.push(kind);
            }
        }
    }
    results.push(TestResult {
        name: "action_state_gate".into(),
        passed: gate_leaks.is_empty(),
        detail: format!("{} actions allowed in the wrong state", gate_leaks.len()),
    });

    results
}

// ── 4. Barricades ───────────────────────────────────────────────────────

fn validate_barricades(_verbose: bool) -> Vec<TestResult> {
    println!("--- Barricades ---");
    let mut results = Vec::new();

    let bands: Vec<BarricadeBand> = (0..=200).map(BarricadeBand::from_level).collect();
    results.push(TestResult {
        name: "barricade_monotonic".into(),
        passed: bands.windows(2).all(|w| w[0] <= w[1]),
        detail: "band never drops as the level rises".into(),
    });

    let zombie = Character::new(1, "Z", ClassGroup::Zombie, 0, 0, START)
        .with_skill(skill_names::MEMORIES_OF_LIFE)
        .with_skill(skill_names::FREE_RUNNING);
    let runner = Character::new(2, "S", ClassGroup::Military, 0, 0, START)
        .with_skill(skill_names::FREE_RUNNING);
    let mut zombie_in = Vec::new();
    let mut runner_wrong = Vec::new();
    for level in 0..=200u32 {
        let mut b = Building::new(1, "Test", 0, 0);
        b.barricade_level = level;
        if level > 0 && movement::check_entry(&zombie, &b).is_ok() {
            zombie_in.push(level);
        }
        let runner_ok = movement::check_entry(&runner, &b).is_ok();
        if runner_ok == b.barricade_band().blocks_entry_from_outside() {
            runner_wrong.push(level);
        }
    }
    results.push(TestResult {
        name: "barricade_zombies_kept_out".into(),
        passed: zombie_in.is_empty(),
        detail: format!("zombie entered at levels {:?}", zombie_in),
    });
    results.push(TestResult {
        name: "barricade_heavy_blocks_free_runners".into(),
        passed: runner_wrong.is_empty(),
        detail: format!("wrong gate at levels {:?}", runner_wrong),
    });

    results
}

// ── 5. Regeneration ─────────────────────────────────────────────────────

fn validate_regeneration(rng: &mut StdRng, verbose: bool) -> Vec<TestResult> {
    println!("--- Regeneration ---");
    let mut results = Vec::new();

    let mut out_of_range = 0;
    let mut refresh_mismatch = 0;
    let mut refresh_drift = 0;
    let mut round_trip_fail = 0;
    let mut min_rate = f32::MAX;

    for id in 0..1000 {
        let mut c = random_character(rng, id);
        c.actions.available = rng.gen_range(0..=c.actions.max);
        c.actions.is_resting = rng.gen_bool(0.2);
        let mut hotel = Building::new(1, "Hotel", 0, 0);
        hotel.is_powered = rng.gen_bool(0.5);
        hotel.ap_regeneration = ApRegeneration::new(rng.gen_range(0.0..6.0), 4);
        let ctx = if rng.gen_bool(0.5) {
            RegenContext::inside(&hotel)
        } else {
            RegenContext::none()
        };
        let rate = regeneration::effective_rate(&c, &ctx);
        min_rate = min_rate.min(rate);

        let now = START + rng.gen_range(0..48 * MILLIS_PER_HOUR);
        let pure = regeneration::available_ap(&c, rate, now);
        let refreshed = regeneration::refresh(&mut c, rate, now);
        if pure != refreshed {
            refresh_mismatch += 1;
        }
        if refreshed > c.actions.max {
            out_of_range += 1;
        }
        if regeneration::refresh(&mut c, rate, now) != refreshed {
            refresh_drift += 1;
        }

        let k = rng.gen_range(0..=refreshed);
        regeneration::consume(&mut c, k, rate, now);
        if regeneration::available_ap(&c, rate, now) != refreshed - k {
            round_trip_fail += 1;
        }
    }
    if verbose {
        println!("  lowest effective rate: {:.2}", min_rate);
    }

    results.push(TestResult {
        name: "regen_in_range".into(),
        passed: out_of_range == 0,
        detail: format!("{} above max", out_of_range),
    });
    results.push(TestResult {
        name: "regen_refresh_matches_read".into(),
        passed: refresh_mismatch == 0,
        detail: format!("{} mismatches", refresh_mismatch),
    });
    results.push(TestResult {
        name: "regen_refresh_idempotent".into(),
        passed: refresh_drift == 0,
        detail: format!("{} values moved on a second refresh", refresh_drift),
    });
    results.push(TestResult {
        name: "regen_consume_round_trip".into(),
        passed: round_trip_fail == 0,
        detail: format!("{} failures", round_trip_fail),
    });
    results.push(TestResult {
        name: "regen_rate_floor".into(),
        passed: min_rate >= 0.5,
        detail: format!("min rate {:.2}", min_rate),
    });

    results
}

// ── Synthetic city ──────────────────────────────────────────────────────

struct Sim {
    engine: Arc<Engine>,
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<ManualClock>,
    buildings: Vec<Building>,
    characters: Vec<u64>,
}

impl Sim {
    fn build(manifest: &CityManifest, rng: &mut StdRng) -> Self {
        let store = Arc::new(MemoryStore::new());
        let per_row = CITY_SIZE / SUBURB_SIZE;
        for (i, name) in manifest.suburbs.iter().enumerate() {
            store.insert_suburb(Suburb {
                id: i as u64 + 1,
                name: name.clone(),
            });
        }

        let mut buildings = Vec::new();
        let mut landmarks = manifest.landmarks.iter();
        let mut next_id = 1;
        for x in 0..CITY_SIZE {
            for y in 0..CITY_SIZE {
                let suburb_id = ((y / SUBURB_SIZE) * per_row + x / SUBURB_SIZE) as u64 + 1;
                if !rng.gen_bool(0.3) {
                    store.insert_cell(MapCell::street(x, y, suburb_id));
                    continue;
                }
                let mut b = Building::new(next_id, format!("Building {}", next_id), x, y);
                if let Some(l) = landmarks.next() {
                    b.name = l.name.clone();
                    b.is_powered = l.powered;
                    b.ap_regeneration = ApRegeneration::new(l.bonus, l.capacity);
                    b.ap_regeneration.class_bonuses = l.class_bonuses.clone();
                }
                b.barricade_level = match rng.gen_range(0..4) {
                    0 => 0,
                    1 => rng.gen_range(1..60),
                    _ => rng.gen_range(0..120),
                };
                b.doors_open = rng.gen_bool(0.6);
                store.insert_cell(MapCell::building(x, y, b.id, suburb_id));
                store.insert_building(b.clone());
                buildings.push(b);
                next_id += 1;
            }
        }

        let mut characters = Vec::new();
        for id in 1..=SURVIVORS + ZOMBIES {
            let class = if id > SURVIVORS {
                ClassGroup::Zombie
            } else {
                [ClassGroup::Military, ClassGroup::Civilian, ClassGroup::Scientist]
                    [rng.gen_range(0..3)]
            };
            let x = rng.gen_range(0..CITY_SIZE);
            let y = rng.gen_range(0..CITY_SIZE);
            let mut c = Character::new(id, format!("Sim {}", id), class, x, y, START);
            for skill in [
                skill_names::FREE_RUNNING,
                skill_names::LURCHING_GAIT,
                skill_names::MEMORIES_OF_LIFE,
            ] {
                if rng.gen_bool(0.4) {
                    c = c.with_skill(skill);
                }
            }
            store.insert_character(c);
            characters.push(id);
        }

        log::info!(
            "Synthetic city: {} buildings, {} characters",
            buildings.len(),
            characters.len()
        );

        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(ManualClock::new(START));
        let engine = Engine::new(EngineContext {
            store: store.clone(),
            notifier: notifier.clone(),
            clock: clock.clone(),
            config: EngineConfig::default(),
        });
        let engine = match engine {
            Ok(e) => Arc::new(e),
            Err(e) => {
                println!("  ✗ engine_config: {}", e);
                std::process::exit(1);
            }
        };

        Self {
            engine,
            store,
            notifier,
            clock,
            buildings,
            characters,
        }
    }

    fn character(&self, id: u64) -> Option<Character> {
        self.store.character(id).ok().flatten()
    }
}

// ── 6. City Walk ────────────────────────────────────────────────────────

fn validate_city_walk(sim: &Sim, rng: &mut StdRng, verbose: bool) -> Vec<TestResult> {
    println!("--- City Walk ---");
    let mut results = Vec::new();

    let mut accepted: HashMap<&'static str, usize> = HashMap::new();
    let mut rejected: HashMap<ErrorClass, usize> = HashMap::new();
    let mut record = |op: &'static str, result: Result<(), deadcity_server::EngineError>| {
        match result {
            Ok(()) => *accepted.entry(op).or_default() += 1,
            Err(e) => *rejected.entry(e.class()).or_default() += 1,
        }
    };

    for _ in 0..TICKS {
        for &id in &sim.characters {
            let Some(c) = sim.character(id) else { continue };
            let engine = &sim.engine;
            match rng.gen_range(0..10) {
                0..=4 => {
                    let x = (c.location.x + rng.gen_range(-1..=1)).clamp(0, CITY_SIZE - 1);
                    let y = (c.location.y + rng.gen_range(-1..=1)).clamp(0, CITY_SIZE - 1);
                    record("move", engine.move_character(id, x, y).map(|_| ()));
                }
                5 | 6 => record("enter", engine.enter_building(id).map(|_| ())),
                7 => record("exit", engine.exit_building(id).map(|_| ())),
                8 => match c.location.building_id {
                    Some(bid) if c.location.is_inside => {
                        record("rest", engine.start_resting(id, bid).map(|_| ()))
                    }
                    _ => record("stop_rest", engine.stop_resting(id).map(|_| ())),
                },
                _ => record("search", engine.perform_action(id, "SEARCH").map(|_| ())),
            }
        }
        sim.clock.advance(TICK_MS);
    }

    if verbose {
        let mut ops: Vec<_> = accepted.iter().collect();
        ops.sort();
        println!("  accepted: {:?}", ops);
        println!("  rejected by class: {:?}", rejected);
    }

    let finals: Vec<Character> = sim
        .characters
        .iter()
        .filter_map(|&id| sim.character(id))
        .collect();

    let ap_bad = finals
        .iter()
        .filter(|c| c.actions.available > c.actions.max)
        .count();
    results.push(TestResult {
        name: "walk_ap_in_range".into(),
        passed: ap_bad == 0,
        detail: format!("{} characters above max", ap_bad),
    });

    let inconsistent = finals.iter().filter(|c| !c.is_consistent()).count();
    results.push(TestResult {
        name: "walk_location_consistent".into(),
        passed: inconsistent == 0,
        detail: format!("{} inside with no building", inconsistent),
    });

    let barricaded: HashSet<u64> = sim
        .buildings
        .iter()
        .filter(|b| b.barricade_level > 0)
        .map(|b| b.id)
        .collect();
    let zombies_in: Vec<u64> = finals
        .iter()
        .filter(|c| c.is_zombie() && c.location.is_inside)
        .filter(|c| c.location.building_id.is_some_and(|b| barricaded.contains(&b)))
        .map(|c| c.id)
        .collect();
    results.push(TestResult {
        name: "walk_zombies_outside_barricades".into(),
        passed: zombies_in.is_empty(),
        detail: format!("zombies inside barricaded buildings: {:?}", zombies_in),
    });

    let over_capacity: Vec<String> = sim
        .buildings
        .iter()
        .filter_map(|b| sim.store.building(b.id).ok().flatten())
        .filter(|b| {
            let r = &b.ap_regeneration;
            r.is_bounded() && r.current_occupancy > r.max_capacity
        })
        .map(|b| b.name)
        .collect();
    results.push(TestResult {
        name: "walk_resting_capacity".into(),
        passed: over_capacity.is_empty(),
        detail: format!("over capacity: {:?}", over_capacity),
    });

    let total_accepted: usize = accepted.values().sum();
    results.push(TestResult {
        name: "walk_made_progress".into(),
        passed: accepted.get("move").copied().unwrap_or(0) > 0 && total_accepted > 0,
        detail: format!(
            "{} accepted, {} rejected, {} events",
            total_accepted,
            rejected.values().sum::<usize>(),
            sim.notifier.events().len()
        ),
    });

    results
}

// ── 7. Regeneration Sweep ───────────────────────────────────────────────

fn validate_sweep(sim: &Sim, _verbose: bool) -> Vec<TestResult> {
    println!("--- Regeneration Sweep ---");
    let mut results = Vec::new();

    sim.clock.advance(3 * MILLIS_PER_HOUR);
    let sweep = RegenSweep::new(Arc::clone(&sim.engine));
    match sweep.run_once(sim.clock.now()) {
        Ok(report) => {
            results.push(TestResult {
                name: "sweep_refreshes".into(),
                passed: report.failed == 0 && report.refreshed <= report.scanned,
                detail: format!(
                    "{} scanned, {} refreshed, {} busy",
                    report.scanned, report.refreshed, report.busy
                ),
            });
            // A second pass at the same instant has nothing to do
            let again = sweep.run_once(sim.clock.now());
            results.push(TestResult {
                name: "sweep_idempotent".into(),
                passed: matches!(again, Ok(r) if r.refreshed == 0),
                detail: "second pass refreshed nobody".into(),
            });
        }
        Err(e) => results.push(TestResult {
            name: "sweep_refreshes".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 8. Snapshot ─────────────────────────────────────────────────────────

fn validate_snapshot(sim: &Sim, _verbose: bool) -> Vec<TestResult> {
    println!("--- Snapshot ---");
    let mut results = Vec::new();

    let restored = sim
        .store
        .snapshot_json()
        .and_then(|json| MemoryStore::from_snapshot_json(&json));
    match restored {
        Ok(copy) => {
            let same = sim
                .characters
                .iter()
                .all(|&id| copy.character(id).ok().flatten() == sim.character(id));
            results.push(TestResult {
                name: "snapshot_round_trip".into(),
                passed: same && copy.character_count() == sim.store.character_count(),
                detail: format!("{} characters restored", copy.character_count()),
            });
        }
        Err(e) => results.push(TestResult {
            name: "snapshot_round_trip".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}
