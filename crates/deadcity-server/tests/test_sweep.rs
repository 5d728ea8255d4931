//! Regeneration sweep tests.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use deadcity_logic::building::{Building, MapCell, Suburb};
use deadcity_logic::character::{Character, ClassGroup};
use deadcity_logic::constants::{BuildingId, CharacterId, SuburbId, Timestamp, MILLIS_PER_HOUR};
use deadcity_logic::events::{topics, Event};
use deadcity_server::clock::ManualClock;
use deadcity_server::notify::RecordingNotifier;
use deadcity_server::store::{GameStore, MemoryStore};
use deadcity_server::sweep::RegenSweep;
use deadcity_server::{Engine, EngineConfig, EngineContext, StoreError};

const START: u64 = 1_000 * MILLIS_PER_HOUR;

fn setup(batch_size: usize) -> (Arc<Engine>, Arc<MemoryStore>, Arc<RecordingNotifier>) {
    let store = Arc::new(MemoryStore::new());
    store.insert_cell(MapCell::street(1, 1, 1));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut config = EngineConfig::default();
    config.sweep.batch_size = batch_size;
    let engine = Engine::new(EngineContext {
        store: store.clone(),
        notifier: notifier.clone(),
        clock: Arc::new(ManualClock::new(START)),
        config,
    })
    .unwrap();
    (Arc::new(engine), store, notifier)
}

/// A character with `available` AP whose last action was `hours_ago`.
fn tired(id: u64, available: u32, hours_ago: u64) -> Character {
    let then = START - hours_ago * MILLIS_PER_HOUR;
    let mut c = Character::new(id, format!("C{}", id), ClassGroup::Civilian, 1, 1, then);
    c.actions.available = available;
    c
}

#[test]
fn sweep_refreshes_recently_active_characters() {
    let (engine, store, notifier) = setup(2);
    store.insert_character(tired(1, 10, 3));
    store.insert_character(tired(2, 20, 5));
    store.insert_character(tired(3, 5, 2));
    // Idle for two days: outside the 24h window
    store.insert_character(tired(4, 5, 48));
    // Full: nothing to do
    store.insert_character(Character::new(5, "Full", ClassGroup::Civilian, 1, 1, START));

    let report = RegenSweep::new(engine).run_once(START).unwrap();
    assert_eq!(report.scanned, 3);
    assert_eq!(report.refreshed, 3);
    assert_eq!(report.busy, 0);
    assert_eq!(report.failed, 0);

    assert_eq!(store.character(1).unwrap().unwrap().actions.available, 13);
    assert_eq!(store.character(2).unwrap().unwrap().actions.available, 25);
    assert_eq!(store.character(4).unwrap().unwrap().actions.available, 5);

    let announced: Vec<u64> = notifier
        .events()
        .into_iter()
        .filter(|(topic, _)| topic == topics::AP_CHANGED)
        .map(|(_, e)| e.character_id())
        .collect();
    assert_eq!(announced, vec![1, 2, 3]);
}

#[test]
fn sweep_within_debounce_changes_nothing() {
    let (engine, store, notifier) = setup(50);
    let mut c = tired(1, 10, 0);
    c.last_active = START;
    store.insert_character(c.clone());

    let report = RegenSweep::new(engine).run_once(START + 10_000).unwrap();
    assert_eq!(report.scanned, 1);
    assert_eq!(report.refreshed, 0);
    assert_eq!(store.character(1).unwrap().unwrap(), c);
    assert!(notifier.events().is_empty());
}

#[test]
fn background_sweep_publishes_and_stops() {
    let (engine, store, notifier) = setup(50);
    store.insert_character(tired(1, 10, 3));

    let handle = RegenSweep::new(engine)
        .spawn_every(Duration::from_millis(10))
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while notifier.events().is_empty() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    handle.stop();

    let events = notifier.events();
    assert!(matches!(
        events.first(),
        Some((_, Event::ApChanged { current: 13, .. }))
    ));
    assert_eq!(store.character(1).unwrap().unwrap().actions.available, 13);
}

/// Memory store whose next character load can be held open, pinning that
/// character's lock inside an engine operation.
#[derive(Default)]
struct GatedStore {
    inner: MemoryStore,
    gate: Mutex<Option<(Sender<()>, Receiver<()>)>>,
}

impl GatedStore {
    /// Returns (entered, release): the next load signals `entered` and
    /// waits until `release` fires.
    fn hold_next_load(&self) -> (Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *self.gate.lock().unwrap() = Some((entered_tx, release_rx));
        (entered_rx, release_tx)
    }
}

impl GameStore for GatedStore {
    fn character(&self, id: CharacterId) -> Result<Option<Character>, StoreError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some((entered, release)) = gate {
            entered.send(()).unwrap();
            let _ = release.recv();
        }
        self.inner.character(id)
    }

    fn save_character(&self, character: &Character) -> Result<(), StoreError> {
        self.inner.save_character(character)
    }

    fn building(&self, id: BuildingId) -> Result<Option<Building>, StoreError> {
        self.inner.building(id)
    }

    fn save_building(&self, building: &Building) -> Result<(), StoreError> {
        self.inner.save_building(building)
    }

    fn cell(&self, x: i32, y: i32) -> Result<Option<MapCell>, StoreError> {
        self.inner.cell(x, y)
    }

    fn suburb(&self, id: SuburbId) -> Result<Option<Suburb>, StoreError> {
        self.inner.suburb(id)
    }

    fn regenerating_characters(&self, since: Timestamp) -> Result<Vec<CharacterId>, StoreError> {
        self.inner.regenerating_characters(since)
    }
}

#[test]
fn sweep_skips_characters_mid_operation() {
    let store = Arc::new(GatedStore::default());
    store.inner.insert_character(tired(1, 10, 3));
    store.inner.insert_character(tired(2, 20, 5));
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = Arc::new(
        Engine::new(EngineContext {
            store: store.clone(),
            notifier: notifier.clone(),
            clock: Arc::new(ManualClock::new(START)),
            config: EngineConfig::default(),
        })
        .unwrap(),
    );

    let (entered, release) = store.hold_next_load();
    let player = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.get_available_ap(1))
    };
    entered.recv().unwrap();

    let report = RegenSweep::new(Arc::clone(&engine)).run_once(START).unwrap();
    release.send(()).unwrap();
    let seen_by_player = player.join().unwrap().unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.busy, 1);
    assert_eq!(report.refreshed, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(store.character(2).unwrap().unwrap().actions.available, 25);
    // The operation that held the lock did its own refresh
    assert_eq!(seen_by_player, 13);
    assert_eq!(store.character(1).unwrap().unwrap().actions.available, 13);
    assert_eq!(notifier.events().len(), 2);
}
