//! Integration tests for the sled-backed record store

use habbit_store::store::keys;
use habbit_store::{Codec, DataManager, FixedClock, Habit, HabitCompletion, HabitFrequency, KeyValueStore, RecordStore, SledStore};
use tempfile::tempdir;

const NOW: i64 = 1_742_040_000_000;

fn open(path: &std::path::Path, codec: Codec) -> DataManager<SledStore, FixedClock> {
    let backend = SledStore::open(path, true).expect("Failed to open sled store");
    DataManager::with_clock(RecordStore::new(backend, codec), FixedClock::new(NOW))
}

#[test]
fn test_collections_survive_reopen() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("store");

    let habit = Habit::new("Drink tea", "green", HabitFrequency::Weekly, NOW);
    {
        let dm = open(&path, Codec::Json);
        dm.add_habit(habit.clone()).unwrap();
        dm.add_glass_of_water().unwrap();
        dm.set_first_launch_completed().unwrap();
    }

    let dm = open(&path, Codec::Json);
    assert_eq!(dm.get_habits(), vec![habit]);
    assert_eq!(dm.get_today_hydration_record().glasses_consumed, 1);
    assert!(!dm.is_first_launch());
}

#[test]
fn test_bincode_store_round_trip() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("store");

    {
        let dm = open(&path, Codec::Bincode);
        dm.add_habit_completion(HabitCompletion::new("h1", "2025-03-15", NOW)).unwrap();
    }

    let dm = open(&path, Codec::Bincode);
    assert!(dm.is_habit_completed("h1", "2025-03-15"));
}

#[test]
fn test_codec_mismatch_degrades_to_default() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("store");

    {
        let dm = open(&path, Codec::Bincode);
        dm.add_habit(Habit::new("Stretch", "", HabitFrequency::Daily, NOW)).unwrap();
    }

    let dm = open(&path, Codec::Json);
    assert!(dm.get_habits().is_empty());
    assert_eq!(dm.store().metrics().snapshot().decode_failures, 1);
}

#[test]
fn test_atomic_delete_on_sled() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let dm = open(&temp_dir.path().join("store"), Codec::Json);

    let habit = Habit::new("Walk", "", HabitFrequency::Daily, NOW);
    dm.add_habit(habit.clone()).unwrap();
    dm.set_habit_completed_today(&habit.id, true).unwrap();

    dm.delete_habit_with_completions(&habit.id).unwrap();

    assert!(dm.get_habits().is_empty());
    assert!(dm.get_habit_completions().is_empty());
    assert_eq!(dm.store().metrics().snapshot().write_errors, 0);
}

#[test]
fn test_clear_removes_every_key() {
    let store = RecordStore::new(SledStore::temporary().expect("temporary store"), Codec::Json);
    store.save(keys::HABITS, &Vec::<Habit>::new()).unwrap();
    store.save_flag(keys::FIRST_LAUNCH, false).unwrap();

    store.clear().unwrap();

    for key in keys::ALL {
        assert!(store.backend().get(key).unwrap().is_none(), "{key} should be gone");
    }
}

#[test]
fn test_stored_json_uses_camel_case_fields() {
    let store = RecordStore::new(SledStore::temporary().expect("temporary store"), Codec::Json);
    store
        .save(keys::HABIT_COMPLETIONS, &vec![HabitCompletion::new("h1", "2025-03-15", 7)])
        .unwrap();

    let raw = store.backend().get(keys::HABIT_COMPLETIONS).unwrap().unwrap();
    let text = String::from_utf8(raw).unwrap();
    assert_eq!(text, r#"[{"habitId":"h1","date":"2025-03-15","completedAt":7}]"#);
}
