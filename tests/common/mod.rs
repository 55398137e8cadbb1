//! Shared fixtures for integration tests
#![allow(dead_code)]

use habbit_store::{DataManager, FixedClock, Habit, HabitFrequency, MemoryStore, RecordStore};

/// 2025-03-15T12:00:00Z
pub const NOW: i64 = 1_742_040_000_000;

pub const DAY: i64 = 24 * 60 * 60 * 1000;

pub type TestManager = DataManager<MemoryStore, FixedClock>;

/// A manager over an empty in-memory store with time frozen at `NOW`
pub fn manager() -> TestManager {
    manager_at(NOW)
}

pub fn manager_at(millis: i64) -> TestManager {
    DataManager::with_clock(RecordStore::in_memory(), FixedClock::new(millis))
}

pub fn habit(id: &str, name: &str) -> Habit {
    Habit {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        frequency: HabitFrequency::Daily,
        created_at: NOW,
        is_active: true,
    }
}
