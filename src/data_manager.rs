//! Data access layer
//!
//! Every operation reads the whole collection it touches, changes it in
//! memory and writes it back. Missing ids and dates are not errors: updates
//! and deletes of unknown records are no-ops, and lookups fall back to
//! defaults. The only errors returned are backend write failures and
//! rejected settings.

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::export::ExportSnapshot;
use crate::models::{AppSettings, Habit, HabitCompletion, HydrationRecord, MoodEntry, TodaySummary};
use crate::sensors::StepDetector;
use crate::store::{keys, KeyValueStore, RecordStore};
use crate::utils::DAY_MILLIS;
use crate::validation::InputValidator;

/// Name fragments that mark a habit as step-tracked
pub const STEP_HABIT_KEYWORDS: [&str; 3] = ["step", "walk", "exercise"];

/// Typed CRUD and queries over the stored collections
pub struct DataManager<S, C = SystemClock> {
    store: RecordStore<S>,
    clock: C,
}

impl<S: KeyValueStore> DataManager<S, SystemClock> {
    /// Create a manager using the system clock
    pub fn new(store: RecordStore<S>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> DataManager<S, C> {
    /// Create a manager with an explicit clock
    pub const fn with_clock(store: RecordStore<S>, clock: C) -> Self {
        Self { store, clock }
    }

    /// The underlying record store
    pub const fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// The clock used for "now" and "today"
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    // Habits

    /// All habits in insertion order
    pub fn get_habits(&self) -> Vec<Habit> {
        self.store.load(keys::HABITS)
    }

    /// Replace the habit collection
    pub fn save_habits(&self, habits: &[Habit]) -> Result<()> {
        self.store.save(keys::HABITS, habits)
    }

    /// Append a habit. The caller supplies a unique id.
    pub fn add_habit(&self, habit: Habit) -> Result<()> {
        let mut habits = self.get_habits();
        debug!(habit_id = %habit.id, "Adding habit");
        habits.push(habit);
        self.save_habits(&habits)
    }

    /// Replace the first habit with the same id; nothing happens if none matches
    pub fn update_habit(&self, habit: Habit) -> Result<()> {
        let mut habits = self.get_habits();
        if let Some(existing) = habits.iter_mut().find(|h| h.id == habit.id) {
            *existing = habit;
            return self.save_habits(&habits);
        }
        debug!(habit_id = %habit.id, "Ignoring update for unknown habit");
        Ok(())
    }

    /// Remove a habit and then its completions, as two separate writes.
    ///
    /// A crash between the writes leaves orphaned completions; use
    /// [`DataManager::delete_habit_with_completions`] to write both at once.
    pub fn delete_habit(&self, habit_id: &str) -> Result<()> {
        let mut habits = self.get_habits();
        habits.retain(|h| h.id != habit_id);
        self.save_habits(&habits)?;

        let mut completions = self.get_habit_completions();
        completions.retain(|c| c.habit_id != habit_id);
        self.save_habit_completions(&completions)?;

        info!(habit_id, "Deleted habit");
        Ok(())
    }

    /// Remove a habit and its completions in one atomic batch
    pub fn delete_habit_with_completions(&self, habit_id: &str) -> Result<()> {
        let mut habits = self.get_habits();
        habits.retain(|h| h.id != habit_id);

        let mut completions = self.get_habit_completions();
        completions.retain(|c| c.habit_id != habit_id);

        let entries = vec![
            (keys::HABITS, self.store.encode(&habits)?),
            (keys::HABIT_COMPLETIONS, self.store.encode(&completions)?),
        ];
        self.store.save_many(entries)?;

        info!(habit_id, "Deleted habit and completions atomically");
        Ok(())
    }

    // Completions

    /// All completions in insertion order
    pub fn get_habit_completions(&self) -> Vec<HabitCompletion> {
        self.store.load(keys::HABIT_COMPLETIONS)
    }

    /// Replace the completion collection
    pub fn save_habit_completions(&self, completions: &[HabitCompletion]) -> Result<()> {
        self.store.save(keys::HABIT_COMPLETIONS, completions)
    }

    /// Record a completion, replacing any existing one for the same habit and day
    pub fn add_habit_completion(&self, completion: HabitCompletion) -> Result<()> {
        let mut completions = self.get_habit_completions();
        completions.retain(|c| !c.matches(&completion.habit_id, &completion.date));
        completions.push(completion);
        self.save_habit_completions(&completions)
    }

    /// Remove the completion for a habit on a day
    pub fn remove_habit_completion(&self, habit_id: &str, date: &str) -> Result<()> {
        let mut completions = self.get_habit_completions();
        completions.retain(|c| !c.matches(habit_id, date));
        self.save_habit_completions(&completions)
    }

    /// Whether the habit has a completion on `date`
    pub fn is_habit_completed(&self, habit_id: &str, date: &str) -> bool {
        self.get_habit_completions().iter().any(|c| c.matches(habit_id, date))
    }

    /// Completions dated today
    pub fn get_today_completions(&self) -> Vec<HabitCompletion> {
        let today = self.clock.today();
        self.get_habit_completions().into_iter().filter(|c| c.date == today).collect()
    }

    /// Mark a habit done or not done for today
    pub fn set_habit_completed_today(&self, habit_id: &str, completed: bool) -> Result<()> {
        let today = self.clock.today();
        if completed {
            self.add_habit_completion(HabitCompletion::new(habit_id, today, self.clock.now_millis()))
        } else {
            self.remove_habit_completion(habit_id, &today)
        }
    }

    /// Flip today's completion for a habit and return the new state
    pub fn toggle_habit_completion(&self, habit_id: &str) -> Result<bool> {
        let completed = !self.is_habit_completed(habit_id, &self.clock.today());
        self.set_habit_completed_today(habit_id, completed)?;
        Ok(completed)
    }

    // Mood

    /// All mood entries in insertion order
    pub fn get_mood_entries(&self) -> Vec<MoodEntry> {
        self.store.load(keys::MOOD_ENTRIES)
    }

    /// Replace the mood collection
    pub fn save_mood_entries(&self, entries: &[MoodEntry]) -> Result<()> {
        self.store.save(keys::MOOD_ENTRIES, entries)
    }

    /// Append a mood entry
    pub fn add_mood_entry(&self, entry: MoodEntry) -> Result<()> {
        let mut entries = self.get_mood_entries();
        entries.push(entry);
        self.save_mood_entries(&entries)
    }

    /// Replace the entry with the same id; nothing happens if none matches
    pub fn update_mood_entry(&self, entry: MoodEntry) -> Result<()> {
        let mut entries = self.get_mood_entries();
        if let Some(existing) = entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
            return self.save_mood_entries(&entries);
        }
        Ok(())
    }

    /// Remove a mood entry by id
    pub fn delete_mood_entry(&self, entry_id: &str) -> Result<()> {
        let mut entries = self.get_mood_entries();
        entries.retain(|e| e.id != entry_id);
        self.save_mood_entries(&entries)
    }

    /// Entries from the last seven days, oldest first
    pub fn get_weekly_mood_trend(&self) -> Vec<MoodEntry> {
        let since = self.clock.now_millis() - 7 * DAY_MILLIS;
        let mut entries: Vec<MoodEntry> = self.get_mood_entries().into_iter().filter(|e| e.timestamp >= since).collect();
        entries.sort_by_key(|e| e.timestamp);
        entries
    }

    // Hydration

    /// All hydration records
    pub fn get_hydration_records(&self) -> Vec<HydrationRecord> {
        self.store.load(keys::HYDRATION_RECORDS)
    }

    /// Replace the hydration collection
    pub fn save_hydration_records(&self, records: &[HydrationRecord]) -> Result<()> {
        self.store.save(keys::HYDRATION_RECORDS, records)
    }

    /// Today's stored record, or a fresh one that has not been saved
    pub fn get_today_hydration_record(&self) -> HydrationRecord {
        let today = self.clock.today();
        self.get_hydration_records()
            .into_iter()
            .find(|r| r.date == today)
            .unwrap_or_else(|| HydrationRecord::new(today, self.clock.now_millis()))
    }

    /// Insert the record, or replace the one with the same date
    pub fn update_hydration_record(&self, record: HydrationRecord) -> Result<()> {
        let mut records = self.get_hydration_records();
        match records.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.save_hydration_records(&records)
    }

    /// Count one more glass today and return the saved record
    pub fn add_glass_of_water(&self) -> Result<HydrationRecord> {
        let mut record = self.get_today_hydration_record();
        record.glasses_consumed += 1;
        record.last_updated = self.clock.now_millis();
        self.update_hydration_record(record.clone())?;

        if record.glasses_consumed == record.daily_goal {
            info!(date = %record.date, goal = record.daily_goal, "Daily hydration goal reached");
        }
        Ok(record)
    }

    // Settings

    /// Stored settings, or defaults
    pub fn get_app_settings(&self) -> AppSettings {
        self.store.load(keys::APP_SETTINGS)
    }

    /// Replace the settings record
    pub fn save_app_settings(&self, settings: &AppSettings) -> Result<()> {
        self.store.save(keys::APP_SETTINGS, settings)
    }

    /// Validate and save settings, then store today's record with the new goal
    pub fn apply_settings(&self, settings: &AppSettings) -> Result<()> {
        InputValidator::validate_settings(settings)?;
        self.save_app_settings(settings)?;

        let mut record = self.get_today_hydration_record();
        record.daily_goal = settings.daily_water_goal;
        self.update_hydration_record(record)?;
        info!(
            reminders = settings.hydration_reminders_enabled,
            interval = settings.reminder_interval_minutes,
            goal = settings.daily_water_goal,
            "Applied settings"
        );
        Ok(())
    }

    /// True until [`DataManager::set_first_launch_completed`] is called
    pub fn is_first_launch(&self) -> bool {
        self.store.load_flag(keys::FIRST_LAUNCH, true)
    }

    /// Clear the first-launch flag
    pub fn set_first_launch_completed(&self) -> Result<()> {
        self.store.save_flag(keys::FIRST_LAUNCH, false)
    }

    /// Delete every collection and flag
    pub fn clear_all_data(&self) -> Result<()> {
        self.store.clear()?;
        info!("Cleared all data");
        Ok(())
    }

    // Derived views

    /// Share of active habits completed today, 0 when there are none
    pub fn get_today_progress(&self) -> f32 {
        let (completed, total) = self.today_counts();
        if total == 0 {
            return 0.0;
        }
        completed as f32 / total as f32
    }

    fn today_counts(&self) -> (usize, usize) {
        let active: Vec<Habit> = self.get_habits().into_iter().filter(|h| h.is_active).collect();
        let today = self.get_today_completions();
        let completed = active
            .iter()
            .filter(|habit| today.iter().any(|c| c.habit_id == habit.id))
            .count();
        (completed, active.len())
    }

    /// Today's habit and hydration numbers
    pub fn today_summary(&self) -> TodaySummary {
        let (completed, total) = self.today_counts();
        let habits_percent = if total == 0 { 0 } else { (completed * 100 / total) as u32 };
        let record = self.get_today_hydration_record();

        TodaySummary {
            date: record.date.clone(),
            habits_completed: completed,
            habits_total: total,
            habits_percent,
            glasses_consumed: record.glasses_consumed,
            daily_goal: record.daily_goal,
            water_percent: record.percent(),
        }
    }

    /// Complete the first step-tracked habit once the detector reaches its goal.
    ///
    /// Returns the habit if a completion was recorded by this call.
    pub fn auto_complete_step_habit(&self, detector: &StepDetector) -> Result<Option<Habit>> {
        let Some(habit) = self.get_habits().into_iter().find(|h| {
            let name = h.name.to_lowercase();
            STEP_HABIT_KEYWORDS.iter().any(|keyword| name.contains(keyword))
        }) else {
            return Ok(None);
        };

        let today = self.clock.today();
        if !detector.goal_reached() || self.is_habit_completed(&habit.id, &today) {
            return Ok(None);
        }

        self.add_habit_completion(HabitCompletion::new(&habit.id, today, self.clock.now_millis()))?;
        info!(habit = %habit.name, steps = detector.step_count(), "Auto-completed step habit");
        Ok(Some(habit))
    }

    /// Every collection, for export
    pub fn export_snapshot(&self) -> ExportSnapshot {
        ExportSnapshot {
            habits: self.get_habits(),
            completions: self.get_habit_completions(),
            mood_entries: self.get_mood_entries(),
            hydration_records: self.get_hydration_records(),
            settings: self.get_app_settings(),
        }
    }
}
