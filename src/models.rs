//! Record types persisted by the store
//!
//! Each collection is stored whole under its own key. Field names are
//! serialized in camelCase so the stored JSON keeps the layout existing
//! installations already have on disk, and every optional field has a serde
//! default so older payloads keep decoding after new fields are added.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::HabbitError;
use crate::utils::now_millis;

/// Default number of glasses in a day's hydration goal
pub const DEFAULT_DAILY_GOAL: u32 = 8;

/// How often a habit should be performed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HabitFrequency {
    /// Every day
    #[default]
    Daily,
    /// Once a week
    Weekly,
}

impl fmt::Display for HabitFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => f.write_str("DAILY"),
            Self::Weekly => f.write_str("WEEKLY"),
        }
    }
}

impl FromStr for HabitFrequency {
    type Err = HabbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(HabbitError::Validation(format!(
                "Unknown habit frequency: {other}. Must be one of: daily, weekly"
            ))),
        }
    }
}

/// A user-defined recurring action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Habit {
    /// Unique identifier, generated when the habit is created
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description (may be empty)
    pub description: String,
    /// Daily or weekly
    pub frequency: HabitFrequency,
    /// Creation time in epoch milliseconds
    pub created_at: i64,
    /// Inactive habits are kept but excluded from progress
    pub is_active: bool,
}

impl Default for Habit {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            frequency: HabitFrequency::Daily,
            created_at: now_millis(),
            is_active: true,
        }
    }
}

impl Habit {
    /// Create an active habit with a fresh UUID
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, frequency: HabitFrequency, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            frequency,
            created_at,
            is_active: true,
        }
    }
}

/// Record that a habit was done on a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCompletion {
    /// Id of the completed habit
    pub habit_id: String,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    /// When the completion was recorded, epoch milliseconds
    #[serde(default = "now_millis")]
    pub completed_at: i64,
}

impl HabitCompletion {
    /// Create a completion for `habit_id` on `date`
    #[must_use]
    pub fn new(habit_id: impl Into<String>, date: impl Into<String>, completed_at: i64) -> Self {
        Self {
            habit_id: habit_id.into(),
            date: date.into(),
            completed_at,
        }
    }

    /// True if this completion is for the given habit and day
    #[must_use]
    pub fn matches(&self, habit_id: &str, date: &str) -> bool {
        self.habit_id == habit_id && self.date == date
    }
}

/// A timestamped emoji and note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoodEntry {
    /// Unique identifier
    pub id: String,
    /// Emoji describing the mood
    pub emoji: String,
    /// Optional note
    pub note: String,
    /// When the mood was recorded, epoch milliseconds
    pub timestamp: i64,
}

impl Default for MoodEntry {
    fn default() -> Self {
        Self {
            id: String::new(),
            emoji: String::new(),
            note: String::new(),
            timestamp: now_millis(),
        }
    }
}

impl MoodEntry {
    /// Create a mood entry with a fresh UUID
    #[must_use]
    pub fn new(emoji: impl Into<String>, note: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            emoji: emoji.into(),
            note: note.into(),
            timestamp,
        }
    }
}

const fn default_daily_goal() -> u32 {
    DEFAULT_DAILY_GOAL
}

/// Water intake for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrationRecord {
    /// Calendar day, `YYYY-MM-DD`; unique across the collection
    pub date: String,
    /// Glasses drunk so far
    #[serde(default)]
    pub glasses_consumed: u32,
    /// Target glasses for the day
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    /// Last modification time, epoch milliseconds
    #[serde(default = "now_millis")]
    pub last_updated: i64,
}

impl HydrationRecord {
    /// An empty record for `date` with the default goal
    #[must_use]
    pub fn new(date: impl Into<String>, last_updated: i64) -> Self {
        Self {
            date: date.into(),
            glasses_consumed: 0,
            daily_goal: DEFAULT_DAILY_GOAL,
            last_updated,
        }
    }

    /// Share of the goal reached, as a whole percentage
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.daily_goal == 0 {
            return 0;
        }
        self.glasses_consumed.saturating_mul(100) / self.daily_goal
    }

    /// True once the goal has been met
    #[must_use]
    pub const fn goal_reached(&self) -> bool {
        self.glasses_consumed >= self.daily_goal
    }
}

/// UI theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
    /// Follow the system setting
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
            Self::System => f.write_str("system"),
        }
    }
}

impl FromStr for Theme {
    type Err = HabbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(HabbitError::Validation(format!(
                "Unknown theme: {other}. Must be one of: light, dark, system"
            ))),
        }
    }
}

/// The app-wide settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Whether periodic hydration reminders are on
    pub hydration_reminders_enabled: bool,
    /// Minutes between reminders
    pub reminder_interval_minutes: u32,
    /// Daily water goal in glasses
    pub daily_water_goal: u32,
    /// Theme preference
    pub theme: Theme,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            hydration_reminders_enabled: true,
            reminder_interval_minutes: 60,
            daily_water_goal: DEFAULT_DAILY_GOAL,
            theme: Theme::Light,
        }
    }
}

/// Today's numbers as shown on a home-screen summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodaySummary {
    /// Calendar day the summary is for
    pub date: String,
    /// Active habits completed today
    pub habits_completed: usize,
    /// Active habits in total
    pub habits_total: usize,
    /// Habit completion as a whole percentage
    pub habits_percent: u32,
    /// Glasses drunk today
    pub glasses_consumed: u32,
    /// Today's goal
    pub daily_goal: u32,
    /// Hydration as a whole percentage
    pub water_percent: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_habit_serializes_camel_case() {
        let habit = Habit {
            id: "h1".to_string(),
            name: "Walk".to_string(),
            description: String::new(),
            frequency: HabitFrequency::Weekly,
            created_at: 42,
            is_active: false,
        };
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["isActive"], false);
        assert_eq!(json["frequency"], "WEEKLY");
    }

    #[test]
    fn test_hydration_record_missing_fields_use_defaults() {
        let record: HydrationRecord = serde_json::from_str(r#"{"date":"2025-03-01"}"#).unwrap();
        assert_eq!(record.glasses_consumed, 0);
        assert_eq!(record.daily_goal, DEFAULT_DAILY_GOAL);
    }

    #[test]
    fn test_settings_partial_payload() {
        let settings: AppSettings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.reminder_interval_minutes, 60);
        assert!(settings.hydration_reminders_enabled);
    }

    #[test]
    fn test_hydration_percent() {
        let mut record = HydrationRecord::new("2025-03-01", 0);
        record.glasses_consumed = 4;
        assert_eq!(record.percent(), 50);
        assert!(!record.goal_reached());
        record.glasses_consumed = 8;
        assert!(record.goal_reached());
    }

    #[test]
    fn test_frequency_and_theme_parse() {
        assert_eq!("Daily".parse::<HabitFrequency>().unwrap(), HabitFrequency::Daily);
        assert_eq!("system".parse::<Theme>().unwrap(), Theme::System);
        assert!("monthly".parse::<HabitFrequency>().is_err());
    }
}
