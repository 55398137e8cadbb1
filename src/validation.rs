use crate::error::{HabbitError, Result};
use crate::models::AppSettings;
use crate::utils::parse_date;

/// Allowed reminder interval range in minutes
pub const REMINDER_INTERVAL_RANGE: std::ops::RangeInclusive<u32> = 15..=240;
/// Allowed daily water goal range in glasses
pub const WATER_GOAL_RANGE: std::ops::RangeInclusive<u32> = 1..=12;

fn invalid(message: impl Into<String>) -> HabbitError {
    HabbitError::Validation(message.into())
}

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate habit name
    pub fn validate_habit_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(invalid("Habit name cannot be empty"));
        }

        if name.chars().count() > 100 {
            return Err(invalid("Habit name too long (max 100 characters)"));
        }

        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(invalid("Habit name contains invalid characters"));
        }

        Ok(())
    }

    /// Validate mood emoji
    pub fn validate_emoji(emoji: &str) -> Result<()> {
        if emoji.trim().is_empty() {
            return Err(invalid("Mood emoji cannot be empty"));
        }

        // Emoji with modifiers and joiners run to several code points
        if emoji.chars().count() > 16 {
            return Err(invalid("Mood emoji too long (max 16 code points)"));
        }

        Ok(())
    }

    /// Validate free-text note
    pub fn validate_note(note: &str) -> Result<()> {
        if note.chars().count() > 1000 {
            return Err(invalid("Note too long (max 1000 characters)"));
        }

        if note.contains('\0') {
            return Err(invalid("Note contains invalid characters"));
        }

        Ok(())
    }

    /// Validate a `YYYY-MM-DD` calendar day
    pub fn validate_date(date: &str) -> Result<()> {
        if parse_date(date).is_none() {
            return Err(invalid(format!("Invalid date: {date}. Use YYYY-MM-DD")));
        }
        Ok(())
    }

    /// Validate reminder interval
    pub fn validate_reminder_interval(minutes: u32) -> Result<()> {
        if !REMINDER_INTERVAL_RANGE.contains(&minutes) {
            return Err(invalid(format!(
                "Reminder interval must be between {} and {} minutes",
                REMINDER_INTERVAL_RANGE.start(),
                REMINDER_INTERVAL_RANGE.end()
            )));
        }

        if minutes % 15 != 0 {
            return Err(invalid("Reminder interval must be a multiple of 15 minutes"));
        }

        Ok(())
    }

    /// Validate daily water goal
    pub fn validate_water_goal(glasses: u32) -> Result<()> {
        if !WATER_GOAL_RANGE.contains(&glasses) {
            return Err(invalid(format!(
                "Daily water goal must be between {} and {} glasses",
                WATER_GOAL_RANGE.start(),
                WATER_GOAL_RANGE.end()
            )));
        }
        Ok(())
    }

    /// Validate a full settings record
    pub fn validate_settings(settings: &AppSettings) -> Result<()> {
        Self::validate_reminder_interval(settings.reminder_interval_minutes)?;
        Self::validate_water_goal(settings.daily_water_goal)
    }
}
