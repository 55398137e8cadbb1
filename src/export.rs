//! Data export.
//!
//! The text format is a readable dump meant for sharing, not for re-import.
//! The JSON format is the full snapshot as stored.

use serde::Serialize;
use std::fmt::Write as _;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{HabbitError, Result};
use crate::models::{AppSettings, Habit, HabitCompletion, HydrationRecord, MoodEntry};
use crate::utils::format_date_time;

/// Every collection at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    /// Habits
    pub habits: Vec<Habit>,
    /// Habit completions
    pub completions: Vec<HabitCompletion>,
    /// Mood entries
    pub mood_entries: Vec<MoodEntry>,
    /// Hydration records
    pub hydration_records: Vec<HydrationRecord>,
    /// Settings
    pub settings: AppSettings,
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Readable text dump
    Txt,
    /// Pretty-printed JSON snapshot
    Json,
}

impl ExportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = HabbitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            other => Err(HabbitError::Validation(format!("Unknown export format: {other}. Must be one of: txt, json"))),
        }
    }
}

/// Render the readable dump. `generated_at` is epoch milliseconds.
#[must_use]
pub fn render_text(snapshot: &ExportSnapshot, generated_at: i64) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_sections(&mut out, snapshot, generated_at);
    out
}

fn write_sections(out: &mut String, snapshot: &ExportSnapshot, generated_at: i64) -> std::fmt::Result {
    writeln!(out, "=== Habbit App Data Export ===")?;
    writeln!(out, "Export Date: {}", format_date_time(generated_at))?;
    writeln!(out)?;

    writeln!(out, "=== Habits ===")?;
    for habit in &snapshot.habits {
        writeln!(out, "- {}: {} ({})", habit.name, habit.description, habit.frequency)?;
    }
    writeln!(out)?;

    writeln!(out, "=== Mood Entries ===")?;
    for mood in &snapshot.mood_entries {
        writeln!(out, "- {} {} ({})", mood.emoji, mood.note, format_date_time(mood.timestamp))?;
    }
    writeln!(out)?;

    writeln!(out, "=== Hydration Records ===")?;
    for record in &snapshot.hydration_records {
        writeln!(out, "- {}: {}/{} glasses", record.date, record.glasses_consumed, record.daily_goal)?;
    }
    writeln!(out)?;

    let settings = &snapshot.settings;
    writeln!(out, "=== Settings ===")?;
    writeln!(out, "- Hydration Reminders: {}", settings.hydration_reminders_enabled)?;
    writeln!(out, "- Reminder Interval: {} minutes", settings.reminder_interval_minutes)?;
    writeln!(out, "- Daily Water Goal: {} glasses", settings.daily_water_goal)?;
    writeln!(out, "- Theme: {}", settings.theme)?;
    Ok(())
}

/// Write the snapshot to `file_path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn write_export(snapshot: &ExportSnapshot, format: ExportFormat, file_path: &Path, generated_at: i64) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Txt => writer.write_all(render_text(snapshot, generated_at).as_bytes())?,
        ExportFormat::Json => serde_json::to_writer_pretty(&mut writer, snapshot)?,
    }

    writer.flush()?;
    Ok(())
}
