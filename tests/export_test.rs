//! Export rendering and file output

mod common;

use common::{habit, manager, NOW};
use habbit_store::export::{render_text, write_export, ExportFormat};
use habbit_store::utils::format_date_time;
use habbit_store::{Clock, HabitFrequency, MoodEntry};
use tempfile::tempdir;

fn populated() -> common::TestManager {
    let dm = manager();
    let mut weekly = habit("h2", "Call family");
    weekly.description = "Sunday evening".to_string();
    weekly.frequency = HabitFrequency::Weekly;
    dm.add_habit(habit("h1", "Read")).unwrap();
    dm.add_habit(weekly).unwrap();
    dm.add_mood_entry(MoodEntry::new("😊", "good day", NOW)).unwrap();
    dm.add_glass_of_water().unwrap();
    dm
}

#[test]
fn test_render_text_sections() {
    let dm = populated();
    let text = render_text(&dm.export_snapshot(), NOW);

    assert!(text.starts_with("=== Habbit App Data Export ===\n"));
    assert!(text.contains(&format!("Export Date: {}", format_date_time(NOW))));
    assert!(text.contains("=== Habits ===\n- Read:  (DAILY)\n- Call family: Sunday evening (WEEKLY)\n"));
    assert!(text.contains(&format!("- 😊 good day ({})", format_date_time(NOW))));
    assert!(text.contains(&format!("- {}: 1/8 glasses", dm.clock().today())));
    assert!(text.contains("- Hydration Reminders: true"));
    assert!(text.contains("- Reminder Interval: 60 minutes"));
    assert!(text.contains("- Daily Water Goal: 8 glasses"));
    assert!(text.ends_with("- Theme: light\n"));
}

#[test]
fn test_render_text_empty_store() {
    let dm = manager();
    let text = render_text(&dm.export_snapshot(), NOW);
    assert!(text.contains("=== Habits ===\n\n=== Mood Entries ===\n\n=== Hydration Records ===\n\n"));
}

#[test]
fn test_write_json_export() {
    let dm = populated();
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("out").join("export.json");

    write_export(&dm.export_snapshot(), ExportFormat::Json, &path, NOW).expect("Failed to write export");

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["habits"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["moodEntries"][0]["emoji"], "😊");
    assert_eq!(value["settings"]["dailyWaterGoal"], 8);
}

#[test]
fn test_write_txt_export() {
    let dm = populated();
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("export.txt");

    write_export(&dm.export_snapshot(), ExportFormat::Txt, &path, NOW).expect("Failed to write export");

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_text(&dm.export_snapshot(), NOW));
}

#[test]
fn test_export_format_parse() {
    assert_eq!("TXT".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
    assert_eq!("json".parse::<ExportFormat>().unwrap().extension(), "json");
    assert!("csv".parse::<ExportFormat>().is_err());
}
