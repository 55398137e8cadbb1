#![allow(clippy::print_stdout)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use habbit_store::config::AppConfig;
use habbit_store::export::{render_text, write_export, ExportFormat};
use habbit_store::logging::{init_logging, OperationTimer};
use habbit_store::reminders::{sync_reminders, LoggingScheduler, ReminderOutcome};
use habbit_store::sensors::{AccelSample, ShakeDetector, StepDetector};
use habbit_store::utils::{format_date_time, mood_score};
use habbit_store::validation::InputValidator;
use habbit_store::{Clock, DataManager, Habit, HabitCompletion, HabitFrequency, MoodEntry, RecordStore, SledStore, Theme};

type Manager = DataManager<SledStore>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Extra configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides configuration)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage habits
    Habit {
        #[command(subcommand)]
        action: HabitCommand,
    },
    /// Log and review moods
    Mood {
        #[command(subcommand)]
        action: MoodCommand,
    },
    /// Track water intake
    Water {
        #[command(subcommand)]
        action: WaterCommand,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// Show today's habit progress
    Progress,
    /// Show today's habit and hydration summary
    Summary {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count steps in a JSON file of accelerometer samples
    Steps {
        /// Path to a JSON array of {x, y, z, timestamp_ms}
        samples: PathBuf,
    },
    /// Export all data
    Export {
        /// Output format (txt or json)
        #[arg(short, long, default_value = "txt")]
        format: String,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete all stored data
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum HabitCommand {
    /// Add a habit
    Add {
        /// Habit name
        name: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// daily or weekly
        #[arg(short, long, default_value = "daily")]
        frequency: HabitFrequency,
    },
    /// List habits with today's status
    List,
    /// Edit a habit
    Update {
        /// Habit id
        id: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New frequency
        #[arg(short, long)]
        frequency: Option<HabitFrequency>,

        /// Mark active or inactive
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a habit and its completions
    Delete {
        /// Habit id
        id: String,
    },
    /// Mark a habit done
    Complete {
        /// Habit id
        id: String,

        /// Day to mark (YYYY-MM-DD), today by default
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove a habit's completion
    Uncomplete {
        /// Habit id
        id: String,

        /// Day to clear (YYYY-MM-DD), today by default
        #[arg(long)]
        date: Option<String>,
    },
    /// Flip today's completion
    Toggle {
        /// Habit id
        id: String,
    },
}

#[derive(Subcommand)]
enum MoodCommand {
    /// Record a mood
    Log {
        /// Mood emoji
        emoji: String,

        /// Optional note
        #[arg(short, long, default_value = "")]
        note: String,
    },
    /// List all moods
    List,
    /// Moods from the last seven days
    Trend,
    /// Delete a mood entry
    Delete {
        /// Entry id
        id: String,
    },
}

#[derive(Subcommand)]
enum WaterCommand {
    /// Add a glass of water
    Drink,
    /// Show today's intake
    Status,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print current settings
    Show,
    /// Change settings
    Set {
        /// Enable or disable reminders
        #[arg(long)]
        reminders: Option<bool>,

        /// Minutes between reminders (15-240)
        #[arg(long)]
        interval: Option<u32>,

        /// Daily water goal in glasses (1-12)
        #[arg(long)]
        goal: Option<u32>,

        /// light, dark or system
        #[arg(long)]
        theme: Option<Theme>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load_from(cli.config.as_deref())?;

    // Initialize logging
    let log_file = config.logging.file_path.as_ref().map(PathBuf::from);
    let _guard = init_logging(Some(&config.get_log_level()), log_file.as_deref(), config.logging.format == "json")?;

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.get_storage_path());
    let backend = SledStore::open(&data_dir, config.storage.flush_on_write)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let manager = DataManager::new(RecordStore::new(backend, config.storage.codec));
    info!(path = %data_dir.display(), "Opened habbit store");

    if manager.is_first_launch() {
        println!("Welcome to Habbit! Track habits, moods and water from here.");
        manager.set_first_launch_completed()?;
    }

    match cli.command {
        Commands::Habit { action } => run_habit(&manager, action)?,
        Commands::Mood { action } => run_mood(&manager, action)?,
        Commands::Water { action } => run_water(&manager, action)?,
        Commands::Settings { action } => run_settings(&manager, action)?,
        Commands::Progress => {
            let progress = manager.get_today_progress();
            println!("Today's progress: {:.0}%", progress * 100.0);
        }
        Commands::Summary { json } => {
            let summary = manager.today_summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.date);
                println!("Habits: {}/{} ({}%)", summary.habits_completed, summary.habits_total, summary.habits_percent);
                println!("Water:  {}/{} glasses ({}%)", summary.glasses_consumed, summary.daily_goal, summary.water_percent);
            }
        }
        Commands::Steps { samples } => run_steps(&manager, &config, &samples)?,
        Commands::Export { format, output } => run_export(&manager, &format, output)?,
        Commands::Reset { yes } => {
            if yes {
                manager.clear_all_data()?;
                println!("All data cleared");
            } else {
                warn!("Refusing to clear data without --yes");
                println!("Pass --yes to delete all data. This cannot be undone.");
            }
        }
    }

    manager.store().flush()?;
    Ok(())
}

fn find_habit(manager: &Manager, id: &str) -> Result<Habit> {
    manager
        .get_habits()
        .into_iter()
        .find(|h| h.id == id)
        .ok_or_else(|| anyhow::anyhow!("Habit not found: {}", id))
}

fn resolve_date(manager: &Manager, date: Option<String>) -> Result<String> {
    match date {
        Some(date) => {
            InputValidator::validate_date(&date)?;
            Ok(date)
        }
        None => Ok(manager.clock().today()),
    }
}

fn run_habit(manager: &Manager, action: HabitCommand) -> Result<()> {
    match action {
        HabitCommand::Add { name, description, frequency } => {
            InputValidator::validate_habit_name(&name)?;
            let habit = Habit::new(name, description, frequency, manager.clock().now_millis());
            println!("Added habit {} ({})", habit.name, habit.id);
            manager.add_habit(habit)?;
        }
        HabitCommand::List => {
            let today = manager.clock().today();
            for habit in manager.get_habits() {
                let mark = if manager.is_habit_completed(&habit.id, &today) { "x" } else { " " };
                let status = if habit.is_active { "" } else { " [inactive]" };
                println!("[{mark}] {} {} ({}){status}", habit.id, habit.name, habit.frequency);
            }
        }
        HabitCommand::Update { id, name, description, frequency, active } => {
            let mut habit = find_habit(manager, &id)?;
            if let Some(name) = name {
                InputValidator::validate_habit_name(&name)?;
                habit.name = name;
            }
            if let Some(description) = description {
                habit.description = description;
            }
            if let Some(frequency) = frequency {
                habit.frequency = frequency;
            }
            if let Some(active) = active {
                habit.is_active = active;
            }
            manager.update_habit(habit)?;
            println!("Updated habit {id}");
        }
        HabitCommand::Delete { id } => {
            let habit = find_habit(manager, &id)?;
            manager.delete_habit_with_completions(&id)?;
            println!("Deleted habit {}", habit.name);
        }
        HabitCommand::Complete { id, date } => {
            find_habit(manager, &id)?;
            let date = resolve_date(manager, date)?;
            manager.add_habit_completion(HabitCompletion::new(&id, date.clone(), manager.clock().now_millis()))?;
            println!("Completed {id} on {date}");
        }
        HabitCommand::Uncomplete { id, date } => {
            let date = resolve_date(manager, date)?;
            manager.remove_habit_completion(&id, &date)?;
            println!("Cleared {id} on {date}");
        }
        HabitCommand::Toggle { id } => {
            find_habit(manager, &id)?;
            let completed = manager.toggle_habit_completion(&id)?;
            println!("{id} is now {}", if completed { "done" } else { "not done" });
        }
    }
    Ok(())
}

fn run_mood(manager: &Manager, action: MoodCommand) -> Result<()> {
    match action {
        MoodCommand::Log { emoji, note } => {
            InputValidator::validate_emoji(&emoji)?;
            InputValidator::validate_note(&note)?;
            let entry = MoodEntry::new(emoji, note, manager.clock().now_millis());
            println!("Logged {} ({})", entry.emoji, entry.id);
            manager.add_mood_entry(entry)?;
        }
        MoodCommand::List => {
            for entry in manager.get_mood_entries() {
                println!("{} {} {} {}", entry.id, format_date_time(entry.timestamp), entry.emoji, entry.note);
            }
        }
        MoodCommand::Trend => {
            for entry in manager.get_weekly_mood_trend() {
                println!("{} {} score={}", format_date_time(entry.timestamp), entry.emoji, mood_score(&entry.emoji));
            }
        }
        MoodCommand::Delete { id } => {
            manager.delete_mood_entry(&id)?;
            println!("Deleted mood entry {id}");
        }
    }
    Ok(())
}

fn run_water(manager: &Manager, action: WaterCommand) -> Result<()> {
    let record = match action {
        WaterCommand::Drink => manager.add_glass_of_water()?,
        WaterCommand::Status => manager.get_today_hydration_record(),
    };

    println!("{}: {}/{} glasses", record.date, record.glasses_consumed, record.daily_goal);
    if record.goal_reached() {
        println!("Daily goal reached!");
    }
    Ok(())
}

fn run_settings(manager: &Manager, action: SettingsCommand) -> Result<()> {
    match action {
        SettingsCommand::Show => {
            let settings = manager.get_app_settings();
            println!("Hydration reminders: {}", settings.hydration_reminders_enabled);
            println!("Reminder interval:   {} minutes", settings.reminder_interval_minutes);
            println!("Daily water goal:    {} glasses", settings.daily_water_goal);
            println!("Theme:               {}", settings.theme);
        }
        SettingsCommand::Set { reminders, interval, goal, theme } => {
            let mut settings = manager.get_app_settings();
            if let Some(reminders) = reminders {
                settings.hydration_reminders_enabled = reminders;
            }
            if let Some(interval) = interval {
                settings.reminder_interval_minutes = interval;
            }
            if let Some(goal) = goal {
                settings.daily_water_goal = goal;
            }
            if let Some(theme) = theme {
                settings.theme = theme;
            }
            manager.apply_settings(&settings)?;

            match sync_reminders(&settings, &LoggingScheduler) {
                ReminderOutcome::Scheduled { interval_minutes } => {
                    println!("Reminders every {interval_minutes} minutes");
                }
                ReminderOutcome::PermissionRequired => println!("Enable notifications to receive reminders"),
                ReminderOutcome::Cancelled => println!("Reminders disabled"),
            }
            println!("Settings saved");
        }
    }
    Ok(())
}

fn run_steps(manager: &Manager, config: &AppConfig, path: &Path) -> Result<()> {
    let timer = OperationTimer::new("steps");
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read samples from {}", path.display()))?;
    let samples: Vec<AccelSample> = serde_json::from_str(&raw).context("Samples must be a JSON array of {x, y, z, timestamp_ms}")?;

    let mut steps = StepDetector::new(config.sensors);
    let mut shake = ShakeDetector::new(config.sensors.shake_threshold);
    let mut shakes = 0;
    for sample in samples {
        steps.on_sample(sample);
        if shake.on_sample(sample) {
            shakes += 1;
            shake.rearm();
        }
    }

    println!("Steps: {}", steps.step_count());
    if shakes > 0 {
        println!("Shakes: {shakes}");
    }
    if let Some(habit) = manager.auto_complete_step_habit(&steps)? {
        println!("Completed {} for today", habit.name);
    }
    timer.finish();
    Ok(())
}

fn run_export(manager: &Manager, format: &str, output: Option<PathBuf>) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let snapshot = manager.export_snapshot();
    let now = manager.clock().now_millis();

    match output {
        Some(path) => {
            let timer = OperationTimer::new("export");
            write_export(&snapshot, format, &path, now)?;
            timer.finish();
            println!("Exported to {}", path.display());
        }
        None => match format {
            ExportFormat::Txt => print!("{}", render_text(&snapshot, now)),
            ExportFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        },
    }
    Ok(())
}
