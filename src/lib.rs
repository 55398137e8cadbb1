//! Habbit Store - Local Wellness Data
//!
//! A Rust library for storing and querying personal wellness data: habits
//! and their daily completions, emoji mood entries, daily water intake and
//! app settings, kept as whole collections in an embedded key-value store.
//!
//! # Features
//!
//! - Sled-backed or in-memory storage with JSON or bincode payloads
//! - One completion per habit per day, cascading habit deletes
//! - Today's progress, weekly mood trend and hydration tracking
//! - Threshold-based step and shake detection
//! - Reminder scheduling against a pluggable notification backend
//! - Text and JSON export

/// Time source
pub mod clock;
/// Configuration management
pub mod config;
/// Data access layer
pub mod data_manager;
/// Error types
pub mod error;
/// Data export
pub mod export;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Hydration reminder scheduling
pub mod reminders;
/// Step and shake detection
pub mod sensors;
/// Key-value record store
pub mod store;
/// Date helpers and mood scoring
pub mod utils;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use clock::{Clock, FixedClock, SystemClock};
pub use data_manager::DataManager;
pub use error::{HabbitError, Result};
pub use models::{AppSettings, Habit, HabitCompletion, HabitFrequency, HydrationRecord, MoodEntry, Theme, TodaySummary};
pub use store::{Codec, KeyValueStore, MemoryStore, RecordStore, SledStore};
