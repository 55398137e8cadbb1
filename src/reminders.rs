//! Hydration reminder scheduling
//!
//! The scheduler itself belongs to the host platform. This module only
//! decides what to ask of it when settings change.

use tracing::{info, warn};

use crate::error::Result;
use crate::models::AppSettings;

/// Platform notification scheduler
pub trait NotificationScheduler {
    /// (Re)schedule a recurring reminder every `interval_minutes`
    fn schedule(&self, interval_minutes: u32);

    /// Cancel the recurring reminder
    fn cancel(&self);

    /// Show a reminder right now
    fn show_reminder(&self) -> Result<()>;

    /// Whether notification permission is currently granted
    fn notifications_enabled(&self) -> bool;
}

/// What [`sync_reminders`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    /// Reminders are scheduled at this interval
    Scheduled {
        /// Minutes between reminders
        interval_minutes: u32,
    },
    /// Reminders are on but permission is missing; nothing was scheduled
    PermissionRequired,
    /// Reminders were cancelled
    Cancelled,
}

/// Bring the scheduler in line with `settings`.
///
/// When scheduling succeeds an immediate reminder confirms the setup; if that
/// reminder is refused the failure is logged and otherwise ignored.
pub fn sync_reminders(settings: &AppSettings, scheduler: &dyn NotificationScheduler) -> ReminderOutcome {
    if !settings.hydration_reminders_enabled {
        scheduler.cancel();
        info!("Hydration reminders cancelled");
        return ReminderOutcome::Cancelled;
    }

    if !scheduler.notifications_enabled() {
        warn!("Hydration reminders enabled without notification permission");
        return ReminderOutcome::PermissionRequired;
    }

    let interval_minutes = settings.reminder_interval_minutes;
    scheduler.schedule(interval_minutes);
    if let Err(e) = scheduler.show_reminder() {
        warn!(error = %e, "Could not show confirmation reminder");
    }
    info!(interval_minutes, "Hydration reminders scheduled");
    ReminderOutcome::Scheduled { interval_minutes }
}

/// Scheduler that only logs; used when no platform scheduler is available
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingScheduler;

impl NotificationScheduler for LoggingScheduler {
    fn schedule(&self, interval_minutes: u32) {
        info!(interval_minutes, "Would schedule hydration reminder");
    }

    fn cancel(&self) {
        info!("Would cancel hydration reminder");
    }

    fn show_reminder(&self) -> Result<()> {
        info!("Time to drink a glass of water");
        Ok(())
    }

    fn notifications_enabled(&self) -> bool {
        true
    }
}
