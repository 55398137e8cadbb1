//! Step and shake detection over raw accelerometer samples
//!
//! Both detectors are plain state machines: feed them samples in time order
//! and they report when a step or a shake happened. Neither touches storage;
//! the caller decides what to do with a detected step (see
//! [`crate::data_manager::DataManager::auto_complete_step_habit`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One three-axis accelerometer reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    /// X-axis acceleration
    pub x: f32,
    /// Y-axis acceleration
    pub y: f32,
    /// Z-axis acceleration
    pub z: f32,
    /// Sample time in epoch milliseconds
    pub timestamp_ms: i64,
}

impl AccelSample {
    /// Build a sample
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, timestamp_ms: i64) -> Self {
        Self { x, y, z, timestamp_ms }
    }

    /// Euclidean magnitude of the reading
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Detector tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Minimum summed per-axis change for a step
    pub step_threshold: f32,
    /// Minimum spacing between two steps
    pub min_step_interval_ms: i64,
    /// Steps needed before a step habit is auto-completed
    pub auto_complete_steps: u32,
    /// Minimum magnitude for a shake
    pub shake_threshold: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            step_threshold: 15.0,
            min_step_interval_ms: 300,
            auto_complete_steps: 100,
            shake_threshold: 800.0,
        }
    }
}

/// Threshold-based step counter
#[derive(Debug, Clone)]
pub struct StepDetector {
    config: StepConfig,
    last: (f32, f32, f32),
    last_step_ms: i64,
    step_count: u32,
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new(StepConfig::default())
    }
}

impl StepDetector {
    /// A detector with no history
    #[must_use]
    pub const fn new(config: StepConfig) -> Self {
        Self {
            config,
            last: (0.0, 0.0, 0.0),
            last_step_ms: 0,
            step_count: 0,
        }
    }

    /// Feed one sample; returns true if it counted as a step
    pub fn on_sample(&mut self, sample: AccelSample) -> bool {
        let (lx, ly, lz) = self.last;
        let delta = (sample.x - lx).abs() + (sample.y - ly).abs() + (sample.z - lz).abs();
        self.last = (sample.x, sample.y, sample.z);

        if delta > self.config.step_threshold && sample.timestamp_ms.saturating_sub(self.last_step_ms) > self.config.min_step_interval_ms {
            self.step_count += 1;
            self.last_step_ms = sample.timestamp_ms;
            debug!(steps = self.step_count, "Step detected");
            return true;
        }
        false
    }

    /// Feed a sequence of samples; returns how many were steps
    pub fn feed<I: IntoIterator<Item = AccelSample>>(&mut self, samples: I) -> u32 {
        let mut steps = 0;
        for sample in samples {
            if self.on_sample(sample) {
                steps += 1;
            }
        }
        steps
    }

    /// Steps counted since creation or the last reset
    #[must_use]
    pub const fn step_count(&self) -> u32 {
        self.step_count
    }

    /// True once enough steps were counted to auto-complete a habit
    #[must_use]
    pub const fn goal_reached(&self) -> bool {
        self.step_count >= self.config.auto_complete_steps
    }

    /// Zero the step count. The last sample and step time are kept.
    pub fn reset(&mut self) {
        self.step_count = 0;
    }
}

/// One-shot shake detector
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    threshold: f32,
    armed: bool,
}

impl ShakeDetector {
    /// An armed detector firing above `threshold`
    #[must_use]
    pub const fn new(threshold: f32) -> Self {
        Self { threshold, armed: true }
    }

    /// Feed one sample; returns true the first time the magnitude exceeds the threshold
    pub fn on_sample(&mut self, sample: AccelSample) -> bool {
        if self.armed && sample.magnitude() > self.threshold {
            self.armed = false;
            debug!("Shake detected");
            return true;
        }
        false
    }

    /// Whether the detector can still fire
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Allow the detector to fire again
    pub fn rearm(&mut self) {
        self.armed = true;
    }
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(StepConfig::default().shake_threshold)
    }
}
