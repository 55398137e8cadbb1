//! Unit tests for step and shake detection

use habbit_store::sensors::{AccelSample, ShakeDetector, StepConfig, StepDetector};

fn sample(z: f32, t: i64) -> AccelSample {
    AccelSample::new(0.0, 0.0, z, t)
}

#[test]
fn test_step_requires_delta_above_threshold() {
    let mut detector = StepDetector::default();
    assert!(!detector.on_sample(sample(15.0, 1_000)));
    assert!(detector.on_sample(sample(30.1, 2_000)));
    assert_eq!(detector.step_count(), 1);
}

#[test]
fn test_delta_sums_all_axes() {
    let mut detector = StepDetector::default();
    assert!(detector.on_sample(AccelSample::new(6.0, -6.0, 6.0, 1_000)));
}

#[test]
fn test_steps_closer_than_interval_are_ignored() {
    let mut detector = StepDetector::default();
    assert!(detector.on_sample(sample(20.0, 1_000)));
    assert!(!detector.on_sample(sample(0.0, 1_300)));
    assert!(detector.on_sample(sample(20.0, 1_301)));
    assert_eq!(detector.step_count(), 2);
}

#[test]
fn test_last_sample_updates_even_without_step() {
    let mut detector = StepDetector::default();
    assert!(detector.on_sample(sample(20.0, 1_000)));
    // Too soon, but still becomes the reference sample
    assert!(!detector.on_sample(sample(40.0, 1_100)));
    // Only 5 away from the previous sample
    assert!(!detector.on_sample(sample(45.0, 2_000)));
}

#[test]
fn test_feed_counts_steps() {
    let mut detector = StepDetector::default();
    let samples = (0..10).map(|i| sample(if i % 2 == 0 { 20.0 } else { 0.0 }, 1_000 + i * 500));
    assert_eq!(detector.feed(samples), 10);
    assert!(!detector.goal_reached());
}

#[test]
fn test_goal_uses_configured_step_count() {
    let config = StepConfig {
        auto_complete_steps: 3,
        ..StepConfig::default()
    };
    let mut detector = StepDetector::new(config);
    let samples = (0..3).map(|i| sample(if i % 2 == 0 { 20.0 } else { 0.0 }, 1_000 + i * 500));
    detector.feed(samples);
    assert!(detector.goal_reached());

    detector.reset();
    assert_eq!(detector.step_count(), 0);
    assert!(!detector.goal_reached());
}

#[test]
fn test_shake_fires_once_until_rearmed() {
    let mut shake = ShakeDetector::default();
    assert!(!shake.on_sample(AccelSample::new(9.8, 0.0, 0.0, 0)));
    assert!(shake.on_sample(AccelSample::new(600.0, 600.0, 0.0, 10)));
    assert!(!shake.is_armed());
    assert!(!shake.on_sample(AccelSample::new(900.0, 0.0, 0.0, 20)));

    shake.rearm();
    assert!(shake.on_sample(AccelSample::new(900.0, 0.0, 0.0, 30)));
}

#[test]
fn test_magnitude() {
    let s = AccelSample::new(3.0, 4.0, 0.0, 0);
    assert!((s.magnitude() - 5.0).abs() < f32::EPSILON);
}

#[test]
fn test_timestamp_jumping_backwards_is_not_a_step() {
    let mut detector = StepDetector::default();
    assert!(detector.on_sample(sample(20.0, 1_000)));
    assert!(!detector.on_sample(sample(0.0, i64::MIN)));
    assert_eq!(detector.step_count(), 1);
}
