//! Property tests for collection invariants

mod common;

use common::{manager, NOW};
use habbit_store::{Habit, HabitCompletion, HabitFrequency, MoodEntry};
use proptest::prelude::*;
use std::collections::HashSet;

fn habit_strategy() -> impl Strategy<Value = Habit> {
    ("[a-z0-9]{1,12}", "\\PC{0,20}", "\\PC{0,40}", any::<bool>(), any::<bool>(), 0i64..NOW).prop_map(
        |(id, name, description, weekly, is_active, created_at)| Habit {
            id,
            name,
            description,
            frequency: if weekly { HabitFrequency::Weekly } else { HabitFrequency::Daily },
            created_at,
            is_active,
        },
    )
}

proptest! {
    #[test]
    fn added_habit_is_stored_once(h in habit_strategy()) {
        let dm = manager();
        dm.add_habit(h.clone()).unwrap();
        let habits = dm.get_habits();
        prop_assert_eq!(habits.iter().filter(|stored| **stored == h).count(), 1);
        prop_assert_eq!(habits.len(), 1);
    }

    #[test]
    fn at_most_one_completion_per_habit_and_day(
        ops in prop::collection::vec((0u8..3, 0u8..4, 0i64..1_000), 1..40)
    ) {
        let dm = manager();
        for (habit, day, at) in &ops {
            dm.add_habit_completion(HabitCompletion::new(format!("h{habit}"), format!("2025-03-0{}", day + 1), *at)).unwrap();
        }

        let completions = dm.get_habit_completions();
        let pairs: HashSet<(String, String)> = completions.iter().map(|c| (c.habit_id.clone(), c.date.clone())).collect();
        prop_assert_eq!(pairs.len(), completions.len());

        // The latest write for each pair wins
        for c in &completions {
            let last = ops
                .iter()
                .rev()
                .find(|(habit, day, _)| format!("h{habit}") == c.habit_id && format!("2025-03-0{}", day + 1) == c.date)
                .map(|(_, _, at)| *at);
            prop_assert_eq!(Some(c.completed_at), last);
        }
    }

    #[test]
    fn delete_only_touches_target_habit(
        completions in prop::collection::vec((0u8..4, 1u8..9), 0..30),
        target in 0u8..4
    ) {
        let dm = manager();
        for (habit, day) in &completions {
            dm.add_habit_completion(HabitCompletion::new(format!("h{habit}"), format!("2025-03-0{day}"), NOW)).unwrap();
        }
        let before: Vec<HabitCompletion> = dm.get_habit_completions();
        let target_id = format!("h{target}");

        dm.delete_habit(&target_id).unwrap();

        let expected: Vec<HabitCompletion> = before.into_iter().filter(|c| c.habit_id != target_id).collect();
        prop_assert_eq!(dm.get_habit_completions(), expected);
    }

    #[test]
    fn weekly_trend_is_sorted_and_recent(offsets in prop::collection::vec(0i64..(14 * common::DAY), 0..20)) {
        let dm = manager();
        for (i, offset) in offsets.iter().enumerate() {
            dm.add_mood_entry(MoodEntry { id: i.to_string(), emoji: "😐".to_string(), note: String::new(), timestamp: NOW - offset }).unwrap();
        }

        let trend = dm.get_weekly_mood_trend();
        prop_assert!(trend.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        prop_assert!(trend.iter().all(|e| e.timestamp >= NOW - 7 * common::DAY));
        prop_assert_eq!(trend.len(), offsets.iter().filter(|o| **o <= 7 * common::DAY).count());
    }

    #[test]
    fn glasses_match_number_of_drinks(n in 0u32..30) {
        let dm = manager();
        for _ in 0..n {
            dm.add_glass_of_water().unwrap();
        }
        prop_assert_eq!(dm.get_today_hydration_record().glasses_consumed, n);
    }
}
