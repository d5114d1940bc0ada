/// Concurrent toggles on one habit must never lose an update
use std::thread;
use chrono::{Duration, NaiveDate};
use habitflow::*;

const THREADS: usize = 8;
const DAYS_PER_THREAD: usize = 25;

fn hammer<S: HabitStorage>(service: &HabitService<S>) {
    let habit = service.create_habit("Run", None, None).unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    thread::scope(|scope| {
        for t in 0..THREADS {
            let habit_id = habit.id.clone();
            scope.spawn(move || {
                for d in 0..DAYS_PER_THREAD {
                    let offset = (t * DAYS_PER_THREAD + d) as i64;
                    service
                        .toggle_completion(&habit_id, start + Duration::days(offset))
                        .unwrap();
                }
            });
        }
    });

    let habit = service.get_habit(&habit.id).unwrap();
    assert_eq!(habit.completion_count(), THREADS * DAYS_PER_THREAD);
}

#[test]
fn test_concurrent_toggles_memory() {
    hammer(&HabitService::new(MemoryStorage::new()));
}

#[test]
fn test_concurrent_toggles_sqlite() {
    hammer(&HabitService::new(SqliteStorage::open_in_memory().unwrap()));
}

#[test]
fn test_concurrent_same_date_toggles_pair_up() {
    let service = HabitService::new(MemoryStorage::new());
    let habit = service.create_habit("Run", None, None).unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    // An even number of toggles on one date must leave it unset
    thread::scope(|scope| {
        for _ in 0..10 {
            let habit_id = habit.id.clone();
            let service = &service;
            scope.spawn(move || {
                service.toggle_completion(&habit_id, day).unwrap();
            });
        }
    });

    assert!(!service.get_habit(&habit.id).unwrap().is_completed_on(day));
}
