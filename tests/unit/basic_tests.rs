/// Basic unit tests to verify core functionality
use chrono::NaiveDate;
use habitflow::*;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new("Test Habit", Some("A test habit".to_string()), Some(21));

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.goal_days, Some(21));
        assert!(habit.completed_dates.is_empty());
    }

    #[test]
    fn test_activity_from_habits() {
        let jan_1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jan_2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let mut h1 = Habit::new("H1", None, None).unwrap();
        h1.toggle(jan_1);
        h1.toggle(jan_2);
        let mut h2 = Habit::new("H2", None, None).unwrap();
        h2.toggle(jan_1);

        let summary = ActivitySummary::from_habits(&[h1, h2]);
        assert_eq!(summary.activity.into_iter().collect::<Vec<_>>(), vec![(jan_1, 2), (jan_2, 1)]);
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_storage_is_object_safe() {
        let storage: Box<dyn HabitStorage> = Box::new(MemoryStorage::new());
        let service = HabitService::new(storage);
        assert!(service.list_habits().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitFlowServer::new(temp_file.path().to_path_buf()).await;
        assert!(server.is_ok());
    }
}
