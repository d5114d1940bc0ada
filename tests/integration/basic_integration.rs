/// Basic integration tests
use chrono::NaiveDate;
use habitflow::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();
        let day = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        let created = {
            let server = HabitFlowServer::new(db_path.clone())
                .await
                .expect("Failed to create first server");
            let habit = server
                .service()
                .create_habit("Read", Some("20 pages".to_string()), Some(14))
                .unwrap();
            server.service().toggle_completion(&habit.id, day).unwrap()
        };

        // Same database path, fresh server
        let server2 = HabitFlowServer::new(db_path)
            .await
            .expect("Failed to create second server");

        let loaded = server2.service().get_habit(&created.id).unwrap();
        assert_eq!(loaded, created);
        assert_eq!(server2.service().get_activity().unwrap().count_on(day), 1);
    }

    #[tokio::test]
    async fn test_delete_survives_reopen() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let habit_id = {
            let server = HabitFlowServer::new(db_path.clone()).await.unwrap();
            let habit = server.service().create_habit("Run", None, None).unwrap();
            server.service().delete_habit(&habit.id).unwrap();
            habit.id
        };

        let server = HabitFlowServer::new(db_path).await.unwrap();
        assert!(matches!(
            server.service().get_habit(&habit_id),
            Err(HabitError::NotFound { .. })
        ));
        assert!(server.service().list_habits().unwrap().is_empty());
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf())
            .expect("Failed to create storage");

        let _: &dyn HabitStorage = &storage;
    }
}
