/// A store whose writes fail must leave earlier state intact and surface as
/// an internal error, never as a caller mistake
use chrono::NaiveDate;
use habitflow::mcp::protocol::error_codes;
use habitflow::*;
use serde_json::{json, Value};

/// Reads go to an in-memory store; `replace` and `remove` always fail
struct BrokenWrites {
    inner: MemoryStorage,
    fail_inserts: bool,
}

impl BrokenWrites {
    fn new() -> Self {
        Self { inner: MemoryStorage::new(), fail_inserts: false }
    }

    fn failing_inserts() -> Self {
        Self { inner: MemoryStorage::new(), fail_inserts: true }
    }
}

fn disk_gone() -> StorageError {
    StorageError::Connection("disk I/O error".to_string())
}

impl HabitStorage for BrokenWrites {
    fn insert(&self, habit: Habit) -> Result<Habit, StorageError> {
        if self.fail_inserts {
            return Err(disk_gone());
        }
        self.inner.insert(habit)
    }

    fn get(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        self.inner.get(habit_id)
    }

    fn list(&self) -> Result<Vec<Habit>, StorageError> {
        self.inner.list()
    }

    fn replace(&self, _habit_id: &HabitId, _habit: Habit) -> Result<Habit, StorageError> {
        Err(disk_gone())
    }

    fn remove(&self, _habit_id: &HabitId) -> Result<(), StorageError> {
        Err(disk_gone())
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
}

#[test]
fn test_failed_toggle_keeps_completions() {
    let service = HabitService::new(BrokenWrites::new());
    let habit = service.create_habit("Stretch", None, None).unwrap();

    let result = service.toggle_completion(&habit.id, day());
    assert!(matches!(result, Err(HabitError::Internal(StorageError::Connection(_)))));
    assert!(!result.unwrap_err().is_recoverable());

    let stored = service.get_habit(&habit.id).unwrap();
    assert_eq!(stored.completed_dates, habit.completed_dates);
    assert_eq!(stored, habit);
}

#[test]
fn test_failed_delete_keeps_habit() {
    let service = HabitService::new(BrokenWrites::new());
    let habit = service.create_habit("Stretch", None, None).unwrap();

    assert!(matches!(service.delete_habit(&habit.id), Err(HabitError::Internal(_))));
    assert_eq!(service.get_habit(&habit.id).unwrap(), habit);
}

#[test]
fn test_failed_insert_creates_nothing() {
    let service = HabitService::new(BrokenWrites::failing_inserts());

    assert!(matches!(
        service.create_habit("Stretch", None, Some(10)),
        Err(HabitError::Internal(_))
    ));
    assert!(service.list_habits().unwrap().is_empty());
}

fn tool_call(id: u64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
    .to_string()
}

fn call(server: &McpServer, line: &str) -> Value {
    serde_json::to_value(server.process_line(line).unwrap()).unwrap()
}

#[test]
fn test_storage_failure_is_json_rpc_error() {
    let server = McpServer::new(HabitFlowServer::with_storage(BrokenWrites::new()));

    let created = call(&server, &tool_call(1, "habit_create", json!({"name": "Stretch"})));
    let text = created["result"]["content"][0]["text"].as_str().unwrap();
    let (_, body) = text.split_once("\n\n").unwrap();
    let habit_id = serde_json::from_str::<Value>(body).unwrap()["habit"]["id"].clone();

    let toggled = call(
        &server,
        &tool_call(2, "habit_toggle", json!({"habit_id": habit_id, "date": "2024-02-29"})),
    );
    assert_eq!(toggled["id"], 2);
    assert_eq!(toggled["error"]["code"], error_codes::STORAGE_ERROR);
    assert!(toggled.get("result").is_none());

    let fetched = call(&server, &tool_call(3, "habit_get", json!({"habit_id": habit_id})));
    assert_eq!(fetched["result"]["isError"], false);
    let text = fetched["result"]["content"][0]["text"].as_str().unwrap();
    let (_, body) = text.split_once("\n\n").unwrap();
    assert_eq!(serde_json::from_str::<Value>(body).unwrap()["habit"]["completedDates"], json!([]));
}
