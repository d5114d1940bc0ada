/// SQLite implementation of the habit storage interface
///
/// Habits live in the `habits` table and their completion dates in
/// `habit_completions`, one row per habit and day.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::domain::{Habit, HabitId};
use crate::storage::{check_same_id, migrations, HabitStorage, StorageError};

const SELECT_HABITS: &str =
    "SELECT id, name, description, goal_days, created_at FROM habits";

/// SQLite-based storage implementation
///
/// The connection sits behind a mutex so one storage value can be shared
/// between threads; each trait call holds the lock for its whole duration.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

/// A `habits` row before its columns are parsed into domain types
struct HabitRow {
    id: String,
    name: String,
    description: Option<String>,
    goal_days: Option<u32>,
    created_at: String,
}

impl HabitRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            goal_days: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_habit(self, completed_dates: BTreeSet<NaiveDate>) -> Result<Habit, StorageError> {
        let id = HabitId::from_string(&self.id).map_err(|e| StorageError::CorruptRow {
            column: "id",
            message: e.to_string(),
        })?;

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StorageError::CorruptRow {
                column: "created_at",
                message: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(Habit::from_existing(
            id,
            self.name,
            self.description,
            self.goal_days,
            created_at,
            completed_dates,
        ))
    }
}

impl SqliteStorage {
    /// Open (or create) the database file and bring its schema up to date
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Create a private in-memory database (used by tests)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn not_found(habit_id: &HabitId) -> StorageError {
        StorageError::HabitNotFound {
            habit_id: habit_id.to_string(),
        }
    }

    fn load_dates(conn: &Connection, habit_id: &str) -> Result<BTreeSet<NaiveDate>, StorageError> {
        let mut stmt = conn.prepare(
            "SELECT completed_date FROM habit_completions WHERE habit_id = ?1",
        )?;
        let dates = stmt
            .query_map(params![habit_id], |row| row.get::<_, NaiveDate>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(dates)
    }

    fn write_dates(tx: &Transaction<'_>, habit: &Habit) -> Result<(), StorageError> {
        let mut stmt = tx.prepare(
            "INSERT INTO habit_completions (habit_id, completed_date) VALUES (?1, ?2)",
        )?;
        let habit_id = habit.id.to_string();
        for date in &habit.completed_dates {
            stmt.execute(params![habit_id, date])?;
        }
        Ok(())
    }

    fn is_primary_key_violation(error: &rusqlite::Error) -> bool {
        matches!(
            error,
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    }
}

impl HabitStorage for SqliteStorage {
    fn insert(&self, habit: Habit) -> Result<Habit, StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO habits (id, seq, name, description, goal_days, created_at)
             VALUES (?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM habits), ?2, ?3, ?4, ?5)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.goal_days,
                habit.created_at.to_rfc3339(),
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(e) if Self::is_primary_key_violation(&e) => {
                return Err(StorageError::DuplicateId {
                    habit_id: habit.id.to_string(),
                });
            }
            Err(e) => return Err(StorageError::Query(e)),
        }

        Self::write_dates(&tx, &habit)?;
        tx.commit()?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(habit)
    }

    fn get(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let conn = self.conn.lock();
        let id = habit_id.to_string();

        let row = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_HABITS),
                params![id],
                HabitRow::from_row,
            )
            .optional()?
            .ok_or_else(|| Self::not_found(habit_id))?;

        let dates = Self::load_dates(&conn, &id)?;
        row.into_habit(dates)
    }

    fn list(&self) -> Result<Vec<Habit>, StorageError> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(&format!("{} ORDER BY seq", SELECT_HABITS))?;
        let rows = stmt
            .query_map([], HabitRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut dates_by_habit: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
        let mut stmt = conn.prepare("SELECT habit_id, completed_date FROM habit_completions")?;
        let completions = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, NaiveDate>(1)?))
        })?;
        for completion in completions {
            let (habit_id, date) = completion?;
            dates_by_habit.entry(habit_id).or_default().insert(date);
        }

        rows.into_iter()
            .map(|row| {
                let dates = dates_by_habit.remove(&row.id).unwrap_or_default();
                row.into_habit(dates)
            })
            .collect()
    }

    fn replace(&self, habit_id: &HabitId, habit: Habit) -> Result<Habit, StorageError> {
        check_same_id(habit_id, &habit)?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let id = habit_id.to_string();

        let rows_affected = tx.execute(
            "UPDATE habits SET name = ?2, description = ?3, goal_days = ?4, created_at = ?5
             WHERE id = ?1",
            params![
                id,
                habit.name,
                habit.description,
                habit.goal_days,
                habit.created_at.to_rfc3339(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(Self::not_found(habit_id));
        }

        tx.execute("DELETE FROM habit_completions WHERE habit_id = ?1", params![id])?;
        Self::write_dates(&tx, &habit)?;
        tx.commit()?;

        tracing::debug!(
            "Replaced habit: {} ({}) with {} completed dates",
            habit.name,
            habit.id,
            habit.completed_dates.len()
        );
        Ok(habit)
    }

    fn remove(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let id = habit_id.to_string();

        tx.execute("DELETE FROM habit_completions WHERE habit_id = ?1", params![id])?;
        let rows_affected = tx.execute("DELETE FROM habits WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(Self::not_found(habit_id));
        }
        tx.commit()?;

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }
}
