//! SQLite-backed class store
//!
//! One row per class. The roster is stored as a JSON document column so a
//! class and its students are always written together in one statement.
//! Timestamps are microseconds since the Unix epoch.

use super::ClassStore;
use crate::models::{Class, ClassSummary, Student};
use crate::{time, Error, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const CLASS_COLUMNS: &str = "name, students, created_at, updated_at";

/// Raw `classes` row before the roster document is decoded
#[derive(Debug, sqlx::FromRow)]
struct ClassRow {
    name: String,
    students: String,
    created_at: i64,
    updated_at: i64,
}

impl ClassRow {
    fn into_class(self) -> Result<Class> {
        Ok(Class {
            name: self.name,
            students: serde_json::from_str(&self.students)?,
            created_at: time::from_micros(self.created_at),
            updated_at: time::from_micros(self.updated_at),
        })
    }
}

/// Class store over a SQLite connection pool
#[derive(Clone)]
pub struct SqliteClassStore {
    pool: SqlitePool,
}

impl SqliteClassStore {
    /// Open (or create) the database file and ensure the schema exists
    pub async fn open(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", db_path.display());
        } else {
            info!("Opened existing database: {}", db_path.display());
        }

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if needed
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        create_classes_table(&pool).await?;
        Ok(Self { pool })
    }
}

async fn create_classes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            students TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    debug!("classes table ready");
    Ok(())
}

fn not_found(name: &str) -> Error {
    Error::NotFound(format!("class '{}'", name))
}

#[async_trait]
impl ClassStore for SqliteClassStore {
    async fn list_class_names(&self) -> Result<Vec<ClassSummary>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM classes ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(names.into_iter().map(|name| ClassSummary { name }).collect())
    }

    async fn get_class(&self, name: &str) -> Result<Class> {
        let sql = format!("SELECT {} FROM classes WHERE name = ?", CLASS_COLUMNS);
        let row: Option<ClassRow> = sqlx::query_as(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| not_found(name))?.into_class()
    }

    async fn create_class(&self, name: &str, students: Vec<Student>) -> Result<Class> {
        let document = serde_json::to_string(&students)?;
        let now = time::now_micros();

        let sql = format!(
            "INSERT INTO classes (name, students, created_at, updated_at) \
             VALUES (?, ?, ?, ?) RETURNING {}",
            CLASS_COLUMNS
        );
        let row: ClassRow = sqlx::query_as(&sql)
            .bind(name)
            .bind(&document)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let duplicate = e
                    .as_database_error()
                    .is_some_and(|db_err| db_err.is_unique_violation());
                if duplicate {
                    Error::Conflict(format!("class '{}' already exists", name))
                } else {
                    Error::Service(e)
                }
            })?;

        info!("Created class '{}' with {} students", name, students.len());
        row.into_class()
    }

    async fn replace_roster(&self, name: &str, students: Vec<Student>) -> Result<Class> {
        let document = serde_json::to_string(&students)?;

        // updated_at must advance even when the clock has not
        let sql = format!(
            "UPDATE classes SET students = ?, updated_at = MAX(?, updated_at + 1) \
             WHERE name = ? RETURNING {}",
            CLASS_COLUMNS
        );
        let row: Option<ClassRow> = sqlx::query_as(&sql)
            .bind(&document)
            .bind(time::now_micros())
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        let class = row.ok_or_else(|| not_found(name))?.into_class()?;
        info!("Replaced roster of class '{}' ({} students)", name, students.len());
        Ok(class)
    }

    async fn delete_class(&self, name: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM classes WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(name));
        }

        info!("Deleted class '{}'", name);
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }
}
