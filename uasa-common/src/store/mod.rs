//! Record store for class documents
//!
//! Each class is a single document embedding its ordered student list.
//! Operations are atomic per document; there are no cross-class transactions.

use crate::models::{Class, ClassSummary, Student};
use crate::Result;
use async_trait::async_trait;

pub mod sqlite;

pub use sqlite::SqliteClassStore;

/// Which branch of [`ClassStore::import_roster`] ran
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    /// No class had this name; a new one was created
    Created(Class),
    /// An existing class had its roster replaced
    Replaced(Class),
}

impl UpsertOutcome {
    /// The stored class, whichever branch ran
    pub fn into_class(self) -> Class {
        match self {
            UpsertOutcome::Created(class) | UpsertOutcome::Replaced(class) => class,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }
}

/// Store handle shared by all request handlers
///
/// Implementations must enforce class-name uniqueness themselves; callers hold
/// no locks across these calls.
#[async_trait]
pub trait ClassStore: Send + Sync {
    /// All class names, ascending
    async fn list_class_names(&self) -> Result<Vec<ClassSummary>>;

    /// Full class by exact name, or `NotFound`
    async fn get_class(&self, name: &str) -> Result<Class>;

    /// Create a new class, or `Conflict` if the name is taken
    async fn create_class(&self, name: &str, students: Vec<Student>) -> Result<Class>;

    /// Replace the whole roster of an existing class, or `NotFound`
    async fn replace_roster(&self, name: &str, students: Vec<Student>) -> Result<Class>;

    /// Replace the roster if the class exists, otherwise create it
    ///
    /// `Conflict` only when a concurrent create wins the race for the name.
    async fn import_roster(&self, name: &str, students: Vec<Student>) -> Result<UpsertOutcome> {
        match self.replace_roster(name, students.clone()).await {
            Ok(class) => Ok(UpsertOutcome::Replaced(class)),
            Err(crate::Error::NotFound(_)) => {
                self.create_class(name, students).await.map(UpsertOutcome::Created)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove a class and all its students, or `NotFound`
    async fn delete_class(&self, name: &str) -> Result<()>;

    /// Release store resources on shutdown
    async fn close(&self);
}
