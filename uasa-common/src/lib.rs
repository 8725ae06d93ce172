//! # UASA Common Library
//!
//! Shared code for the UASA class roster service:
//! - Class / student data model
//! - Roster import transform and name collation
//! - Record store trait and SQLite implementation
//! - Configuration loading
//! - Error types

pub mod collation;
pub mod config;
pub mod error;
pub mod models;
pub mod roster;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use models::{Class, ClassSummary, Marks, Student, DEFAULT_SUBJECTS};
pub use store::{ClassStore, SqliteClassStore, UpsertOutcome};
