//! Class roster data model
//!
//! Field names on the wire follow the existing Malay API
//! (`namaKelas`, `pelajar`, `nama`, `markah`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Subject code → optional mark
///
/// Open attribute bag: keys outside the default subject set are kept as-is.
/// An unset mark is a present key with a `null` value.
pub type Marks = BTreeMap<String, Option<f64>>;

/// Subject codes every imported student starts with
pub const DEFAULT_SUBJECTS: [&str; 13] = [
    "bm", "bi", "mt", "sn", "pai", "ba", "pm", "pj", "pk", "sej", "mz", "psv", "rbt",
];

/// A student embedded in exactly one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "nama")]
    pub name: String,

    /// Institutional ID, not guaranteed unique
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(rename = "markah", default)]
    pub marks: Marks,
}

impl Student {
    /// New student with every given subject present and unset
    pub fn with_subjects<S: AsRef<str>>(
        name: impl Into<String>,
        external_id: Option<String>,
        subjects: &[S],
    ) -> Self {
        let marks = subjects
            .iter()
            .map(|code| (code.as_ref().to_string(), None))
            .collect();

        Self {
            name: name.into(),
            external_id,
            marks,
        }
    }
}

/// A named class owning its ordered roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    #[serde(rename = "namaKelas")]
    pub name: String,

    /// Display/report order
    #[serde(rename = "pelajar")]
    pub students: Vec<Student>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Name-only projection returned by the class list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    #[serde(rename = "namaKelas")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_marks_serialize_as_null() {
        let student = Student::with_subjects("Ali", Some("S1".to_string()), &["bm", "bi"]);
        let value = serde_json::to_value(&student).unwrap();

        assert_eq!(
            value,
            json!({"nama": "Ali", "id": "S1", "markah": {"bm": null, "bi": null}})
        );
    }

    #[test]
    fn test_student_accepts_extra_subjects_and_missing_id() {
        let student: Student = serde_json::from_value(json!({
            "nama": "Siti",
            "markah": {"bm": 80, "robotik": 91.5, "sej": null}
        }))
        .unwrap();

        assert_eq!(student.external_id, None);
        assert_eq!(student.marks.get("bm"), Some(&Some(80.0)));
        assert_eq!(student.marks.get("robotik"), Some(&Some(91.5)));
        assert_eq!(student.marks.get("sej"), Some(&None));
    }

    #[test]
    fn test_student_requires_name() {
        let result: Result<Student, _> = serde_json::from_value(json!({"id": "S9"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_subjects_are_distinct() {
        let mut codes = DEFAULT_SUBJECTS.to_vec();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 13);
    }
}
