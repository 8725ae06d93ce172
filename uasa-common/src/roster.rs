//! Roster import transform
//!
//! Converts an uploaded comma-delimited roster into an ordered student list.
//! The first non-blank line is a header and never becomes a student. Rows
//! with fewer than two fields or an empty name are skipped, never rejected.

use crate::collation::CollationKey;
use crate::models::Student;
use crate::{Error, Result};
use tracing::debug;

/// Decode raw upload bytes and parse them as a roster
///
/// Fails with [`Error::Read`] only when the bytes are not valid UTF-8.
pub fn decode_roster<S: AsRef<str>>(raw: &[u8], subjects: &[S]) -> Result<Vec<Student>> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| Error::Read(format!("roster is not valid UTF-8: {}", e)))?;
    Ok(parse_roster(text, subjects))
}

/// Parse roster text into students sorted by name
///
/// Every student starts with all `subjects` present and unset.
pub fn parse_roster<S: AsRef<str>>(text: &str, subjects: &[S]) -> Vec<Student> {
    let mut skipped = 0usize;

    let mut students: Vec<Student> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .skip(1)
        .filter_map(|line| {
            let student = parse_row(line, subjects);
            if student.is_none() {
                skipped += 1;
            }
            student
        })
        .collect();

    students.sort_by_cached_key(|s| CollationKey::new(&s.name));

    debug!(
        "Parsed roster: {} students, {} rows skipped",
        students.len(),
        skipped
    );

    students
}

fn parse_row<S: AsRef<str>>(line: &str, subjects: &[S]) -> Option<Student> {
    let mut fields = line.split(',').map(str::trim);

    let name = fields.next().filter(|name| !name.is_empty())?;
    let external_id = fields.next()?;

    let external_id = (!external_id.is_empty()).then(|| external_id.to_string());
    Some(Student::with_subjects(name, external_id, subjects))
}
