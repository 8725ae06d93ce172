//! HTTP API handlers for uasa-api

pub mod health;
pub mod kelas;
pub mod upload;

pub use health::health_routes;
pub use kelas::kelas_routes;
pub use upload::upload_routes;

/// A class name is missing when absent or empty
///
/// Whitespace is not trimmed: `"  "` is a name like any other.
pub(crate) fn required_name(value: Option<String>) -> Option<String> {
    value.filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_name() {
        assert_eq!(required_name(None), None);
        assert_eq!(required_name(Some(String::new())), None);
        assert_eq!(required_name(Some("   ".to_string())).as_deref(), Some("   "));
        assert_eq!(required_name(Some("5 Bestari".to_string())).as_deref(), Some("5 Bestari"));
    }
}
