//! URL mapping entity: the durable association between a URL and its short id.

use chrono::{DateTime, Utc};

/// A committed mapping between an original URL and its short identifier.
///
/// Mappings are append-only. Once inserted, neither `original` nor `short`
/// ever changes, and both are unique across all mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub original: String,
    pub short: i64,
    pub created_at: DateTime<Utc>,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(original: String, short: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            original,
            short,
            created_at,
        }
    }
}

/// Input data for inserting a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlMapping {
    pub original: String,
    pub short: i64,
}

impl NewUrlMapping {
    pub fn new(original: impl Into<String>, short: i64) -> Self {
        Self {
            original: original.into(),
            short,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_creation() {
        let now = Utc::now();
        let mapping = UrlMapping::new("https://example.com/a".to_string(), 0, now);

        assert_eq!(mapping.original, "https://example.com/a");
        assert_eq!(mapping.short, 0);
        assert_eq!(mapping.created_at, now);
    }

    #[test]
    fn test_new_mapping_keeps_exact_url() {
        let new_mapping = NewUrlMapping::new("https://EXAMPLE.com/Path?q=1", 7);

        assert_eq!(new_mapping.original, "https://EXAMPLE.com/Path?q=1");
        assert_eq!(new_mapping.short, 7);
    }
}
