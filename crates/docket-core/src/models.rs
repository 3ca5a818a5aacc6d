//! Data models for docket
//!
//! Defines `Document`, the metadata record for one tracked file, and the
//! slug rule used to derive mirror and artifact file names from a title.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field names, in column order
pub mod fields {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const CLASSIFICATION: &str = "classification";
    pub const FILE_PATH: &str = "file_path";
    pub const UPLOAD_DATE: &str = "upload_date";

    /// Every field, in the order used for the store header and mirror files
    pub const ALL: [&str; 6] = [
        ID,
        TITLE,
        DESCRIPTION,
        CLASSIFICATION,
        FILE_PATH,
        UPLOAD_DATE,
    ];

    /// Fields that must be present and non-blank for a record to exist
    pub const REQUIRED: [&str; 2] = [ID, TITLE];
}

/// A required field was absent while building a `Document`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required field: {0}")]
pub struct MissingField(pub &'static str);

/// Metadata for one tracked document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Identifier assigned by the repository, numeric in practice
    pub id: String,
    /// Display name, also the source of the derived file names
    pub title: String,
    pub description: String,
    pub classification: String,
    /// Path to the stored artifact this record describes
    pub file_path: String,
    /// `%Y-%m-%d %H:%M:%S` timestamp of creation or last update
    pub upload_date: String,
}

/// User-supplied fields for a new document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDocument {
    pub title: String,
    pub description: String,
    pub classification: String,
}

impl NewDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = classification.into();
        self
    }
}

impl Document {
    /// Field names in column order
    pub fn field_names() -> &'static [&'static str] {
        &fields::ALL
    }

    /// Ordered field name / value pairs
    pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        fields::ALL
            .iter()
            .map(|&name| (name, self.get(name).unwrap_or_default()))
            .collect()
    }

    /// Look up a field value by name
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            fields::ID => &self.id,
            fields::TITLE => &self.title,
            fields::DESCRIPTION => &self.description,
            fields::CLASSIFICATION => &self.classification,
            fields::FILE_PATH => &self.file_path,
            fields::UPLOAD_DATE => &self.upload_date,
            _ => return None,
        };
        Some(value)
    }

    /// Build a document from named values
    ///
    /// Keys outside the declared field list are ignored. `id` and `title`
    /// must be present; every other field defaults to an empty string.
    pub fn from_fields(values: &HashMap<String, String>) -> Result<Self, MissingField> {
        for name in fields::REQUIRED {
            if !values.contains_key(name) {
                return Err(MissingField(name));
            }
        }

        let take = |name: &str| values.get(name).cloned().unwrap_or_default();
        Ok(Self {
            id: take(fields::ID),
            title: take(fields::TITLE),
            description: take(fields::DESCRIPTION),
            classification: take(fields::CLASSIFICATION),
            file_path: take(fields::FILE_PATH),
            upload_date: take(fields::UPLOAD_DATE),
        })
    }

    /// Decimal digits of the id without leading zeros, if it is a number
    ///
    /// Ids of any length qualify; `"007"` yields `"7"` and `"0"` yields `"0"`.
    pub fn numeric_id(&self) -> Option<&str> {
        let digits = self.id.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        Some(if trimmed.is_empty() { "0" } else { trimmed })
    }

    /// Slug derived from the current title
    pub fn slug(&self) -> String {
        slug(&self.title)
    }

    /// Case-insensitive substring match against every field
    pub fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        fields::ALL.iter().any(|&name| {
            self.get(name)
                .is_some_and(|value| value.to_lowercase().contains(&keyword))
        })
    }
}

/// Derive a file-name stem from a title: lower-cased, spaces become underscores
pub fn slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document {
            id: "1".to_string(),
            title: "Project Plan".to_string(),
            description: "Detailed project plan".to_string(),
            classification: "Confidential".to_string(),
            file_path: "/docs/project_plan.pdf".to_string(),
            upload_date: "2024-10-05 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_field_names_order() {
        assert_eq!(
            Document::field_names(),
            &[
                "id",
                "title",
                "description",
                "classification",
                "file_path",
                "upload_date"
            ]
        );
    }

    #[test]
    fn test_to_pairs() {
        let doc = sample();
        let pairs = doc.to_pairs();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], ("id", "1"));
        assert_eq!(pairs[1], ("title", "Project Plan"));
        assert_eq!(pairs[5], ("upload_date", "2024-10-05 00:00:00"));
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Project Plan"), "project_plan");
        assert_eq!(slug("Budget  Report 2024"), "budget__report_2024");
        assert_eq!(slug("already_slugged"), "already_slugged");
    }

    #[test]
    fn test_from_fields() {
        let values: HashMap<String, String> = [
            ("id", "7"),
            ("title", "Lease"),
            ("classification", "Home"),
            ("unexpected", "ignored"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let doc = Document::from_fields(&values).unwrap();
        assert_eq!(doc.id, "7");
        assert_eq!(doc.title, "Lease");
        assert_eq!(doc.classification, "Home");
        assert!(doc.description.is_empty());
        assert!(doc.file_path.is_empty());
    }

    #[test]
    fn test_from_fields_missing_title() {
        let values: HashMap<String, String> = [("id".to_string(), "3".to_string())]
            .into_iter()
            .collect();

        let err = Document::from_fields(&values).unwrap_err();
        assert_eq!(err, MissingField("title"));
        assert_eq!(err.to_string(), "Missing required field: title");
    }

    #[test]
    fn test_numeric_id() {
        let mut doc = sample();
        assert_eq!(doc.numeric_id(), Some("1"));
        doc.id = " 007 ".to_string();
        assert_eq!(doc.numeric_id(), Some("7"));
        doc.id = "000".to_string();
        assert_eq!(doc.numeric_id(), Some("0"));
        doc.id = "18446744073709551616".to_string();
        assert_eq!(doc.numeric_id(), Some("18446744073709551616"));
        doc.id = "abc".to_string();
        assert_eq!(doc.numeric_id(), None);
        doc.id = "-3".to_string();
        assert_eq!(doc.numeric_id(), None);
    }

    #[test]
    fn test_matches_any_field() {
        let doc = sample();
        assert!(doc.matches("PROJECT"));
        assert!(doc.matches("confidential"));
        assert!(doc.matches("project_plan.pdf"));
        assert!(doc.matches("2024-10"));
        assert!(doc.matches(""));
        assert!(!doc.matches("budget"));
    }

    #[test]
    fn test_new_document_builder() {
        let new = NewDocument::new("Tax Return")
            .description("2023 filing")
            .classification("Finance");
        assert_eq!(new.title, "Tax Return");
        assert_eq!(new.description, "2023 filing");
        assert_eq!(new.classification, "Finance");
    }

    #[test]
    fn test_document_serialization() {
        let doc = sample();
        let json = serde_json::to_string(&doc).unwrap();
        let deserialized: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, deserialized);
    }
}
