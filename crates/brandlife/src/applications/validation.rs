//! Field rules for the application document.
//!
//! Every write goes through [`validate_record`], so the bounds below hold for
//! whatever store sits behind the repository trait.

use std::sync::OnceLock;

use regex::Regex;

use super::domain::ApplicationRecord;

/// Client-facing validation failure. The `Display` text is returned verbatim
/// in the `error` field of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("'{value}' is not a valid value for {field}")]
    InvalidChoice { field: &'static str, value: String },
    #[error("{0}")]
    Field(&'static str),
    #[error("Application ID and status are required")]
    MissingIdOrStatus,
    #[error("Invalid status")]
    InvalidStatus,
    #[error("Invalid application ID")]
    InvalidId,
    #[error("{0}")]
    InvalidQuery(String),
}

struct FieldRule {
    value: fn(&ApplicationRecord) -> Option<&str>,
    required: Option<&'static str>,
    max_len: Option<(usize, &'static str)>,
}

const SCHEMA: &[FieldRule] = &[
    FieldRule {
        value: |record| Some(record.name.as_str()),
        required: Some("Name is required"),
        max_len: Some((100, "Name cannot be more than 100 characters")),
    },
    FieldRule {
        value: |record| Some(record.email.as_str()),
        required: Some("Email is required"),
        max_len: Some((254, "Email cannot be more than 254 characters")),
    },
    FieldRule {
        value: |record| record.phone.as_deref(),
        required: None,
        max_len: Some((40, "Phone cannot be more than 40 characters")),
    },
    FieldRule {
        value: |record| record.instagram.as_deref(),
        required: None,
        max_len: Some((100, "Instagram handle cannot be more than 100 characters")),
    },
    FieldRule {
        value: |record| record.tiktok.as_deref(),
        required: None,
        max_len: Some((100, "TikTok handle cannot be more than 100 characters")),
    },
    FieldRule {
        value: |record| record.website.as_deref(),
        required: None,
        max_len: Some((200, "Website cannot be more than 200 characters")),
    },
    FieldRule {
        value: |record| Some(record.company.as_str()),
        required: Some("Company is required"),
        max_len: Some((100, "Company name cannot be more than 100 characters")),
    },
    FieldRule {
        value: |record| Some(record.challenges.as_str()),
        required: Some("Challenges description is required"),
        max_len: Some((1000, "Challenges cannot be more than 1000 characters")),
    },
    FieldRule {
        value: |record| Some(record.goals.as_str()),
        required: Some("Goals description is required"),
        max_len: Some((1000, "Goals cannot be more than 1000 characters")),
    },
    FieldRule {
        value: |record| record.notes.as_deref(),
        required: None,
        max_len: Some((500, "Notes cannot be more than 500 characters")),
    },
];

/// Checks a fully built record against the document schema. Enumerated fields
/// are enforced by their types.
pub fn validate_record(record: &ApplicationRecord) -> Result<(), ValidationError> {
    for rule in SCHEMA {
        let value = (rule.value)(record);
        if let Some(message) = rule.required {
            if value.map_or(true, |value| value.trim().is_empty()) {
                return Err(ValidationError::Field(message));
            }
        }
        if let (Some(value), Some((max, message))) = (value, rule.max_len) {
            if value.chars().count() > max {
                return Err(ValidationError::Field(message));
            }
        }
    }

    if !is_schema_email(&record.email) {
        return Err(ValidationError::Field("Please enter a valid email"));
    }

    Ok(())
}

/// Loose `local@domain.tld` shape check applied at the submission boundary.
pub fn is_basic_email(value: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
        .is_match(value)
}

/// Stricter pattern stored documents must satisfy.
pub fn is_schema_email(value: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$",
            )
            .expect("valid schema email regex")
        })
        .is_match(value)
}

/// Trims a free-text field, dropping it when nothing is left.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == value.len() {
            Some(value)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Trims and lowercases an address so uniqueness is case-insensitive.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}
