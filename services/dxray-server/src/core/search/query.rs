//! Query preprocessing and validation.
//!
//! Free-text queries go straight to Tantivy's query parser. This
//! module trims them, optionally escapes all query syntax, and rejects
//! field prefixes that do not exist in the study schema with a hint
//! at the field that was probably meant.

use crate::core::error::DxrayError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Fields a query may be restricted to
pub const VALID_FIELDS: [&str; 7] = [
    "owner",
    "patient",
    "race",
    "id",
    "uid",
    "date",
    "description",
];

// Pattern to detect potential field prefixes (word:nonspace)
static FIELD_PREFIX_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+):([^\s:])").unwrap());

/// Prepare a query string for Tantivy.
///
/// In literal mode every special character is escaped so the query
/// is matched as plain words.
pub fn preprocess_query(query: &str, literal: bool) -> String {
    let trimmed = query.trim();
    if literal {
        escape_all_special(trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Escape ALL special characters for literal search mode.
fn escape_all_special(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for ch in s.chars() {
        match ch {
            ':' | '{' | '}' | '[' | ']' | '(' | ')' | '@' | '"' | '\\' | '+' | '-' | '!' | '^'
            | '~' | '*' | '\'' => {
                result.push('\\');
                result.push(ch);
            }
            _ => result.push(ch),
        }
    }
    result
}

/// Validate that all field prefixes in a query are valid.
///
/// # Examples
///
/// ```
/// use dxray::core::search::validate_query_fields;
///
/// assert!(validate_query_fields("race:labrador").is_ok());
/// assert!(validate_query_fields("breed:labrador").is_err());
/// ```
pub fn validate_query_fields(query: &str) -> Result<(), DxrayError> {
    let trimmed = query.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') {
        return Ok(());
    }

    for cap in FIELD_PREFIX_PATTERN.captures_iter(query) {
        let Some(whole) = cap.get(0) else {
            continue;
        };
        let field = &cap[1];

        // Only a prefix at the start or after whitespace names a field
        if let Some(prev) = query[..whole.start()].chars().next_back() {
            if !prev.is_whitespace() && prev != '+' && prev != '-' && prev != '(' {
                continue;
            }
        }

        // Times such as 12:30
        if VALID_FIELDS.contains(&field) || field.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }

        let hint = match suggest_field_alias(field) {
            Some(suggestion) => format!(" Did you mean '{suggestion}'?"),
            None => String::new(),
        };
        return Err(DxrayError::InvalidQuery(format!(
            "Unknown field '{field}'.{hint} Valid fields: {}",
            VALID_FIELDS.join(", ")
        )));
    }

    Ok(())
}

/// Suggest a valid field name for common aliases.
fn suggest_field_alias(field: &str) -> Option<&'static str> {
    match field.to_lowercase().as_str() {
        "name" | "client" | "customer" | "ownername" => Some("owner"),
        "animal" | "pet" | "animalname" => Some("patient"),
        "breed" | "species" => Some("race"),
        "patientid" | "pid" => Some("id"),
        "studyuid" | "studyinstanceuid" => Some("uid"),
        "studydate" | "day" => Some("date"),
        "desc" | "text" | "series" => Some("description"),
        _ => None,
    }
}
