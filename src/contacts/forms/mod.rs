//! Create/update forms and inline detail form sets.
//!
//! Forms hold raw submitted values. `clean` validates every field at once and
//! either yields the values to persist or reports all failures; nothing is
//! written by a form.

mod company;
mod details;
mod formset;
mod group;
mod location;
mod person;

pub use company::*;
pub use details::*;
pub use formset::*;
pub use group::*;
pub use location::*;
pub use person::*;

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use crate::core::shared::utils::slugify;
use crate::core::validation::{ValidationError, ValidationResult};

pub const SLUG_MAX_LENGTH: usize = 50;
pub const IMAGE_MAX_LENGTH: usize = 100;

/// Slug derived from a display name, cut to the slug column width.
pub fn derive_slug(source: &str, field: &str) -> Result<String, ValidationError> {
    let slug: String = slugify(source).chars().take(SLUG_MAX_LENGTH).collect();
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            expected: "at least one letter or digit".to_string(),
        });
    }
    Ok(slug)
}

pub(crate) fn duplicate(field: &str, value: &str) -> ValidationError {
    ValidationError::Duplicate {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Store an uploaded image name under `dir`. Any directory part of the
/// submitted name is dropped.
pub(crate) fn image_path(dir: &str, submitted: &str) -> String {
    let name = submitted.trim();
    let base = name.rsplit('/').next().unwrap_or(name);
    format!("{dir}{base}")
}

/// Field errors of the owner form plus per-row errors of each form set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub fields: ValidationResult,
    pub formsets: BTreeMap<&'static str, BTreeMap<usize, ValidationResult>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_valid() && self.formsets.values().all(BTreeMap::is_empty)
    }

    pub fn add_rows(&mut self, prefix: &'static str, rows: BTreeMap<usize, ValidationResult>) {
        if !rows.is_empty() {
            self.formsets.entry(prefix).or_default().extend(rows);
        }
    }

    pub fn row(&self, prefix: &str, index: usize) -> Option<&ValidationResult> {
        self.formsets.get(prefix).and_then(|rows| rows.get(&index))
    }

    pub fn message_count(&self) -> usize {
        self.fields.errors().len()
            + self
                .formsets
                .values()
                .flat_map(BTreeMap::values)
                .map(|row| row.errors().len())
                .sum::<usize>()
    }

    /// `{"fields": {field: [messages]}, "formsets": {prefix: {row: {field: [messages]}}}}`
    pub fn to_json(&self) -> Value {
        let formsets: Map<String, Value> = self
            .formsets
            .iter()
            .map(|(prefix, rows)| {
                let rows: Map<String, Value> = rows
                    .iter()
                    .map(|(index, result)| (index.to_string(), field_messages(result)))
                    .collect();
                (prefix.to_string(), Value::Object(rows))
            })
            .collect();

        json!({
            "fields": field_messages(&self.fields),
            "formsets": formsets,
        })
    }
}

fn field_messages(result: &ValidationResult) -> Value {
    let mut fields: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for error in result.errors() {
        fields
            .entry(error.field())
            .or_default()
            .push(error.to_string());
    }
    json!(fields)
}

impl From<ValidationResult> for FormErrors {
    fn from(fields: ValidationResult) -> Self {
        Self {
            fields,
            formsets: BTreeMap::new(),
        }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut messages = self.fields.to_error_messages();
        for (prefix, rows) in &self.formsets {
            for (index, row) in rows {
                messages.extend(
                    row.to_error_messages()
                        .into_iter()
                        .map(|m| format!("{prefix}[{index}]: {m}")),
                );
            }
        }
        f.write_str(&messages.join("; "))
    }
}
