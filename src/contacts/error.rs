use diesel::result::{DatabaseErrorKind, Error as DieselError};

use super::forms::FormErrors;
use crate::core::validation::{ValidationError, ValidationResult};

#[derive(Debug, thiserror::Error)]
pub enum ContactsError {
    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("Database error: {0}")]
    Database(#[from] DieselError),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("{entity} '{slug}' not found")]
    SlugNotFound { entity: &'static str, slug: String },
    #[error("Invalid input: {0}")]
    Invalid(FormErrors),
}

impl ContactsError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn form_errors(&self) -> Option<&FormErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether the caller can fix the failure by changing its input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Invalid(_) | Self::NotFound { .. } | Self::SlugNotFound { .. }
        )
    }
}

impl From<ValidationResult> for ContactsError {
    fn from(result: ValidationResult) -> Self {
        Self::Invalid(FormErrors::from(result))
    }
}

impl From<FormErrors> for ContactsError {
    fn from(errors: FormErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Turn a UNIQUE constraint failure into a field error. Validation checks
/// uniqueness up front; this covers the window between check and write.
pub fn map_unique_violation(err: DieselError, field: &str, value: &str) -> ContactsError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ValidationResult::from(ValidationError::Duplicate {
                field: field.to_string(),
                value: value.to_string(),
            })
            .into()
        }
        other => ContactsError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result_becomes_invalid() {
        let err: ContactsError = ValidationResult::from(ValidationError::Required(
            "first_name".to_string(),
        ))
        .into();
        assert!(err.is_user_error());
        let errors = err.form_errors().expect("form errors");
        assert!(errors.fields.has_error_for("first_name"));
    }

    #[test]
    fn test_map_unique_violation_passes_other_errors_through() {
        let err = map_unique_violation(DieselError::NotFound, "slug", "acme");
        assert!(matches!(err, ContactsError::Database(DieselError::NotFound)));
        assert!(!err.is_user_error());
    }
}
