use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Required(String),
    TooLong { field: String, max: usize, actual: usize },
    InvalidFormat { field: String, expected: String },
    InvalidRange { field: String, min: String, max: String },
    InvalidChoice { field: String, value: String },
    InvalidEmail { field: String, value: String },
    InvalidUrl { field: String, value: String },
    InvalidDate { field: String, value: String },
    Duplicate { field: String, value: String },
    UnknownReference { field: String, id: i32 },
    LocationNotAllowed { field: String, location: String, kind: String },
}

/// The three families of user-correctable failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Field,
    Uniqueness,
    Reference,
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            Self::Required(field) => field,
            Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidRange { field, .. }
            | Self::InvalidChoice { field, .. }
            | Self::InvalidEmail { field, .. }
            | Self::InvalidUrl { field, .. }
            | Self::InvalidDate { field, .. }
            | Self::Duplicate { field, .. }
            | Self::UnknownReference { field, .. }
            | Self::LocationNotAllowed { field, .. } => field,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Duplicate { .. } => ErrorCategory::Uniqueness,
            Self::UnknownReference { .. } | Self::LocationNotAllowed { .. } => {
                ErrorCategory::Reference
            }
            _ => ErrorCategory::Field,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required(field) => write!(f, "Field '{}' is required", field),
            Self::TooLong { field, max, actual } => {
                write!(f, "Field '{}' is too long: {} > {} chars", field, actual, max)
            }
            Self::InvalidFormat { field, expected } => {
                write!(f, "Field '{}' has invalid format, expected: {}", field, expected)
            }
            Self::InvalidRange { field, min, max } => {
                write!(f, "Field '{}' must be between {} and {}", field, min, max)
            }
            Self::InvalidChoice { field, value } => write!(
                f,
                "Field '{}': select a valid choice, '{}' is not one of the available choices",
                field, value
            ),
            Self::InvalidEmail { field, value } => {
                write!(f, "Field '{}' has invalid email address: {}", field, value)
            }
            Self::InvalidUrl { field, value } => {
                write!(f, "Field '{}' has invalid URL: {}", field, value)
            }
            Self::InvalidDate { field, value } => {
                write!(f, "Field '{}' has invalid date: {}", field, value)
            }
            Self::Duplicate { field, value } => {
                write!(f, "Field '{}' must be unique: '{}' is already taken", field, value)
            }
            Self::UnknownReference { field, id } => {
                write!(f, "Field '{}' refers to unknown record {}", field, id)
            }
            Self::LocationNotAllowed { field, location, kind } => write!(
                f,
                "Field '{}': location '{}' cannot be used for a {}",
                field, location, kind
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    pub fn to_error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    pub fn field_errors<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.errors.iter().filter(move |e| e.field() == field)
    }

    pub fn has_error_for(&self, field: &str) -> bool {
        self.field_errors(field).next().is_some()
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("Invalid email regex")
});

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i:https?|ftps?)://(?:[a-zA-Z0-9][-a-zA-Z0-9]*(?:\.[a-zA-Z0-9][-a-zA-Z0-9]*)*|\d{1,3}(?:\.\d{1,3}){3})(?::\d{1,5})?(?:[/?#][-a-zA-Z0-9()@:%_\+.~#?&/=!,;']*)?$"
    ).expect("Invalid URL regex")
});

static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-a-zA-Z0-9_]+$").expect("Invalid slug regex")
});

const IMAGE_EXTENSIONS: &[&str] = &["bmp", "gif", "jpeg", "jpg", "png", "tif", "tiff", "webp"];

pub fn validate_required(value: &str, field_name: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field_name.to_string()))
    } else {
        Ok(())
    }
}

pub fn validate_max_length(value: &str, field_name: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong {
            field: field_name.to_string(),
            max,
            actual: len,
        });
    }
    Ok(())
}

pub fn validate_email(email: &str, field_name: &str) -> Result<(), ValidationError> {
    if email.len() <= 254 && EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            field: field_name.to_string(),
            value: email.to_string(),
        })
    }
}

pub fn validate_url(url: &str, field_name: &str) -> Result<(), ValidationError> {
    if url.len() <= 2048 && URL_REGEX.is_match(url) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl {
            field: field_name.to_string(),
            value: url.to_string(),
        })
    }
}

pub fn validate_slug(value: &str, field_name: &str) -> Result<(), ValidationError> {
    if SLUG_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: field_name.to_string(),
            expected: "letters, numbers, underscores or hyphens".to_string(),
        })
    }
}

pub fn validate_image_name(value: &str, field_name: &str) -> Result<(), ValidationError> {
    let extension = value
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) && !value.contains("..") {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: field_name.to_string(),
            expected: format!("an image file ({})", IMAGE_EXTENSIONS.join(", ")),
        })
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    value: T,
    field_name: &str,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::InvalidRange {
            field: field_name.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Collects every failure instead of stopping at the first one, so a form
/// can report all of its fields at once.
#[derive(Debug, Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Required text with a length cap; the length is only checked once the
    /// value is present.
    pub fn required(mut self, value: &str, field_name: &str, max: usize) -> Self {
        if let Err(e) = validate_required(value, field_name) {
            self.result.add_error(e);
        } else if let Err(e) = validate_max_length(value.trim(), field_name, max) {
            self.result.add_error(e);
        }
        self
    }

    pub fn optional(mut self, value: Option<&str>, field_name: &str, max: usize) -> Self {
        if let Some(value) = value {
            if let Err(e) = validate_max_length(value.trim(), field_name, max) {
                self.result.add_error(e);
            }
        }
        self
    }

    pub fn email(mut self, value: &str, field_name: &str) -> Self {
        if let Err(e) = validate_required(value, field_name) {
            self.result.add_error(e);
        } else if let Err(e) = validate_email(value.trim(), field_name) {
            self.result.add_error(e);
        }
        self
    }

    pub fn url(mut self, value: &str, field_name: &str, max: usize) -> Self {
        let value = value.trim();
        if let Err(e) = validate_required(value, field_name) {
            self.result.add_error(e);
        } else if let Err(e) = validate_max_length(value, field_name, max) {
            self.result.add_error(e);
        } else if let Err(e) = validate_url(value, field_name) {
            self.result.add_error(e);
        }
        self
    }

    pub fn slug(mut self, value: &str, field_name: &str, max: usize) -> Self {
        let value = value.trim();
        if let Err(e) = validate_required(value, field_name) {
            self.result.add_error(e);
        } else if let Err(e) = validate_max_length(value, field_name, max) {
            self.result.add_error(e);
        } else if let Err(e) = validate_slug(value, field_name) {
            self.result.add_error(e);
        }
        self
    }

    pub fn image(mut self, value: Option<&str>, field_name: &str, max: usize) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if let Err(e) = validate_max_length(value, field_name, max) {
                self.result.add_error(e);
            } else if let Err(e) = validate_image_name(value, field_name) {
                self.result.add_error(e);
            }
        }
        self
    }

    pub fn range(mut self, value: i32, field_name: &str, min: i32, max: i32) -> Self {
        if let Err(e) = validate_range(value, field_name, min, max) {
            self.result.add_error(e);
        }
        self
    }

    pub fn custom<F>(mut self, validation_fn: F) -> Self
    where
        F: FnOnce() -> Option<ValidationError>,
    {
        if let Some(error) = validation_fn() {
            self.result.add_error(error);
        }
        self
    }

    pub fn validate(self) -> Result<(), ValidationResult> {
        if self.result.is_valid() {
            Ok(())
        } else {
            Err(self.result)
        }
    }

    pub fn result(self) -> ValidationResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("value", "field").is_ok());
        assert!(validate_required("", "field").is_err());
        assert!(validate_required("  ", "field").is_err());
    }

    #[test]
    fn test_validate_max_length_counts_chars() {
        assert!(validate_max_length("hello", "field", 5).is_ok());
        assert!(validate_max_length("hello world", "field", 5).is_err());
        assert!(validate_max_length("ééééé", "field", 5).is_ok());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com", "email").is_ok());
        assert!(validate_email("user.name+tag@domain.co.uk", "email").is_ok());
        assert!(validate_email("invalid", "email").is_err());
        assert!(validate_email("@domain.com", "email").is_err());
        assert!(validate_email("user@", "email").is_err());
        assert!(validate_email("user@localhost", "email").is_ok());
        assert!(validate_email("user@-localhost", "email").is_err());
        assert!(validate_email("user@localhost.", "email").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com", "url").is_ok());
        assert!(validate_url("http://sub.domain.com/path?query=1", "url").is_ok());
        assert!(validate_url("http://localhost:8000/", "url").is_ok());
        assert!(validate_url("ftp://files.example.com/pub", "url").is_ok());
        assert!(validate_url("gopher://example.com", "url").is_err());
        assert!(validate_url("not-a-url", "url").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("my-slug", "slug").is_ok());
        assert!(validate_slug("My_Slug1", "slug").is_ok());
        assert!(validate_slug("has space", "slug").is_err());
        assert!(validate_slug("dots.bad", "slug").is_err());
    }

    #[test]
    fn test_validate_image_name() {
        assert!(validate_image_name("logo.PNG", "logo").is_ok());
        assert!(validate_image_name("photo.jpeg", "photo").is_ok());
        assert!(validate_image_name("notes.txt", "logo").is_err());
        assert!(validate_image_name("../../etc/passwd.png", "logo").is_err());
        assert!(validate_image_name("noextension", "logo").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(5, "weight", 0, 10).is_ok());
        assert!(validate_range(0, "weight", 0, 10).is_ok());
        assert!(validate_range(11, "weight", 0, 10).is_err());
        assert!(validate_range(-1, "weight", 0, 10).is_err());
    }

    #[test]
    fn test_validator_chain() {
        let result = Validator::new()
            .required("Acme", "name", 200)
            .optional(Some("ACME"), "nickname", 50)
            .slug("acme", "slug", 50)
            .validate();

        assert!(result.is_ok());
    }

    #[test]
    fn test_validator_collects_every_error() {
        let result = Validator::new()
            .required("", "name", 200)
            .email("invalid-email", "email_address")
            .slug("bad slug", "slug", 50)
            .validate();

        let errors = result.unwrap_err();
        assert_eq!(errors.errors().len(), 3);
        assert!(errors.has_error_for("name"));
        assert!(errors.has_error_for("email_address"));
        assert!(errors.has_error_for("slug"));
        assert!(!errors.has_error_for("about"));
    }

    #[test]
    fn test_required_skips_length_when_missing() {
        let errors = Validator::new().required("   ", "name", 2).result();
        assert_eq!(errors.errors(), &[ValidationError::Required("name".to_string())]);
    }

    #[test]
    fn test_error_categories() {
        let duplicate = ValidationError::Duplicate {
            field: "slug".to_string(),
            value: "acme".to_string(),
        };
        let location = ValidationError::LocationNotAllowed {
            field: "location".to_string(),
            location: "Mailing".to_string(),
            kind: "phone number".to_string(),
        };
        assert_eq!(duplicate.category(), ErrorCategory::Uniqueness);
        assert_eq!(location.category(), ErrorCategory::Reference);
        assert_eq!(
            ValidationError::Required("name".to_string()).category(),
            ErrorCategory::Field
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::Required("first_name".to_string());
        assert!(err.to_string().contains("first_name"));
        assert!(err.to_string().contains("required"));
    }
}
