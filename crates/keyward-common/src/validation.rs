//! Validation trait and field validators
//!
//! Request types in the directory crate implement [`Validatable`] and
//! compose these validators instead of repeating ad-hoc string checks.

use thiserror::Error;

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Format error for {field}: {message}")]
    Format { field: String, message: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Collapse a list of errors: none is `Ok`, one is itself, more is `Multiple`.
    pub fn from_list(mut errors: Vec<ValidationError>) -> Result<(), ValidationError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }

    /// Field names this error refers to, flattened
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::Required { field }
            | ValidationError::Format { field, .. }
            | ValidationError::InvalidValue { field, .. } => vec![field.as_str()],
            ValidationError::Multiple(errors) => errors.iter().flat_map(|e| e.fields()).collect(),
        }
    }
}

/// Types that can check their own invariants
pub trait Validatable {
    fn validate(&self) -> Result<(), ValidationError>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Validator for a single value
pub trait Validator<T: ?Sized> {
    fn validate(&self, value: &T) -> Result<(), ValidationError>;
}

/// Rejects empty or whitespace-only strings
pub struct NonEmptyStringValidator {
    field_name: String,
}

impl NonEmptyStringValidator {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
        }
    }
}

impl Validator<str> for NonEmptyStringValidator {
    fn validate(&self, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::Required {
                field: self.field_name.clone(),
            });
        }
        Ok(())
    }
}

/// Minimal `local@domain` shape check
pub struct EmailValidator {
    field_name: String,
}

impl EmailValidator {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
        }
    }
}

impl Validator<str> for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::Required {
                field: self.field_name.clone(),
            });
        }

        let well_formed = match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            }
            None => false,
        };

        if !well_formed {
            return Err(ValidationError::Format {
                field: self.field_name.clone(),
                message: "expected an address of the form local@domain".to_string(),
            });
        }
        Ok(())
    }
}

/// Rejects empty collections
pub struct NonEmptyListValidator {
    field_name: String,
}

impl NonEmptyListValidator {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
        }
    }
}

impl<T> Validator<[T]> for NonEmptyListValidator {
    fn validate(&self, value: &[T]) -> Result<(), ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: self.field_name.clone(),
                message: "at least one entry must be selected".to_string(),
            });
        }
        Ok(())
    }
}
