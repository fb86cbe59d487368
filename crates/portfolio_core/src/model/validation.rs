//! Field validation errors raised before any remote call.

use super::ResourceKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected at the provider boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or blank.
    MissingField {
        kind: ResourceKind,
        field: &'static str,
    },
    /// A field is present but unusable.
    InvalidField {
        kind: ResourceKind,
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    pub fn missing(kind: ResourceKind, field: &'static str) -> Self {
        Self::MissingField { kind, field }
    }

    pub fn invalid(kind: ResourceKind, field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            kind,
            field,
            message: message.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field, .. } | Self::InvalidField { field, .. } => field,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { kind, field } => {
                write!(f, "{} field `{field}` is required", kind.as_str())
            }
            Self::InvalidField {
                kind,
                field,
                message,
            } => write!(f, "{} field `{field}` is invalid: {message}", kind.as_str()),
        }
    }
}

impl Error for ValidationError {}

/// Fails when a required text field is blank.
pub(crate) fn require_text(
    kind: ResourceKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(kind, field));
    }
    Ok(())
}

/// Fails when a patch would blank out a required text field.
pub(crate) fn require_text_if_set(
    kind: ResourceKind,
    field: &'static str,
    value: Option<&str>,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => require_text(kind, field, value),
        None => Ok(()),
    }
}

/// Trims optional text and maps blank values to `None`.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{clean_optional, require_text, ValidationError};
    use crate::model::ResourceKind;

    #[test]
    fn blank_text_is_missing() {
        let err = require_text(ResourceKind::Project, "title", "   ").unwrap_err();
        assert_eq!(err, ValidationError::missing(ResourceKind::Project, "title"));
        assert_eq!(err.to_string(), "project field `title` is required");
    }

    #[test]
    fn clean_optional_drops_blank_values() {
        assert_eq!(clean_optional(Some("  ".to_string())), None);
        assert_eq!(
            clean_optional(Some(" https://x.dev ".to_string())).as_deref(),
            Some("https://x.dev")
        );
    }
}
