//! Traits shared by every editable collection entity.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// An entity that lives in an editable collection.
///
/// The id is optional: a record drafted in a create form has none until the
/// backend assigns one.
pub trait Entity: Clone + PartialEq + Debug {
    type Id: Clone + Eq + Hash + Debug + Display;

    fn id(&self) -> Option<&Self::Id>;
}

/// Client-side validation performed before a draft may be submitted.
pub trait Validate {
    /// # Errors
    ///
    /// Returns the first rule the draft breaks.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A draft failed client-side validation. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    /// The offending field, for inline display next to it.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Required { field } | Self::Invalid { field, .. } => field,
        }
    }

    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Fail with [`ValidationError::Required`] when `value` is blank.
///
/// # Errors
///
/// Returns `Required { field }` for empty or whitespace-only input.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}
