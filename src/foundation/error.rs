/// Convenience result type used across menugraph.
pub type MenuGraphResult<T> = Result<T, MenuGraphError>;

/// Top-level error taxonomy used by generator APIs.
///
/// Only fatal conditions are represented here. Unresolved items and missing remoting data degrade
/// per item and surface as warnings in [`crate::RunStats`].
#[derive(thiserror::Error, Debug)]
pub enum MenuGraphError {
    /// Invalid user-provided project, address tree or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Two toggles disagree on the value they drive for the same animated property.
    #[error(
        "authoring conflict on {property}: '{first}' and '{second}' disagree ({detail})"
    )]
    AuthoringConflict {
        /// Human-readable `object:property` key.
        property: String,
        /// Display name of the first contributor.
        first: String,
        /// Display name of the disagreeing contributor.
        second: String,
        /// Which values differ.
        detail: String,
    },

    /// Two generated resources ended up with the same identity.
    #[error("identity collision: {0}")]
    Identity(String),

    /// A generation run was requested while another one is in progress.
    #[error("a generation run is already in progress")]
    Busy,

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MenuGraphError {
    /// Build a [`MenuGraphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MenuGraphError::Identity`] value.
    pub fn identity(msg: impl Into<String>) -> Self {
        Self::Identity(msg.into())
    }

    /// Build a [`MenuGraphError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`MenuGraphError::AuthoringConflict`] value.
    pub fn conflict(
        property: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::AuthoringConflict {
            property: property.into(),
            first: first.into(),
            second: second.into(),
            detail: detail.into(),
        }
    }

    /// `true` for the authoring-conflict class.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AuthoringConflict { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
