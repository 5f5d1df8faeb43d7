//! # Manifest Errors
//!
//! Failure causes raised by catalog assets. The engine wraps them in
//! `TesseraError::Load` or `TesseraError::Generate` together with the
//! asset name.

use thiserror::Error;

/// Errors raised while loading or generating catalog assets.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The install config is an input and cannot be synthesized.
    #[error("{file} is required and was not found in the asset directory")]
    MissingInstallConfig { file: &'static str },

    /// The install config parsed but holds unusable values.
    #[error("invalid install config: {field}: {reason}")]
    InvalidInstallConfig { field: &'static str, reason: String },

    /// YAML could not be parsed.
    #[error("failed to parse {file}: {reason}")]
    Parse { file: String, reason: String },

    /// A manifest could not be rendered as YAML.
    #[error("failed to render {file}: {reason}")]
    Render { file: &'static str, reason: String },
}

impl ManifestError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInstallConfig {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ManifestError::invalid("metadata.name", "must not be empty");
        assert_eq!(
            err.to_string(),
            "invalid install config: metadata.name: must not be empty"
        );
    }
}
