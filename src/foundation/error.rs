/// Convenience result type used across poseplay.
pub type PoseplayResult<T> = Result<T, PoseplayError>;

/// Top-level error taxonomy used by library APIs.
///
/// Data-shape problems inside otherwise usable input are repaired and logged rather than
/// returned; these variants cover the cases where an operation cannot produce meaningful output.
#[derive(thiserror::Error, Debug)]
pub enum PoseplayError {
    /// Invalid user-provided data, definitions or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Structurally unusable animations (no frames, bad frame rate).
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while sampling an animation at a point in time.
    #[error("sampling error: {0}")]
    Sampling(String),

    /// Errors while retargeting detector output onto the skeleton.
    #[error("retarget error: {0}")]
    Retarget(String),

    /// Errors when serializing or deserializing interchange documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PoseplayError {
    /// Build a [`PoseplayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PoseplayError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`PoseplayError::Sampling`] value.
    pub fn sampling(msg: impl Into<String>) -> Self {
        Self::Sampling(msg.into())
    }

    /// Build a [`PoseplayError::Retarget`] value.
    pub fn retarget(msg: impl Into<String>) -> Self {
        Self::Retarget(msg.into())
    }

    /// Build a [`PoseplayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PoseplayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
