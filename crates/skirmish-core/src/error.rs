use thiserror::Error;

/// Startup errors. Frame stepping never fails once an arena has been built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkirmishError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Clip not found: {0}")]
    MissingClip(String),

    #[error("Skeleton not found: {0}")]
    MissingSkeleton(String),

    #[error("Invalid clip '{name}': {reason}")]
    InvalidClip { name: String, reason: String },

    #[error("Invalid skeleton: {0}")]
    InvalidSkeleton(String),
}

impl SkirmishError {
    pub fn config(message: impl Into<String>) -> Self {
        SkirmishError::InvalidConfiguration(message.into())
    }

    pub fn clip(name: impl Into<String>, reason: impl Into<String>) -> Self {
        SkirmishError::InvalidClip {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
