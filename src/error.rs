use thiserror::Error;

/// Unified error type for git-semver operations
#[derive(Error, Debug)]
pub enum SemverError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate release rule for commit type '{0}'")]
    DuplicateRule(String),

    #[error("Unknown release type '{release}' for commit type '{commit_type}'")]
    UnknownReleaseType {
        commit_type: String,
        release: String,
    },

    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("No history: {0}")]
    NoHistory(String),

    #[error("Could not find merge base of {merge} and {parent}")]
    MissingMergeBase { merge: String, parent: String },

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Signing failed: {0}")]
    Sign(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in git-semver
pub type Result<T> = std::result::Result<T, SemverError>;

impl SemverError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemverError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SemverError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        SemverError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        SemverError::Remote(msg.into())
    }

    /// Create a signing error with context
    pub fn sign(msg: impl Into<String>) -> Self {
        SemverError::Sign(msg.into())
    }

    /// Create an output error with context
    pub fn output(msg: impl Into<String>) -> Self {
        SemverError::Output(msg.into())
    }

    /// Errors caused by user-supplied configuration rather than repository state
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SemverError::Config(_)
                | SemverError::DuplicateRule(_)
                | SemverError::UnknownReleaseType { .. }
                | SemverError::Toml(_)
                | SemverError::Json(_)
        )
    }
}
