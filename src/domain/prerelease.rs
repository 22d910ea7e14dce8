//! Pre-release and build metadata decoration for computed versions
//!
//! According to semver.org: https://semver.org/#spec-item-9 and
//! https://semver.org/#spec-item-10

use crate::domain::Version;
use crate::error::{Result, SemverError};

/// Suffix used when prerelease mode is on and no suffix was given
pub const DEFAULT_PRERELEASE_SUFFIX: &str = "rc";

/// Optional decoration applied to a computed release version.
///
/// Fields are validated once at construction, so a built value always
/// formats to a valid semantic version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseOptions {
    prerelease: Option<String>,
    build_metadata: Option<String>,
}

impl ReleaseOptions {
    /// Create release options
    ///
    /// # Arguments
    /// * `prerelease` - Pre-release identifier such as `rc` or `beta.1`
    /// * `build_metadata` - Build metadata such as `sha.5114f85`
    ///
    /// # Returns
    /// * `Err` - If either value is empty or not a dot-separated list of
    ///   `[0-9A-Za-z-]` identifiers
    pub fn new(prerelease: Option<&str>, build_metadata: Option<&str>) -> Result<Self> {
        let prerelease = prerelease.map(validate_prerelease).transpose()?;
        let build_metadata = build_metadata.map(validate_build_metadata).transpose()?;

        Ok(ReleaseOptions {
            prerelease,
            build_metadata,
        })
    }

    /// Options from a prerelease mode switch and an optional suffix.
    ///
    /// The suffix is ignored unless `prerelease_mode` is set; when it is set
    /// without a suffix, [`DEFAULT_PRERELEASE_SUFFIX`] is used.
    pub fn from_mode(
        prerelease_mode: bool,
        suffix: Option<&str>,
        build_metadata: Option<&str>,
    ) -> Result<Self> {
        let prerelease = prerelease_mode.then(|| suffix.unwrap_or(DEFAULT_PRERELEASE_SUFFIX));
        Self::new(prerelease, build_metadata)
    }

    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    pub fn build_metadata(&self) -> Option<&str> {
        self.build_metadata.as_deref()
    }

    /// Apply the configured decoration, prerelease before build metadata
    pub fn decorate(&self, mut version: Version) -> Version {
        version.prerelease = self.prerelease.clone();
        version.build = self.build_metadata.clone();
        version
    }
}

fn validate_prerelease(s: &str) -> Result<String> {
    if s.is_empty() {
        return Err(SemverError::version("Empty pre-release identifier"));
    }
    semver::Prerelease::new(s)
        .map(|pre| pre.to_string())
        .map_err(|e| SemverError::version(format!("Invalid pre-release identifier '{}': {}", s, e)))
}

fn validate_build_metadata(s: &str) -> Result<String> {
    if s.is_empty() {
        return Err(SemverError::version("Empty build metadata"));
    }
    semver::BuildMetadata::new(s)
        .map(|build| build.to_string())
        .map_err(|e| SemverError::version(format!("Invalid build metadata '{}': {}", s, e)))
}
