//! Machine-readable output: the `--json` report and the CI output file.

use crate::domain::Version;
use crate::error::{Result, SemverError};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Environment variable naming the CI step output file
pub const CI_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

pub const MESSAGE_NEW_RELEASE: &str = "new release found";
pub const MESSAGE_DRY_RUN: &str = "new release found, dry-run is enabled";
pub const MESSAGE_NO_RELEASE: &str = "no new release";

/// Single JSON object printed on stdout with `--json`
///
/// `new-version` is set when a release was tagged, `next-version` when it
/// would have been (dry-run). Neither is present without a new release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct JsonReport {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_version: Option<String>,
    pub new_release: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl JsonReport {
    pub fn new_release(version: &Version, tag: &str) -> Self {
        JsonReport {
            message: MESSAGE_NEW_RELEASE.to_string(),
            new_version: Some(version.to_string()),
            next_version: None,
            new_release: true,
            tag: Some(tag.to_string()),
        }
    }

    pub fn dry_run(version: &Version, tag: &str) -> Self {
        JsonReport {
            message: MESSAGE_DRY_RUN.to_string(),
            new_version: None,
            next_version: Some(version.to_string()),
            new_release: true,
            tag: Some(tag.to_string()),
        }
    }

    pub fn no_release() -> Self {
        JsonReport {
            message: MESSAGE_NO_RELEASE.to_string(),
            new_version: None,
            next_version: None,
            new_release: false,
            tag: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Append `SEMVER=` and `NEW_RELEASE=` lines to a CI output file
///
/// The file must already be writable; failing to write it is an error since
/// later pipeline steps depend on these values.
pub fn write_ci_output(path: &Path, version: &Version, new_release: bool) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| {
            SemverError::output(format!("Cannot open {}: {}", path.display(), e))
        })?;

    writeln!(file, "SEMVER={}", version)
        .and_then(|_| writeln!(file, "NEW_RELEASE={}", new_release))
        .map_err(|e| SemverError::output(format!("Cannot write {}: {}", path.display(), e)))?;

    Ok(())
}
