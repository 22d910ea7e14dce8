//! Release tag signing
//!
//! Signing shells out to an OpenPGP program (`gpg` by default) rather than
//! linking a crypto library. The program must be on `PATH` or given as a path.

use crate::error::{Result, SemverError};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Default OpenPGP program
pub const DEFAULT_SIGNING_PROGRAM: &str = "gpg";

/// Produces a detached, ASCII-armored signature over a tag object
pub trait TagSigner {
    fn sign(&self, content: &[u8]) -> Result<String>;
}

/// Signs through an external gpg-compatible program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpgSigner {
    key_id: String,
    program: String,
}

impl GpgSigner {
    pub fn new(key_id: impl Into<String>, program: impl Into<String>) -> Self {
        GpgSigner {
            key_id: key_id.into(),
            program: program.into(),
        }
    }

    /// Import an armored private key file and sign with it
    ///
    /// The key's fingerprint is read before import and used as the signing
    /// identity, so it does not matter what else is in the keyring.
    ///
    /// # Returns
    /// * `Err(SemverError::Sign)` - If the file is missing, holds no key, or
    ///   the program cannot import it
    pub fn from_key_file(path: &Path, program: impl Into<String>) -> Result<Self> {
        let program = program.into();

        if !path.exists() {
            return Err(SemverError::sign(format!(
                "Signing key not found: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(SemverError::sign(format!(
                "Signing key path is not a file: {}",
                path.display()
            )));
        }

        let listing = run(
            Command::new(&program)
                .args(["--batch", "--with-colons", "--import-options", "show-only", "--import"])
                .arg(path),
            &program,
        )?;
        let fingerprint = parse_fingerprint(&listing).ok_or_else(|| {
            SemverError::sign(format!("No key found in {}", path.display()))
        })?;

        run(
            Command::new(&program).args(["--batch", "--import"]).arg(path),
            &program,
        )?;
        debug!(fingerprint = %fingerprint, "imported signing key");

        Ok(GpgSigner::new(fingerprint, program))
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl TagSigner for GpgSigner {
    fn sign(&self, content: &[u8]) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(["--batch", "--yes", "--detach-sign", "--armor", "--local-user"])
            .arg(&self.key_id)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SemverError::sign(format!("Failed to run {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(content)
                .map_err(|e| SemverError::sign(format!("Failed to write to {}: {}", self.program, e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| SemverError::sign(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(SemverError::sign(format!(
                "{} exited with code {}: {}",
                self.program,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let signature = String::from_utf8_lossy(&output.stdout).into_owned();
        if signature.trim().is_empty() {
            return Err(SemverError::sign(format!("{} produced no signature", self.program)));
        }

        Ok(signature)
    }
}

fn run(cmd: &mut Command, program: &str) -> Result<String> {
    let output = cmd
        .output()
        .map_err(|e| SemverError::sign(format!("Failed to run {}: {}", program, e)))?;

    if !output.status.success() {
        return Err(SemverError::sign(format!(
            "{} exited with code {}: {}",
            program,
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// First fingerprint in `--with-colons` output
fn parse_fingerprint(listing: &str) -> Option<String> {
    listing
        .lines()
        .filter(|line| line.starts_with("fpr:"))
        .find_map(|line| line.split(':').nth(9))
        .filter(|fpr| !fpr.is_empty())
        .map(str::to_string)
}
