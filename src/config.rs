use crate::domain::{build_rule_table, ReleaseOptions, ReleaseRule, ReleaseRules, TagPrefix};
use crate::error::{Result, SemverError};
use crate::signing::DEFAULT_SIGNING_PROGRAM;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "gitsemver.toml";
/// File name looked up in the user config directory
pub const USER_CONFIG_FILE_NAME: &str = ".gitsemver.toml";

/// Represents the complete configuration for git-semver.
///
/// Every field is optional; an empty file is equivalent to the defaults.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Branch whose head is analyzed; `HEAD` when unset
    #[serde(default)]
    pub release_branch: Option<String>,

    #[serde(default)]
    pub tag_prefix: String,

    /// Replaces the default rule table when present
    #[serde(default)]
    pub rules: Option<Vec<ReleaseRule>>,

    #[serde(default)]
    pub prerelease: PrereleaseConfig,

    #[serde(default)]
    pub build_metadata: Option<String>,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub sign: SignConfig,
}

/// Prerelease mode settings
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PrereleaseConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Defaults to "rc" when prerelease mode is on
    #[serde(default)]
    pub suffix: Option<String>,
}

fn default_remote_name() -> String {
    "origin".to_string()
}

/// Where and how release tags are pushed
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_name")]
    pub name: String,

    #[serde(default)]
    pub push: bool,

    /// Environment variable holding an access token for HTTPS remotes
    #[serde(default)]
    pub token_env: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            name: default_remote_name(),
            push: false,
            token_env: None,
        }
    }
}

fn default_signing_program() -> String {
    DEFAULT_SIGNING_PROGRAM.to_string()
}

/// Tag signing settings. Tags are signed only when a key is given.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SignConfig {
    /// Armored private key file, imported before signing
    #[serde(default)]
    pub key_path: Option<String>,

    /// Key already present in the keyring
    #[serde(default)]
    pub key_id: Option<String>,

    #[serde(default = "default_signing_program")]
    pub program: String,
}

impl Default for SignConfig {
    fn default() -> Self {
        SignConfig {
            key_path: None,
            key_id: None,
            program: default_signing_program(),
        }
    }
}

impl SignConfig {
    pub fn is_enabled(&self) -> bool {
        self.key_path.is_some() || self.key_id.is_some()
    }
}

impl Config {
    /// Rule table from `rules`, or the default table
    pub fn release_rules(&self) -> Result<ReleaseRules> {
        build_rule_table(self.rules.clone())
    }

    /// Validated prerelease and build metadata decoration
    pub fn release_options(&self) -> Result<ReleaseOptions> {
        ReleaseOptions::from_mode(
            self.prerelease.enabled,
            self.prerelease.suffix.as_deref(),
            self.build_metadata.as_deref(),
        )
    }

    pub fn tag_prefix(&self) -> TagPrefix {
        TagPrefix::new(self.tag_prefix.clone())
    }

    /// Check what can be checked without a repository
    ///
    /// Release levels of rules are not checked here: an unknown level only
    /// fails once a commit of that type is met.
    pub fn validate(&self) -> Result<()> {
        self.release_rules()?;
        self.release_options()?;

        if self.remote.name.trim().is_empty() {
            return Err(SemverError::config("Remote name cannot be empty"));
        }
        if self.sign.key_path.is_some() && self.sign.key_id.is_some() {
            return Err(SemverError::config(
                "Only one of sign.key_path and sign.key_id can be set",
            ));
        }
        Ok(())
    }
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitsemver.toml` in current directory
/// 3. `.gitsemver.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            SemverError::config(format!("Cannot read config file '{}': {}", path, e))
        })?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// JSON rule file layout: `{"rules": [{"type": "feat", "release": "minor"}]}`
///
/// The singular `rule` key is read as well.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RulesFile {
    #[serde(alias = "rule")]
    pub rules: Vec<ReleaseRule>,
}

/// Read a JSON rule file
///
/// Duplicate types are reported when the table is built, not here.
pub fn load_rules_file(path: &Path) -> Result<Vec<ReleaseRule>> {
    let content = fs::read_to_string(path).map_err(|e| {
        SemverError::config(format!("Cannot read rules file '{}': {}", path.display(), e))
    })?;
    let file: RulesFile = serde_json::from_str(&content)?;
    Ok(file.rules)
}
