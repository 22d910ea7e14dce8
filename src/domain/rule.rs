//! Release rules: which commit types trigger which kind of release.

use crate::domain::VersionBump;
use crate::error::{Result, SemverError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps a commit type to a release level ("major", "minor" or "patch").
///
/// The release level is kept as written in configuration; it is only
/// interpreted when a commit of that type is actually met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRule {
    #[serde(rename = "type")]
    pub commit_type: String,
    pub release: String,
}

impl ReleaseRule {
    pub fn new(commit_type: impl Into<String>, release: impl Into<String>) -> Self {
        ReleaseRule {
            commit_type: commit_type.into(),
            release: release.into(),
        }
    }
}

/// Returns the default rules: `feat` is minor, `fix` and `perf` are patch.
pub fn default_rules() -> Vec<ReleaseRule> {
    vec![
        ReleaseRule::new("feat", "minor"),
        ReleaseRule::new("fix", "patch"),
        ReleaseRule::new("perf", "patch"),
    ]
}

/// Release rule table keyed by commit type, one rule per type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRules {
    rules: Vec<ReleaseRule>,
    index: HashMap<String, usize>,
}

impl ReleaseRules {
    /// Build a table, rejecting any commit type listed more than once
    pub fn new(rules: Vec<ReleaseRule>) -> Result<Self> {
        let mut index = HashMap::with_capacity(rules.len());

        for (position, rule) in rules.iter().enumerate() {
            if index.insert(rule.commit_type.clone(), position).is_some() {
                return Err(SemverError::DuplicateRule(rule.commit_type.clone()));
            }
        }

        Ok(ReleaseRules { rules, index })
    }

    /// Rules in the order they were given
    pub fn rules(&self) -> &[ReleaseRule] {
        &self.rules
    }

    pub fn get(&self, commit_type: &str) -> Option<&ReleaseRule> {
        self.index.get(commit_type).map(|&i| &self.rules[i])
    }

    /// Bump implied by a commit type.
    ///
    /// Unknown types give `Ok(None)`. A rule whose release level is not
    /// major, minor or patch is an error.
    pub fn bump_for(&self, commit_type: &str) -> Result<Option<VersionBump>> {
        let Some(rule) = self.get(commit_type) else {
            return Ok(None);
        };

        rule.release
            .parse::<VersionBump>()
            .map(Some)
            .map_err(|_| SemverError::UnknownReleaseType {
                commit_type: rule.commit_type.clone(),
                release: rule.release.clone(),
            })
    }
}

impl Default for ReleaseRules {
    fn default() -> Self {
        let rules = default_rules();
        let index = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (rule.commit_type.clone(), i))
            .collect();
        ReleaseRules { rules, index }
    }
}

/// Build a rule table from caller overrides, or the defaults when `None`
pub fn build_rule_table(overrides: Option<Vec<ReleaseRule>>) -> Result<ReleaseRules> {
    match overrides {
        Some(rules) => ReleaseRules::new(rules),
        None => Ok(ReleaseRules::default()),
    }
}
