use crate::analyzer::ReleaseOutcome;
use std::fmt;

/// Non-fatal conditions around the release boundary that should be reported
/// to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No new commits since the latest tag
    NoNewCommits {
        latest_tag: String,
        current_commit_hash: String,
    },
    /// Commits exist but none of them triggers a release
    NoReleasableCommits {
        latest_tag: Option<String>,
        commit_count: usize,
    },
    /// Commits whose subject does not follow the conventional grammar
    UnconventionalCommits { count: usize },
    /// Push requested together with dry-run
    PushSkipped { remote: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash,
            } => {
                let short_hash = if current_commit_hash.len() > 7 {
                    &current_commit_hash[..7]
                } else {
                    current_commit_hash.as_str()
                };
                write!(
                    f,
                    "No new commits since tag '{}' (current: {})",
                    latest_tag, short_hash
                )
            }
            BoundaryWarning::NoReleasableCommits {
                latest_tag,
                commit_count,
            } => match latest_tag {
                Some(tag) => write!(
                    f,
                    "{} commit(s) since tag '{}', none triggers a release",
                    commit_count, tag
                ),
                None => write!(
                    f,
                    "{} commit(s) and no release tag, none triggers a release",
                    commit_count
                ),
            },
            BoundaryWarning::UnconventionalCommits { count } => {
                write!(
                    f,
                    "{} commit(s) do not follow the conventional commit format and were ignored",
                    count
                )
            }
            BoundaryWarning::PushSkipped { remote } => {
                write!(f, "Dry-run is enabled, not pushing to remote '{}'", remote)
            }
        }
    }
}

/// Warnings worth showing for a computed outcome
pub fn collect_warnings(outcome: &ReleaseOutcome) -> Vec<BoundaryWarning> {
    let mut warnings = Vec::new();
    let latest_tag = outcome.previous.as_ref().map(|tag| tag.name.clone());

    if outcome.commits.is_empty() {
        if let Some(latest_tag) = latest_tag {
            warnings.push(BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash: outcome.head.to_string(),
            });
        }
        return warnings;
    }

    let unconventional = outcome
        .commits
        .iter()
        .filter(|c| c.parsed.is_unconventional() && !c.commit.is_merge())
        .count();
    if unconventional > 0 {
        warnings.push(BoundaryWarning::UnconventionalCommits {
            count: unconventional,
        });
    }

    if !outcome.new_release {
        warnings.push(BoundaryWarning::NoReleasableCommits {
            latest_tag,
            commit_count: outcome.commits.len(),
        });
    }

    warnings
}
