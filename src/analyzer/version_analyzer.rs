use crate::analyzer::tag_locator::locate_latest_release;
use crate::domain::{
    classify_commit, ParsedCommit, ReleaseOptions, ReleaseRules, ReleaseTag, TagPrefix, Version,
    VersionBump,
};
use crate::error::{Result, SemverError};
use crate::git::{CommitInfo, CommitWalker, Repository};
use git2::Oid;
use tracing::{debug, info, trace};

/// Reference walked when no release branch is configured
pub const DEFAULT_TARGET: &str = "HEAD";

/// A walked commit together with what it contributes to the release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedCommit {
    pub commit: CommitInfo,
    pub parsed: ParsedCommit,
    /// Effective bump: `Major` for breaking changes, else the rule table's
    pub bump: Option<VersionBump>,
}

/// Result of a version computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// Next version when `new_release`, otherwise the baseline unchanged
    pub version: Version,
    pub new_release: bool,
    /// Commit the target resolved to
    pub head: Oid,
    /// Latest release reachable from the target, if any
    pub previous: Option<ReleaseTag>,
    /// Strongest bump found across the walked commits
    pub bump: Option<VersionBump>,
    /// Commits since the previous release, in walk order
    pub commits: Vec<AnalyzedCommit>,
}

/// Computes the next semantic version of a branch
///
/// Locates the latest release tag, walks the branch history down to it,
/// classifies every commit and applies a single increment at the strongest
/// bump level found.
pub struct VersionComputer<'a> {
    rules: &'a ReleaseRules,
    prefix: &'a TagPrefix,
    options: &'a ReleaseOptions,
}

impl<'a> VersionComputer<'a> {
    /// Create a new version computer
    pub fn new(rules: &'a ReleaseRules, prefix: &'a TagPrefix, options: &'a ReleaseOptions) -> Self {
        VersionComputer {
            rules,
            prefix,
            options,
        }
    }

    /// Compute the next version of `target` (a branch or reference name)
    ///
    /// # Returns
    /// * `Err(SemverError::NoHistory)` - If the target cannot be resolved,
    ///   e.g. an unborn `HEAD`
    /// * `Err(SemverError::UnknownReleaseType)` - If a walked commit hits a
    ///   rule with an unrecognized release level
    /// * `Err(SemverError::MissingMergeBase)` - If a merge cannot be walked
    pub fn compute<R: Repository + ?Sized>(&self, repo: &R, target: &str) -> Result<ReleaseOutcome> {
        let head = match repo.resolve(target) {
            Ok(oid) => oid,
            Err(SemverError::UnresolvedReference(reason)) => {
                return Err(SemverError::NoHistory(format!(
                    "cannot resolve '{}' ({})",
                    target, reason
                )));
            }
            Err(e) => return Err(e),
        };
        let head_commit = repo.find_commit(head)?;

        let previous = locate_latest_release(repo, self.prefix, head)?;
        let boundary = previous.as_ref().map(|tag| tag.commit);
        let baseline = previous
            .as_ref()
            .map(|tag| tag.version.clone())
            .unwrap_or_default();
        debug!(reference = target, head = %head, baseline = %baseline, "walking history");

        let mut strongest: Option<VersionBump> = None;
        let mut commits = Vec::new();

        let mut walker = CommitWalker::new(repo, head_commit, boundary);
        while let Some(commit) = walker.next() {
            let commit = commit?;

            // side branches may reach below the release they were merged after;
            // everything behind such a commit is released too
            if let Some(boundary) = boundary {
                if repo.is_ancestor(commit.id, boundary)? {
                    trace!(commit = %commit.id, "already released, pruning branch");
                    walker.prune_branch();
                    continue;
                }
            }

            let parsed = classify_commit(commit.subject(), commit.body());
            let nominal = self.rules.bump_for(&parsed.r#type)?;
            let bump = if parsed.is_breaking_change {
                Some(VersionBump::Major)
            } else {
                nominal
            };

            trace!(
                commit = %commit.short_id(),
                kind = %parsed.r#type,
                breaking = parsed.is_breaking_change,
                bump = ?bump,
                "classified commit"
            );

            strongest = strongest.max(bump);
            commits.push(AnalyzedCommit {
                commit,
                parsed,
                bump,
            });
        }

        debug!(commits = commits.len(), bump = ?strongest, "classified commits");

        let outcome = match strongest {
            None => ReleaseOutcome {
                version: baseline,
                new_release: false,
                head,
                previous,
                bump: None,
                commits,
            },
            Some(bump) => {
                let next = if previous.is_none() {
                    Version::initial(bump)
                } else {
                    baseline.bump(bump)?
                };

                ReleaseOutcome {
                    version: self.options.decorate(next),
                    new_release: true,
                    head,
                    previous,
                    bump: Some(bump),
                    commits,
                }
            }
        };

        if outcome.new_release {
            info!(version = %outcome.version, "new release found");
        } else {
            info!(version = %outcome.version, "no new release");
        }

        Ok(outcome)
    }
}

/// Compute the next version of `target`, or of `HEAD` when `None`
pub fn compute_next_version<R: Repository + ?Sized>(
    repo: &R,
    rules: &ReleaseRules,
    prefix: &TagPrefix,
    options: &ReleaseOptions,
    target: Option<&str>,
) -> Result<ReleaseOutcome> {
    VersionComputer::new(rules, prefix, options).compute(repo, target.unwrap_or(DEFAULT_TARGET))
}
