//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the Git operations
//! the release engine needs: read access to commits, their parents, merge
//! bases and tags, plus creating and pushing a release tag.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory commit graph for testing
//!
//! History traversal itself lives in [walker::CommitWalker], which only
//! depends on the trait.
//!
//! # Usage
//!
//! ```rust
//! # use git_semver::git::{CommitWalker, Repository};
//! # fn example<R: Repository>(repo: &R) -> git_semver::Result<()> {
//! let head = repo.resolve("HEAD")?;
//! for commit in CommitWalker::new(repo, repo.find_commit(head)?, None) {
//!     println!("{}", commit?.subject());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;
pub mod walker;

pub use mock::MockRepository;
pub use repository::Git2Repository;
pub use walker::CommitWalker;

use crate::domain::commit::split_message;
use crate::error::Result;
use crate::signing::TagSigner;
use git2::Oid;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: Oid,
    /// Full commit message: first line is the subject, the rest the body
    pub message: String,
    /// Parent commits in recorded order
    pub parents: Vec<Oid>,
    /// Committer timestamp, seconds since the epoch
    pub time: i64,
}

impl CommitInfo {
    pub fn subject(&self) -> &str {
        split_message(&self.message).0
    }

    pub fn body(&self) -> &str {
        split_message(&self.message).1
    }

    /// Abbreviated hash for display
    pub fn short_id(&self) -> String {
        short_oid(self.id)
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// A tag as listed by the repository, already peeled to its commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    pub target: Oid,
    /// Tagger time for annotated tags, commit time for lightweight ones
    pub created: i64,
}

/// Seven-character abbreviation of an object id
pub fn short_oid(oid: Oid) -> String {
    let full = oid.to_string();
    full[..7.min(full.len())].to_string()
}

/// Repository operations used by the release engine
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::SemverError] variants.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Test implementation backed by an in-memory graph
pub trait Repository {
    /// Resolve a branch name or reference (e.g. "HEAD", "main") to a commit
    ///
    /// # Returns
    /// * `Err(SemverError::UnresolvedReference)` - If the reference is absent
    fn resolve(&self, reference: &str) -> Result<Oid>;

    /// Load a commit by id
    fn find_commit(&self, oid: Oid) -> Result<CommitInfo>;

    /// Parents of a commit, in recorded order. Empty for the root commit.
    fn parents(&self, commit: &CommitInfo) -> Result<Vec<CommitInfo>> {
        commit
            .parents
            .iter()
            .map(|&parent| self.find_commit(parent))
            .collect()
    }

    /// Best common ancestors of two commits. Empty if they are unrelated.
    fn merge_base(&self, a: Oid, b: Oid) -> Result<Vec<Oid>>;

    /// All tags of the repository that point (possibly through an annotated
    /// tag object) at a commit
    fn list_tags(&self) -> Result<Vec<TagRef>>;

    /// True if `ancestor` is `descendant` or reachable from it
    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool>;

    /// Create an annotated tag pointing at `target`
    ///
    /// When a signer is given, the detached signature it produces is
    /// embedded in the tag object.
    ///
    /// # Returns
    /// * `Ok(Oid)` - Object ID of the tag object
    /// * `Err` - If the tag already exists or signing fails
    fn create_tag(
        &self,
        name: &str,
        target: Oid,
        message: &str,
        signer: Option<&dyn TagSigner>,
    ) -> Result<Oid>;

    /// Push tags to remote
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin", "upstream")
    /// * `tag_names` - Slice of tag names to push
    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()>;
}
