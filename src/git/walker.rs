//! Branch-aware history traversal.
//!
//! [`CommitWalker`] walks backwards from a start commit, newest work first,
//! without looking at timestamps:
//!
//! - a commit with one parent continues into that parent;
//! - at a merge, the first parent stays the mainline and is resumed last,
//!   every other parent opens a side branch bounded by its nearest merge
//!   base with a sibling queued before it (most recent sibling first);
//! - the most recently opened side branch is always drained first, and
//!   stops just before its boundary commit;
//! - reaching a root commit ends the whole walk.
//!
//! Pending branches live in an explicit stack, so deep histories do not
//! grow the call stack.

use crate::error::{Result, SemverError};
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use tracing::trace;

#[derive(Debug)]
struct QueueEntry {
    current: CommitInfo,
    /// Commit at which this branch stops, not yielded
    end: Option<Oid>,
}

/// Lazy, non-restartable commit sequence over a [`Repository`].
///
/// Dropping the walker early is always fine; it only holds in-memory state.
/// After an error the walker is exhausted.
pub struct CommitWalker<'r, R: Repository + ?Sized> {
    repo: &'r R,
    queue: Vec<QueueEntry>,
    /// Queue slot that produced the last yielded commit
    last_top: Option<usize>,
}

impl<'r, R: Repository + ?Sized> CommitWalker<'r, R> {
    /// Start a walk at `start`, stopping the mainline at `boundary` if given.
    ///
    /// When `start` is the boundary itself nothing is yielded.
    pub fn new(repo: &'r R, start: CommitInfo, boundary: Option<Oid>) -> Self {
        let queue = if boundary == Some(start.id) {
            Vec::new()
        } else {
            vec![QueueEntry {
                current: start,
                end: boundary,
            }]
        };

        CommitWalker {
            repo,
            queue,
            last_top: None,
        }
    }

    /// Number of branches still waiting to be walked
    pub fn pending_branches(&self) -> usize {
        self.queue.len()
    }

    /// Drop everything behind the last yielded commit.
    ///
    /// The branch it came from stops and every side branch opened at it is
    /// discarded; other pending branches are kept.
    pub fn prune_branch(&mut self) {
        if let Some(top) = self.last_top.take() {
            self.queue.truncate(top);
        }
    }

    fn advance(&mut self) -> Result<Option<CommitInfo>> {
        self.last_top = None;
        let Some(top) = self.queue.len().checked_sub(1) else {
            return Ok(None);
        };
        self.last_top = Some(top);

        let current = self.queue[top].current.clone();
        let end = self.queue[top].end;
        let parents = self.repo.parents(&current)?;

        if parents.is_empty() {
            // single root: nothing older exists on any pending branch
            self.queue.clear();
            return Ok(Some(current));
        }

        let mut reached_end = false;
        let mut siblings: Vec<Oid> = Vec::with_capacity(parents.len());

        for (index, parent) in parents.into_iter().enumerate() {
            if index == 0 {
                reached_end = end == Some(parent.id);
                siblings.push(parent.id);
                self.queue[top].current = parent;
                continue;
            }

            if end == Some(parent.id) {
                // the boundary merged back in: nothing to walk on that side
                siblings.push(parent.id);
                continue;
            }

            let base = self
                .nearest_merge_base(parent.id, &siblings)?
                .ok_or_else(|| SemverError::MissingMergeBase {
                    merge: current.id.to_string(),
                    parent: parent.id.to_string(),
                })?;

            trace!(
                merge = %current.id,
                parent = %parent.id,
                boundary = %base,
                "queueing side branch"
            );

            siblings.push(parent.id);
            self.queue.push(QueueEntry {
                current: parent,
                end: Some(base),
            });
        }

        if reached_end {
            self.queue.remove(top);
        }

        Ok(Some(current))
    }

    fn nearest_merge_base(&self, parent: Oid, siblings: &[Oid]) -> Result<Option<Oid>> {
        for &sibling in siblings.iter().rev() {
            if let Some(&base) = self.repo.merge_base(parent, sibling)?.first() {
                return Ok(Some(base));
            }
        }
        Ok(None)
    }
}

impl<R: Repository + ?Sized> Iterator for CommitWalker<'_, R> {
    type Item = Result<CommitInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(commit) => commit.map(Ok),
            Err(e) => {
                self.queue.clear();
                Some(Err(e))
            }
        }
    }
}
