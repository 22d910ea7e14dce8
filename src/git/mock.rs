use crate::error::{Result, SemverError};
use crate::git::{CommitInfo, Repository, TagRef};
use crate::signing::TagSigner;
use git2::Oid;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

const BASE_TIME: i64 = 1_700_000_000;

/// A tag created through [`Repository::create_tag`] on a [`MockRepository`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    pub name: String,
    pub target: Oid,
    pub message: String,
    pub signature: Option<String>,
}

/// Mock repository for testing without actual git operations
///
/// Holds an in-memory commit graph. Commits added through
/// [`MockRepository::commit`] get sequential ids and strictly increasing
/// timestamps, and move `HEAD`.
pub struct MockRepository {
    commits: HashMap<Oid, CommitInfo>,
    refs: HashMap<String, Oid>,
    tags: RefCell<Vec<TagRef>>,
    created: RefCell<Vec<CreatedTag>>,
    pushed: RefCell<Vec<(String, Vec<String>)>>,
    reject_push: bool,
    counter: u32,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            refs: HashMap::new(),
            tags: RefCell::new(Vec::new()),
            created: RefCell::new(Vec::new()),
            pushed: RefCell::new(Vec::new()),
            reject_push: false,
            counter: 0,
        }
    }

    /// Add a commit with the given parents and point `HEAD` at it
    pub fn commit(&mut self, message: &str, parents: &[Oid]) -> Oid {
        self.counter += 1;
        let mut bytes = [0u8; 20];
        bytes[..4].copy_from_slice(&self.counter.to_be_bytes());
        bytes[19] = 1;
        // from_bytes only fails on a wrong length
        let id = Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero());

        self.commits.insert(
            id,
            CommitInfo {
                id,
                message: message.to_string(),
                parents: parents.to_vec(),
                time: BASE_TIME + i64::from(self.counter) * 60,
            },
        );
        self.refs.insert("HEAD".to_string(), id);
        id
    }

    /// Point a branch (or `HEAD`) at a commit
    pub fn set_ref(&mut self, name: impl Into<String>, oid: Oid) {
        self.refs.insert(name.into(), oid);
    }

    /// Tag a commit, using the commit time as creation time
    pub fn add_tag(&mut self, name: impl Into<String>, target: Oid) {
        let created = self.commits.get(&target).map(|c| c.time).unwrap_or(BASE_TIME);
        self.add_tag_at(name, target, created);
    }

    /// Tag a commit with an explicit creation time
    pub fn add_tag_at(&mut self, name: impl Into<String>, target: Oid, created: i64) {
        self.tags.get_mut().push(TagRef {
            name: name.into(),
            target,
            created,
        });
    }

    /// Make every push fail with a remote error
    pub fn reject_pushes(&mut self) {
        self.reject_push = true;
    }

    /// Tags created through the repository interface
    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.created.borrow().clone()
    }

    /// Pushes performed, as (remote, tag names)
    pub fn pushed(&self) -> Vec<(String, Vec<String>)> {
        self.pushed.borrow().clone()
    }

    fn commit_ref(&self, oid: Oid) -> Result<&CommitInfo> {
        self.commits
            .get(&oid)
            .ok_or_else(|| SemverError::Git(git2::Error::from_str(&format!("commit {} not found", oid))))
    }

    /// `oid` and everything reachable from it
    fn ancestors(&self, oid: Oid) -> Result<HashSet<Oid>> {
        let mut seen = HashSet::new();
        let mut stack = vec![oid];
        while let Some(next) = stack.pop() {
            if seen.insert(next) {
                stack.extend(self.commit_ref(next)?.parents.iter().copied());
            }
        }
        Ok(seen)
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn resolve(&self, reference: &str) -> Result<Oid> {
        self.refs
            .get(reference)
            .copied()
            .ok_or_else(|| SemverError::UnresolvedReference(reference.to_string()))
    }

    fn find_commit(&self, oid: Oid) -> Result<CommitInfo> {
        self.commit_ref(oid).cloned()
    }

    fn merge_base(&self, a: Oid, b: Oid) -> Result<Vec<Oid>> {
        let left = self.ancestors(a)?;
        let right = self.ancestors(b)?;
        let common: Vec<Oid> = left.intersection(&right).copied().collect();

        // keep only common ancestors that no other common ancestor descends from
        let mut best = Vec::new();
        for &candidate in &common {
            let mut dominated = false;
            for &other in &common {
                if other != candidate && self.ancestors(other)?.contains(&candidate) {
                    dominated = true;
                    break;
                }
            }
            if !dominated {
                best.push(candidate);
            }
        }

        best.sort_by_key(|oid| {
            let time = self.commits.get(oid).map(|c| c.time).unwrap_or_default();
            (std::cmp::Reverse(time), *oid)
        });
        Ok(best)
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.borrow().clone())
    }

    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        Ok(self.ancestors(descendant)?.contains(&ancestor))
    }

    fn create_tag(
        &self,
        name: &str,
        target: Oid,
        message: &str,
        signer: Option<&dyn TagSigner>,
    ) -> Result<Oid> {
        if self.tags.borrow().iter().any(|t| t.name == name) {
            return Err(SemverError::tag(format!("Tag '{}' already exists", name)));
        }
        let created = self.commit_ref(target)?.time;
        let signature = signer.map(|s| s.sign(message.as_bytes())).transpose()?;

        self.tags.borrow_mut().push(TagRef {
            name: name.to_string(),
            target,
            created,
        });
        self.created.borrow_mut().push(CreatedTag {
            name: name.to_string(),
            target,
            message: message.to_string(),
            signature,
        });

        Ok(Oid::hash_object(git2::ObjectType::Tag, name.as_bytes())?)
    }

    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()> {
        if self.reject_push {
            return Err(SemverError::remote(format!("Remote '{}' rejected push", remote)));
        }
        self.pushed.borrow_mut().push((
            remote.to_string(),
            tag_names.iter().map(|s| s.to_string()).collect(),
        ));
        Ok(())
    }
}
