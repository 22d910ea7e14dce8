// Shared helpers for integration tests: real repositories in temp dirs.
#![allow(dead_code)]

use git2::{Oid, Repository, Signature, Time};
use git_semver::git::Git2Repository;
use std::cell::Cell;
use std::path::Path;
use tempfile::TempDir;

const BASE_TIME: i64 = 1_700_000_000;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Git2Repository,
    clock: Cell<i64>,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        TestRepo {
            dir,
            repo: Git2Repository::from_git2(repo),
            clock: Cell::new(BASE_TIME),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git(&self) -> &Repository {
        self.repo.inner()
    }

    fn signature(&self) -> Signature<'static> {
        let now = self.clock.get() + 60;
        self.clock.set(now);
        Signature::new("Test User", "test@example.com", &Time::new(now, 0))
            .expect("Could not create signature")
    }

    /// Commit an empty tree with explicit parents, without moving any ref
    pub fn commit(&self, message: &str, parents: &[Oid]) -> Oid {
        let git = self.git();
        let sig = self.signature();
        let tree_id = git
            .treebuilder(None)
            .expect("Could not create tree builder")
            .write()
            .expect("Could not write tree");
        let tree = git.find_tree(tree_id).expect("Could not find tree");
        let parents: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| git.find_commit(*oid).expect("Could not find parent"))
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

        git.commit(None, &sig, &sig, message, &tree, &parent_refs)
            .expect("Could not create commit")
    }

    /// Commit on top of HEAD and move HEAD's branch
    pub fn commit_on_head(&self, message: &str) -> Oid {
        let parents: Vec<Oid> = match self.git().head() {
            Ok(head) => head.target().into_iter().collect(),
            Err(_) => vec![],
        };
        let oid = self.commit(message, &parents);
        let head = self.git().find_reference("HEAD").expect("HEAD exists");
        let branch = head
            .symbolic_target()
            .expect("HEAD is symbolic")
            .to_string();
        self.git()
            .reference(&branch, oid, true, message)
            .expect("Could not move branch");
        oid
    }

    /// Point a branch at a commit
    pub fn branch(&self, name: &str, oid: Oid) {
        self.git()
            .reference(&format!("refs/heads/{}", name), oid, true, "branch")
            .expect("Could not create branch");
    }

    pub fn checkout(&self, name: &str) {
        self.git()
            .set_head(&format!("refs/heads/{}", name))
            .expect("Could not set HEAD");
    }

    /// Annotated tag on a commit
    pub fn tag(&self, name: &str, oid: Oid) {
        let git = self.git();
        let object = git.find_object(oid, None).expect("Could not find object");
        git.tag(name, &object, &self.signature(), name, false)
            .expect("Could not create tag");
    }

    pub fn lightweight_tag(&self, name: &str, oid: Oid) {
        let git = self.git();
        let object = git.find_object(oid, None).expect("Could not find object");
        git.tag_lightweight(name, &object, false)
            .expect("Could not create tag");
    }
}
