mod common;

use common::TestRepo;
use git_semver::analyzer::compute_next_version;
use git_semver::domain::{build_rule_table, ReleaseOptions, ReleaseRule, ReleaseRules, TagPrefix};
use git_semver::git::{Git2Repository, Repository};
use git_semver::SemverError;

fn next_version(repo: &TestRepo) -> (String, bool) {
    next_version_with(repo, &TagPrefix::default(), &ReleaseOptions::default())
}

fn next_version_with(repo: &TestRepo, prefix: &TagPrefix, options: &ReleaseOptions) -> (String, bool) {
    let outcome = compute_next_version(&repo.repo, &ReleaseRules::default(), prefix, options, None)
        .expect("Should compute next version");
    (outcome.version.to_string(), outcome.new_release)
}

#[test]
fn test_untagged_repository_without_release() {
    let repo = TestRepo::new();
    repo.commit_on_head("commit that does not trigger a release");

    assert_eq!(next_version(&repo), ("0.0.0".to_string(), false));
}

#[test]
fn test_untagged_repository_patch_release() {
    let repo = TestRepo::new();
    repo.commit_on_head("fix: commit that triggers a patch release");

    assert_eq!(next_version(&repo), ("0.0.1".to_string(), true));
}

#[test]
fn test_untagged_repository_minor_release() {
    let repo = TestRepo::new();
    repo.commit_on_head("feat: commit that triggers a minor release");

    assert_eq!(next_version(&repo), ("0.1.0".to_string(), true));
}

#[test]
fn test_untagged_repository_major_release() {
    let repo = TestRepo::new();
    repo.commit_on_head("feat!: commit that triggers a major release");
    repo.commit_on_head("fix: added hello feature");

    assert_eq!(next_version(&repo), ("1.0.0".to_string(), true));
}

#[test]
fn test_tagged_repository() {
    let repo = TestRepo::new();
    let first = repo.commit_on_head("First commit");
    repo.tag("1.0.0", first);
    repo.commit_on_head("fix: y");
    assert_eq!(next_version(&repo), ("1.0.1".to_string(), true));

    repo.commit_on_head("feat: x");
    assert_eq!(next_version(&repo), ("1.1.0".to_string(), true));
}

#[test]
fn test_latest_tag_by_precedence() {
    let repo = TestRepo::new();
    let c1 = repo.commit_on_head("First commit");
    repo.tag("2.0.0", c1);
    let c2 = repo.commit_on_head("chore: a");
    repo.lightweight_tag("2.0.1", c2);
    let c3 = repo.commit_on_head("chore: b");
    repo.tag("3.0.0", c3);
    let c4 = repo.commit_on_head("chore: c");
    repo.tag("2.5.0", c4);
    let c5 = repo.commit_on_head("chore: d");
    repo.tag("0.1.0", c5);
    repo.commit_on_head("fix: e");

    let outcome = compute_next_version(
        &repo.repo,
        &ReleaseRules::default(),
        &TagPrefix::default(),
        &ReleaseOptions::default(),
        None,
    )
    .expect("Should compute next version");
    assert_eq!(outcome.previous.expect("has baseline").name, "3.0.0");
    assert_eq!(outcome.version.to_string(), "3.0.1");
    // walk stops at the 3.0.0 commit
    assert_eq!(outcome.commits.len(), 3);
}

#[test]
fn test_tag_prefix() {
    let repo = TestRepo::new();
    let first = repo.commit_on_head("First commit");
    repo.tag("v0.4.1", first);
    repo.tag("release-9.9.9", first);
    repo.commit_on_head("feat: x");

    let (version, new_release) =
        next_version_with(&repo, &TagPrefix::new("v"), &ReleaseOptions::default());
    assert_eq!(version, "0.5.0");
    assert!(new_release);
}

#[test]
fn test_prerelease_and_build_metadata() {
    let repo = TestRepo::new();
    let first = repo.commit_on_head("First commit");
    repo.tag("1.0.0", first);
    repo.commit_on_head("fix: y");

    let options = ReleaseOptions::new(Some("rc"), Some("abc")).expect("valid options");
    let (version, _) = next_version_with(&repo, &TagPrefix::default(), &options);
    assert_eq!(version, "1.0.1-rc+abc");
}

#[test]
fn test_head_on_tag_is_no_release() {
    let repo = TestRepo::new();
    repo.commit_on_head("First commit");
    let head = repo.commit_on_head("feat: x");
    repo.tag("0.1.0", head);

    assert_eq!(next_version(&repo), ("0.1.0".to_string(), false));
}

#[test]
fn test_merged_feature_branch() {
    let repo = TestRepo::new();
    let first = repo.commit_on_head("First commit");
    repo.tag("1.0.0", first);
    let feature = repo.commit("feat: on feature branch", &[first]);
    let main = repo.commit_on_head("docs: on main");
    let merge = repo.commit("Merge branch 'feature'", &[main, feature]);
    repo.branch("release", merge);

    let outcome = compute_next_version(
        &repo.repo,
        &ReleaseRules::default(),
        &TagPrefix::default(),
        &ReleaseOptions::default(),
        Some("release"),
    )
    .expect("Should compute next version");
    assert_eq!(outcome.version.to_string(), "1.1.0");
    assert_eq!(outcome.commits.len(), 3);
}

#[test]
fn test_unknown_release_type_fails() {
    let repo = TestRepo::new();
    repo.commit_on_head("fix: commit that trigger an unknown release");

    let rules = build_rule_table(Some(vec![ReleaseRule::new("fix", "unknown")]))
        .expect("levels are checked lazily");
    let result = compute_next_version(
        &repo.repo,
        &rules,
        &TagPrefix::default(),
        &ReleaseOptions::default(),
        None,
    );
    assert!(matches!(result, Err(SemverError::UnknownReleaseType { .. })));
}

#[test]
fn test_uninitialized_repository_has_no_history() {
    let repo = TestRepo::new();

    let result = compute_next_version(
        &repo.repo,
        &ReleaseRules::default(),
        &TagPrefix::default(),
        &ReleaseOptions::default(),
        None,
    );
    assert!(matches!(result, Err(SemverError::NoHistory(_))));
}

#[test]
fn test_open_discovers_repository_from_subdirectory() {
    let repo = TestRepo::new();
    let head = repo.commit_on_head("First commit");
    let nested = repo.path().join("nested").join("dir");
    std::fs::create_dir_all(&nested).expect("Could not create nested dir");

    let opened = Git2Repository::open(&nested).expect("Should discover repository");
    assert_eq!(opened.resolve("HEAD").expect("HEAD resolves"), head);
}

#[test]
fn test_open_outside_repository_fails() {
    let dir = tempfile::TempDir::new().expect("Could not create temp dir");
    assert!(Git2Repository::open(dir.path().join("does").join("not").join("exist")).is_err());
}
