use crate::domain::{ReleaseTag, TagPrefix};
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use tracing::{debug, trace};

/// Find the latest release reachable from `head`
///
/// Only tags whose name is `prefix` followed by a semantic version are
/// candidates; anything else is skipped silently. Among candidates that are
/// `head` itself or one of its ancestors, the highest version wins. Two tags
/// naming the same version are settled by creation time, latest first.
///
/// # Returns
/// * `Ok(None)` - No prior release: the walk should go down to the root
pub fn locate_latest_release<R: Repository + ?Sized>(
    repo: &R,
    prefix: &TagPrefix,
    head: Oid,
) -> Result<Option<ReleaseTag>> {
    let mut best: Option<(ReleaseTag, i64)> = None;

    for tag in repo.list_tags()? {
        let Some(version) = prefix.parse(&tag.name) else {
            trace!(tag = %tag.name, "ignoring non-release tag");
            continue;
        };

        if !repo.is_ancestor(tag.target, head)? {
            trace!(tag = %tag.name, "ignoring tag not reachable from head");
            continue;
        }

        let newer = match &best {
            None => true,
            Some((current, created)) => {
                (&version, tag.created) > (&current.version, *created)
            }
        };

        if newer {
            best = Some((
                ReleaseTag {
                    name: tag.name,
                    version,
                    commit: tag.target,
                },
                tag.created,
            ));
        }
    }

    let latest = best.map(|(tag, _)| tag);
    match &latest {
        Some(tag) => debug!(tag = %tag.name, version = %tag.version, "located latest release"),
        None => debug!("no prior release"),
    }

    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;
    use crate::git::MockRepository;

    fn linear(repo: &mut MockRepository, n: usize) -> Vec<Oid> {
        let mut ids = vec![repo.commit("First commit", &[])];
        for i in 1..n {
            let parent = ids[i - 1];
            ids.push(repo.commit(&format!("commit-{}", i), &[parent]));
        }
        ids
    }

    #[test]
    fn test_selects_highest_version_not_latest_tag() {
        let mut repo = MockRepository::new();
        let ids = linear(&mut repo, 5);
        repo.add_tag("2.0.0", ids[0]);
        repo.add_tag("2.0.1", ids[1]);
        repo.add_tag("3.0.0", ids[2]);
        repo.add_tag("2.5.0", ids[3]);
        repo.add_tag("0.1.0", ids[4]);

        let tag = locate_latest_release(&repo, &TagPrefix::default(), ids[4])
            .unwrap()
            .unwrap();
        assert_eq!(tag.name, "3.0.0");
        assert_eq!(tag.commit, ids[2]);
    }

    #[test]
    fn test_no_tags() {
        let mut repo = MockRepository::new();
        let ids = linear(&mut repo, 2);
        assert_eq!(
            locate_latest_release(&repo, &TagPrefix::default(), ids[1]).unwrap(),
            None
        );
    }

    #[test]
    fn test_non_semver_tags_ignored() {
        let mut repo = MockRepository::new();
        let ids = linear(&mut repo, 2);
        repo.add_tag("latest", ids[1]);
        repo.add_tag("v1.0", ids[1]);
        repo.add_tag("1.0.0", ids[0]);

        let tag = locate_latest_release(&repo, &TagPrefix::default(), ids[1])
            .unwrap()
            .unwrap();
        assert_eq!(tag.version, Version::new(1, 0, 0));
    }

    #[test]
    fn test_prefix_filters_tags() {
        let mut repo = MockRepository::new();
        let ids = linear(&mut repo, 3);
        repo.add_tag("v1.0.0", ids[0]);
        repo.add_tag("9.0.0", ids[1]);
        repo.add_tag("v1.1.0", ids[2]);

        let tag = locate_latest_release(&repo, &TagPrefix::new("v"), ids[2])
            .unwrap()
            .unwrap();
        assert_eq!(tag.name, "v1.1.0");
    }

    #[test]
    fn test_unreachable_tags_ignored() {
        let mut repo = MockRepository::new();
        let ids = linear(&mut repo, 2);
        let other = repo.commit("feat: elsewhere", &[ids[0]]);
        repo.add_tag("5.0.0", other);
        repo.add_tag("1.0.0", ids[0]);

        let tag = locate_latest_release(&repo, &TagPrefix::default(), ids[1])
            .unwrap()
            .unwrap();
        assert_eq!(tag.name, "1.0.0");
    }

    #[test]
    fn test_release_beats_its_prerelease() {
        let mut repo = MockRepository::new();
        let ids = linear(&mut repo, 2);
        repo.add_tag("1.0.0", ids[0]);
        repo.add_tag("1.0.0-rc", ids[1]);

        let tag = locate_latest_release(&repo, &TagPrefix::default(), ids[1])
            .unwrap()
            .unwrap();
        assert_eq!(tag.name, "1.0.0");
    }

    #[test]
    fn test_prerelease_tags_compare_as_text() {
        let mut repo = MockRepository::new();
        let ids = linear(&mut repo, 2);
        repo.add_tag("1.0.0-rc.2", ids[0]);
        repo.add_tag("1.0.0-rc.10", ids[1]);

        let tag = locate_latest_release(&repo, &TagPrefix::default(), ids[1])
            .unwrap()
            .unwrap();
        assert_eq!(tag.name, "1.0.0-rc.2");
    }

    #[test]
    fn test_same_version_latest_created_wins() {
        let mut repo = MockRepository::new();
        let ids = linear(&mut repo, 2);
        repo.add_tag_at("1.0.0+build.1", ids[0], 100);
        repo.add_tag_at("1.0.0+build.2", ids[1], 200);

        let tag = locate_latest_release(&repo, &TagPrefix::default(), ids[1])
            .unwrap()
            .unwrap();
        assert_eq!(tag.name, "1.0.0+build.2");
    }
}
