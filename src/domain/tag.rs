use crate::domain::Version;
use git2::Oid;

/// A release tag: a tag whose name parses as a semantic version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    /// Tag name as it appears in `refs/tags/`
    pub name: String,
    pub version: Version,
    /// Commit the tag points to (annotated tags already peeled)
    pub commit: Oid,
}

/// Literal prefix put in front of the version in tag names (e.g. "v")
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPrefix {
    prefix: String,
}

impl TagPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        TagPrefix {
            prefix: prefix.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Format a version as a tag name
    /// Example: prefix="v", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        format!("{}{}", self.prefix, version)
    }

    /// Version carried by a tag name, if the name is the prefix followed by
    /// a valid semantic version
    pub fn parse(&self, tag_name: &str) -> Option<Version> {
        let suffix = tag_name.strip_prefix(self.prefix.as_str())?;
        Version::parse(suffix).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_without_prefix() {
        let prefix = TagPrefix::default();
        assert_eq!(prefix.format(&Version::new(1, 2, 3)), "1.2.3");
    }

    #[test]
    fn test_format_with_prefix() {
        let prefix = TagPrefix::new("v");
        assert_eq!(
            prefix.format(&Version::new(1, 2, 3).with_prerelease("rc")),
            "v1.2.3-rc"
        );
    }

    #[test]
    fn test_parse_with_prefix() {
        let prefix = TagPrefix::new("v");
        assert_eq!(prefix.parse("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(prefix.parse("1.2.3"), None);
        assert_eq!(prefix.parse("release-1.2.3"), None);
        assert_eq!(prefix.parse("vfoo"), None);
    }

    #[test]
    fn test_parse_without_prefix_is_strict() {
        let prefix = TagPrefix::default();
        assert_eq!(prefix.parse("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(prefix.parse("v1.2.3"), None);
        assert_eq!(prefix.parse("latest"), None);
    }

    #[test]
    fn test_parse_keeps_decoration() {
        let prefix = TagPrefix::new("release-");
        let version = prefix.parse("release-2.0.0-beta.2+sha.1").unwrap();
        assert_eq!(version.prerelease.as_deref(), Some("beta.2"));
        assert_eq!(version.build.as_deref(), Some("sha.1"));
    }
}
