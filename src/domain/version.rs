use crate::error::{Result, SemverError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// Ordering and equality follow release precedence: build metadata is
/// carried through formatting but never compared. Two prerelease strings
/// compare as plain text.
#[derive(Debug, Clone, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Parse a strict `MAJOR.MINOR.PATCH[-prerelease][+build]` string.
    ///
    /// No prefix is stripped here; see [`crate::domain::TagPrefix`].
    pub fn parse(s: &str) -> Result<Self> {
        let parsed = semver::Version::parse(s)
            .map_err(|e| SemverError::version(format!("Invalid version '{}': {}", s, e)))?;

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease: (!parsed.pre.is_empty()).then(|| parsed.pre.to_string()),
            build: (!parsed.build.is_empty()).then(|| parsed.build.to_string()),
        })
    }

    /// Attach a prerelease identifier
    pub fn with_prerelease(mut self, prerelease: impl Into<String>) -> Self {
        self.prerelease = Some(prerelease.into());
        self
    }

    /// Attach build metadata
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    /// Bump version according to bump type.
    ///
    /// Exactly one component is incremented and the lower ones reset;
    /// prerelease and build decoration of the baseline are dropped.
    ///
    /// # Returns
    /// * `Err(SemverError::Version)` - If the incremented component overflows
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || {
            SemverError::version(format!(
                "Cannot apply a {} bump to {}: component overflow",
                bump_type, self
            ))
        };

        Ok(match bump_type {
            VersionBump::Major => {
                Version::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            VersionBump::Minor => Version::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            VersionBump::Patch => Version::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        })
    }

    /// First release of a repository that has never been tagged.
    ///
    /// The bump sets its component directly from zero: patch gives 0.0.1,
    /// minor gives 0.1.0 and major gives exactly 1.0.0.
    pub fn initial(bump_type: VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => Version::new(1, 0, 0),
            VersionBump::Minor => Version::new(0, 1, 0),
            VersionBump::Patch => Version::new(0, 0, 1),
        }
    }
}

impl FromStr for Version {
    type Err = SemverError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// Version bump type decision
///
/// Variants are declared weakest first so `Ord`/`max` give precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    pub fn name(&self) -> &'static str {
        match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        }
    }
}

impl FromStr for VersionBump {
    type Err = SemverError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            other => Err(SemverError::version(format!(
                "Unknown bump level: '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert_eq!(v.prerelease, None);
        assert_eq!(v.build, None);
    }

    #[test]
    fn test_version_parse_full() {
        let v = Version::parse("1.0.0-rc.1+build.5").unwrap();
        assert_eq!(v.prerelease.as_deref(), Some("rc.1"));
        assert_eq!(v.build.as_deref(), Some("build.5"));
    }

    #[test]
    fn test_version_parse_rejects_prefix_and_garbage() {
        assert!(Version::parse("v1.2.3").is_err());
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("01.2.3").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_version_bump_major() {
        let bumped = Version::new(1, 2, 3).bump(VersionBump::Major).unwrap();
        assert_eq!(bumped, Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let bumped = Version::new(1, 2, 3).bump(VersionBump::Minor).unwrap();
        assert_eq!(bumped, Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let bumped = Version::new(1, 2, 3).bump(VersionBump::Patch).unwrap();
        assert_eq!(bumped, Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_drops_decoration() {
        let base = Version::new(1, 0, 0).with_prerelease("rc").with_build("abc");
        let bumped = base.bump(VersionBump::Patch).unwrap();
        assert_eq!(bumped.to_string(), "1.0.1");
    }

    #[test]
    fn test_version_bump_overflow_is_an_error() {
        let major = Version::new(u64::MAX, 0, 0);
        assert!(matches!(
            major.bump(VersionBump::Major),
            Err(SemverError::Version(_))
        ));

        let minor = Version::new(1, u64::MAX, 0);
        assert!(matches!(
            minor.bump(VersionBump::Minor),
            Err(SemverError::Version(_))
        ));
        // lower components reset, so a maxed minor still takes a major bump
        assert_eq!(minor.bump(VersionBump::Major).unwrap(), Version::new(2, 0, 0));

        let patch = Version::new(1, 2, u64::MAX);
        let err = patch.bump(VersionBump::Patch).unwrap_err();
        assert!(err.to_string().contains("overflow"));
        assert_eq!(patch.bump(VersionBump::Minor).unwrap(), Version::new(1, 3, 0));
    }

    #[test]
    fn test_initial_release_sets_component() {
        assert_eq!(Version::initial(VersionBump::Patch).to_string(), "0.0.1");
        assert_eq!(Version::initial(VersionBump::Minor).to_string(), "0.1.0");
        assert_eq!(Version::initial(VersionBump::Major).to_string(), "1.0.0");
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(
            Version::new(1, 0, 1)
                .with_prerelease("rc")
                .with_build("abc")
                .to_string(),
            "1.0.1-rc+abc"
        );
        assert_eq!(Version::new(1, 0, 1).with_build("abc").to_string(), "1.0.1+abc");
    }

    #[test]
    fn test_ordering_numeric_components() {
        assert!(Version::new(2, 0, 0) > Version::new(1, 9, 9));
        assert!(Version::new(1, 10, 0) > Version::new(1, 9, 0));
        assert!(Version::new(1, 0, 10) > Version::new(1, 0, 9));
    }

    #[test]
    fn test_ordering_prerelease_is_lower() {
        let release = Version::new(1, 0, 0);
        let rc = Version::new(1, 0, 0).with_prerelease("rc");
        assert!(release > rc);
        assert!(Version::new(1, 0, 0).with_prerelease("beta") > Version::new(1, 0, 0).with_prerelease("alpha"));
    }

    #[test]
    fn test_ordering_prerelease_is_plain_text() {
        let rc2 = Version::parse("1.0.0-rc.2").unwrap();
        let rc10 = Version::parse("1.0.0-rc.10").unwrap();
        assert!(rc2 > rc10);
        assert_eq!(rc2.cmp(&rc10), "rc.2".cmp("rc.10"));
    }

    #[test]
    fn test_build_metadata_ignored_for_precedence() {
        let a = Version::new(1, 0, 0).with_build("one");
        let b = Version::new(1, 0, 0).with_build("two");
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a.to_string(), "1.0.0+one");
    }

    #[test]
    fn test_default_is_zero() {
        let v = Version::default();
        assert_eq!(v, Version::new(0, 0, 0));
        assert_eq!(v.to_string(), "0.0.0");
    }

    #[test]
    fn test_bump_precedence() {
        assert!(VersionBump::Major > VersionBump::Minor);
        assert!(VersionBump::Minor > VersionBump::Patch);
        let strongest = [VersionBump::Patch, VersionBump::Major, VersionBump::Minor]
            .into_iter()
            .max();
        assert_eq!(strongest, Some(VersionBump::Major));
        assert!(Some(VersionBump::Patch) > None);
    }

    #[test]
    fn test_bump_from_str() {
        assert_eq!("major".parse::<VersionBump>().unwrap(), VersionBump::Major);
        assert_eq!("minor".parse::<VersionBump>().unwrap(), VersionBump::Minor);
        assert_eq!("patch".parse::<VersionBump>().unwrap(), VersionBump::Patch);
        assert!("Major".parse::<VersionBump>().is_err());
        assert!("unknown".parse::<VersionBump>().is_err());
    }
}
