//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod prerelease;
pub mod rule;
pub mod tag;
pub mod version;

pub use commit::{classify_commit, ParsedCommit};
pub use prerelease::ReleaseOptions;
pub use rule::{build_rule_table, ReleaseRule, ReleaseRules};
pub use tag::{ReleaseTag, TagPrefix};
pub use version::{Version, VersionBump};
