//! Analysis engine: release baseline lookup and next version computation

pub mod tag_locator;
pub mod version_analyzer;

pub use tag_locator::locate_latest_release;
pub use version_analyzer::{compute_next_version, AnalyzedCommit, ReleaseOutcome, VersionComputer};
