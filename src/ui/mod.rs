//! User-facing output.
//!
//! Separates concerns:
//! - `formatter` - Console status lines and commit listings
//! - `report` - JSON report and CI output file

pub mod formatter;
pub mod report;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_commit_analysis, display_error,
    display_manual_push_instruction, display_proposed_tag, display_status, display_success,
};
pub use report::{write_ci_output, JsonReport, CI_OUTPUT_ENV};
