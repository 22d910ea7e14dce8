//! Pure formatting functions for console output.
//!
//! Colors come from `console`, which drops them when the stream is not a
//! terminal (CI logs, pipes).

use crate::analyzer::AnalyzedCommit;
use crate::boundary::BoundaryWarning;
use console::style;

/// Commits listed before the rest is summarized
pub const MAX_LISTED_COMMITS: usize = 10;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// One line per analyzed commit: short hash, bump marker, short message
pub fn format_commit_line(index: usize, commit: &AnalyzedCommit) -> String {
    let marker = commit.bump.map(|b| b.name()).unwrap_or("-");
    format!(
        "  {}. {} [{}] {}",
        index + 1,
        commit.commit.short_id(),
        marker,
        commit.parsed.short_message
    )
}

/// Display commit analysis for a branch.
///
/// Shows the branch name and up to [`MAX_LISTED_COMMITS`] commits.
/// If more exist, displays count of remaining commits.
///
/// # Arguments
/// * `commits` - Analyzed commits in walk order
/// * `branch_name` - The name of the branch being analyzed
pub fn display_commit_analysis(commits: &[AnalyzedCommit], branch_name: &str) {
    println!(
        "\n{}",
        style(format!("Analyzing commits on '{}'", branch_name)).bold()
    );

    if commits.is_empty() {
        println!("  (no commits since last release)");
        return;
    }

    println!(
        "{}",
        style(format!("{} commit(s) since last release:", commits.len())).underlined()
    );

    for (i, commit) in commits.iter().take(MAX_LISTED_COMMITS).enumerate() {
        println!("{}", format_commit_line(i, commit));
    }

    if commits.len() > MAX_LISTED_COMMITS {
        println!("  ... and {} more commits", commits.len() - MAX_LISTED_COMMITS);
    }
}

/// Display the proposed tag change (or initial tag).
///
/// Shows either:
/// - If updating: "From: old_tag -> To: new_tag"
/// - If initial: "Initial Tag: new_tag"
pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str) {
    match old_tag {
        Some(old) => {
            println!("\n{}", style("Proposed Tag Change:").bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(new_tag).green());
        }
        None => {
            println!("\n{}", style("Initial Tag:").bold());
            println!("  New tag: {}", style(new_tag).green());
        }
    }
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display manual push instruction for a tag.
///
/// # Arguments
/// * `tag` - The tag that was created locally
/// * `remote` - The remote name (e.g., "origin")
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}
