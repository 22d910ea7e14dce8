//! Main workflow orchestration logic
//!
//! Compute the next version, then create, sign and push its tag. Kept apart
//! from `main.rs` so the workflow can be driven programmatically without
//! depending on clap.

use anyhow::{Context, Result};
use git2::Oid;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::analyzer::{version_analyzer::DEFAULT_TARGET, ReleaseOutcome, VersionComputer};
use crate::boundary::{collect_warnings, BoundaryWarning};
use crate::config::{load_rules_file, Config, SignConfig};
use crate::domain::{build_rule_table, ReleaseOptions, ReleaseRules, TagPrefix, Version};
use crate::git::{Git2Repository, Repository};
use crate::signing::{GpgSigner, TagSigner};
use crate::ui::{self, JsonReport};

/// Arguments for the release workflow
///
/// Mirrors the CLI Args; every `Option` left at `None` falls back to the
/// configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseWorkflowArgs {
    /// Repository path, discovered upwards
    pub repository_path: String,

    /// Path to custom config file
    pub config_path: Option<String>,

    /// Branch whose head is released
    pub branch: Option<String>,

    pub tag_prefix: Option<String>,

    /// JSON rule file replacing the rule table
    pub rules_path: Option<String>,

    /// Turn prerelease mode on
    pub prerelease: bool,

    pub prerelease_suffix: Option<String>,

    pub build_metadata: Option<String>,

    /// Compute and report only - don't create tags or push
    pub dry_run: bool,

    /// Push the created tag
    pub push: bool,

    pub remote: Option<String>,

    /// Armored private key file used to sign the tag
    pub sign_key: Option<String>,

    /// Print a JSON report instead of console output
    pub json: bool,
}

/// Everything the workflow needs once configuration is resolved
pub struct ReleasePlan {
    pub rules: ReleaseRules,
    pub prefix: TagPrefix,
    pub options: ReleaseOptions,
    pub target: String,
    pub dry_run: bool,
    pub push: bool,
    pub remote: String,
}

/// Result of a release workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub outcome: ReleaseOutcome,

    /// Tag name for the new version, set whenever there is a new release
    pub tag: Option<String>,

    /// The reference that was analyzed
    pub branch: String,

    pub head: Oid,

    /// Whether the tag was created locally
    pub tag_created: bool,

    /// Whether the tag was pushed to remote
    pub pushed: bool,

    /// Remote the tag is (or would be) pushed to
    pub remote: String,

    pub dry_run: bool,

    pub warnings: Vec<BoundaryWarning>,
}

impl WorkflowResult {
    pub fn version(&self) -> &Version {
        &self.outcome.version
    }

    pub fn report(&self) -> JsonReport {
        match (&self.tag, self.dry_run) {
            (Some(tag), true) => JsonReport::dry_run(&self.outcome.version, tag),
            (Some(tag), false) => JsonReport::new_release(&self.outcome.version, tag),
            (None, _) => JsonReport::no_release(),
        }
    }
}

/// Layer CLI arguments over the loaded configuration
pub fn apply_overrides(args: &ReleaseWorkflowArgs, mut config: Config) -> Config {
    if let Some(branch) = &args.branch {
        config.release_branch = Some(branch.clone());
    }
    if let Some(prefix) = &args.tag_prefix {
        config.tag_prefix = prefix.clone();
    }
    if args.prerelease {
        config.prerelease.enabled = true;
    }
    if let Some(suffix) = &args.prerelease_suffix {
        config.prerelease.suffix = Some(suffix.clone());
    }
    if let Some(metadata) = &args.build_metadata {
        config.build_metadata = Some(metadata.clone());
    }
    if args.push {
        config.remote.push = true;
    }
    if let Some(remote) = &args.remote {
        config.remote.name = remote.clone();
    }
    if let Some(key) = &args.sign_key {
        config.sign.key_path = Some(key.clone());
        config.sign.key_id = None;
    }
    config
}

/// Resolve a plan from merged configuration
pub fn build_plan(args: &ReleaseWorkflowArgs, config: &Config) -> Result<ReleasePlan> {
    config.validate()?;

    let rules = match &args.rules_path {
        Some(path) => build_rule_table(Some(load_rules_file(Path::new(path))?))?,
        None => config.release_rules()?,
    };

    Ok(ReleasePlan {
        rules,
        prefix: config.tag_prefix(),
        options: config.release_options()?,
        target: config
            .release_branch
            .clone()
            .unwrap_or_else(|| DEFAULT_TARGET.to_string()),
        dry_run: args.dry_run,
        push: config.remote.push,
        remote: config.remote.name.clone(),
    })
}

/// Signer for the configured key, if any
pub fn build_signer(sign: &SignConfig) -> Result<Option<GpgSigner>> {
    if let Some(path) = &sign.key_path {
        let signer = GpgSigner::from_key_file(Path::new(path), sign.program.clone())
            .with_context(|| format!("Cannot load signing key '{}'", path))?;
        return Ok(Some(signer));
    }
    Ok(sign
        .key_id
        .as_ref()
        .map(|id| GpgSigner::new(id.clone(), sign.program.clone())))
}

/// Compute the next version and tag it according to the plan
///
/// `signer` is only asked for once a tag is actually going to be created.
pub fn execute_release<R, F>(repo: &R, plan: &ReleasePlan, signer: F) -> Result<WorkflowResult>
where
    R: Repository + ?Sized,
    F: FnOnce() -> Result<Option<Box<dyn TagSigner>>>,
{
    let computer = VersionComputer::new(&plan.rules, &plan.prefix, &plan.options);
    let outcome = computer.compute(repo, &plan.target)?;
    let head = outcome.head;
    let mut warnings = collect_warnings(&outcome);

    let mut result = WorkflowResult {
        tag: None,
        branch: plan.target.clone(),
        head,
        tag_created: false,
        pushed: false,
        remote: plan.remote.clone(),
        dry_run: plan.dry_run,
        warnings: Vec::new(),
        outcome,
    };

    if !result.outcome.new_release {
        result.warnings = warnings;
        return Ok(result);
    }

    let tag = plan.prefix.format(&result.outcome.version);
    result.tag = Some(tag.clone());

    if plan.dry_run {
        info!(tag = %tag, "dry-run, not creating tag");
        if plan.push {
            warnings.push(BoundaryWarning::PushSkipped {
                remote: plan.remote.clone(),
            });
        }
        result.warnings = warnings;
        return Ok(result);
    }

    let signer = signer()?;
    repo.create_tag(&tag, head, &tag, signer.as_deref())
        .with_context(|| format!("Failed to create tag '{}'", tag))?;
    result.tag_created = true;
    info!(tag = %tag, signed = signer.is_some(), "created tag");

    if plan.push {
        repo.push_tags(&plan.remote, &[tag.as_str()])
            .with_context(|| format!("Failed to push tag '{}' to '{}'", tag, plan.remote))?;
        result.pushed = true;
        info!(tag = %tag, remote = %plan.remote, "pushed tag");
    }

    result.warnings = warnings;
    Ok(result)
}

/// Main release workflow
///
/// Orchestrates the entire process:
/// 1. Merge CLI arguments over configuration
/// 2. Open the git repository
/// 3. Compute the next version of the release branch
/// 4. Create (and sign) the tag unless dry-run
/// 5. Push the tag if requested
///
/// # Arguments
///
/// * `args` - Workflow arguments
/// * `config` - Loaded configuration
pub fn run_release_workflow(args: &ReleaseWorkflowArgs, config: Config) -> Result<WorkflowResult> {
    let config = apply_overrides(args, config);
    let plan = build_plan(args, &config)?;

    let path = if args.repository_path.is_empty() {
        "."
    } else {
        args.repository_path.as_str()
    };
    let mut repo = Git2Repository::open(path)
        .with_context(|| format!("Cannot open git repository at '{}'", path))?;

    if let Some(var) = &config.remote.token_env {
        match std::env::var(var) {
            Ok(token) if !token.is_empty() => repo = repo.with_access_token(token),
            _ => warn!(variable = %var, "access token variable is not set"),
        }
    }

    debug!(target_ref = %plan.target, prefix = %plan.prefix.as_str(), "running release workflow");

    execute_release(&repo, &plan, || {
        Ok(build_signer(&config.sign)?.map(|s| Box::new(s) as Box<dyn TagSigner>))
    })
}

/// Print the result and write the CI output file when one is configured
pub fn emit_output(result: &WorkflowResult, json: bool) -> Result<()> {
    if json {
        println!("{}", result.report().to_json()?);
    } else {
        display_result(result);
    }

    if let Some(path) = std::env::var_os(ui::CI_OUTPUT_ENV) {
        ui::write_ci_output(
            Path::new(&path),
            result.version(),
            result.outcome.new_release,
        )?;
    }

    Ok(())
}

fn display_result(result: &WorkflowResult) {
    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }

    ui::display_commit_analysis(&result.outcome.commits, &result.branch);

    let Some(tag) = &result.tag else {
        ui::display_status(&format!(
            "No new release (current version {})",
            result.outcome.version
        ));
        return;
    };

    let previous = result.outcome.previous.as_ref().map(|t| t.name.as_str());
    ui::display_proposed_tag(previous, tag);

    if result.dry_run {
        ui::display_status("Dry-run is enabled, no tag created");
        return;
    }

    ui::display_success(&format!("Created tag '{}'", tag));
    if result.pushed {
        ui::display_success(&format!("Pushed tag '{}' to '{}'", tag, result.remote));
    } else {
        ui::display_manual_push_instruction(tag, &result.remote);
    }
}
