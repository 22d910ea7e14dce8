use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use git_semver::cli::orchestration::{emit_output, run_release_workflow, ReleaseWorkflowArgs};
use git_semver::{config, ui, SemverError};

#[derive(clap::Parser)]
#[command(
    name = "git-semver",
    version,
    about = "Compute the next semantic version from conventional commits and tag it"
)]
struct Args {
    #[arg(default_value = ".", help = "Path of the git repository")]
    path: String,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Branch to release (defaults to HEAD)")]
    branch: Option<String>,

    #[arg(long, help = "Prefix put in front of versions in tag names, e.g. 'v'")]
    tag_prefix: Option<String>,

    #[arg(long, help = "JSON file replacing the release rules")]
    rules: Option<String>,

    #[arg(long, help = "Compute a prerelease version")]
    prerelease: bool,

    #[arg(long, help = "Prerelease identifier (default: rc)")]
    prerelease_suffix: Option<String>,

    #[arg(long, help = "Build metadata appended to the version")]
    build_metadata: Option<String>,

    #[arg(long, help = "Compute and report without creating a tag")]
    dry_run: bool,

    #[arg(long, help = "Push the created tag to the remote")]
    push: bool,

    #[arg(short, long, help = "Remote to push to (default: origin)")]
    remote: Option<String>,

    #[arg(long, help = "Armored private key file used to sign the tag")]
    sign_key: Option<String>,

    #[arg(long, help = "Print a JSON report on stdout")]
    json: bool,

    #[arg(short, long, help = "Show debug logs")]
    verbose: bool,
}

impl From<&Args> for ReleaseWorkflowArgs {
    fn from(args: &Args) -> Self {
        ReleaseWorkflowArgs {
            repository_path: args.path.clone(),
            config_path: args.config.clone(),
            branch: args.branch.clone(),
            tag_prefix: args.tag_prefix.clone(),
            rules_path: args.rules.clone(),
            prerelease: args.prerelease,
            prerelease_suffix: args.prerelease_suffix.clone(),
            build_metadata: args.build_metadata.clone(),
            dry_run: args.dry_run,
            push: args.push,
            remote: args.remote.clone(),
            sign_key: args.sign_key.clone(),
            json: args.json,
        }
    }
}

/// Logs go to stderr so `--json` output stays clean. `RUST_LOG` wins over
/// `--verbose`.
fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("git_semver={}", level)))
        .context("Failed to create tracing filter")?;

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry().with(filter).with(layer).init();
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    let workflow_args = ReleaseWorkflowArgs::from(args);

    let result = run_release_workflow(&workflow_args, config)?;
    emit_output(&result, workflow_args.json)
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.verbose) {
        eprintln!("{:#}", e);
    }

    if let Err(e) = run(&args) {
        ui::display_error(&format!("{:#}", e));
        let configuration = e
            .chain()
            .filter_map(|cause| cause.downcast_ref::<SemverError>())
            .any(SemverError::is_configuration_error);
        if configuration {
            ui::display_status("Check the release rules and options in gitsemver.toml or on the command line");
        }
        std::process::exit(1);
    }
}
