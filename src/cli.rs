use crate::{
    banner::print_banner,
    error::TransferError,
    filter_repo::Identity,
    git, logging,
    prompt::{self, StringPrompter},
    runner::{CommandRunner, SystemRunner},
    transfer::{self, TransferPlan},
    url::RepoUrl,
};

use clap::Parser;
use console::style;
use std::path::PathBuf;

/// Command-line flags. Every value can also be entered interactively.
#[derive(Parser, Debug)]
#[command(
    name = "git-repo-transfer",
    version,
    about = "Copy a repository's full history to a new remote, rewriting every commit's author"
)]
pub struct Cli {
    /// URL of the repository to copy from (prompted if omitted)
    #[arg(long)]
    pub source: Option<String>,

    /// URL of the repository to push to (prompted if omitted)
    #[arg(long)]
    pub destination: Option<String>,

    /// New author and committer name (prompted if omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// New author and committer email (prompted if omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// Directory in which the temporary bare clone is created
    #[arg(long, default_value = ".")]
    pub workdir: PathBuf,

    /// Name of the remote registered for the destination
    #[arg(long, default_value = git::DEFAULT_REMOTE)]
    pub remote_name: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Log every command that is run
    #[arg(short, long)]
    pub verbose: bool,
}

/// Values collected from flags and prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TransferInputs {
    source: RepoUrl,
    destination: RepoUrl,
    identity: Identity,
}

/// Collects the four inputs, asking for any not given on the command line.
///
/// The source URL is validated before the identity prompts so its
/// repository name can be shown as context; nothing runs before all four
/// values are known.
fn gather_inputs<P: StringPrompter, R: CommandRunner + ?Sized>(
    cli: &Cli,
    prompter: &mut P,
    runner: &mut R,
) -> Result<TransferInputs, TransferError> {
    let source = prompt::preset_or_ask(
        prompter,
        cli.source.as_deref(),
        "URL of the old repository",
        None,
        "",
    )
    .map_err(TransferError::Prompt)?;
    let source = RepoUrl::parse(&source)?;
    let repo_name = source.repo_name()?;

    let destination = prompt::preset_or_ask(
        prompter,
        cli.destination.as_deref(),
        "URL of the new repository",
        None,
        "",
    )
    .map_err(TransferError::Prompt)?;
    let destination = RepoUrl::parse(&destination)?;

    let default_name = git::config_get(runner, "user.name");
    let default_email = git::config_get(runner, "user.email");

    let name = prompt::preset_or_ask(
        prompter,
        cli.name.as_deref(),
        "New author name",
        Some(&repo_name),
        &default_name,
    )
    .map_err(TransferError::Prompt)?;

    let email = prompt::preset_or_ask(
        prompter,
        cli.email.as_deref(),
        "New author email",
        Some(&repo_name),
        &default_email,
    )
    .map_err(TransferError::Prompt)?;

    Ok(TransferInputs {
        source,
        destination,
        identity: Identity::new(&name, &email),
    })
}

/// Logs `e`; validation errors are reported before any work was done.
fn report(e: &TransferError) {
    if e.is_validation() {
        tracing::error!("{}", e);
    } else {
        tracing::error!("An error occurred: {}", e);
    }
}

/// Main CLI entry point for `git-repo-transfer`.
///
/// 1. Parses flags and sets up logging.
/// 2. Checks that `git` is on `PATH`.
/// 3. Collects source, destination, name and email.
/// 4. Validates both URLs and derives the clone directory.
/// 5. Shows the transfer summary and asks for confirmation (unless `--yes`).
/// 6. Runs the transfer; the local clone is removed whatever the outcome.
///
/// # Exit Codes
///
/// * `0` – Transfer completed, or the user declined at the confirmation.
/// * Non-zero – Validation failed or a command failed.
pub fn entry() -> Result<i32, ()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = git::ensure_git() {
        eprintln!("{}", style(format!("Error: {}", e)).red().bold());
        return Err(());
    }

    let mut runner = SystemRunner;
    let mut string_prompter = prompt::DialoguerStringPrompter;

    let inputs = match gather_inputs(&cli, &mut string_prompter, &mut runner) {
        Ok(v) => v,
        Err(e) => {
            report(&e);
            return Err(());
        }
    };

    let plan = match TransferPlan::new(
        inputs.source,
        inputs.destination,
        inputs.identity,
        &cli.workdir,
    ) {
        Ok(p) => p.with_remote(&cli.remote_name),
        Err(e) => {
            report(&e);
            return Err(());
        }
    };

    print_banner(&plan);

    if !cli.yes {
        let mut confirm_prompter = prompt::DialoguerConfirmPrompter;
        match prompt::confirm_transfer(&mut confirm_prompter) {
            Ok(true) => {}
            Ok(false) => {
                println!(
                    "{}",
                    style("Canceled by user. No changes made.").yellow().bold()
                );
                return Ok(0);
            }
            Err(e) => {
                report(&TransferError::Prompt(e));
                return Err(());
            }
        }
    }

    match transfer::transfer(&mut runner, &plan) {
        Ok(_) => Ok(0),
        // Already logged by the workflow.
        Err(_) => Err(()),
    }
}
