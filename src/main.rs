//! commitpick - CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commitpick::commit::run_commit;
use commitpick::git;
use commitpick::llm::{HttpGenerator, OfflineGenerator, SuggestionGenerator};
use commitpick::ui::{Decision, run_selection};
use commitpick::{Config, RepoError};

/// Suggest commit messages for staged changes and pick one.
#[derive(Parser, Debug)]
#[command(name = "commitpick")]
#[command(about = "Suggest commit messages for staged changes and pick one")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Commit style: conventional, gitmoji, free or custom
    #[arg(short, long)]
    style: Option<String>,

    /// Model to use (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Language of the generated messages (e.g. en, pt, es)
    #[arg(short, long)]
    language: Option<String>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use local heuristics instead of calling a provider
    #[arg(long)]
    offline: bool,

    /// Print the chosen message instead of committing
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(Command::Version) = cli.command {
        println!("commitpick {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    // Step 1: Load configuration
    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(
            cli.style.as_deref(),
            cli.model.as_deref(),
            cli.language.as_deref(),
        );

    if !cli.offline {
        config.validate()?;
    }
    debug!(
        "Using style '{}', model '{}', language '{}'",
        config.commit_style, config.model, config.language
    );

    // Step 2: Collect repository context
    let cwd = env::current_dir().context("Cannot determine current directory")?;
    let ctx = match git::collect(&cwd, config.max_diff_lines) {
        Ok(ctx) => ctx,
        Err(RepoError::NoStagedChanges) => {
            eprintln!("{}", "No staged changes found.".yellow());
            eprintln!("Stage files with `git add <file>` and run commitpick again.");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("Failed to read repository"),
    };

    println!(
        "Found {} staged file(s) on branch {}",
        ctx.changed_files.len(),
        ctx.branch_name
    );

    // Step 3: Generate suggestions
    let generator: Box<dyn SuggestionGenerator> = if cli.offline {
        println!("Generating suggestions offline...");
        Box::new(OfflineGenerator)
    } else {
        let http = HttpGenerator::new(
            &config.api_key,
            &config.model,
            &config.language,
            &config.custom_format,
        )?;
        println!("Analyzing your changes with {}...", http.provider());
        Box::new(http)
    };

    let suggestions = generator
        .generate(&ctx, &config.commit_style)
        .await
        .context("Failed to generate commit suggestions")?;
    ensure!(!suggestions.is_empty(), "No commit suggestions were generated");

    // Step 4: Let the user choose
    let decision = run_selection(suggestions).context("Interactive selector failed")?;

    let Decision::Commit { message, body } = &decision else {
        println!("{}", "Aborted.".yellow());
        return Ok(ExitCode::SUCCESS);
    };

    // Step 5: Commit or display
    if cli.dry_run {
        println!("\n--- Dry Run: commit message ---\n");
        println!("{}", decision.full_message());
        return Ok(ExitCode::SUCCESS);
    }

    run_commit(message, body).context("Failed to create commit")?;
    println!("{}", format!("✔ Committed: {message}").green());

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "commitpick=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
