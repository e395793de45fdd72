use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use portcheck::OutputFormat;
use portcheck::areas::analyzer::{Analyzer, DEFAULT_JOBS};
use portcheck::areas::destination::Destination;
use portcheck::areas::history::{DEFAULT_GIT_TIMEOUT, GitHistory, History};
use portcheck::areas::session::Session;
use portcheck::artifacts::history::since::SinceParser;
use portcheck::artifacts::history::status_filter::StatusFilter;
use portcheck::artifacts::rules::Rules;
use portcheck::commands::scan::ScanOptions;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "portcheck",
    version,
    about = "Decide which origin commits still need porting to the destination codebase",
    long_about = "Reads the commit history of an origin codebase, keeps the changes that touch \
    its portable public surface, extracts the declarations they add or modify and checks \
    whether the destination codebase already declares them.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
{all-args}
"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "PORTCHECK_ORIGIN",
        default_value = ".",
        help = "Path to the origin git repository"
    )]
    origin: PathBuf,
    #[arg(
        long,
        global = true,
        env = "PORTCHECK_DESTINATION",
        help = "Path to the destination codebase"
    )]
    destination: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "PORTCHECK_RULES",
        help = "YAML file overriding the built-in rule tables"
    )]
    rules: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "PORTCHECK_JOBS",
        default_value_t = DEFAULT_JOBS,
        help = "Commits and files analysed concurrently"
    )]
    jobs: usize,
    #[arg(
        long = "git-timeout",
        global = true,
        env = "PORTCHECK_GIT_TIMEOUT",
        default_value_t = DEFAULT_GIT_TIMEOUT.as_secs(),
        help = "Seconds before a git call is abandoned"
    )]
    git_timeout: u64,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text, help = "Report format")]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "analyze",
        about = "Analyse the given commits",
        long_about = "Runs the full analysis for each commit. Unknown commits produce an \
        empty result instead of an error."
    )]
    Analyze {
        #[arg(required = true, help = "Commit hashes or revisions")]
        commits: Vec<String>,
        #[arg(long = "diff-filter", value_parser = parse_status_filter, help = "Only analyse files with these statuses (A, M, D, R)")]
        diff_filter: Option<StatusFilter>,
    },
    #[command(
        name = "scan",
        about = "Analyse every commit since a point in time",
        long_about = "Accepts YYYY-MM-DD, today, yesterday, 'N days ago', 'N weeks ago' and \
        'last monday'. Anything else is passed to git log --since as is."
    )]
    Scan {
        #[arg(long, default_value = "today", help = "Time expression")]
        since: String,
        #[arg(long = "all-refs", help = "Scan every ref, not only HEAD")]
        all_refs: bool,
        #[arg(long = "relevant-only", help = "Only report commits that need porting")]
        relevant_only: bool,
        #[arg(long = "diff-filter", value_parser = parse_status_filter, help = "Only analyse files with these statuses (A, M, D, R)")]
        diff_filter: Option<StatusFilter>,
    },
    #[command(
        name = "check-path",
        about = "Show the relevance decision and destination mapping for origin paths"
    )]
    CheckPath {
        #[arg(required = true, help = "Origin-relative paths")]
        paths: Vec<PathBuf>,
    },
    #[command(name = "rules", about = "Print the effective rule tables as YAML")]
    Rules,
}

fn parse_status_filter(letters: &str) -> Result<StatusFilter, String> {
    StatusFilter::try_parse(letters)
        .filter(|filter| !filter.is_empty())
        .ok_or_else(|| format!("invalid status letters '{letters}', expected some of A, M, D, R"))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn init_colors() {
    let enabled = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    colored::control::set_override(enabled);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    init_colors();

    let rules = Rules::load(cli.rules.as_deref())?;
    let history = GitHistory::new(cli.origin.clone(), Duration::from_secs(cli.git_timeout));
    let destination = match &cli.destination {
        Some(path) => {
            let path = path
                .canonicalize()
                .with_context(|| format!("destination {} is not accessible", path.display()))?;
            Some(Destination::new(path.into_boxed_path()))
        }
        None => None,
    };

    let statuses = match &cli.command {
        Commands::Analyze { diff_filter, .. } | Commands::Scan { diff_filter, .. } => {
            diff_filter.unwrap_or_default()
        }
        Commands::CheckPath { .. } | Commands::Rules => StatusFilter::default(),
    };
    let needs_history = matches!(cli.command, Commands::Analyze { .. } | Commands::Scan { .. });
    if needs_history {
        history.validate().await?;
    }

    let analyzer = Analyzer::new(history, destination, &rules)?
        .with_jobs(cli.jobs)
        .with_status_filter(statuses);
    let session = Session::new(analyzer, rules, cli.format, Box::new(std::io::stdout()));

    match &cli.command {
        Commands::Analyze { commits, .. } => session.analyze(commits).await?,
        Commands::Scan {
            since,
            all_refs,
            relevant_only,
            ..
        } => {
            let today = chrono::Local::now().date_naive();
            let options = ScanOptions {
                since: SinceParser::new()?.parse(since, today),
                all_refs: *all_refs,
                relevant_only: *relevant_only,
            };
            session.scan(&options).await?
        }
        Commands::CheckPath { paths } => session.check_paths(paths)?,
        Commands::Rules => session.rules_table()?,
    }

    Ok(())
}
