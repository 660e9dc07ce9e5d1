use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use semver_marker::config::{self, Config, LOG_ENV, MARKER_FILE_NAME};
use semver_marker::marker::VersionFile;
use semver_marker::version::Version;

#[derive(Parser)]
#[command(name = "semver-marker")]
#[command(version, about = "Read and write the .semver marker of a directory tree")]
struct Cli {
    /// Directory to start from (defaults to the current directory)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a .semver file holding version 0.0.0
    Init {
        /// Overwrite an existing .semver file
        #[arg(long)]
        force: bool,
    },
    /// Print the path of the nearest .semver file
    Path,
    /// Print the version using the configured tag format
    Tag,
    /// Print the version using a custom template (%M, %m, %p, %s)
    Format { template: String },
    /// Set the special (prerelease) string; an empty string clears it
    Special { special: String },
    /// Parse a version string and print its components as JSON
    Parse {
        input: String,
        /// Template to parse with (defaults to the configured tag format)
        #[arg(long)]
        template: Option<String>,
        /// Require major, minor and patch to all be present
        #[arg(long)]
        strict: bool,
    },
    /// Compare two versions written in the configured tag format
    Compare { a: String, b: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging();
    let config = Config::load(&config::config_path());
    let start_dir = cli.dir.as_deref();

    match cli.command {
        Command::Init { force } => {
            let dir = match start_dir {
                Some(dir) => dir.to_path_buf(),
                None => std::env::current_dir()?,
            };
            let path = dir.join(MARKER_FILE_NAME);
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            VersionFile::create(&path, Version::default()).save()?;
            println!("{}", path.display());
        }
        Command::Path => {
            println!("{}", semver_marker::locate_file_path(start_dir)?.display());
        }
        Command::Tag => {
            let file = semver_marker::locate(start_dir)?;
            println!("{}", file.version().format(&config.tag_format));
        }
        Command::Format { template } => {
            let file = semver_marker::locate(start_dir)?;
            println!("{}", file.version().format(&template));
        }
        Command::Special { special } => {
            let mut file = semver_marker::locate(start_dir)?;
            file.version_mut().set_special(special)?;
            file.save()?;
            println!("{}", file.version().format(&config.tag_format));
        }
        Command::Parse {
            input,
            template,
            strict,
        } => {
            let template = template.unwrap_or_else(|| config.tag_format.clone());
            let allow_missing = config.allow_missing && !strict;
            let Some(version) = Version::parse(&input, &template, allow_missing)? else {
                bail!("{input:?} does not match template {template:?}");
            };
            println!("{}", serde_json::to_string(&version)?);
        }
        Command::Compare { a, b } => {
            let parse = |input: &str| -> anyhow::Result<Version> {
                Version::parse(input, &config.tag_format, config.allow_missing)?
                    .with_context(|| format!("{input:?} does not match {:?}", config.tag_format))
            };
            let ordering = match parse(&a)?.cmp(&parse(&b)?) {
                Ordering::Less => "less",
                Ordering::Equal => "equal",
                Ordering::Greater => "greater",
            };
            println!("{ordering}");
        }
    }

    Ok(())
}

/// Install the stderr subscriber, plus a JSON file log when the log filter env var is set.
fn init_logging() -> Option<WorkerGuard> {
    let filter = || EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var_os(LOG_ENV) {
        Some(_) => {
            let log_path = config::log_path();
            let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_default();
            match (std::fs::create_dir_all(&log_dir), log_path.file_name()) {
                (Ok(()), Some(file_name)) => {
                    let appender = tracing_appender::rolling::never(&log_dir, file_name);
                    let (writer, guard) = tracing_appender::non_blocking(appender);
                    let layer = fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_filter(filter());
                    (Some(layer), Some(guard))
                }
                _ => (None, None),
            }
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter()),
        )
        .with(file_layer)
        .init();

    guard
}
