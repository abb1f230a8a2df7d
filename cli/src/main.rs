//! sftpcp - SFTP copy
//!
//! Copy a local file or directory tree to a remote host over SFTP,
//! powered by sftpcopy.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use sftpcopy::{
    CopyOptions, CopyStats, DEFAULT_BUFFER_SIZE, Error as SftpcopyError, OnConflict, PathCopier,
    SessionConfig, SftpSession,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// sftpcp - copy files to a remote host over SFTP
///
/// Authenticates with the ssh agent (when SSH_AUTH_SOCK is set) and then
/// the password, if one is given.
///
/// Usage:
///   sftpcp --username USER cp SRC DST
///   sftpcp --username USER cp DIR/ DST     (copy the contents of DIR)
#[derive(Parser, Debug)]
#[command(name = "sftpcp", version, about, long_about = None)]
struct Args {
    /// SFTP username
    #[arg(long, env = "SFTP_USERNAME", global = true)]
    username: Option<String>,

    /// SFTP password
    #[arg(long, env = "SFTP_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    /// Max packet size (bytes per remote write)
    #[arg(long, env = "SFTP_SIZE", global = true, default_value_t = DEFAULT_BUFFER_SIZE)]
    size: usize,

    /// Host
    #[arg(long, env = "SFTP_HOST", global = true, default_value = "localhost")]
    host: String,

    /// Port
    #[arg(long, env = "SFTP_PORT", global = true, default_value_t = 22)]
    port: u16,

    /// Session timeout in seconds (default: none)
    #[arg(long, env = "SFTP_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// What to do when the remote file already exists
    #[arg(short = 'c', long, value_enum, global = true, default_value = "skip-unchanged")]
    on_conflict: ConflictStrategy,

    /// Output format for the final summary
    #[arg(long, value_enum, global = true, default_value = "human")]
    output: OutputMode,

    /// Verbose output
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy a file or directory to the remote host
    Cp {
        /// Source file or directory
        #[arg(value_name = "SRC")]
        src: PathBuf,

        /// Destination on the remote host
        #[arg(value_name = "DST")]
        dst: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConflictStrategy {
    /// Skip files with the same size and a newer remote copy (default)
    SkipUnchanged,
    /// Always transfer
    Overwrite,
}

impl From<ConflictStrategy> for OnConflict {
    fn from(s: ConflictStrategy) -> Self {
        match s {
            ConflictStrategy::SkipUnchanged => OnConflict::SkipUnchanged,
            ConflictStrategy::Overwrite => OnConflict::Overwrite,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Source does not exist: {path}: {source}")]
    SourceNotFound { path: PathBuf, source: io::Error },

    #[error("Missing username: pass --username or set SFTP_USERNAME")]
    MissingUsername,

    #[error("{source}")]
    Session { source: SftpcopyError },

    #[error("Failed to copy {src} to {dst}: {source}")]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        source: SftpcopyError,
    },

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(error) = run(&args) {
        tracing::error!("{}", error);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> CliResult<()> {
    let Command::Cp { src, dst } = &args.command;

    // Fail on a bad source before spending a round trip on the session.
    if let Err(source) = src.metadata() {
        return Err(CliError::SourceNotFound {
            path: src.clone(),
            source,
        });
    }

    let config = build_session_config(args)?;
    let session = SftpSession::connect(&config).map_err(|source| CliError::Session { source })?;

    let options = build_options(args);
    let copier = PathCopier::new(&session, options);

    let stats = copier.copy(src, dst).map_err(|source| CliError::Copy {
        src: src.clone(),
        dst: dst.clone(),
        source,
    })?;

    match args.output {
        OutputMode::Human => {
            if !args.quiet {
                print_stats(&stats, args.verbose);
            }
        }
        OutputMode::Json => print_json_value(&stats_to_json(src, dst, &stats))?,
    }
    Ok(())
}

fn build_session_config(args: &Args) -> CliResult<SessionConfig> {
    let username = args.username.clone().ok_or(CliError::MissingUsername)?;

    let mut config = SessionConfig::new(username)
        .with_host(args.host.clone())
        .with_port(args.port);
    if let Some(password) = &args.password {
        config = config.with_password(password.clone());
    }
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

fn build_options(args: &Args) -> CopyOptions {
    CopyOptions::default()
        .with_buffer_size(args.size)
        .with_on_conflict(args.on_conflict.into())
}

fn stats_to_json(src: &Path, dst: &Path, stats: &CopyStats) -> Value {
    json!({
        "status": "ok",
        "source": display_path(src),
        "destination": display_path(dst),
        "files_copied": stats.files_copied,
        "files_skipped": stats.files_skipped,
        "symlinks_skipped": stats.symlinks_skipped,
        "dirs_created": stats.dirs_created,
        "bytes_copied": stats.bytes_copied,
        "duration_ms": u64::try_from(stats.duration.as_millis()).unwrap_or(u64::MAX),
    })
}

fn print_stats(stats: &CopyStats, verbose: bool) {
    if stats.files_copied == 0 {
        if stats.files_skipped > 0 {
            println!(
                "Nothing to copy ({} files already up to date)",
                stats.files_skipped
            );
        } else {
            println!("Nothing to copy");
        }
        return;
    }

    let bytes_str = format_bytes(stats.bytes_copied);

    if verbose {
        println!("Copy completed in {:?}", stats.duration);
        println!("  Files copied:   {}", stats.files_copied);
        println!("  Files skipped:  {}", stats.files_skipped);
        println!("  Directories:    {}", stats.dirs_created);
        println!("  Total size:     {}", bytes_str);

        if stats.duration.as_secs_f64() > 0.0 {
            let speed = stats.bytes_copied as f64 / stats.duration.as_secs_f64();
            println!("  Speed:          {}/s", format_bytes(speed as u64));
        }
    } else {
        let mut parts = vec![format!("{} files", stats.files_copied)];
        if stats.files_skipped > 0 {
            parts.push(format!("{} up to date", stats.files_skipped));
        }
        println!("Copied {} ({})", parts.join(", "), bytes_str);
    }
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
