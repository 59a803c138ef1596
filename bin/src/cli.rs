use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Capture the state of a git working tree and render it as build metadata.
///
/// With a TEMPLATE, `{{ key }}` placeholders are replaced by the values
/// (hash, branch, tag, describe, short_hash, is_clean,
/// is_clean_no_untracked_files). Without one, a built-in format is printed.
#[derive(Debug, Parser)]
#[command(name = "gitstamp", version, about, long_about = None)]
pub struct Cli {
    /// Template file to render
    pub template: Option<PathBuf>,

    /// Git repository path (default: current directory)
    #[arg(short = 'g', long = "git-repo", env = "GITSTAMP_REPO")]
    pub git_repo: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long, env = "GITSTAMP_OUT")]
    pub out: Option<PathBuf>,

    /// Rewrite the output file even if its content is unchanged
    #[arg(short, long)]
    pub force: bool,

    /// Render empty values instead of failing when git cannot be queried
    #[arg(long)]
    pub ignore_git_errors: bool,

    /// Built-in output format, used when no template is given
    #[arg(long, value_enum, conflicts_with = "template")]
    pub format: Option<Format>,

    /// git executable
    #[arg(long = "git", env = "GITSTAMP_GIT", default_value = "git")]
    pub git_program: PathBuf,

    /// Also write logs to this file
    #[arg(long, env = "GITSTAMP_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `NAME = VALUE` lines
    #[default]
    Text,
    /// Rust constants, as generated for build scripts
    Rust,
    /// `cargo:rustc-env` directives
    Env,
    /// JSON object
    Json,
}
