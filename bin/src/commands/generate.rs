use anyhow::{Context, Result};
use gitstamp::{render, write_if_changed, GitInfo, Repository, Template};
use std::{env, fs, io::Write, path::Path};
use tracing::{debug, info, warn};

use crate::cli::{Cli, Format};

/// Capture git info for the configured repository and render it.
///
/// Output goes to `--out` when given, otherwise to `stdout`.
pub fn handle(cli: &Cli, stdout: &mut impl Write) -> Result<()> {
    let repo_path = match &cli.git_repo {
        Some(path) => path.clone(),
        None => env::current_dir().context("resolving current directory")?,
    };

    let template = cli
        .template
        .as_deref()
        .map(load_template)
        .transpose()?;

    let info = match capture(&repo_path, cli) {
        Ok(info) => info,
        Err(e) if cli.ignore_git_errors => {
            warn!(error = %e, repo = %repo_path.display(), "ignoring git error, rendering empty values");
            GitInfo::default()
        },
        Err(e) => {
            return Err(e).with_context(|| format!("inspecting {}", repo_path.display()));
        },
    };

    let rendered = match &template {
        Some(template) => template.render(&info.identity()),
        None => render_format(cli.format.unwrap_or_default(), &info)?,
    };

    match &cli.out {
        Some(path) => {
            if write_if_changed(path, rendered.as_bytes(), cli.force)? {
                info!(path = %path.display(), "wrote output");
            } else {
                debug!(path = %path.display(), "output unchanged");
            }
        },
        None => stdout
            .write_all(rendered.as_bytes())
            .context("writing to stdout")?,
    }
    Ok(())
}

fn capture(repo_path: &Path, cli: &Cli) -> gitstamp::Result<GitInfo> {
    Repository::open_with(repo_path, &cli.git_program)?.git_info()
}

fn load_template(path: &Path) -> Result<Template> {
    let source =
        fs::read_to_string(path).with_context(|| format!("reading template {}", path.display()))?;
    Template::parse(&source).with_context(|| format!("parsing template {}", path.display()))
}

fn render_format(format: Format, info: &GitInfo) -> Result<String> {
    Ok(match format {
        Format::Text => render::text(&info.identity()),
        Format::Rust => render::rust_source(info),
        Format::Env => render::cargo_env(info),
        Format::Json => render::json(info)? + "\n",
    })
}
