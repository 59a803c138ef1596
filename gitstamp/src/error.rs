use std::{io, path::PathBuf, process::ExitStatus};
use thiserror::Error;

use crate::template::TemplateError;

/// Errors that can occur while capturing or rendering build identity.
///
/// None of these describe missing-but-valid data: a repository without tags
/// or with a detached HEAD produces sentinel values, not an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The path is not inside a git working tree
    #[error("not a git working tree: {0}")]
    NotARepository(PathBuf),

    /// The git executable could not be started
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// A git command exited unsuccessfully
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    /// A git command printed something that is not UTF-8
    #[error("`{0}` produced non-utf-8 output")]
    NonUtf8Output(String),

    /// `rev-parse HEAD` returned something that is not a commit id
    #[error("malformed commit hash: {0:?}")]
    MalformedHash(String),

    /// The repository has no commit for HEAD to point at
    #[error("repository has no commits: {0}")]
    NoCommits(PathBuf),

    #[error("serializing git info: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A variable cargo sets for build scripts is missing
    #[error("environment variable {0} is not set; is this running from a build script?")]
    MissingEnv(&'static str),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
