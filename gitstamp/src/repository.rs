//! Read-only git queries against a working tree.
//!
//! [`Repository`] shells out to the `git` executable, the same way a developer
//! would inspect the tree by hand. Each query maps to one value of
//! [`GitInfo`]; [`Repository::git_info`] runs them all.
//!
//! Nothing here writes to the repository. `status` runs with
//! `--no-optional-locks` so it does not refresh the index as a side effect.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::debug;

use crate::{
    error::{Error, Result},
    identity::{GitInfo, NO_TAG, SHORT_HASH_LEN},
};

/// Environment variables set by git hooks that would override `-C`.
const GIT_ENV_OVERRIDES: [&str; 3] = ["GIT_DIR", "GIT_WORK_TREE", "GIT_INDEX_FILE"];

/// A git working tree inspected through the `git` command line.
#[derive(Clone, Debug)]
pub struct Repository {
    workdir: PathBuf,
    program: PathBuf,
}

impl Repository {
    /// Open the working tree containing `path` using `git` from `PATH`.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, "git")
    }

    /// Open the working tree containing `path` using a specific git executable.
    ///
    /// Fails with [`Error::NotARepository`] when `path` is not inside a working
    /// tree, and with [`Error::Spawn`] when the executable cannot be run.
    pub fn open_with(path: &Path, program: impl Into<PathBuf>) -> Result<Self> {
        let repo = Self {
            workdir: path.to_path_buf(),
            program: program.into(),
        };

        match repo.run(["rev-parse", "--is-inside-work-tree"]) {
            Ok(out) if out.trim() == "true" => Ok(repo),
            Ok(_) | Err(Error::CommandFailed { .. }) => {
                Err(Error::NotARepository(path.to_path_buf()))
            },
            Err(e) => Err(e),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Capture every value of the build identity.
    pub fn git_info(&self) -> Result<GitInfo> {
        let hash = self.hash()?;
        let short_hash = hash[..SHORT_HASH_LEN].to_string();
        let has_tag = self.has_tag()?;
        let info = GitInfo {
            branch: self.branch()?,
            tag: self.tag_if(has_tag)?,
            describe: self.describe_if(has_tag)?,
            is_clean: self.is_clean()?,
            is_clean_no_untracked_files: self.is_clean_no_untracked_files()?,
            hash,
            short_hash,
        };
        debug!(?info, workdir = %self.workdir.display(), "captured git info");
        Ok(info)
    }

    /// Full commit id of HEAD.
    pub fn hash(&self) -> Result<String> {
        let out = match self.run(["rev-parse", "--verify", "--quiet", "HEAD^{commit}"]) {
            Ok(out) => out,
            Err(Error::CommandFailed { .. }) => {
                return Err(Error::NoCommits(self.workdir.clone()))
            },
            Err(e) => return Err(e),
        };
        let hash = out.trim();
        if !is_commit_id(hash) {
            return Err(Error::MalformedHash(hash.to_string()));
        }
        Ok(hash.to_string())
    }

    /// Checked-out branch name; `HEAD` when detached.
    pub fn branch(&self) -> Result<String> {
        Ok(self.run(["rev-parse", "--abbrev-ref", "HEAD"])?.trim().to_string())
    }

    /// Whether any tag is reachable from HEAD.
    pub fn has_tag(&self) -> Result<bool> {
        Ok(!self.run(["tag", "--merged", "HEAD"])?.trim().is_empty())
    }

    /// Nearest tag reachable from HEAD, or [`NO_TAG`].
    pub fn tag(&self) -> Result<String> {
        self.tag_if(self.has_tag()?)
    }

    /// `git describe --tags`, or [`NO_TAG`] when no tag is reachable.
    pub fn describe(&self) -> Result<String> {
        self.describe_if(self.has_tag()?)
    }

    fn tag_if(&self, has_tag: bool) -> Result<String> {
        if !has_tag {
            return Ok(NO_TAG.to_string());
        }
        Ok(self
            .run(["describe", "--tags", "--abbrev=0"])?
            .trim()
            .to_string())
    }

    fn describe_if(&self, has_tag: bool) -> Result<String> {
        if !has_tag {
            return Ok(NO_TAG.to_string());
        }
        Ok(self.run(["describe", "--tags"])?.trim().to_string())
    }

    /// No modified, staged, deleted or untracked files.
    pub fn is_clean(&self) -> Result<bool> {
        let out = self.run(["--no-optional-locks", "status", "--porcelain"])?;
        Ok(out.trim().is_empty())
    }

    /// No modified, staged or deleted tracked files. Untracked files are ignored.
    pub fn is_clean_no_untracked_files(&self) -> Result<bool> {
        let out = self.run([
            "--no-optional-locks",
            "status",
            "--porcelain",
            "--untracked-files=no",
        ])?;
        Ok(out.trim().is_empty())
    }

    /// Absolute path of the `.git` directory for this working tree.
    pub fn git_dir(&self) -> Result<PathBuf> {
        Ok(PathBuf::from(
            self.run(["rev-parse", "--absolute-git-dir"])?.trim(),
        ))
    }

    /// Directory holding refs shared between linked worktrees.
    ///
    /// Same as [`git_dir`](Self::git_dir) for an ordinary checkout.
    pub fn common_dir(&self) -> Result<PathBuf> {
        let dir = PathBuf::from(self.run(["rev-parse", "--git-common-dir"])?.trim());
        if dir.is_absolute() {
            Ok(dir)
        } else {
            Ok(self.workdir.join(dir))
        }
    }

    /// Root of the working tree.
    pub fn toplevel(&self) -> Result<PathBuf> {
        Ok(PathBuf::from(
            self.run(["rev-parse", "--show-toplevel"])?.trim(),
        ))
    }

    /// Absolute paths of every file in the index, across the whole working tree.
    ///
    /// Includes tracked files that have been deleted from disk.
    pub fn tracked_files(&self) -> Result<Vec<PathBuf>> {
        let toplevel = self.toplevel()?;
        let out = self.run(["ls-files", "-z", "--full-name", "--", ":/"])?;
        Ok(out
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(|p| toplevel.join(p))
            .collect())
    }

    fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args
            .into_iter()
            .map(|a| a.as_ref().to_os_string())
            .collect();
        let command = format!(
            "{} -C {} {}",
            self.program.display(),
            self.workdir.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        debug!(%command, "running git");

        let mut cmd = Command::new(&self.program);
        cmd.arg("-C").arg(&self.workdir).args(&args);
        for var in GIT_ENV_OVERRIDES {
            cmd.env_remove(var);
        }
        let output = cmd.output().map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| Error::NonUtf8Output(command))
    }
}

/// SHA-1 (40) or SHA-256 (64) lowercase hex.
fn is_commit_id(s: &str) -> bool {
    matches!(s.len(), 40 | 64) && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
