use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};
use tempfile::TempDir;

/// Run a git command in `dir`, returning stdout on success.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE")
        .env_remove("GIT_INDEX_FILE")
        .output()
        .with_context(|| format!("running git {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "git {} failed in {}:\n{stderr}",
            args.join(" "),
            dir.display()
        );
    }

    String::from_utf8(output.stdout).context("git output is not utf-8")
}

/// Init a git repo at `repo_dir` on branch `main` with test user config.
///
/// Signing is disabled so a developer's global config cannot make commits or
/// tags prompt for a key.
pub fn init(repo_dir: &Path) -> Result<()> {
    run_git(repo_dir, &["init", "--quiet"])?;
    run_git(repo_dir, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    run_git(repo_dir, &["config", "user.name", "Test"])?;
    run_git(repo_dir, &["config", "user.email", "test@test.com"])?;
    run_git(repo_dir, &["config", "commit.gpgsign", "false"])?;
    run_git(repo_dir, &["config", "tag.gpgsign", "false"])?;
    Ok(())
}

/// Collect files changed in working tree or index (vs HEAD).
///
/// Returns absolute (canonicalized) paths. Untracked files are not included.
pub fn collect_changed_files(repo: &Path) -> Result<Vec<PathBuf>> {
    let canonical_repo = fs::canonicalize(repo).unwrap_or_else(|_| repo.to_path_buf());
    let mut files = Vec::new();
    for args in [
        &["diff", "--name-only"][..],
        &["diff", "--cached", "--name-only"],
    ] {
        let stdout = run_git(repo, args)?;
        for line in stdout.lines() {
            let line = line.trim();
            if !line.is_empty() {
                let path = canonical_repo.join(line);
                if !files.contains(&path) {
                    files.push(path);
                }
            }
        }
    }
    Ok(files)
}

/// Throwaway git repository backed by a [`TempDir`].
pub struct GitFixture {
    _temp_dir: TempDir,
    dir: PathBuf,
}

impl GitFixture {
    /// Create an empty repository on branch `main` with no commits.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("creating temp dir")?;
        let dir = fs::canonicalize(temp_dir.path()).context("canonicalizing temp dir")?;
        init(&dir)?;
        Ok(Self {
            _temp_dir: temp_dir,
            dir,
        })
    }

    /// Create a repository with a single commit adding `README.md`.
    pub fn with_commit() -> Result<Self> {
        let fixture = Self::new()?;
        fixture.commit_file("README.md", "fixture\n", "initial commit")?;
        Ok(fixture)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `contents` to `path` (relative to the repo) without staging it.
    pub fn write(&self, path: &str, contents: &str) -> Result<()> {
        let full = self.dir.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&full, contents).with_context(|| format!("writing {}", full.display()))
    }

    /// Write, stage and commit a single file. Returns the new HEAD commit id.
    pub fn commit_file(&self, path: &str, contents: &str, message: &str) -> Result<String> {
        self.write(path, contents)?;
        self.git(&["add", path])?;
        self.git(&["commit", "--quiet", "-m", message])?;
        self.head()
    }

    /// Create a lightweight tag at HEAD.
    pub fn tag(&self, name: &str) -> Result<()> {
        self.git(&["tag", name])?;
        Ok(())
    }

    /// Check out the current commit with a detached HEAD.
    pub fn detach(&self) -> Result<()> {
        self.git(&["checkout", "--quiet", "--detach"])?;
        Ok(())
    }

    /// Full commit id of HEAD.
    pub fn head(&self) -> Result<String> {
        Ok(self.git(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    /// Absolute paths of files modified in the working tree or index (vs HEAD).
    pub fn changed_files(&self) -> Result<Vec<PathBuf>> {
        collect_changed_files(&self.dir)
    }

    /// Run a git command in the fixture directory, returning stdout.
    pub fn git(&self, args: &[&str]) -> Result<String> {
        run_git(&self.dir, args)
    }
}
