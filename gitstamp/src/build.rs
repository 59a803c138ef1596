//! Build-script driver.
//!
//! Call [`Builder::emit`] from `build.rs`; it inspects the crate's working
//! tree, writes the generated constants to `OUT_DIR` and prints the cargo
//! directives that keep them current. Any failure is returned so the build
//! script can fail the build with it.
//!
//! ```ignore
//! // build.rs
//! fn main() -> Result<(), gitstamp::Error> {
//!     gitstamp::build::Builder::new().emit()?;
//!     Ok(())
//! }
//!
//! // main.rs
//! gitstamp::include_build_identity!();
//!
//! fn main() {
//!     print!("{BUILD_IDENTITY}");
//! }
//! ```

use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    error::{Error, Result},
    fs::write_if_changed,
    identity::GitInfo,
    render,
    repository::Repository,
};

/// File written to `OUT_DIR` unless overridden with [`Builder::file_name`].
pub const DEFAULT_FILE_NAME: &str = "gitstamp.rs";

/// Overrides the git executable used by build scripts.
pub const GIT_PROGRAM_ENV: &str = "GITSTAMP_GIT";

#[derive(Clone, Debug)]
pub struct Builder {
    repo: Option<PathBuf>,
    git_program: Option<PathBuf>,
    file_name: String,
    cargo_env: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            repo: None,
            git_program: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            cargo_env: true,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Working tree to inspect. Defaults to `CARGO_MANIFEST_DIR`.
    pub fn repo(mut self, path: impl Into<PathBuf>) -> Self {
        self.repo = Some(path.into());
        self
    }

    /// git executable. Defaults to `$GITSTAMP_GIT`, then `git`.
    pub fn git_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.git_program = Some(program.into());
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Whether to also print `cargo:rustc-env` directives.
    pub fn cargo_env(mut self, enabled: bool) -> Self {
        self.cargo_env = enabled;
        self
    }

    /// Generate into `OUT_DIR`, printing cargo directives to stdout.
    pub fn emit(&self) -> Result<GitInfo> {
        let out_dir = env_path("OUT_DIR")?;
        self.emit_to(&out_dir, &mut io::stdout().lock())
    }

    /// Generate into `out_dir`, writing cargo directives to `directives`.
    pub fn emit_to(&self, out_dir: &Path, directives: &mut impl Write) -> Result<GitInfo> {
        let repo_path = match &self.repo {
            Some(path) => path.clone(),
            None => env_path("CARGO_MANIFEST_DIR")?,
        };
        let program = self
            .git_program
            .clone()
            .or_else(|| env::var_os(GIT_PROGRAM_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("git"));

        let repo = Repository::open_with(&repo_path, program)?;
        let info = repo.git_info()?;
        let watched = watched_paths(&repo)?;

        let target = out_dir.join(&self.file_name);
        if write_if_changed(&target, render::rust_source(&info).as_bytes(), false)? {
            info!(path = %target.display(), "wrote build identity");
        }

        let mut text = String::new();
        for path in watched {
            text.push_str(&format!("cargo:rerun-if-changed={}\n", path.display()));
        }
        text.push_str(&format!("cargo:rerun-if-env-changed={GIT_PROGRAM_ENV}\n"));
        if self.cargo_env {
            text.push_str(&render::cargo_env(&info));
        }
        directives
            .write_all(text.as_bytes())
            .map_err(|e| Error::io("writing cargo directives", e))?;

        Ok(info)
    }
}

/// Files whose changes can alter any captured value.
///
/// Git metadata covers HEAD, branches, tags and staging; the tracked files
/// cover edits that leave the index alone. Missing git metadata paths are
/// skipped since cargo treats a missing path as always changed. A deleted
/// tracked file is kept for the same reason: the tree stays dirty until it is
/// restored or the deletion committed.
fn watched_paths(repo: &Repository) -> Result<Vec<PathBuf>> {
    let git_dir = repo.git_dir()?;
    let common_dir = repo.common_dir()?;
    let candidates = [
        git_dir.join("HEAD"),
        git_dir.join("index"),
        common_dir.join("packed-refs"),
        common_dir.join("refs"),
    ];
    let mut paths: Vec<_> = candidates.into_iter().filter(|p| p.exists()).collect();
    paths.extend(repo.tracked_files()?);
    Ok(paths)
}

fn env_path(var: &'static str) -> Result<PathBuf> {
    env::var_os(var)
        .map(PathBuf::from)
        .ok_or(Error::MissingEnv(var))
}

#[cfg(test)]
mod tests {
    use super::{Builder, DEFAULT_FILE_NAME};
    use crate::error::Error;
    use git_fixture::GitFixture;
    use std::{fs, io};
    use tempfile::TempDir;

    #[test]
    fn writes_source_and_directives() {
        let fixture = GitFixture::with_commit().unwrap();
        fixture.tag("v1.0.0").unwrap();
        let out_dir = TempDir::new().unwrap();
        let mut directives = Vec::new();

        let info = Builder::new()
            .repo(fixture.dir())
            .emit_to(out_dir.path(), &mut directives)
            .unwrap();

        let source = fs::read_to_string(out_dir.path().join(DEFAULT_FILE_NAME)).unwrap();
        assert!(source.contains(&format!("pub const GIT_HASH: &str = \"{}\";", info.hash)));
        assert!(source.contains("pub const GIT_TAG: &str = \"v1.0.0\";"));

        let directives = String::from_utf8(directives).unwrap();
        let head = fixture.dir().join(".git").join("HEAD");
        assert!(
            directives.contains(&format!("cargo:rerun-if-changed={}\n", head.display())),
            "{directives}"
        );
        assert!(directives.contains("cargo:rerun-if-changed="));
        assert!(directives.contains("cargo:rerun-if-env-changed=GITSTAMP_GIT\n"));
        assert!(directives.contains("cargo:rustc-env=GIT_BRANCH=main\n"));
    }

    #[test]
    fn tracked_files_trigger_rerun() {
        let fixture = GitFixture::with_commit().unwrap();
        fixture.commit_file("demo/src/main.rs", "fn main() {}\n", "demo").unwrap();
        let out_dir = TempDir::new().unwrap();
        let mut directives = Vec::new();

        Builder::new()
            .repo(fixture.dir().join("demo"))
            .emit_to(out_dir.path(), &mut directives)
            .unwrap();

        let directives = String::from_utf8(directives).unwrap();
        for file in ["README.md", "demo/src/main.rs"] {
            let line = format!(
                "cargo:rerun-if-changed={}\n",
                fixture.dir().join(file).display()
            );
            assert!(directives.contains(&line), "{file} not watched:\n{directives}");
        }
    }

    #[test]
    fn edited_tracked_file_is_dirty_on_rerun() {
        let fixture = GitFixture::with_commit().unwrap();
        let out_dir = TempDir::new().unwrap();
        let builder = Builder::new().repo(fixture.dir());
        let target = out_dir.path().join(DEFAULT_FILE_NAME);

        builder.emit_to(out_dir.path(), &mut io::sink()).unwrap();
        assert!(fs::read_to_string(&target)
            .unwrap()
            .contains("pub const GIT_IS_CLEAN: bool = true;"));

        fixture.write("README.md", "edited\n").unwrap();
        builder.emit_to(out_dir.path(), &mut io::sink()).unwrap();
        let source = fs::read_to_string(&target).unwrap();
        assert!(source.contains("pub const GIT_IS_CLEAN: bool = false;"));
        assert!(source.contains("pub const GIT_IS_CLEAN_NO_UNTRACKED_FILES: bool = false;"));
    }

    #[test]
    fn custom_file_name_without_env() {
        let fixture = GitFixture::with_commit().unwrap();
        let out_dir = TempDir::new().unwrap();
        let mut directives = Vec::new();

        Builder::new()
            .repo(fixture.dir())
            .file_name("identity.rs")
            .cargo_env(false)
            .emit_to(out_dir.path(), &mut directives)
            .unwrap();

        assert!(out_dir.path().join("identity.rs").exists());
        assert!(!String::from_utf8(directives)
            .unwrap()
            .contains("cargo:rustc-env"));
    }

    #[test]
    fn rerun_keeps_unchanged_file() {
        let fixture = GitFixture::with_commit().unwrap();
        let out_dir = TempDir::new().unwrap();
        let builder = Builder::new().repo(fixture.dir());
        let target = out_dir.path().join(DEFAULT_FILE_NAME);

        builder.emit_to(out_dir.path(), &mut io::sink()).unwrap();
        let first = fs::metadata(&target).unwrap().modified().unwrap();
        builder.emit_to(out_dir.path(), &mut io::sink()).unwrap();
        let second = fs::metadata(&target).unwrap().modified().unwrap();
        assert_eq!(first, second);

        fixture.write("untracked.txt", "x").unwrap();
        builder.emit_to(out_dir.path(), &mut io::sink()).unwrap();
        let source = fs::read_to_string(&target).unwrap();
        assert!(source.contains("pub const GIT_IS_CLEAN: bool = false;"));
        assert!(source.contains("pub const GIT_IS_CLEAN_NO_UNTRACKED_FILES: bool = true;"));
    }

    #[test]
    fn non_repository_fails_loudly() {
        let not_repo = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        let err = Builder::new()
            .repo(not_repo.path())
            .emit_to(out_dir.path(), &mut io::sink())
            .unwrap_err();

        assert!(matches!(err, Error::NotARepository(_)), "{err}");
        assert!(!out_dir.path().join(DEFAULT_FILE_NAME).exists());
    }

    #[cfg(unix)]
    #[test]
    fn failed_watch_query_writes_nothing() {
        use std::os::unix::fs::PermissionsExt;

        let fixture = GitFixture::with_commit().unwrap();
        let out_dir = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        let wrapper = bin.path().join("git");
        fs::write(
            &wrapper,
            "#!/bin/sh\ncase \"$*\" in *ls-files*) exit 1;; esac\nexec git \"$@\"\n",
        )
        .unwrap();
        fs::set_permissions(&wrapper, fs::Permissions::from_mode(0o755)).unwrap();
        let mut directives = Vec::new();

        let err = Builder::new()
            .repo(fixture.dir())
            .git_program(&wrapper)
            .emit_to(out_dir.path(), &mut directives)
            .unwrap_err();

        assert!(matches!(err, Error::CommandFailed { .. }), "{err}");
        assert!(!out_dir.path().join(DEFAULT_FILE_NAME).exists());
        assert!(directives.is_empty());
    }

    #[test]
    fn missing_git_fails_loudly() {
        let fixture = GitFixture::with_commit().unwrap();
        let out_dir = TempDir::new().unwrap();

        let err = Builder::new()
            .repo(fixture.dir())
            .git_program("gitstamp-no-such-git")
            .emit_to(out_dir.path(), &mut io::sink())
            .unwrap_err();

        assert!(matches!(err, Error::Spawn { .. }), "{err}");
    }
}
