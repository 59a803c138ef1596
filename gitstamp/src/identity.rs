//! The build identity data model.
//!
//! [`GitInfo`] is the owned snapshot produced at build time by
//! [`Repository::git_info`](crate::Repository::git_info). [`BuildIdentity`] is
//! the borrowed view of the same seven values; the generated constant
//! `BUILD_IDENTITY` is a `BuildIdentity<'static>` so reading it at runtime costs
//! nothing.
//!
//! [`Field`] fixes the order and names of the values. Every renderer walks
//! [`Field::ALL`], which keeps the text, Rust, env and template outputs in sync.

use serde::Serialize;
use std::fmt;

/// Branch name reported when HEAD is detached.
pub const DETACHED_BRANCH: &str = "HEAD";

/// Tag and describe value when no tag is reachable from HEAD.
pub const NO_TAG: &str = "";

/// Length of [`GitInfo::short_hash`].
pub const SHORT_HASH_LEN: usize = 7;

/// One of the seven baked-in values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Hash,
    Branch,
    Tag,
    Describe,
    ShortHash,
    IsClean,
    IsCleanNoUntrackedFiles,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Hash,
        Field::Branch,
        Field::Tag,
        Field::Describe,
        Field::ShortHash,
        Field::IsClean,
        Field::IsCleanNoUntrackedFiles,
    ];

    /// Name of the generated constant and `rustc-env` variable.
    pub fn const_name(self) -> &'static str {
        match self {
            Field::Hash => "GIT_HASH",
            Field::Branch => "GIT_BRANCH",
            Field::Tag => "GIT_TAG",
            Field::Describe => "GIT_DESCRIBE",
            Field::ShortHash => "GIT_SHORT_HASH",
            Field::IsClean => "GIT_IS_CLEAN",
            Field::IsCleanNoUntrackedFiles => "GIT_IS_CLEAN_NO_UNTRACKED_FILES",
        }
    }

    /// Key used in `{{ key }}` template placeholders.
    pub fn key(self) -> &'static str {
        match self {
            Field::Hash => "hash",
            Field::Branch => "branch",
            Field::Tag => "tag",
            Field::Describe => "describe",
            Field::ShortHash => "short_hash",
            Field::IsClean => "is_clean",
            Field::IsCleanNoUntrackedFiles => "is_clean_no_untracked_files",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn is_bool(self) -> bool {
        matches!(self, Field::IsClean | Field::IsCleanNoUntrackedFiles)
    }
}

/// Value of a [`Field`] as read from a [`BuildIdentity`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value<'a> {
    Str(&'a str),
    Bool(bool),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Immutable description of the source tree a program was built from.
///
/// Usually obtained through the generated `BUILD_IDENTITY` constant; see
/// [`include_build_identity!`](crate::include_build_identity).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildIdentity<'a> {
    /// Full commit id of HEAD
    pub hash: &'a str,
    /// Checked-out branch, or [`DETACHED_BRANCH`]
    pub branch: &'a str,
    /// Nearest reachable tag, or [`NO_TAG`]
    pub tag: &'a str,
    /// `git describe --tags`, or [`NO_TAG`]
    pub describe: &'a str,
    /// Abbreviated commit id, a prefix of `hash`
    pub short_hash: &'a str,
    /// No tracked changes and no untracked files
    pub is_clean: bool,
    /// No tracked changes; untracked files allowed
    pub is_clean_no_untracked_files: bool,
}

impl<'a> BuildIdentity<'a> {
    pub fn get(&self, field: Field) -> Value<'a> {
        match field {
            Field::Hash => Value::Str(self.hash),
            Field::Branch => Value::Str(self.branch),
            Field::Tag => Value::Str(self.tag),
            Field::Describe => Value::Str(self.describe),
            Field::ShortHash => Value::Str(self.short_hash),
            Field::IsClean => Value::Bool(self.is_clean),
            Field::IsCleanNoUntrackedFiles => Value::Bool(self.is_clean_no_untracked_files),
        }
    }

    pub fn is_detached(&self) -> bool {
        self.branch == DETACHED_BRANCH
    }

    pub fn has_tag(&self) -> bool {
        self.tag != NO_TAG
    }
}

/// Prints the seven values as `NAME = VALUE` lines.
impl fmt::Display for BuildIdentity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = Field::ALL
            .iter()
            .map(|field| field.const_name().len())
            .max()
            .unwrap_or(0);
        for field in Field::ALL {
            writeln!(
                f,
                "{:<width$} = {}",
                field.const_name(),
                self.get(field),
                width = width
            )?;
        }
        Ok(())
    }
}

/// Owned build identity, as captured from a repository.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GitInfo {
    pub hash: String,
    pub branch: String,
    pub tag: String,
    pub describe: String,
    pub short_hash: String,
    pub is_clean: bool,
    pub is_clean_no_untracked_files: bool,
}

impl GitInfo {
    pub fn identity(&self) -> BuildIdentity<'_> {
        BuildIdentity {
            hash: &self.hash,
            branch: &self.branch,
            tag: &self.tag,
            describe: &self.describe,
            short_hash: &self.short_hash,
            is_clean: self.is_clean,
            is_clean_no_untracked_files: self.is_clean_no_untracked_files,
        }
    }
}
