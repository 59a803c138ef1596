//! Bake git build metadata into Rust programs.
//!
//! At build time a [`build::Builder`] inspects the crate's git working tree and
//! generates seven constants:
//!
//! | Constant | Value |
//! |---|---|
//! | `GIT_HASH` | full commit id of HEAD |
//! | `GIT_BRANCH` | checked-out branch, `"HEAD"` when detached |
//! | `GIT_TAG` | nearest reachable tag, `""` when none |
//! | `GIT_DESCRIBE` | `git describe --tags`, `""` when no tag |
//! | `GIT_SHORT_HASH` | first 7 characters of `GIT_HASH` |
//! | `GIT_IS_CLEAN` | no tracked changes and no untracked files |
//! | `GIT_IS_CLEAN_NO_UNTRACKED_FILES` | no tracked changes |
//!
//! plus `BUILD_IDENTITY`, a [`BuildIdentity<'static>`] holding all of them.
//! [`include_build_identity!`] brings them into scope. Nothing is computed at
//! runtime and there is no runtime error path; a repository that cannot be
//! inspected fails the build instead.

pub mod build;
mod error;
mod fs;
mod identity;
pub mod render;
mod repository;
mod template;

pub use error::{Error, Result};
pub use fs::write_if_changed;
pub use identity::{
    BuildIdentity, Field, GitInfo, Value, DETACHED_BRANCH, NO_TAG, SHORT_HASH_LEN,
};
pub use repository::Repository;
pub use template::{Template, TemplateError, TemplateErrorKind};

/// Include the constants generated by [`build::Builder::emit`].
///
/// With no argument this includes [`build::DEFAULT_FILE_NAME`]; pass the name
/// given to [`build::Builder::file_name`] otherwise.
#[macro_export]
macro_rules! include_build_identity {
    () => {
        include!(concat!(env!("OUT_DIR"), "/gitstamp.rs"));
    };
    ($file:literal) => {
        include!(concat!(env!("OUT_DIR"), "/", $file));
    };
}
