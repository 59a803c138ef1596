// @generated by gitstamp. Do not edit.

#[allow(dead_code)]
pub const GIT_HASH: &str = "abc1234def5678abc1234def5678abc1234def56";
#[allow(dead_code)]
pub const GIT_BRANCH: &str = "main";
#[allow(dead_code)]
pub const GIT_TAG: &str = "v1.0.0";
#[allow(dead_code)]
pub const GIT_DESCRIBE: &str = "v1.0.0";
#[allow(dead_code)]
pub const GIT_SHORT_HASH: &str = "abc1234";
#[allow(dead_code)]
pub const GIT_IS_CLEAN: bool = true;
#[allow(dead_code)]
pub const GIT_IS_CLEAN_NO_UNTRACKED_FILES: bool = true;

#[allow(dead_code)]
pub const BUILD_IDENTITY: ::gitstamp::BuildIdentity<'static> = ::gitstamp::BuildIdentity {
    hash: GIT_HASH,
    branch: GIT_BRANCH,
    tag: GIT_TAG,
    describe: GIT_DESCRIBE,
    short_hash: GIT_SHORT_HASH,
    is_clean: GIT_IS_CLEAN,
    is_clean_no_untracked_files: GIT_IS_CLEAN_NO_UNTRACKED_FILES,
};
