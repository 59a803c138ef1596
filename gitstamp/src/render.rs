//! Built-in output formats for a captured [`GitInfo`].

use crate::{
    error::Result,
    identity::{BuildIdentity, Field, GitInfo, Value},
};

/// `NAME = VALUE` lines, as printed by the example consumer.
pub fn text(identity: &BuildIdentity<'_>) -> String {
    identity.to_string()
}

/// Rust source defining the seven constants and `BUILD_IDENTITY`.
///
/// Meant to be written to `OUT_DIR` and pulled in with
/// [`include_build_identity!`](crate::include_build_identity).
pub fn rust_source(info: &GitInfo) -> String {
    let identity = info.identity();
    let mut out = String::from("// @generated by gitstamp. Do not edit.\n\n");

    for field in Field::ALL {
        let (ty, literal) = match identity.get(field) {
            Value::Str(s) => ("&str", format!("{s:?}")),
            Value::Bool(b) => ("bool", b.to_string()),
        };
        out.push_str(&format!(
            "#[allow(dead_code)]\npub const {}: {ty} = {literal};\n",
            field.const_name()
        ));
    }

    out.push_str("\n#[allow(dead_code)]\npub const BUILD_IDENTITY: ::gitstamp::BuildIdentity<'static> = ::gitstamp::BuildIdentity {\n");
    for field in Field::ALL {
        out.push_str(&format!("    {}: {},\n", field.key(), field.const_name()));
    }
    out.push_str("};\n");
    out
}

/// `cargo:rustc-env` directives so values are also readable with `env!`.
pub fn cargo_env(info: &GitInfo) -> String {
    let identity = info.identity();
    let mut out = String::new();
    for field in Field::ALL {
        out.push_str(&format!(
            "cargo:rustc-env={}={}\n",
            field.const_name(),
            identity.get(field)
        ));
    }
    out
}

pub fn json(info: &GitInfo) -> Result<String> {
    Ok(serde_json::to_string_pretty(info)?)
}
