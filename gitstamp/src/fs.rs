use std::{fs, path::Path};
use tracing::debug;

use crate::error::{Error, Result};

/// Write `contents` to `path` unless the file already holds exactly that.
///
/// Leaving an identical file alone keeps its mtime, so build systems watching
/// it do not rebuild. `force` writes regardless. Returns whether the file was
/// written.
pub fn write_if_changed(path: &Path, contents: &[u8], force: bool) -> Result<bool> {
    if !force {
        if let Ok(existing) = fs::read(path) {
            if existing == contents {
                debug!(path = %path.display(), "unchanged, not rewriting");
                return Ok(false);
            }
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
    }
    fs::write(path, contents).map_err(|e| Error::io(format!("writing {}", path.display()), e))?;
    Ok(true)
}
