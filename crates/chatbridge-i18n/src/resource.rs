//! Discovery of Fluent files on disk.

use crate::error::{I18nError, I18nResult};
use crate::locale::is_discord_locale;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the resource file inside each locale directory.
pub const RESOURCE_FILE: &str = "main.ftl";

/// One locale's Fluent source read from disk.
#[derive(Debug, Clone)]
pub struct LocaleSource {
    /// Locale code taken from the directory name.
    pub code: String,
    /// Path of the file that was read.
    pub path: PathBuf,
    /// File contents.
    pub text: String,
}

/// Reads `<dir>/<locale>/main.ftl` for every sub-directory named after a
/// Discord locale, sorted by locale code.
pub fn discover(dir: &Path) -> I18nResult<Vec<LocaleSource>> {
    let mut sources = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let name = entry.file_name();
        let Some(code) = name.to_str().filter(|code| is_discord_locale(code)) else {
            debug!(tag = "setup", "Skipping non-locale directory {:?}", entry.path());
            continue;
        };

        let path = entry.path().join(RESOURCE_FILE);
        if !path.is_file() {
            warn!(tag = "warn", "Locale directory {code} has no {RESOURCE_FILE}");
            continue;
        }

        let text = fs::read_to_string(&path).map_err(|source| I18nError::ResourceLoad {
            path: path.display().to_string(),
            source,
        })?;

        sources.push(LocaleSource {
            code: code.to_string(),
            path,
            text,
        });
    }

    sources.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(sources)
}
