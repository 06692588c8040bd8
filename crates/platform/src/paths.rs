//! Path expansion and PATH-like list utilities

use crate::error::PlatformError;
use std::path::{Path, PathBuf};

/// Expand a path, resolving `~` to the user's home directory
pub fn expand_path<P: AsRef<Path>>(path: P) -> Result<PathBuf, PlatformError> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(PlatformError::NoHomeDirectory)?;
        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir().ok_or(PlatformError::NoHomeDirectory)
    } else {
        Ok(path.to_path_buf())
    }
}

/// Split a PATH-like value into its entries, dropping empty ones
pub fn split_path_list(value: &str, separator: char) -> Vec<&str> {
    value.split(separator).filter(|entry| !entry.is_empty()).collect()
}

/// Join entries into a PATH-like value
pub fn join_path_list<'a, I>(entries: I, separator: char) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    entries
        .into_iter()
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}
