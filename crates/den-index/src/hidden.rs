//! Platform-specific "is this entry hidden" check.

use walkdir::DirEntry;

/// Unix: a dot-prefixed name other than `.` itself.
#[cfg(unix)]
pub fn is_hidden(entry: &DirEntry) -> bool {
    is_hidden_name(&entry.file_name().to_string_lossy())
}

/// Windows: the `FILE_ATTRIBUTE_HIDDEN` attribute. Entries whose metadata
/// cannot be read are treated as visible; the walk reports the error later.
#[cfg(windows)]
pub fn is_hidden(entry: &DirEntry) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    entry
        .metadata()
        .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(any(unix, windows)))]
pub fn is_hidden(_entry: &DirEntry) -> bool {
    false
}

pub fn is_hidden_name(name: &str) -> bool {
    name.len() > 1 && name.starts_with('.')
}
