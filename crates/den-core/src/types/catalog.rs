//! Catalog record types.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Mutually exclusive media category of a cataloged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Picture,
    Video,
    Audio,
    Document,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Picture,
        Category::Video,
        Category::Audio,
        Category::Document,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Picture => "picture",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Other => "other",
        }
    }

    /// Name of the extension table, `None` for [`Category::Other`].
    pub fn table(&self) -> Option<&'static str> {
        match self {
            Self::Other => None,
            other => Some(other.as_str()),
        }
    }

    /// Whether files of this category get media metadata probed.
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Picture | Self::Video | Self::Audio)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category-specific attributes attached to a catalog entry.
///
/// An entry owns at most one extension; [`Extension::None`] means the file
/// is cataloged as [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Extension {
    #[default]
    None,
    Picture {
        camera: Option<String>,
    },
    Video {
        seconds: Option<i64>,
        camera: Option<String>,
        year: Option<i32>,
    },
    Audio {
        seconds: Option<i64>,
        author: Option<String>,
        year: Option<i32>,
    },
    Document,
}

impl Extension {
    pub fn category(&self) -> Category {
        match self {
            Self::None => Category::Other,
            Self::Picture { .. } => Category::Picture,
            Self::Video { .. } => Category::Video,
            Self::Audio { .. } => Category::Audio,
            Self::Document => Category::Document,
        }
    }
}

/// A file as stored in the catalog. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub path: String,
    pub size: i64,
    pub created_guess: i64,
    pub modified: i64,
    pub mime: String,
    pub extension: Extension,
}

impl CatalogEntry {
    pub fn category(&self) -> Category {
        self.extension.category()
    }
}

/// The part of a stored entry that rescans compare against the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredFileState {
    pub size: i64,
    pub modified: i64,
}

/// The catalog key for a filesystem path.
///
/// Non-UTF-8 names are converted lossily; walks and stored rows use the same
/// conversion so keys stay comparable.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_determines_category() {
        assert_eq!(Extension::None.category(), Category::Other);
        assert_eq!(Extension::Document.category(), Category::Document);
        let audio = Extension::Audio {
            seconds: Some(1),
            author: None,
            year: None,
        };
        assert_eq!(audio.category(), Category::Audio);
    }

    #[test]
    fn other_has_no_table() {
        assert_eq!(Category::Other.table(), None);
        assert_eq!(Category::Video.table(), Some("video"));
        assert!(Category::Picture.is_media());
        assert!(!Category::Document.is_media());
    }

    #[test]
    fn entries_serialize_with_tagged_extensions() {
        let entry = CatalogEntry {
            path: "/m/clip.mp4".into(),
            size: 10,
            created_guess: 1,
            modified: 2,
            mime: "video/mp4".into(),
            extension: Extension::Video {
                seconds: Some(90),
                camera: None,
                year: Some(2020),
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["extension"]["kind"], "video");
        assert_eq!(json["extension"]["seconds"], 90);

        let back: CatalogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
        assert_eq!(
            serde_json::to_value(Category::Picture).unwrap(),
            serde_json::json!("picture")
        );
    }
}
