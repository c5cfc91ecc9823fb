//! File classification: MIME type, category, and category-specific
//! metadata for a walked file.

pub mod category;
pub mod exif_source;
pub mod media;
pub mod sniff;

use std::path::Path;

use den_core::constants::DEFAULT_SNIFF_LEN;
use den_core::types::{CatalogEntry, Category, Extension};

use crate::times;
use crate::walker::WalkedFile;

pub use category::category_for;
pub use exif_source::ExifSource;
pub use media::{MediaInfo, MediaKind, MediaSource, NoMediaSource, StreamReport};

/// Result of classifying one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub mime: String,
    pub extension: Extension,
}

impl Classification {
    pub fn category(&self) -> Category {
        self.extension.category()
    }
}

pub struct Classifier {
    media: Box<dyn MediaSource>,
    sniff_len: usize,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ExifSource)
    }
}

impl Classifier {
    pub fn new(media: impl MediaSource + 'static) -> Self {
        Self {
            media: Box::new(media),
            sniff_len: DEFAULT_SNIFF_LEN,
        }
    }

    pub fn with_sniff_len(mut self, sniff_len: usize) -> Self {
        self.sniff_len = sniff_len.max(1);
        self
    }

    pub fn classify(&self, path: &Path) -> Classification {
        let mime = sniff::determine_mime(path, self.sniff_len);
        let category = category_for(&mime);
        let info = if category.is_media() {
            media::probe_or_default(self.media.as_ref(), path)
        } else {
            MediaInfo::default()
        };
        Classification {
            mime,
            extension: extension_for(category, info),
        }
    }

    /// Build the catalog entry for a walked file.
    pub fn entry_for(&self, file: &WalkedFile) -> CatalogEntry {
        let Classification { mime, extension } = self.classify(&file.path);
        CatalogEntry {
            path: file.key.clone(),
            size: file.size(),
            created_guess: times::created_guess(&file.metadata),
            modified: file.modified_secs(),
            mime,
            extension,
        }
    }
}

/// Category attributes from the probe. A video-typed file whose probe
/// reports only audio is stored as audio.
pub fn extension_for(category: Category, info: MediaInfo) -> Extension {
    match category {
        Category::Other => Extension::None,
        Category::Document => Extension::Document,
        Category::Picture => Extension::Picture {
            camera: info.camera,
        },
        Category::Video if info.kind != MediaKind::Audio => Extension::Video {
            seconds: info.seconds,
            camera: info.camera,
            year: info.year,
        },
        Category::Video | Category::Audio => Extension::Audio {
            seconds: info.seconds,
            author: info.author,
            year: info.year,
        },
    }
}
