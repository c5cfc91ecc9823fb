//! MIME → category mapping and the zip-container extension table.

use std::path::Path;

use den_core::types::Category;

/// Application types that count as documents.
const DOCUMENT_MIMES: &[&str] = &[
    "application/json",
    "application/msword",
    "application/pdf",
    "application/rtf",
    "application/vnd.oasis.opendocument.presentation",
    "application/vnd.oasis.opendocument.spreadsheet",
    "application/vnd.oasis.opendocument.text",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/x-openscad",
    "application/x-perl",
    "application/x-php",
    "application/x-powershell",
    "application/x-ruby",
    "application/x-troff-man",
    "application/xml",
    "application/yaml",
];

pub fn category_for(mime: &str) -> Category {
    if mime == "application/ogg" {
        return Category::Audio;
    }
    if DOCUMENT_MIMES.contains(&mime) {
        return Category::Document;
    }
    match mime.split('/').next().unwrap_or_default() {
        "image" => Category::Picture,
        "video" => Category::Video,
        "audio" => Category::Audio,
        "message" | "text" => Category::Document,
        _ => Category::Other,
    }
}

/// Office and OpenDocument formats are zip containers; pick the real type
/// from the extension.
pub fn zip_document_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "odp" => "application/vnd.oasis.opendocument.presentation",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => return None,
    };
    Some(mime)
}
