//! MIME determination: byte-signature sniffing of the file head, with
//! extension lookup as fallback and override.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use infer::MatcherType;

use super::category::zip_document_mime;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN: &str = "text/plain";
pub const SVG: &str = "image/svg+xml";
pub const ZIP: &str = "application/zip";
pub const TEXT_HTML: &str = "text/html";
pub const TEXT_XML: &str = "text/xml";

/// Read at most `len` bytes from the start of `path`.
pub fn read_head(path: &Path, len: usize) -> io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(len);
    File::open(path)?.take(len as u64).read_to_end(&mut head)?;
    Ok(head)
}

/// Content type from leading bytes. Empty input sniffs as plain text;
/// unrecognized binary data as `application/octet-stream`.
///
/// Every zip container, office formats and jars included, sniffs as plain
/// `application/zip`; [`refine`] lets the extension tell them apart.
pub fn detect(head: &[u8]) -> &'static str {
    if head.is_empty() {
        return TEXT_PLAIN;
    }
    if infer::archive::is_zip(head) {
        return ZIP;
    }
    match infer::get(head) {
        Some(kind) if kind.matcher_type() == MatcherType::Text => markup(kind.mime_type()),
        Some(kind) => kind.mime_type(),
        None if is_textual(head) => TEXT_PLAIN,
        None => OCTET_STREAM,
    }
}

// HTML and XML keep their own type; any other text signature is plain text.
fn markup(mime: &'static str) -> &'static str {
    match mime {
        TEXT_HTML | TEXT_XML => mime,
        _ => TEXT_PLAIN,
    }
}

fn is_textual(head: &[u8]) -> bool {
    const BOMS: [&[u8]; 3] = [b"\xEF\xBB\xBF", b"\xFE\xFF", b"\xFF\xFE"];
    if BOMS.iter().any(|bom| head.starts_with(bom)) {
        return true;
    }
    !head.iter().any(|&b| is_binary_byte(b))
}

// Control bytes that do not occur in text.
fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

/// MIME type registered for the path's extension.
pub fn by_extension(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
}

/// Drop a parameter suffix such as `; charset=utf-8`.
pub fn strip_params(mime: &str) -> &str {
    mime.split(';').next().unwrap_or(mime).trim()
}

/// Combine the sniffed type with the extension's verdict.
///
/// `read_any` is false when the file was empty.
pub fn refine(sniffed: &str, read_any: bool, path: &Path) -> String {
    let sniffed = strip_params(sniffed);
    if !read_any || sniffed == OCTET_STREAM {
        return by_extension(path).unwrap_or_else(|| sniffed.to_string());
    }
    match sniffed {
        TEXT_PLAIN | TEXT_XML if by_extension(path).as_deref() == Some(SVG) => SVG.to_string(),
        ZIP => zip_document_mime(path).unwrap_or(ZIP).to_string(),
        other => other.to_string(),
    }
}

/// Final MIME type of the file at `path`. A file that cannot be read falls
/// back to its extension.
pub fn determine_mime(path: &Path, sniff_len: usize) -> String {
    match read_head(path, sniff_len) {
        Ok(head) => refine(detect(&head), !head.is_empty(), path),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not sniff content type");
            refine(OCTET_STREAM, true, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

    fn zip_bytes() -> Vec<u8> {
        let mut bytes = b"PK\x03\x04".to_vec();
        bytes.extend_from_slice(&[0u8; 60]);
        bytes
    }

    const ODT_MIME: &[u8] = b"application/vnd.oasis.opendocument.text";
    const CONTENT_XML: &[u8] =
        b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><office:document-content/>";

    /// One uncompressed zip member: local file header followed by the data.
    fn stored_member(name: &str, data: &[u8], crc: u32) -> Vec<u8> {
        let size = (data.len() as u32).to_le_bytes();
        let mut bytes = b"PK\x03\x04".to_vec();
        bytes.extend_from_slice(&20u16.to_le_bytes()); // version needed
        bytes.extend_from_slice(&[0u8; 8]); // flags, method (stored), time, date
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&size);
        bytes.extend_from_slice(&size);
        bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(name.as_bytes());
        bytes.extend_from_slice(data);
        bytes
    }

    /// The head of an OpenDocument text file: `mimetype` stored first.
    fn odt_bytes() -> Vec<u8> {
        let mut bytes = stored_member("mimetype", ODT_MIME, 0x0C32_C65E);
        bytes.extend(stored_member("content.xml", CONTENT_XML, 0x3428_BCAD));
        bytes
    }

    #[test]
    fn signatures_win_over_extensions() {
        assert_eq!(detect(JPEG), "image/jpeg");
        assert_eq!(refine(detect(JPEG), true, Path::new("/x/photo.txt")), "image/jpeg");
    }

    #[test]
    fn text_and_binary_fallbacks() {
        assert_eq!(detect(b"hello\nworld\n"), TEXT_PLAIN);
        assert_eq!(detect(&[0x00, 0x01, 0x02, 0x9C]), OCTET_STREAM);
        assert_eq!(detect(b""), TEXT_PLAIN);
    }

    #[test]
    fn octet_stream_and_empty_files_use_the_extension() {
        assert_eq!(
            refine(OCTET_STREAM, true, Path::new("/x/song.mp3")),
            "audio/mpeg"
        );
        assert_eq!(refine(TEXT_PLAIN, false, Path::new("/x/doc.pdf")), "application/pdf");
        assert_eq!(refine(TEXT_PLAIN, false, Path::new("/x/noext")), TEXT_PLAIN);
        assert_eq!(
            refine(OCTET_STREAM, true, Path::new("/x/blob.unknownext")),
            OCTET_STREAM
        );
    }

    #[test]
    fn svg_text_is_reclassified() {
        assert_eq!(refine(TEXT_PLAIN, true, Path::new("/x/logo.svg")), SVG);
        assert_eq!(refine("text/xml", true, Path::new("/x/logo.SVG")), SVG);
        assert_eq!(refine("text/xml", true, Path::new("/x/feed.xml")), "text/xml");
    }

    #[test]
    fn zip_is_disambiguated_by_extension() {
        let bytes = zip_bytes();
        let sniffed = detect(&bytes);
        assert_eq!(sniffed, ZIP);
        assert_eq!(
            refine(sniffed, true, Path::new("/x/report.docx")),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(
            refine(sniffed, true, Path::new("/x/slides.ODP")),
            "application/vnd.oasis.opendocument.presentation"
        );
        assert_eq!(refine(sniffed, true, Path::new("/x/archive.zip")), ZIP);
        assert_eq!(refine(sniffed, true, Path::new("/x/app.jar")), ZIP);
    }

    #[test]
    fn office_containers_sniff_as_plain_zip() {
        let odt = odt_bytes();
        assert_eq!(
            infer::get(&odt).map(|kind| kind.mime_type()),
            Some("application/vnd.oasis.opendocument.text")
        );
        assert_eq!(detect(&odt), ZIP);
        assert_eq!(refine(detect(&odt), true, Path::new("/x/archive.zip")), ZIP);
        assert_eq!(
            refine(detect(&odt), true, Path::new("/x/letter.odt")),
            "application/vnd.oasis.opendocument.text"
        );

        let epub = stored_member("mimetype", b"application/epub+zip", 0x2CAB_616F);
        assert_eq!(detect(&epub), ZIP);
        assert_eq!(refine(detect(&epub), true, Path::new("/x/book.zip")), ZIP);
    }

    #[test]
    fn renamed_office_file_on_disk_stays_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.zip");
        std::fs::write(&path, odt_bytes()).unwrap();
        assert_eq!(determine_mime(&path, 512), ZIP);
    }

    #[test]
    fn markup_is_told_apart_from_plain_text() {
        assert_eq!(detect(b"<?xml version=\"1.0\"?><feed/>"), TEXT_XML);
        assert_eq!(detect(b"\n  <?XML version=\"1.0\"?>"), TEXT_XML);
        assert_eq!(detect(b"<!DOCTYPE html>\n<html></html>"), TEXT_HTML);
        assert_eq!(detect(b"\t<HTML lang=\"en\">"), TEXT_HTML);
        assert_eq!(detect(b"<htmlish>"), TEXT_PLAIN);
        assert_eq!(detect(b"#!/bin/sh\necho hi\n"), TEXT_PLAIN);
    }

    #[test]
    fn xml_svg_on_disk_is_reclassified() {
        let dir = tempfile::tempdir().unwrap();
        let svg = dir.path().join("logo.svg");
        std::fs::write(
            &svg,
            "<?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"/>\n",
        )
        .unwrap();
        assert_eq!(determine_mime(&svg, 512), SVG);

        let page = dir.path().join("index.html");
        std::fs::write(&page, "<!doctype html>\n<title>x</title>\n").unwrap();
        assert_eq!(determine_mime(&page, 512), TEXT_HTML);
    }

    #[test]
    fn parameters_are_stripped() {
        assert_eq!(strip_params("text/plain; charset=utf-8"), TEXT_PLAIN);
        assert_eq!(strip_params("image/png"), "image/png");
    }

    #[test]
    fn unreadable_file_falls_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            determine_mime(&dir.path().join("missing.png"), 512),
            "image/png"
        );
    }
}
