//! [`MediaSource`] backed by embedded EXIF data.
//!
//! Only still images carry EXIF. Audio, video, and anything without a
//! readable EXIF block come back as an empty report; only I/O failures are
//! errors.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use exif::{Exif, In, Tag};

use super::media::{MediaSource, StreamReport, CAMERA_KEY, RECORDED_DATE_KEY};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExifSource;

impl ExifSource {
    fn tag(exif: &Exif, tag: Tag) -> Option<String> {
        exif.get_field(tag, In::PRIMARY)
            .map(|f| f.display_value().to_string().replace(['\\', '"'], ""))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn camera(exif: &Exif) -> Option<String> {
        let model = Self::tag(exif, Tag::Model)?;
        match Self::tag(exif, Tag::Make) {
            Some(make) if !model.starts_with(&make) => Some(format!("{make} {model}")),
            _ => Some(model),
        }
    }
}

impl MediaSource for ExifSource {
    fn probe(&self, path: &Path) -> io::Result<StreamReport> {
        let mut reader = BufReader::new(File::open(path)?);
        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::Io(e)) => return Err(e),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no usable EXIF data");
                return Ok(StreamReport::default());
            }
        };

        let mut report = StreamReport {
            image_streams: 1,
            ..StreamReport::default()
        };
        if let Some(camera) = Self::camera(&exif) {
            report.general.insert(CAMERA_KEY.to_string(), camera);
        }
        if let Some(taken) = Self::tag(&exif, Tag::DateTimeOriginal) {
            report.general.insert(RECORDED_DATE_KEY.to_string(), taken);
        }
        Ok(report)
    }
}
