//! Media metadata probing.
//!
//! A [`MediaSource`] reports stream counts and general key/value fields for
//! a file; [`MediaInfo::from_report`] interprets them. Probing is best
//! effort: a failing probe yields empty metadata and never fails indexing.

use std::io;
use std::path::Path;

use den_core::types::collections::FxHashMap;

/// General field: duration in milliseconds.
pub const DURATION_KEY: &str = "Duration";
/// General field: recording hardware.
pub const CAMERA_KEY: &str = "Encoded_Hardware/String";
/// General field: free-form dump, searched for a QuickTime model line.
pub const INFORM_KEY: &str = "Inform";
/// General field: recording date, the first four characters are the year.
pub const RECORDED_DATE_KEY: &str = "Recorded_Date";
/// General field: performer of an audio track.
pub const PERFORMER_KEY: &str = "Performer";

const QUICKTIME_MODEL_PREFIX: &str = "COM.APPLE.QUICKTIME.MODEL";

/// Raw probe output for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamReport {
    pub video_streams: usize,
    pub audio_streams: usize,
    pub image_streams: usize,
    pub general: FxHashMap<String, String>,
}

impl StreamReport {
    pub fn with_general(mut self, key: &str, value: impl Into<String>) -> Self {
        self.general.insert(key.to_string(), value.into());
        self
    }

    /// Non-empty general field value.
    pub fn general(&self, key: &str) -> Option<&str> {
        self.general
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn kind(&self) -> MediaKind {
        if self.video_streams > 0 {
            MediaKind::Video
        } else if self.audio_streams > 0 {
            MediaKind::Audio
        } else if self.image_streams > 0 {
            MediaKind::Picture
        } else {
            MediaKind::Unknown
        }
    }
}

/// What the probe thinks the file is. Video streams take precedence over
/// audio, audio over image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    #[default]
    Unknown,
    Picture,
    Video,
    Audio,
}

/// Interpreted media metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaInfo {
    pub kind: MediaKind,
    pub seconds: Option<i64>,
    pub camera: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
}

impl MediaInfo {
    pub fn from_report(report: &StreamReport) -> Self {
        let kind = report.kind();
        let mut info = Self {
            kind,
            ..Self::default()
        };
        match kind {
            MediaKind::Unknown => {}
            MediaKind::Picture => {
                info.camera = camera(report);
            }
            MediaKind::Video => {
                info.seconds = duration_seconds(report);
                info.camera = camera(report);
                info.year = recorded_year(report);
            }
            MediaKind::Audio => {
                info.seconds = duration_seconds(report);
                info.author = report.general(PERFORMER_KEY).map(str::to_string);
                info.year = recorded_year(report);
            }
        }
        info
    }
}

fn duration_seconds(report: &StreamReport) -> Option<i64> {
    let ms: i64 = report.general(DURATION_KEY)?.parse().ok()?;
    Some(ms / 1000)
}

fn camera(report: &StreamReport) -> Option<String> {
    if let Some(hw) = report.general(CAMERA_KEY) {
        return Some(hw.to_string());
    }
    report
        .general(INFORM_KEY)?
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key.trim() == QUICKTIME_MODEL_PREFIX).then(|| value.trim())
        })
        .filter(|model| !model.is_empty())
        .map(str::to_string)
}

fn recorded_year(report: &StreamReport) -> Option<i32> {
    report.general(RECORDED_DATE_KEY)?.get(..4)?.parse().ok()
}

/// Source of per-file media stream information.
pub trait MediaSource: Send + Sync {
    fn probe(&self, path: &Path) -> io::Result<StreamReport>;
}

/// Reports nothing; every media file gets empty metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMediaSource;

impl MediaSource for NoMediaSource {
    fn probe(&self, _path: &Path) -> io::Result<StreamReport> {
        Ok(StreamReport::default())
    }
}

/// Probe `path`, degrading failures to empty metadata.
pub fn probe_or_default(source: &dyn MediaSource, path: &Path) -> MediaInfo {
    match source.probe(path) {
        Ok(report) => MediaInfo::from_report(&report),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "media probe failed");
            MediaInfo::default()
        }
    }
}
