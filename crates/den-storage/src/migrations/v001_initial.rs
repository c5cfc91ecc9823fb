//! v001: tracked roots, file catalog, and one extension table per category.

pub const MIGRATION_SQL: &str = "
CREATE TABLE tracked_path (
    path TEXT NOT NULL,
    UNIQUE(path)
);

CREATE TABLE file (
    id            INTEGER PRIMARY KEY,
    path          TEXT NOT NULL,
    size          INTEGER NOT NULL,
    created_guess INTEGER NOT NULL,
    modified      INTEGER NOT NULL,
    mime          TEXT NOT NULL,
    UNIQUE(path)
);
CREATE INDEX idx_file_path ON file(path);
CREATE INDEX idx_file_created_guess ON file(created_guess);
CREATE INDEX idx_file_modified ON file(modified);
CREATE INDEX idx_file_mime ON file(mime);

CREATE TABLE picture (
    file   INTEGER PRIMARY KEY,
    camera TEXT,
    FOREIGN KEY(file) REFERENCES file(id) ON DELETE CASCADE
);
CREATE INDEX idx_picture_camera ON picture(camera);

CREATE TABLE video (
    file    INTEGER PRIMARY KEY,
    seconds INTEGER,
    camera  TEXT,
    year    INTEGER,
    FOREIGN KEY(file) REFERENCES file(id) ON DELETE CASCADE
);
CREATE INDEX idx_video_seconds ON video(seconds);
CREATE INDEX idx_video_camera ON video(camera);
CREATE INDEX idx_video_year ON video(year);

CREATE TABLE audio (
    file    INTEGER PRIMARY KEY,
    seconds INTEGER,
    author  TEXT,
    year    INTEGER,
    FOREIGN KEY(file) REFERENCES file(id) ON DELETE CASCADE
);
CREATE INDEX idx_audio_seconds ON audio(seconds);
CREATE INDEX idx_audio_author ON audio(author);
CREATE INDEX idx_audio_year ON audio(year);

CREATE TABLE document (
    file INTEGER PRIMARY KEY,
    FOREIGN KEY(file) REFERENCES file(id) ON DELETE CASCADE
);
";
