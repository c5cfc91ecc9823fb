//! Aggregate counts over the catalog. Formatting is left to callers.

use den_core::constants::LONG_MEDIA_SECONDS;
use den_core::errors::StorageError;
use den_core::types::Category;
use rusqlite::{Connection, Params};

/// `WHERE` fragment matching files without any extension row (alias `f`).
pub(crate) const NO_EXTENSION: &str = "NOT EXISTS (SELECT 1 FROM picture p WHERE p.file = f.id) \
     AND NOT EXISTS (SELECT 1 FROM video v WHERE v.file = f.id) \
     AND NOT EXISTS (SELECT 1 FROM audio a WHERE a.file = f.id) \
     AND NOT EXISTS (SELECT 1 FROM document d WHERE d.file = f.id)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCount {
    pub name: String,
    pub count: i64,
}

/// Tables with a camera column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraTable {
    Picture,
    Video,
}

/// Tables with seconds and year columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedTable {
    Video,
    Audio,
}

impl CameraTable {
    fn name(self) -> &'static str {
        match self {
            Self::Picture => "picture",
            Self::Video => "video",
        }
    }
}

impl TimedTable {
    fn name(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

/// Entries at most / at least ten minutes long. Exactly ten minutes counts
/// toward both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationSplit {
    pub short: i64,
    pub long: i64,
}

fn named_counts<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<NamedCount>, StorageError> {
    let mut stmt = conn.prepare_cached(sql).map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    let rows = stmt
        .query_map(params, |row| {
            Ok(NamedCount {
                name: row.get(0)?,
                count: row.get(1)?,
            })
        })
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?);
    }
    Ok(result)
}

fn count(conn: &Connection, sql: &str) -> Result<i64, StorageError> {
    conn.query_row(sql, [], |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Files per local-time creation year, oldest first. `None` covers every file.
pub fn years_created(conn: &Connection, category: Option<Category>) -> Result<Vec<NamedCount>, StorageError> {
    let filter = match category {
        None => "1 = 1".to_string(),
        Some(Category::Other) => NO_EXTENSION.to_string(),
        Some(c) => format!(
            "EXISTS (SELECT 1 FROM {} x WHERE x.file = f.id)",
            c.as_str()
        ),
    };
    let sql = format!(
        "SELECT strftime('%Y', datetime(created_guess, 'unixepoch', 'localtime')) AS year,
                COUNT(*)
         FROM file f
         WHERE {filter}
         GROUP BY year
         ORDER BY year"
    );
    named_counts(conn, &sql, [])
}

/// Files per camera, skipping unknown cameras.
pub fn camera_counts(conn: &Connection, table: CameraTable) -> Result<Vec<NamedCount>, StorageError> {
    let sql = format!(
        "SELECT camera, COUNT(*) FROM {} WHERE camera IS NOT NULL GROUP BY camera ORDER BY camera",
        table.name()
    );
    named_counts(conn, &sql, [])
}

/// Files per recording decade, labelled like `1990-1999`.
pub fn decade_counts(conn: &Connection, table: TimedTable) -> Result<Vec<NamedCount>, StorageError> {
    let sql = format!(
        "SELECT CAST((year / 10) * 10 AS TEXT) || '-' || CAST((year / 10) * 10 + 9 AS TEXT) AS decade,
                COUNT(*)
         FROM {}
         WHERE year IS NOT NULL
         GROUP BY decade
         ORDER BY decade",
        table.name()
    );
    named_counts(conn, &sql, [])
}

/// Audio files per author, alphabetically, at most `limit` authors.
pub fn author_counts(conn: &Connection, limit: usize) -> Result<Vec<NamedCount>, StorageError> {
    named_counts(
        conn,
        "SELECT author, COUNT(*) FROM audio
         WHERE author IS NOT NULL
         GROUP BY author
         ORDER BY author
         LIMIT ?1",
        [limit as i64],
    )
}

pub fn duration_split(conn: &Connection, table: TimedTable) -> Result<DurationSplit, StorageError> {
    let name = table.name();
    Ok(DurationSplit {
        short: count(
            conn,
            &format!("SELECT COUNT(*) FROM {name} WHERE seconds <= {LONG_MEDIA_SECONDS}"),
        )?,
        long: count(
            conn,
            &format!("SELECT COUNT(*) FROM {name} WHERE seconds >= {LONG_MEDIA_SECONDS}"),
        )?,
    })
}

/// Number of files in each category.
pub fn category_counts(conn: &Connection) -> Result<Vec<(Category, i64)>, StorageError> {
    Category::ALL
        .iter()
        .map(|&c| super::files::count_category(conn, c).map(|n| (c, n)))
        .collect()
}
