//! Filtered path listings per category, newest modification first.

use den_core::errors::StorageError;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use super::stats::NO_EXTENSION;

/// Filters shared by every category. Timestamps are unix seconds, inclusive.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pub created_since: Option<i64>,
    pub created_until: Option<i64>,
    /// Literal path prefix; `%`, `_` and `\` match themselves.
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PictureFilter {
    pub file: FileFilter,
    pub camera: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    pub file: FileFilter,
    pub min_seconds: Option<i64>,
    pub max_seconds: Option<i64>,
    pub camera: Option<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct AudioFilter {
    pub file: FileFilter,
    pub min_seconds: Option<i64>,
    pub max_seconds: Option<i64>,
    pub author: Option<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub file: FileFilter,
    /// Only `text/*` documents.
    pub text_only: bool,
}

/// Accumulates `AND` clauses and their bound values.
struct PathQuery {
    sql: String,
    args: Vec<Value>,
}

impl PathQuery {
    /// `base` must end in a WHERE clause so `AND` can follow.
    fn new(base: &str) -> Self {
        Self {
            sql: base.to_string(),
            args: Vec::new(),
        }
    }

    fn and(&mut self, clause: &str, value: impl Into<Value>) {
        self.sql.push_str(" AND ");
        self.sql.push_str(clause);
        self.args.push(value.into());
    }

    fn and_opt<V: Into<Value>>(&mut self, clause: &str, value: Option<V>) {
        if let Some(v) = value {
            self.and(clause, v);
        }
    }

    fn file_filters(&mut self, filter: &FileFilter) {
        self.and_opt("f.created_guess >= ?", filter.created_since);
        self.and_opt("f.created_guess <= ?", filter.created_until);
        if let Some(prefix) = filter.prefix.as_deref().filter(|p| !p.is_empty()) {
            self.and("f.path LIKE ? ESCAPE '\\'", format!("{}%", escape_like(prefix)));
        }
    }

    fn run(mut self, conn: &Connection) -> Result<Vec<String>, StorageError> {
        self.sql.push_str(" ORDER BY f.modified DESC, f.path");
        let mut stmt = conn.prepare(&self.sql).map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        let rows = stmt
            .query_map(params_from_iter(self.args.iter()), |row| row.get::<_, String>(0))
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
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}

pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn all(conn: &Connection, filter: &FileFilter) -> Result<Vec<String>, StorageError> {
    let mut q = PathQuery::new("SELECT f.path FROM file f WHERE 1 = 1");
    q.file_filters(filter);
    q.run(conn)
}

pub fn pictures(conn: &Connection, filter: &PictureFilter) -> Result<Vec<String>, StorageError> {
    let mut q = PathQuery::new(
        "SELECT f.path FROM file f INNER JOIN picture p ON p.file = f.id WHERE 1 = 1",
    );
    q.file_filters(&filter.file);
    q.and_opt("p.camera = ?", non_empty(&filter.camera));
    q.run(conn)
}

pub fn videos(conn: &Connection, filter: &VideoFilter) -> Result<Vec<String>, StorageError> {
    let mut q = PathQuery::new(
        "SELECT f.path FROM file f INNER JOIN video v ON v.file = f.id WHERE 1 = 1",
    );
    q.file_filters(&filter.file);
    q.and_opt("v.seconds >= ?", filter.min_seconds);
    q.and_opt("v.seconds <= ?", filter.max_seconds);
    q.and_opt("v.camera = ?", non_empty(&filter.camera));
    q.and_opt("v.year >= ?", filter.min_year);
    q.and_opt("v.year <= ?", filter.max_year);
    q.run(conn)
}

pub fn audios(conn: &Connection, filter: &AudioFilter) -> Result<Vec<String>, StorageError> {
    let mut q = PathQuery::new(
        "SELECT f.path FROM file f INNER JOIN audio a ON a.file = f.id WHERE 1 = 1",
    );
    q.file_filters(&filter.file);
    q.and_opt("a.seconds >= ?", filter.min_seconds);
    q.and_opt("a.seconds <= ?", filter.max_seconds);
    q.and_opt("a.author = ?", non_empty(&filter.author));
    q.and_opt("a.year >= ?", filter.min_year);
    q.and_opt("a.year <= ?", filter.max_year);
    q.run(conn)
}

pub fn documents(conn: &Connection, filter: &DocumentFilter) -> Result<Vec<String>, StorageError> {
    let mut q = PathQuery::new(
        "SELECT f.path FROM file f INNER JOIN document d ON d.file = f.id WHERE 1 = 1",
    );
    q.file_filters(&filter.file);
    if filter.text_only {
        q.and("f.mime LIKE ?", "text/%".to_string());
    }
    q.run(conn)
}

/// Files without any extension row.
pub fn others(conn: &Connection, filter: &FileFilter) -> Result<Vec<String>, StorageError> {
    let mut q = PathQuery::new(&format!("SELECT f.path FROM file f WHERE {NO_EXTENSION}"));
    q.file_filters(filter);
    q.run(conn)
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("/a_b/100%"), "/a\\_b/100\\%");
        assert_eq!(escape_like("c:\\x"), "c:\\\\x");
        assert_eq!(escape_like("/plain"), "/plain");
    }
}
