//! Database schema definitions

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Television shows, keyed by their stable site id
CREATE TABLE IF NOT EXISTS shows (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    imdb_id TEXT UNIQUE NOT NULL,
    title TEXT NOT NULL,
    year_start INTEGER,
    year_end INTEGER,
    scraped_at TEXT NOT NULL
);

-- Writers, keyed by their stable site id
CREATE TABLE IF NOT EXISTS writers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    imdb_id TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    image_url TEXT,
    bio TEXT
);

-- One row per writing credit; the same writer can appear on the same
-- show under several roles ("creator", "written by", "teleplay by")
CREATE TABLE IF NOT EXISTS show_writers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    show_id INTEGER NOT NULL REFERENCES shows(id),
    writer_id INTEGER NOT NULL REFERENCES writers(id),
    role TEXT,
    episode_count INTEGER,
    UNIQUE(show_id, writer_id, role)
);

CREATE INDEX IF NOT EXISTS idx_show_writers_show ON show_writers(show_id);
CREATE INDEX IF NOT EXISTS idx_show_writers_writer ON show_writers(writer_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
