//! SQLite storage implementation
//!
//! `SqliteStore` holds only the database path. Every operation opens a
//! fresh connection and closes it on return, so there is no long-lived
//! transaction and no cross-call state; repeated upserts are made safe by
//! the schema's UNIQUE constraints on the natural keys.

use crate::scrape::{ShowRef, WriterRef};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StorageError, StorageResult};
use crate::storage::{LinkRow, OverlapRecord, ShowRow, WriterRow};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// SQLite storage backend
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) a database at the given path
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> StorageResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }
}

impl Store for SqliteStore {
    // ===== Writes =====

    fn upsert_show(&self, show: &ShowRef) -> StorageResult<i64> {
        let conn = self.connect()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM shows WHERE imdb_id = ?1",
                params![show.imdb_id],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO shows (imdb_id, title, year_start, year_end, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![show.imdb_id, show.title, show.year_start, show.year_end, now],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn upsert_writer(&self, imdb_id: &str, name: &str) -> StorageResult<i64> {
        let conn = self.connect()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM writers WHERE imdb_id = ?1",
                params![imdb_id],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        conn.execute(
            "INSERT INTO writers (imdb_id, name) VALUES (?1, ?2)",
            params![imdb_id, name],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn link_show_writer(
        &self,
        show_id: i64,
        writer_id: i64,
        role: Option<&str>,
        episode_count: Option<u32>,
    ) -> StorageResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR IGNORE INTO show_writers (show_id, writer_id, role, episode_count)
             VALUES (?1, ?2, ?3, ?4)",
            params![show_id, writer_id, role, episode_count],
        )?;
        Ok(())
    }

    fn update_writer_details(
        &self,
        imdb_id: &str,
        image_url: Option<&str>,
        bio: Option<&str>,
    ) -> StorageResult<bool> {
        let conn = self.connect()?;

        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM writers WHERE imdb_id = ?1",
                params![imdb_id],
                |row| row.get(0),
            )
            .optional()?;

        if exists.is_none() {
            return Ok(false);
        }

        if image_url.is_some() || bio.is_some() {
            conn.execute(
                "UPDATE writers
                 SET image_url = COALESCE(?1, image_url), bio = COALESCE(?2, bio)
                 WHERE imdb_id = ?3",
                params![image_url, bio, imdb_id],
            )?;
        }

        Ok(true)
    }

    // ===== Crawl seeding =====

    fn existing_show_ids(&self) -> StorageResult<HashSet<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT imdb_id FROM shows")?;

        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(ids)
    }

    fn eligible_seed_writers(&self, min_episodes: u32) -> StorageResult<Vec<WriterRef>> {
        let conn = self.connect()?;

        // A writer with no recorded episode count on any credit is kept
        // as eligible; the threshold only excludes writers whose best
        // known credit falls short of it.
        let mut stmt = conn.prepare(
            "SELECT DISTINCT w.imdb_id, w.name, MAX(sw.episode_count) AS max_episodes
             FROM writers w
             JOIN show_writers sw ON w.id = sw.writer_id
             GROUP BY w.id
             HAVING max_episodes >= ?1 OR max_episodes IS NULL
             ORDER BY max_episodes DESC",
        )?;

        let writers = stmt
            .query_map(params![min_episodes], |row| {
                Ok(WriterRef {
                    imdb_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(writers)
    }

    // ===== Reads =====

    fn all_shows(&self) -> StorageResult<Vec<ShowRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, imdb_id, title, year_start, year_end, scraped_at
             FROM shows ORDER BY title",
        )?;

        let shows = stmt
            .query_map([], |row| {
                Ok(ShowRow {
                    id: row.get(0)?,
                    imdb_id: row.get(1)?,
                    title: row.get(2)?,
                    year_start: row.get(3)?,
                    year_end: row.get(4)?,
                    scraped_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(shows)
    }

    fn all_writers(&self) -> StorageResult<Vec<WriterRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, imdb_id, name, image_url, bio
             FROM writers ORDER BY name COLLATE NOCASE",
        )?;

        let writers = stmt
            .query_map([], |row| {
                Ok(WriterRow {
                    id: row.get(0)?,
                    imdb_id: row.get(1)?,
                    name: row.get(2)?,
                    image_url: row.get(3)?,
                    bio: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(writers)
    }

    fn all_links(&self) -> StorageResult<Vec<LinkRow>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT show_id, writer_id, role, episode_count FROM show_writers")?;

        let links = stmt
            .query_map([], |row| {
                Ok(LinkRow {
                    show_id: row.get(0)?,
                    writer_id: row.get(1)?,
                    role: row.get(2)?,
                    episode_count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn overlap_report(&self) -> StorageResult<Vec<OverlapRecord>> {
        let conn = self.connect()?;

        // Aggregate over distinct (writer, show) pairs so a writer with
        // several roles on the same show contributes that show once.
        let mut stmt = conn.prepare(
            "SELECT w.id, w.name, w.imdb_id,
                    GROUP_CONCAT(t.title, '|||') AS titles,
                    GROUP_CONCAT(t.id, '|||') AS show_ids,
                    COUNT(t.id) AS show_count
             FROM writers w
             JOIN (SELECT DISTINCT sw.writer_id AS writer_id, s.id AS id, s.title AS title
                   FROM show_writers sw
                   JOIN shows s ON s.id = sw.show_id) t
               ON t.writer_id = w.id
             GROUP BY w.id
             HAVING COUNT(t.id) > 1
             ORDER BY show_count DESC, w.name",
        )?;

        let records = stmt
            .query_map([], |row| {
                let titles: Option<String> = row.get(3)?;
                let ids: Option<String> = row.get(4)?;
                Ok(OverlapRecord {
                    writer_id: row.get(0)?,
                    writer_name: row.get(1)?,
                    writer_imdb_id: row.get(2)?,
                    show_titles: titles
                        .map(|t| t.split("|||").map(str::to_string).collect())
                        .unwrap_or_default(),
                    show_ids: ids
                        .map(|t| t.split("|||").filter_map(|x| x.parse().ok()).collect())
                        .unwrap_or_default(),
                    show_count: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn writers_without_details(&self) -> StorageResult<Vec<WriterRef>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT imdb_id, name FROM writers
             WHERE image_url IS NULL OR bio IS NULL
             ORDER BY name",
        )?;

        let writers = stmt
            .query_map([], |row| {
                Ok(WriterRef {
                    imdb_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(writers)
    }

    fn count_shows(&self) -> StorageResult<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM shows", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_writers(&self) -> StorageResult<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM writers", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_links(&self) -> StorageResult<u64> {
        let conn = self.connect()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM show_writers", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&dir.path().join("graph.db")).unwrap();
        (dir, store)
    }

    fn show(imdb_id: &str, title: &str) -> ShowRef {
        ShowRef {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year_start: Some(2008),
            year_end: None,
        }
    }

    #[test]
    fn test_upsert_show_is_idempotent() {
        let (_dir, store) = temp_store();

        let id1 = store.upsert_show(&show("tt0001", "Breaking Sad")).unwrap();
        let id2 = store.upsert_show(&show("tt0001", "Breaking Sad")).unwrap();

        assert_eq!(id1, id2);
        assert_eq!(store.count_shows().unwrap(), 1);
    }

    #[test]
    fn test_upsert_writer_is_idempotent() {
        let (_dir, store) = temp_store();

        let id1 = store.upsert_writer("nm0001", "Vince Gill").unwrap();
        let id2 = store.upsert_writer("nm0001", "Vince Gill").unwrap();

        assert_eq!(id1, id2);
        assert_eq!(store.count_writers().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_link_is_ignored() {
        let (_dir, store) = temp_store();

        let show_id = store.upsert_show(&show("tt0001", "A")).unwrap();
        let writer_id = store.upsert_writer("nm0001", "W").unwrap();

        store
            .link_show_writer(show_id, writer_id, Some("creator"), Some(10))
            .unwrap();
        store
            .link_show_writer(show_id, writer_id, Some("creator"), Some(10))
            .unwrap();

        assert_eq!(store.count_links().unwrap(), 1);
    }

    #[test]
    fn test_same_pair_different_roles_are_distinct_links() {
        let (_dir, store) = temp_store();

        let show_id = store.upsert_show(&show("tt0001", "A")).unwrap();
        let writer_id = store.upsert_writer("nm0001", "W").unwrap();

        store
            .link_show_writer(show_id, writer_id, Some("creator"), Some(10))
            .unwrap();
        store
            .link_show_writer(show_id, writer_id, Some("written by"), Some(4))
            .unwrap();

        assert_eq!(store.count_links().unwrap(), 2);
    }

    #[test]
    fn test_existing_show_ids() {
        let (_dir, store) = temp_store();

        store.upsert_show(&show("tt0001", "A")).unwrap();
        store.upsert_show(&show("tt0002", "B")).unwrap();

        let ids = store.existing_show_ids().unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("tt0001"));
        assert!(ids.contains("tt0002"));
    }

    #[test]
    fn test_eligible_seed_writers_threshold_and_null() {
        let (_dir, store) = temp_store();

        let show_id = store.upsert_show(&show("tt0001", "A")).unwrap();
        let prolific = store.upsert_writer("nm0001", "Prolific").unwrap();
        let minor = store.upsert_writer("nm0002", "Minor").unwrap();
        let unknown = store.upsert_writer("nm0003", "Unknown").unwrap();

        store
            .link_show_writer(show_id, prolific, Some("creator"), Some(12))
            .unwrap();
        store
            .link_show_writer(show_id, minor, Some("written by"), Some(1))
            .unwrap();
        store
            .link_show_writer(show_id, unknown, Some("written by"), None)
            .unwrap();

        let seeds = store.eligible_seed_writers(3).unwrap();
        let ids: Vec<&str> = seeds.iter().map(|w| w.imdb_id.as_str()).collect();

        // Known-and-below-threshold is excluded; unknown counts stay in.
        assert!(ids.contains(&"nm0001"));
        assert!(ids.contains(&"nm0003"));
        assert!(!ids.contains(&"nm0002"));
        // Ordered by best known credit, descending.
        assert_eq!(ids[0], "nm0001");
    }

    #[test]
    fn test_overlap_report_ordering_and_distinct_shows() {
        let (_dir, store) = temp_store();

        let s1 = store.upsert_show(&show("tt0001", "Alpha")).unwrap();
        let s2 = store.upsert_show(&show("tt0002", "Beta")).unwrap();
        let s3 = store.upsert_show(&show("tt0003", "Gamma")).unwrap();

        // Credited on three shows, twice on the first one.
        let busy = store.upsert_writer("nm0001", "Zed Busy").unwrap();
        store
            .link_show_writer(s1, busy, Some("creator"), Some(10))
            .unwrap();
        store
            .link_show_writer(s1, busy, Some("written by"), Some(3))
            .unwrap();
        store.link_show_writer(s2, busy, None, Some(5)).unwrap();
        store.link_show_writer(s3, busy, None, Some(2)).unwrap();

        // Credited on two shows.
        let pair = store.upsert_writer("nm0002", "Amy Pair").unwrap();
        store.link_show_writer(s1, pair, None, Some(1)).unwrap();
        store.link_show_writer(s2, pair, None, Some(1)).unwrap();

        // Only one show, never overlaps.
        let solo = store.upsert_writer("nm0003", "Solo").unwrap();
        store.link_show_writer(s1, solo, None, Some(8)).unwrap();

        let report = store.overlap_report().unwrap();
        assert_eq!(report.len(), 2);

        assert_eq!(report[0].writer_name, "Zed Busy");
        assert_eq!(report[0].show_count, 3);
        // The double credit on Alpha shows up once.
        assert_eq!(report[0].show_titles.len(), 3);
        assert_eq!(report[0].show_ids.len(), 3);

        assert_eq!(report[1].writer_name, "Amy Pair");
        assert_eq!(report[1].show_count, 2);
    }

    #[test]
    fn test_update_writer_details() {
        let (_dir, store) = temp_store();

        store.upsert_writer("nm0001", "W").unwrap();

        assert!(store
            .update_writer_details("nm0001", Some("https://img.example/w.jpg"), None)
            .unwrap());
        assert!(store
            .update_writer_details("nm0001", None, Some("Wrote things."))
            .unwrap());
        assert!(!store
            .update_writer_details("nm9999", None, Some("ghost"))
            .unwrap());

        let writers = store.all_writers().unwrap();
        assert_eq!(writers.len(), 1);
        // Both fields survive the two partial updates.
        assert_eq!(
            writers[0].image_url.as_deref(),
            Some("https://img.example/w.jpg")
        );
        assert_eq!(writers[0].bio.as_deref(), Some("Wrote things."));
    }

    #[test]
    fn test_writers_without_details() {
        let (_dir, store) = temp_store();

        store.upsert_writer("nm0001", "Complete").unwrap();
        store.upsert_writer("nm0002", "Missing").unwrap();
        store
            .update_writer_details("nm0001", Some("https://img"), Some("bio"))
            .unwrap();

        let missing = store.writers_without_details().unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].imdb_id, "nm0002");
    }
}
