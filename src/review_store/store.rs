//! SQLite-backed review store implementation.

use super::models::{NewReview, Review, TrackStats};
use super::schema::REVIEW_VERSIONED_SCHEMAS;
use super::trait_def::ReviewStore;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

const BASE_DB_VERSION: i64 = 271;

/// SQLite-backed review store.
///
/// One process-wide connection guarded by a mutex; each statement takes
/// the guard and releases it on every exit path, so an error can never
/// leak the connection.
pub struct SqliteReviewStore {
    conn: Mutex<Connection>,
}

impl SqliteReviewStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path.as_ref(),
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| {
            format!(
                "Failed to open review database at {:?}",
                db_path.as_ref()
            )
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on review database")?;

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )?;

        if table_count == 0 {
            info!("Creating review db schema at {:?}", db_path.as_ref());
            Self::create_schema(&conn)?;
        } else {
            Self::validate_version(&conn)?;
        }

        let store = SqliteReviewStore {
            conn: Mutex::new(conn),
        };
        info!(
            "Review store ready: {} reviews persisted",
            store.count_reviews()?
        );
        Ok(store)
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        let latest = &REVIEW_VERSIONED_SCHEMAS[REVIEW_VERSIONED_SCHEMAS.len() - 1];
        for table in latest.tables {
            conn.execute(table.schema, [])
                .with_context(|| format!("Failed to create table {}", table.name))?;
            for index in table.indices {
                conn.execute(index, [])?;
            }
        }
        conn.pragma_update(None, "user_version", BASE_DB_VERSION + latest.version as i64)?;
        Ok(())
    }

    fn validate_version(conn: &Connection) -> Result<()> {
        let version: i64 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .context("Failed to read review database version")?;
        if version != BASE_DB_VERSION {
            bail!("Unknown review database version {}", version);
        }
        Ok(())
    }
}

fn timestamp_to_datetime(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .with_context(|| format!("Timestamp out of range in review db: {}", secs))
}

impl ReviewStore for SqliteReviewStore {
    fn add_review(&self, review: &NewReview) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO soundscape_review (audio_file, title, rating, user_session, ip_address)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                review.audio_file,
                review.title,
                review.rating,
                review.user_session,
                review.ip_address.to_string(),
            ],
        )
        .with_context(|| format!("Failed to store review for {}", review.audio_file))?;
        Ok(())
    }

    fn get_reviews(&self) -> Result<Vec<Review>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT audio_file, title, rating, created_at, ip_address
             FROM soundscape_review
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut reviews = Vec::new();
        for row in rows {
            let (audio_file, title, rating, created_at, ip_address) = row?;
            reviews.push(Review {
                audio_file,
                title,
                rating,
                created_at: timestamp_to_datetime(created_at)?,
                ip_address: ip_address.parse().with_context(|| {
                    format!("Malformed ip address in review db: {}", ip_address)
                })?,
            });
        }
        Ok(reviews)
    }

    fn get_track_stats(&self) -> Result<Vec<TrackStats>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT audio_file, title, COUNT(*) as review_count, AVG(rating) as avg_rating
             FROM soundscape_review
             GROUP BY audio_file, title
             ORDER BY avg_rating DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TrackStats {
                audio_file: row.get(0)?,
                title: row.get(1)?,
                review_count: row.get(2)?,
                avg_rating: row.get(3)?,
            })
        })?;
        let stats = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read track stats")?;
        Ok(stats)
    }

    fn count_reviews(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: usize =
            conn.query_row("SELECT COUNT(*) FROM soundscape_review", [], |r| r.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (SqliteReviewStore, TempDir) {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("reviews.db");
        let store = SqliteReviewStore::new(&db_path).unwrap();
        (store, tmp)
    }

    fn make_review(audio_file: &str, title: &str, rating: i64) -> NewReview {
        NewReview {
            audio_file: audio_file.to_string(),
            title: title.to_string(),
            rating,
            user_session: "test-agent".to_string(),
            ip_address: "127.0.0.1".parse().unwrap(),
        }
    }

    #[test]
    fn test_add_and_list_reviews() {
        let (store, _tmp) = create_test_store();

        store
            .add_review(&make_review("forest.wav", "Forest Rain", 4))
            .unwrap();
        store
            .add_review(&make_review("ambient.wav", "Deep Relaxing Ambient Music", 2))
            .unwrap();

        let reviews = store.get_reviews().unwrap();
        assert_eq!(reviews.len(), 2);

        let forest = reviews
            .iter()
            .find(|r| r.audio_file == "forest.wav")
            .unwrap();
        assert_eq!(forest.title, "Forest Rain");
        assert_eq!(forest.rating, 4);
        assert_eq!(forest.ip_address.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_reviews_listed_newest_first() {
        let (store, _tmp) = create_test_store();

        for i in 0..3 {
            store
                .add_review(&make_review(&format!("track{}.wav", i), "Track", 3))
                .unwrap();
        }

        let reviews = store.get_reviews().unwrap();
        assert_eq!(reviews.len(), 3);
        // Inserts land within the same clock second; the id tiebreak keeps
        // the latest insert first.
        assert_eq!(reviews[0].audio_file, "track2.wav");
        assert_eq!(reviews[2].audio_file, "track0.wav");
        for pair in reviews.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_rating_check_constraint() {
        let (store, _tmp) = create_test_store();

        assert!(store
            .add_review(&make_review("forest.wav", "Forest Rain", 6))
            .is_err());
        assert!(store
            .add_review(&make_review("forest.wav", "Forest Rain", -1))
            .is_err());
        assert_eq!(store.count_reviews().unwrap(), 0);

        // 0 is a valid rating, distinct from "no rating"
        store
            .add_review(&make_review("forest.wav", "Forest Rain", 0))
            .unwrap();
        assert_eq!(store.count_reviews().unwrap(), 1);
        assert_eq!(store.get_reviews().unwrap()[0].rating, 0);
    }

    #[test]
    fn test_stats_count_and_average() {
        let (store, _tmp) = create_test_store();

        for rating in [3, 4, 5] {
            store
                .add_review(&make_review("forest.wav", "Forest Rain", rating))
                .unwrap();
        }

        let stats = store.get_track_stats().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].audio_file, "forest.wav");
        assert_eq!(stats[0].title, "Forest Rain");
        assert_eq!(stats[0].review_count, 3);
        assert!((stats[0].avg_rating - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_sorted_by_average_descending() {
        let (store, _tmp) = create_test_store();

        store
            .add_review(&make_review("low.wav", "Low", 1))
            .unwrap();
        store
            .add_review(&make_review("high.wav", "High", 5))
            .unwrap();
        store
            .add_review(&make_review("mid.wav", "Mid", 3))
            .unwrap();

        let stats = store.get_track_stats().unwrap();
        assert_eq!(stats.len(), 3);
        for pair in stats.windows(2) {
            assert!(pair[0].avg_rating >= pair[1].avg_rating);
        }
        assert_eq!(stats[0].audio_file, "high.wav");
        assert_eq!(stats[2].audio_file, "low.wav");
    }

    #[test]
    fn test_stats_group_by_stored_title_pair() {
        let (store, _tmp) = create_test_store();

        store
            .add_review(&make_review("forest.wav", "Forest Rain", 5))
            .unwrap();
        store
            .add_review(&make_review("forest.wav", "forest rain", 1))
            .unwrap();

        // Inconsistent titles for the same file produce separate groups.
        let stats = store.get_track_stats().unwrap();
        assert_eq!(stats.len(), 2);

        let total: usize = stats.iter().map(|s| s.review_count).sum();
        assert_eq!(total, store.count_reviews().unwrap());
    }

    #[test]
    fn test_stats_empty_store() {
        let (store, _tmp) = create_test_store();
        assert!(store.get_track_stats().unwrap().is_empty());
        assert_eq!(store.count_reviews().unwrap(), 0);
    }

    #[test]
    fn test_reopen_existing_database() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("reviews.db");

        {
            let store = SqliteReviewStore::new(&db_path).unwrap();
            store
                .add_review(&make_review("forest.wav", "Forest Rain", 4))
                .unwrap();
        }

        let reopened = SqliteReviewStore::new(&db_path).unwrap();
        assert_eq!(reopened.count_reviews().unwrap(), 1);
    }

    #[test]
    fn test_rejects_unknown_database_version() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("reviews.db");

        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute("CREATE TABLE something_else (id INTEGER)", [])
                .unwrap();
        }

        assert!(SqliteReviewStore::new(&db_path).is_err());
    }
}
