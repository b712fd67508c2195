//! SQLite schema definitions for the review database.

pub struct Table {
    pub name: &'static str,
    pub schema: &'static str,
    pub indices: &'static [&'static str],
}

/// One row per submitted rating. The rating CHECK mirrors the intake
/// validation so an out-of-range value can never land in the database,
/// whatever path it took.
const REVIEW_TABLE_V_0: Table = Table {
    name: "soundscape_review",
    schema: "CREATE TABLE soundscape_review (\
             id INTEGER NOT NULL UNIQUE, \
             audio_file TEXT NOT NULL, \
             title TEXT NOT NULL, \
             rating INTEGER NOT NULL CHECK (rating >= 0 AND rating <= 5), \
             created_at INTEGER NOT NULL DEFAULT (cast(strftime('%s','now') as int)), \
             user_session TEXT NOT NULL, \
             ip_address TEXT NOT NULL, \
             PRIMARY KEY (id));",
    indices: &["CREATE INDEX review_created_at_index ON soundscape_review (created_at);"],
};

pub struct VersionedSchema {
    pub version: u32,
    pub tables: &'static [Table],
}

pub const REVIEW_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[REVIEW_TABLE_V_0],
}];
