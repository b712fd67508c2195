//! Data models for the review database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A validated submission, ready to be persisted.
///
/// `audio_file` references a catalog filename by convention only; the
/// store accepts any string (no foreign key, matching the original
/// deployment's data).
#[derive(Debug, Clone)]
pub struct NewReview {
    pub audio_file: String,
    pub title: String,
    pub rating: i64,
    pub user_session: String,
    pub ip_address: IpAddr,
}

/// A persisted review as returned by the read endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub audio_file: String,
    pub title: String,
    pub rating: i64,
    pub created_at: DateTime<Utc>,
    pub ip_address: IpAddr,
}

/// Per-track aggregate: review count and mean rating.
///
/// Grouping key is the (audio_file, title) pair as stored, so a track
/// submitted with inconsistent titles yields one row per variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackStats {
    pub audio_file: String,
    pub title: String,
    pub review_count: usize,
    pub avg_rating: f64,
}
