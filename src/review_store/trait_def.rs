//! ReviewStore trait definition.

use super::models::{NewReview, Review, TrackStats};
use anyhow::Result;

/// Trait for review storage backends.
pub trait ReviewStore: Send + Sync {
    /// Persist one review. The write is atomic: on error nothing is stored.
    fn add_review(&self, review: &NewReview) -> Result<()>;

    /// All reviews, newest first.
    fn get_reviews(&self) -> Result<Vec<Review>>;

    /// Per-(audio_file, title) aggregates, sorted by average rating
    /// descending. Rows with equal averages keep whatever order the
    /// grouping produced.
    fn get_track_stats(&self) -> Result<Vec<TrackStats>>;

    /// Total number of persisted reviews.
    fn count_reviews(&self) -> Result<usize>;
}
