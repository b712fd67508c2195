mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{NewReview, Review, TrackStats};
pub use store::SqliteReviewStore;
pub use trait_def::ReviewStore;
