use serde::{Deserialize, Serialize};

/// A statically catalogued audio item available for review.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Track {
    pub id: u32,
    pub title: String,
    pub filename: String,
}

impl Track {
    pub fn new(id: u32, title: &str, filename: &str) -> Track {
        Track {
            id,
            title: title.to_owned(),
            filename: filename.to_owned(),
        }
    }
}
