//! Validation of a single review submission.
//!
//! Everything here runs before any store interaction: a payload that
//! fails validation never reaches the database.

use crate::review_store::NewReview;
use serde::Deserialize;
use std::net::IpAddr;
use thiserror::Error;

/// Sentinel stored when the client sends no identifying header.
pub const UNKNOWN_SESSION: &str = "unknown";

const MAX_SESSION_LENGTH: usize = 255;

/// Raw submission body. `rating` stays a JSON value because clients send
/// it both as a number and as a numeric string.
#[derive(Deserialize, Debug)]
pub struct SubmitPayload {
    #[serde(default)]
    pub audio_file: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub rating: serde_json::Value,
}

#[derive(Error, Debug, PartialEq)]
pub enum SubmitError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
    #[error("Rating must be an integer")]
    UnparseableRating,
    #[error("Rating must be between 0 and 5")]
    RatingOutOfRange(i64),
}

fn parse_rating(value: &serde_json::Value) -> Result<i64, SubmitError> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().ok_or(SubmitError::UnparseableRating),
        serde_json::Value::String(s) => {
            s.trim().parse().map_err(|_| SubmitError::UnparseableRating)
        }
        _ => Err(SubmitError::UnparseableRating),
    }
}

/// Validate one submission and bind it to its transport metadata.
///
/// `peer_addr` is the socket peer, never a client-forgeable header.
pub fn validate_submission(
    payload: &SubmitPayload,
    user_agent: Option<&str>,
    peer_addr: IpAddr,
) -> Result<NewReview, SubmitError> {
    if payload.audio_file.is_empty() {
        return Err(SubmitError::MissingField("audio_file"));
    }
    if payload.title.is_empty() {
        return Err(SubmitError::MissingField("title"));
    }

    let rating = parse_rating(&payload.rating)?;
    if !(0..=5).contains(&rating) {
        return Err(SubmitError::RatingOutOfRange(rating));
    }

    let user_session = user_agent
        .unwrap_or(UNKNOWN_SESSION)
        .chars()
        .take(MAX_SESSION_LENGTH)
        .collect();

    Ok(NewReview {
        audio_file: payload.audio_file.clone(),
        title: payload.title.clone(),
        rating,
        user_session,
        ip_address: peer_addr,
    })
}
