use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};

use tracing::error;

use crate::catalog::Catalog;
use crate::intake::{validate_submission, SubmitPayload};
use crate::review_store::ReviewStore;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};

async fn index(State(catalog): State<SharedCatalog>) -> Html<String> {
    let mut items = String::new();
    for track in catalog.tracks() {
        items.push_str(&format!(
            "<li data-track-id=\"{}\">{} <em>({})</em></li>",
            track.id, track.title, track.filename
        ));
    }
    Html(format!(
        "<!DOCTYPE html>\
         <html><head><title>Soundscape Reviews</title></head>\
         <body><h1>Soundscape Reviews</h1><ul>{}</ul></body></html>",
        items
    ))
}

async fn submit_review(
    State(store): State<SharedReviewStore>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<SubmitPayload>,
) -> Response {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());

    let review = match validate_submission(&payload, user_agent, peer.ip()) {
        Ok(review) => review,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    };

    match store.add_review(&review) {
        Ok(()) => Json(json!({ "message": "Review submitted successfully!" })).into_response(),
        Err(err) => {
            error!("Error submitting review: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to submit review" })),
            )
                .into_response()
        }
    }
}

async fn get_reviews(State(store): State<SharedReviewStore>) -> Response {
    match store.get_reviews() {
        Ok(reviews) => Json(reviews).into_response(),
        Err(err) => {
            error!("Error getting reviews: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to get reviews" })),
            )
                .into_response()
        }
    }
}

async fn get_stats(State(store): State<SharedReviewStore>) -> Response {
    match store.get_track_stats() {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => {
            error!("Error getting stats: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to get stats" })),
            )
                .into_response()
        }
    }
}

impl ServerState {
    fn new(
        config: ServerConfig,
        catalog: Catalog,
        review_store: Arc<dyn ReviewStore>,
    ) -> ServerState {
        ServerState {
            config,
            catalog: Arc::new(catalog),
            review_store,
        }
    }
}

fn make_app(
    config: ServerConfig,
    catalog: Catalog,
    review_store: Arc<dyn ReviewStore>,
) -> Router {
    let state = ServerState::new(config, catalog, review_store);

    Router::new()
        .route("/", get(index))
        .route("/submit_review", post(submit_review))
        .route("/reviews", get(get_reviews))
        .route("/stats", get(get_stats))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(
    catalog: Catalog,
    review_store: Arc<dyn ReviewStore>,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
    };
    let app = make_app(config, catalog, review_store);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    Ok(axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?)
}
