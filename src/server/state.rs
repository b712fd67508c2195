use axum::extract::FromRef;

use crate::catalog::Catalog;
use crate::review_store::ReviewStore;
use std::sync::Arc;

use super::ServerConfig;

pub type SharedCatalog = Arc<Catalog>;
pub type SharedReviewStore = Arc<dyn ReviewStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub catalog: SharedCatalog,
    pub review_store: SharedReviewStore,
}

impl FromRef<ServerState> for SharedCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for SharedReviewStore {
    fn from_ref(input: &ServerState) -> Self {
        input.review_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
