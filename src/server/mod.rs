mod config;
mod http_layers;
#[allow(clippy::module_inception)]
mod server;
mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::run_server;
