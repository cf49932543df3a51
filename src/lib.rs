pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

use std::sync::Arc;

use axum::{routing::any, Router};
use repository::TodoRepository;
use tokio::net::TcpListener;

/// Path of the single todo endpoint.
pub const TODOS_PATH: &str = "/api/todos";

// === App State ===
#[derive(Clone)]
pub struct AppState {
    repository: Arc<dyn TodoRepository>,
}
impl AppState {
    pub fn new<R: TodoRepository + 'static>(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub fn repository(&self) -> &dyn TodoRepository {
        self.repository.as_ref()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(TODOS_PATH, any(handlers::todos))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
