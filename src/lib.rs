pub mod config;
pub mod event;
pub mod store;
pub mod web;

use std::sync::Arc;

use store::EventStore;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }
}
