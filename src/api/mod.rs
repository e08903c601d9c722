pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::loader::DataLoader;
use crate::search::SearchEngine;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub loader: Arc<DataLoader>,
    pub max_page_size: usize,
}

impl AppState {
    pub fn new(engine: Arc<SearchEngine>, loader: Arc<DataLoader>, max_page_size: usize) -> Self {
        Self {
            engine,
            loader,
            max_page_size,
        }
    }
}
