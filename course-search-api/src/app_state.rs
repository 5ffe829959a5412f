use std::sync::Arc;

use crate::domain::search::{SearchEngine, SearchService};

/// Engine handle shared by all requests.
pub type DynSearchEngine = Arc<dyn SearchEngine>;

#[derive(Clone)]
pub struct AppState {
    search_service: Arc<SearchService<DynSearchEngine>>,
}

impl AppState {
    pub fn new(search_service: SearchService<DynSearchEngine>) -> Self {
        Self {
            search_service: Arc::new(search_service),
        }
    }

    pub fn search_service(&self) -> &SearchService<DynSearchEngine> {
        &self.search_service
    }
}
