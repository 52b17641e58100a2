use crate::config::AppConfig;
use crate::metrics::Metrics;
use extract::{Clock, Extractor};
use std::sync::Arc;
use store::TaskStore;

pub struct AppState {
    pub store: TaskStore,
    pub extractor: Extractor,
    pub metrics: Arc<Metrics>,
    pub title_placeholder: String,
}

impl AppState {
    /// The extractor and the store share one clock, so the year given to
    /// month/day dates and `created_at` stamps always agree.
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: TaskStore::open(config.storage.data_file.clone(), clock.clone()),
            extractor: Extractor::new(clock),
            metrics: Metrics::new(),
            title_placeholder: config.parse.title_placeholder.clone(),
        }
    }
}
