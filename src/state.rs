use crate::config::Config;
use crate::render::ReportRenderer;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Shared application state accessible to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The rendering engine, consumed strictly through the trait so tests
    /// can substitute a stub
    pub renderer: Arc<dyn ReportRenderer>,

    /// Limits concurrent render calls to keep memory bounded
    pub render_semaphore: Arc<Semaphore>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(renderer: Arc<dyn ReportRenderer>, config: Config) -> Self {
        let render_semaphore = Arc::new(Semaphore::new(config.concurrency.max_render_requests));
        Self {
            renderer,
            render_semaphore,
            config: Arc::new(config),
        }
    }
}
