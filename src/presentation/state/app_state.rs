use std::sync::Arc;

use crate::application::services::ExtractionService;

#[derive(Clone)]
pub struct AppState {
    pub extraction_service: Arc<ExtractionService>,
}
