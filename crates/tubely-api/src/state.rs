use crate::auth::Authenticator;
use std::sync::Arc;
use tubely_processing::IngestService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestService>,
    pub authenticator: Arc<dyn Authenticator>,
}
