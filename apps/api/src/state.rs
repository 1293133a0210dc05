use crate::config::Config;
use crate::media::MediaStore;
use crate::store::JsonStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: JsonStore,
    pub media: MediaStore,
    pub config: Config,
}

impl AppState {
    /// Public URL for a stored upload: server-relative unless a base URL is
    /// configured (e.g. behind a CDN or separate media host).
    pub fn upload_url(&self, filename: &str) -> String {
        match &self.config.public_base_url {
            Some(base) => format!("{}/uploads/{}", base.trim_end_matches('/'), filename),
            None => format!("/uploads/{filename}"),
        }
    }
}
