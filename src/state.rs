use std::sync::Arc;

use crate::config::AppConfig;
use crate::dispatch::mailer::{MailerObject, SmtpMailer};
use crate::dispatch::renderer::{RendererObject, TypstRenderer};
use crate::store::{MemoryStore, StoreObject};
use crate::upload::storage::UploadStorage;

/// Shared application state: the store plus the mail and render
/// collaborators, all behind trait objects so tests can swap in doubles.
pub struct AppState {
    pub store: StoreObject,
    pub mailer: MailerObject,
    pub renderer: RendererObject,
    pub uploads: UploadStorage,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let mailer = SmtpMailer::new(&config.smtp)?;
        Ok(Self {
            store: Arc::new(MemoryStore::new()),
            mailer: Arc::new(mailer),
            renderer: Arc::new(TypstRenderer::new(&config.artifact_root)),
            uploads: UploadStorage::new(&config.upload_root),
        })
    }

    /// Assemble from explicit parts; tests use this with doubles.
    pub fn with_parts(
        store: StoreObject,
        mailer: MailerObject,
        renderer: RendererObject,
        uploads: UploadStorage,
    ) -> Self {
        Self {
            store,
            mailer,
            renderer,
            uploads,
        }
    }
}
