pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;

use auth::TokenManager;
use config::ServerConfig;
use events::EventBus;
use services::email::Mailer;
use std::sync::Arc;
use std::time::Instant;
use storage::{ContactStore, ContentStore, UploadStore};

/// Core application state shared across all handlers.
pub struct AppCore {
    pub config: ServerConfig,
    pub tokens: TokenManager,
    pub content: ContentStore,
    pub contacts: ContactStore,
    pub uploads: UploadStore,
    pub mailer: Option<Mailer>,
    pub events: EventBus,
    pub started_at: Instant,
}

impl AppCore {
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let content = ContentStore::new(&config.data_dir, config.max_backups)?;
        let contacts = ContactStore::new(&config.contacts_path())?;
        let uploads = UploadStore::new(&config.uploads_dir())?;
        let mailer = Mailer::from_config(&config.email);
        let tokens = TokenManager::new(config.admin_token.clone());

        Ok(Self {
            tokens,
            content,
            contacts,
            uploads,
            mailer,
            events: EventBus::new(),
            started_at: Instant::now(),
            config,
        })
    }
}

pub type AppState = Arc<AppCore>;
