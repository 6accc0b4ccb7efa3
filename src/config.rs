use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_MAX_BACKUPS: usize = 10;
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024; // 5MB
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub admin_token: String,
    pub allowed_origins: Vec<String>,
    pub data_dir: PathBuf,
    pub max_backups: usize,
    pub max_upload_bytes: u64,
    pub rate_limit_per_minute: Option<u64>,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_use_tls: bool,
    pub notify_to: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    security: SecuritySection,
    #[serde(default)]
    storage: StorageSection,
    #[serde(default)]
    uploads: UploadsSection,
    #[serde(default)]
    rate_limit: RateLimitSection,
    #[serde(default)]
    email: EmailSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_environment")]
    environment: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct SecuritySection {
    #[serde(default)]
    admin_token: Option<String>,
    #[serde(default)]
    allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StorageSection {
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default = "default_max_backups")]
    max_backups: usize,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_backups: default_max_backups(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadsSection {
    #[serde(default = "default_max_upload_bytes")]
    max_file_bytes: u64,
}

impl Default for UploadsSection {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RateLimitSection {
    #[serde(default)]
    requests_per_minute: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct EmailSection {
    #[serde(default)]
    smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    smtp_port: u16,
    #[serde(default)]
    smtp_username: Option<String>,
    #[serde(default)]
    smtp_password: Option<String>,
    #[serde(default = "default_true")]
    smtp_use_tls: bool,
    #[serde(default)]
    notify_to: Option<String>,
}

impl Default for EmailSection {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            smtp_use_tls: true,
            notify_to: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_max_backups() -> usize {
    DEFAULT_MAX_BACKUPS
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_true() -> bool {
    true
}

impl ServerConfig {
    /// Load configuration: `server.toml` first, environment otherwise.
    /// A missing admin token is a startup error, not a runtime one.
    pub fn load() -> anyhow::Result<Self> {
        let config = if let Some(file_config) = load_from_file()? {
            Self::from_file_config(file_config)
        } else {
            Self::from_env()
        };

        if config.admin_token.trim().is_empty() {
            anyhow::bail!(
                "admin token is not configured; set PORTFOLIO_ADMIN_TOKEN or [security].admin_token"
            );
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn content_path(&self) -> PathBuf {
        self.data_dir.join("content.json")
    }

    pub fn contacts_path(&self) -> PathBuf {
        self.data_dir.join("contacts.json")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    fn from_file_config(file_config: FileConfig) -> Self {
        Self {
            host: file_config.server.host,
            port: file_config.server.port,
            environment: file_config.server.environment,
            admin_token: file_config.security.admin_token.unwrap_or_default(),
            allowed_origins: file_config.security.allowed_origins,
            data_dir: file_config.storage.data_dir,
            max_backups: file_config.storage.max_backups,
            max_upload_bytes: file_config.uploads.max_file_bytes,
            rate_limit_per_minute: file_config.rate_limit.requests_per_minute,
            email: EmailConfig {
                smtp_host: file_config.email.smtp_host,
                smtp_port: file_config.email.smtp_port,
                smtp_username: file_config.email.smtp_username,
                smtp_password: file_config.email.smtp_password,
                smtp_use_tls: file_config.email.smtp_use_tls,
                notify_to: file_config.email.notify_to,
            },
        }
    }

    fn from_env() -> Self {
        let host = env::var("PORTFOLIO_HOST").unwrap_or_else(|_| default_host());
        let port = env::var("PORTFOLIO_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or_else(default_port);
        let environment =
            env::var("PORTFOLIO_ENV").unwrap_or_else(|_| default_environment());
        let admin_token = env::var("PORTFOLIO_ADMIN_TOKEN").unwrap_or_default();
        let allowed_origins = env::var("PORTFOLIO_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let data_dir = env::var("PORTFOLIO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());
        let max_backups = env::var("PORTFOLIO_MAX_BACKUPS")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or_else(default_max_backups);
        let max_upload_bytes = env::var("PORTFOLIO_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or_else(default_max_upload_bytes);
        let rate_limit_per_minute = env::var("PORTFOLIO_RATE_LIMIT_RPM")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());

        let email = EmailConfig {
            smtp_host: env::var("PORTFOLIO_SMTP_HOST").ok(),
            smtp_port: env::var("PORTFOLIO_SMTP_PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or_else(default_smtp_port),
            smtp_username: env::var("PORTFOLIO_SMTP_USERNAME").ok(),
            smtp_password: env::var("PORTFOLIO_SMTP_PASSWORD").ok(),
            smtp_use_tls: env::var("PORTFOLIO_SMTP_USE_TLS")
                .ok()
                .and_then(|value| value.parse::<bool>().ok())
                .unwrap_or(true),
            notify_to: env::var("PORTFOLIO_NOTIFY_EMAIL").ok(),
        };

        Self {
            host,
            port,
            environment,
            admin_token,
            allowed_origins,
            data_dir,
            max_backups,
            max_upload_bytes,
            rate_limit_per_minute,
            email,
        }
    }
}

fn load_from_file() -> anyhow::Result<Option<FileConfig>> {
    let config_path = env::var("PORTFOLIO_SERVER_CONFIG").ok();
    let path = if let Some(path) = config_path {
        Some(path)
    } else if Path::new("server.toml").exists() {
        Some("server.toml".to_string())
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(None);
    };

    let contents = fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path, err))?;
    let parsed: FileConfig = toml::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path, err))?;
    Ok(Some(parsed))
}
