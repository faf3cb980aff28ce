use clap::{Args, Parser};
use std::{fs, path::PathBuf, time::Duration};
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://www.googleapis.com/books/v1";

#[derive(Debug, Clone, Parser)]
pub struct BackendConfig {
    #[arg(
        long,
        env = "HONDANA_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/hondana.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "HONDANA_DATA_DIR",
        help = "Data directory (database, configs etc.), default is system default like ~/.local/share/hondana",
        default_value_t = default_data_dir()
    )]
    data_dir: String,
}

fn default_data_dir() -> String {
    let dir = dirs::data_dir()
        .map(|p| p.join("hondana"))
        .unwrap_or_else(|| PathBuf::from("hondana"));

    if !fs::exists(&dir).expect("Failed to check if data directory exists") {
        fs::create_dir_all(&dir).expect("Failed to create data directory");
    } else if !dir.is_dir() {
        panic!("Data directory is not a directory",)
    }

    dir.to_string_lossy().to_string()
}

impl BackendConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/hondana.db?mode=rwc", self.data_dir))
    }
}

#[derive(Debug, Clone, Args)]
pub struct CatalogArgs {
    #[arg(
        long,
        env = "HONDANA_CATALOG_API_KEY",
        hide_env_values = true,
        help = "API key for the book catalog (Google Books)"
    )]
    pub catalog_api_key: Option<String>,

    #[arg(
        long,
        env = "HONDANA_CATALOG_URL",
        default_value = DEFAULT_CATALOG_URL,
        help = "Base URL of the book catalog API"
    )]
    pub catalog_url: Url,

    #[arg(
        long,
        env = "HONDANA_CATALOG_TIMEOUT",
        help = "Timeout for catalog requests in human friendly format (e.g. 10s, 1m), no timeout if not set",
        value_parser = humantime::parse_duration
    )]
    pub catalog_timeout: Option<Duration>,
}
