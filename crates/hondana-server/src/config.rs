use crate::error::Result;
pub use clap::Parser;
use hondana_types::config::CatalogArgs;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "HTTP server forwarding book catalog requests")]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "HONDANA_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "HONDANA_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(long, env = "HONDANA_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }
}
