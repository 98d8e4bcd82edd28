//! QR Docs server
//!
//! Serves the collection API and the pages scanned codes lead to. The
//! collection lives in a key-value store named by `--store-url`.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use qr_core::ServerSettings;
use qr_server::QrServer;

/// QR Docs - store, print and resolve document QR codes
#[derive(Parser, Debug)]
#[command(name = "qr-server")]
#[command(version)]
#[command(about = "QR Docs server - collection API and QR redirect pages")]
struct Args {
    /// JSON settings file (flags and environment override it)
    #[arg(long, env = "QR_SERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Key-value store URL (redis://, file://, memory://)
    #[arg(long, env = "REDIS_URL")]
    store_url: Option<String>,

    /// Security code required for writes
    #[arg(long, env = "SECURITY_CODE", hide_env_values = true)]
    security_code: Option<String>,

    /// Base URL encoded into QR codes
    #[arg(long, env = "QR_PUBLIC_URL")]
    public_url: Option<String>,

    /// Request body limit in bytes
    #[arg(long)]
    max_body_bytes: Option<usize>,

    /// Serialized collection limit in bytes
    #[arg(long)]
    max_blob_bytes: Option<usize>,
}

impl Args {
    fn into_settings(self) -> qr_core::Result<ServerSettings> {
        let mut settings = match &self.config {
            Some(path) => ServerSettings::load(path)?,
            None => ServerSettings::default(),
        };

        if let Some(bind) = self.bind {
            settings.bind = bind;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if self.store_url.is_some() {
            settings.store_url = self.store_url;
        }
        if self.security_code.is_some() {
            settings.security_code = self.security_code;
        }
        if self.public_url.is_some() {
            settings.public_url = self.public_url;
        }
        if let Some(limit) = self.max_body_bytes {
            settings.max_body_bytes = limit;
        }
        if self.max_blob_bytes.is_some() {
            settings.max_blob_bytes = self.max_blob_bytes;
        }

        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let settings = Args::parse()
        .into_settings()
        .map_err(|e| format!("Failed to load settings: {}", e))?;

    if settings.security_code.is_none() {
        return Err("No security code configured (set SECURITY_CODE)".into());
    }
    info!("Loaded settings for port {}", settings.port);

    QrServer::new(settings).run().await?;

    Ok(())
}
