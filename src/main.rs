use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use nav_chrome_lib::error::NavError;

const DEFAULT_SETTINGS_FILE: &str = "nav_settings.json";

#[tokio::main]
async fn main() -> Result<(), NavError> {
    // stdout carries the host protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

    nav_chrome_lib::run(&settings_path).await
}
