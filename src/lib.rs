// Navigation bar driver: aggregated nav state in, webview scripts out.
// `run` wires settings, the controller and the stdio transport together;
// the binary only sets up logging around it.

use std::path::Path;
use tokio::sync::mpsc;

pub mod error;
pub mod event_loop;
pub mod host;
pub mod settings;

// Shared wire types
pub mod state;

// Pure logic modules (no IO)
pub mod modules;

use crate::error::NavError;
use crate::modules::navigation::Navigation;
use crate::modules::script_surface::ScriptSurface;
use crate::settings::NavSettings;

/// Compose the navigation driver and run it over stdin/stdout until shutdown.
pub async fn run(settings_path: &Path) -> Result<(), NavError> {
    let settings = NavSettings::load(settings_path);
    if !settings_path.exists() {
        // Leave an editable copy of the defaults for the next start.
        match settings.save(settings_path) {
            Ok(()) => log::info!("[Settings] Wrote defaults to {:?}", settings_path),
            Err(e) => log::warn!("[Settings] Could not write defaults to {:?}: {}", settings_path, e),
        }
    }
    log::info!("[Nav] Starting with {:?}", settings);

    // Viewport width stays unknown until the host reports its first resize.
    let navigation = Navigation::new(ScriptSurface::new(), &settings);

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        host::read_events(stdin.lock(), event_tx);
    });
    let writer = tokio::spawn(host::write_messages(tokio::io::stdout(), out_rx));

    let result = event_loop::run_event_loop(navigation, event_rx, out_tx).await;

    match writer.await {
        Ok(write_result) => write_result?,
        Err(e) => log::error!("[Host] Writer task failed: {}", e),
    }
    result
}
