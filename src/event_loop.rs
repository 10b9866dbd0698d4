// Drives a Navigation from host events on a single task.
// Trailing resize work is scheduled with a tokio timer alongside the event channel.

use std::time::Instant;
use tokio::sync::mpsc;

use crate::error::NavError;
use crate::modules::navigation::Navigation;
use crate::modules::script_surface::ScriptSurface;
use crate::state::{HostMessage, NavEvent};

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn resize_timer(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn send(output: &mpsc::UnboundedSender<HostMessage>, msg: HostMessage) -> Result<(), NavError> {
    output.send(msg).map_err(|_| NavError::ChannelClosed)
}

/// Forward every queued script to the host as an `eval` message.
fn flush_scripts(
    navigation: &Navigation<ScriptSurface>,
    output: &mpsc::UnboundedSender<HostMessage>,
) -> Result<(), NavError> {
    for script in navigation.with_surface(|s| s.take_scripts()) {
        send(output, HostMessage::Eval { script })?;
    }
    Ok(())
}

/// Apply one event. Returns false when the loop should stop.
fn handle_event(
    navigation: &mut Navigation<ScriptSurface>,
    event: NavEvent,
    output: &mpsc::UnboundedSender<HostMessage>,
) -> Result<bool, NavError> {
    match event {
        NavEvent::Resize { width } => {
            navigation.with_surface(|s| s.report_viewport(width));
            if let Some(deadline) = navigation.on_resize(now()) {
                log::trace!("[Nav] Resize deferred until {:?}", deadline);
            }
        }
        NavEvent::NavHeight { height } => {
            navigation.with_surface(|s| s.report_nav_height(height));
            navigation.invalidate_height();
        }
        NavEvent::Signal { group, key, value } => {
            log::debug!("[Nav] Signal {:?}/{} = {}", group, key, value);
            navigation.signal(group, key, value);
        }
        NavEvent::Retract { group, key } => {
            let previous = navigation.retract(group, &key);
            log::debug!("[Nav] Retract {:?}/{} (was {:?})", group, key, previous);
        }
        NavEvent::Batch { group, flags } => {
            log::debug!("[Nav] Batch {:?} ({} flags)", group, flags.len());
            navigation.batch(group, flags);
        }
        NavEvent::QueryHeight => {
            let px = navigation.height();
            send(output, HostMessage::Height { px })?;
        }
        NavEvent::Snapshot => {
            let snapshot = navigation.snapshot();
            send(output, HostMessage::Snapshot(snapshot))?;
        }
        NavEvent::Shutdown => {
            log::info!("[Nav] Shutdown requested");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Run until `Shutdown` arrives or the event channel closes.
pub async fn run_event_loop(
    mut navigation: Navigation<ScriptSurface>,
    mut events: mpsc::UnboundedReceiver<NavEvent>,
    output: mpsc::UnboundedSender<HostMessage>,
) -> Result<(), NavError> {
    // Effects applied during construction
    flush_scripts(&navigation, &output)?;

    loop {
        let deadline = navigation.resize_deadline();
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    log::info!("[Nav] Event channel closed");
                    break;
                };
                let keep_going = handle_event(&mut navigation, event, &output)?;
                flush_scripts(&navigation, &output)?;
                if !keep_going {
                    break;
                }
            }
            _ = resize_timer(deadline) => {
                navigation.poll_resize(now());
                flush_scripts(&navigation, &output)?;
            }
        }
    }

    Ok(())
}
