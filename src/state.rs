// Shared wire types between the event loop and the host binary.
// Kept free of logic so both sides can be tested independently.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Which aggregated nav state a signal contributes to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignalGroup {
    Floating,
    LogoVisible,
    Expanded,
}

/// Events the host webview reports to us.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavEvent {
    Resize { width: u32 },
    /// Measured `.nav` height; `None` when the element is absent.
    NavHeight { height: Option<u32> },
    Signal { group: SignalGroup, key: String, value: bool },
    /// Withdraw a source entirely instead of setting it false.
    Retract { group: SignalGroup, key: String },
    /// Several flags for one group, applied with a single update.
    Batch { group: SignalGroup, flags: HashMap<String, bool> },
    QueryHeight,
    Snapshot,
    Shutdown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavSnapshot {
    pub floating: bool,
    pub logo_visible: bool,
    pub expanded: bool,
    pub resize_listening: bool,
    pub height: u32,
}

/// Messages sent back to the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    Eval { script: String },
    Height { px: u32 },
    Snapshot(NavSnapshot),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event: NavEvent = serde_json::from_str(
            r#"{"type":"signal","group":"logo_visible","key":"scrollTop","value":false}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            NavEvent::Signal {
                group: SignalGroup::LogoVisible,
                key: "scrollTop".to_string(),
                value: false,
            }
        );

        let event: NavEvent = serde_json::from_str(r#"{"type":"nav_height","height":null}"#).unwrap();
        assert_eq!(event, NavEvent::NavHeight { height: None });

        let event: NavEvent =
            serde_json::from_str(r#"{"type":"retract","group":"expanded","key":"menu"}"#).unwrap();
        assert_eq!(
            event,
            NavEvent::Retract { group: SignalGroup::Expanded, key: "menu".to_string() }
        );
    }

    #[test]
    fn test_snapshot_message_is_flat() {
        let msg = HostMessage::Snapshot(NavSnapshot {
            floating: true,
            logo_visible: false,
            expanded: false,
            resize_listening: false,
            height: 56,
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["logoVisible"], false);
        assert_eq!(json["height"], 56);
    }
}
