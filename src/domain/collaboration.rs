// Realtime collaboration events
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JOIN_DASHBOARD: &str = "join-dashboard";
pub const LEAVE_DASHBOARD: &str = "leave-dashboard";
pub const COMPONENT_UPDATE: &str = "component-update";
pub const CURSOR_MOVE: &str = "cursor-move";
pub const COMPONENT_UPDATED: &str = "component-updated";
pub const CURSOR_MOVED: &str = "cursor-moved";

/// One message on the realtime channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl EventFrame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUser {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Outbound `component-update` payload. `user_id` sits next to `changes`,
/// so a relay that forwards the payload as `component-updated` keeps the
/// author visible to [`ComponentUpdated::user_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUpdate {
    pub dashboard_slug: String,
    pub component_id: String,
    pub changes: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Outbound `cursor-move` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorMove {
    pub dashboard_slug: String,
    pub position: CursorPosition,
    pub user: PresenceUser,
}

/// Inbound `component-updated` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUpdated {
    pub component_id: String,
    #[serde(default)]
    pub changes: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Inbound `cursor-moved` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorMoved {
    pub position: CursorPosition,
    pub user: PresenceUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_wire_shape() {
        let frame = EventFrame::new(JOIN_DASHBOARD, json!("sales"));
        assert_eq!(
            serde_json::to_string(&frame).unwrap(),
            r#"{"event":"join-dashboard","data":"sales"}"#
        );
    }

    #[test]
    fn test_component_update_camel_case() {
        let update = ComponentUpdate {
            dashboard_slug: "sales".to_string(),
            component_id: "c1".to_string(),
            changes: json!({"title": "New"}),
            user_id: None,
        };
        assert_eq!(
            serde_json::to_value(update).unwrap(),
            json!({"dashboardSlug": "sales", "componentId": "c1", "changes": {"title": "New"}})
        );
    }

    #[test]
    fn test_forwarded_update_keeps_author() {
        let update = ComponentUpdate {
            dashboard_slug: "sales".to_string(),
            component_id: "c1".to_string(),
            changes: json!({"title": "New"}),
            user_id: Some("u1".to_string()),
        };
        let forwarded: ComponentUpdated =
            serde_json::from_value(serde_json::to_value(&update).unwrap()).unwrap();
        assert_eq!(forwarded.user_id.as_deref(), Some("u1"));
        assert_eq!(forwarded.changes, json!({"title": "New"}));
    }

    #[test]
    fn test_component_updated_tolerates_missing_fields() {
        let parsed: ComponentUpdated =
            serde_json::from_value(json!({"componentId": "c9"})).unwrap();
        assert_eq!(parsed.component_id, "c9");
        assert!(parsed.changes.is_null());
        assert!(parsed.user_id.is_none());
    }
}
