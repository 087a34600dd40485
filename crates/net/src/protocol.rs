//! JSON bodies exchanged with the dashboard
//!
//! Field names and order match what the dashboard client reads; absent
//! optional fields are omitted rather than sent as `null`.

use nexus_core::AppInfo;
use serde::{Deserialize, Serialize};

/// Reply to `POST /api/launch/{app_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(
        rename = "availableApps",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub available_apps: Option<Vec<String>>,
}

impl LaunchResponse {
    pub fn launched(app_id: &str) -> Self {
        Self {
            success: true,
            message: Some(format!("Launching {}...", app_id)),
            error: None,
            app: Some(app_id.to_string()),
            available_apps: None,
        }
    }

    pub fn unknown(app_id: &str, available: Vec<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(format!("Unknown app: {}", app_id)),
            app: None,
            available_apps: Some(available),
        }
    }

    pub fn failed(app_id: &str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(format!("Failed to launch {}", app_id)),
            app: None,
            available_apps: None,
        }
    }
}

/// Reply to `GET /api/apps`
#[derive(Debug, Clone, Serialize)]
pub struct AppsResponse {
    pub apps: Vec<AppInfo>,
}

/// Reply to `POST /api/system/power`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PowerResponse {
    pub fn accepted(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            error: None,
        }
    }

    pub fn invalid() -> Self {
        Self {
            success: false,
            message: None,
            error: Some("Invalid action".to_string()),
        }
    }
}

/// Body of `POST /api/system/power`
///
/// A missing `action` is an invalid action, not a malformed body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PowerRequest {
    #[serde(default)]
    pub action: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_bodies() {
        let ok = serde_json::to_string(&LaunchResponse::launched("kodi")).unwrap();
        assert_eq!(ok, r#"{"success":true,"message":"Launching kodi...","app":"kodi"}"#);

        let unknown =
            serde_json::to_string(&LaunchResponse::unknown("vlc", vec!["plex".into(), "kodi".into()]))
                .unwrap();
        assert_eq!(
            unknown,
            r#"{"success":false,"error":"Unknown app: vlc","availableApps":["plex","kodi"]}"#
        );

        let failed = serde_json::to_string(&LaunchResponse::failed("kodi")).unwrap();
        assert_eq!(failed, r#"{"success":false,"error":"Failed to launch kodi"}"#);
    }

    #[test]
    fn test_power_bodies() {
        let ok = serde_json::to_string(&PowerResponse::accepted("Restarting...")).unwrap();
        assert_eq!(ok, r#"{"success":true,"message":"Restarting..."}"#);

        let bad = serde_json::to_string(&PowerResponse::invalid()).unwrap();
        assert_eq!(bad, r#"{"success":false,"error":"Invalid action"}"#);
    }

    #[test]
    fn test_power_request_parsing() {
        let req: PowerRequest = serde_json::from_str(r#"{"action":"shutdown"}"#).unwrap();
        assert_eq!(req.action.as_deref(), Some("shutdown"));

        let req: PowerRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.action, None);

        assert!(serde_json::from_str::<PowerRequest>(r#"{"action":1}"#).is_err());
        assert!(serde_json::from_str::<PowerRequest>("not json").is_err());
    }
}
