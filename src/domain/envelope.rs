// Response envelope returned by the dashboard service
use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// `{success, data | error}` wrapper around every service response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, turning a `success: false` envelope into an error.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            let (message, code) = match self.error {
                Some(ErrorBody { message, code }) => (message, code),
                None => ("Request was not successful".to_string(), None),
            };
            return Err(ApiError::Rejected { message, code });
        }
        self.data
            .ok_or_else(|| ApiError::Decode("successful response without data".to_string()))
    }
}

impl ApiResponse<serde_json::Value> {
    /// Envelopes for endpoints that return no payload (deletes).
    pub fn into_unit(self) -> Result<(), ApiError> {
        if self.success {
            return Ok(());
        }
        self.into_result().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::component::{Component, ComponentType, GridPosition};
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let env: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"success": true, "data": {"id": 1}})).unwrap();
        assert_eq!(env.into_result().unwrap(), json!({"id": 1}));
    }

    #[test]
    fn test_failure_envelope() {
        let env: ApiResponse<serde_json::Value> = serde_json::from_value(
            json!({"success": false, "error": {"message": "Nope", "code": "FORBIDDEN"}}),
        )
        .unwrap();
        let err = env.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Nope");
        assert_eq!(err.code(), Some("FORBIDDEN"));
    }

    #[test]
    fn test_component_envelope() {
        let env: ApiResponse<Component> = serde_json::from_value(json!({
            "success": true,
            "data": {
                "id": "c1",
                "dashboardId": "d1",
                "type": "metric-card",
                "title": "Revenue",
                "position": {"x": 0, "y": 0, "w": 3, "h": 2}
            }
        }))
        .unwrap();
        let component = env.into_result().unwrap();
        assert_eq!(component.component_type, ComponentType::MetricCard);
        assert_eq!(component.position, GridPosition::new(0, 0, 3, 2));

        let env: ApiResponse<Component> = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(matches!(env.into_result(), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_unit_envelope_without_data() {
        let env: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"success": true})).unwrap();
        assert!(env.into_unit().is_ok());
    }
}
