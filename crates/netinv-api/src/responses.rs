//! Response envelopes for the API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::interfaces::NetworkInterface;

/// Body of a `/network` response
///
/// Success bodies carry the interface list. The daemon never sets `error`
/// here, failures are sent as [`ErrorResponse`], but both shapes decode into
/// this type so a client can read any `/network` body with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NetworkInterfaces {
    /// Interfaces in enumeration order
    #[serde(rename = "network_interface", default)]
    pub interfaces: Vec<NetworkInterface>,
    /// Error message from the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NetworkInterfaces {
    /// Wrap a list of interfaces in a success envelope
    #[must_use]
    pub fn new(interfaces: Vec<NetworkInterface>) -> Self {
        Self {
            interfaces,
            error: None,
        }
    }

    /// Error message, if the server reported a non-empty one
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Failure body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{AdminStatus, OperationalStatus};

    fn sample() -> NetworkInterfaces {
        NetworkInterfaces::new(vec![
            NetworkInterface {
                name: "eth0".to_string(),
                ip_addresses: vec!["192.168.1.10".to_string(), "fe80::1".to_string()],
                mac_address: "00:11:22:33:44:55".to_string(),
                mtu: 1500,
                speed: "1000Mb/s".to_string(),
                duplex: "Full".to_string(),
                admin_status: AdminStatus::Enabled,
                operational_status: OperationalStatus::Up,
            },
            NetworkInterface {
                name: "dummy0".to_string(),
                ip_addresses: Vec::new(),
                mac_address: String::new(),
                mtu: 1500,
                speed: "N/A".to_string(),
                duplex: "N/A".to_string(),
                admin_status: AdminStatus::Unknown,
                operational_status: OperationalStatus::Unknown,
            },
        ])
    }

    #[test]
    fn test_round_trip() {
        let original = sample();
        let json = serde_json::to_string(&original).unwrap();
        let decoded: NetworkInterfaces = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_empty_addresses_are_an_array() {
        let value = serde_json::to_value(sample()).unwrap();
        let second = &value["network_interface"][1];
        assert_eq!(second["ip_addresses"], serde_json::json!([]));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_body_decodes_as_envelope() {
        let body = r#"{"error":"there is no such interface"}"#;
        let decoded: NetworkInterfaces = serde_json::from_str(body).unwrap();
        assert!(decoded.interfaces.is_empty());
        assert_eq!(decoded.error_message(), Some("there is no such interface"));
    }

    #[test]
    fn test_blank_error_is_ignored() {
        let body = r#"{"network_interface":[],"error":""}"#;
        let decoded: NetworkInterfaces = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.error_message(), None);
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_string(&ErrorResponse::new("boom")).unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);
    }
}
