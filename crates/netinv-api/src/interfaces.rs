//! Network interface record types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Snapshot of a single network interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NetworkInterface {
    /// Interface name, unique within a snapshot
    pub name: String,
    /// Bound addresses without prefix length, IPv4 first
    #[serde(default)]
    pub ip_addresses: Vec<String>,
    /// Hardware address, empty when the interface has none
    #[serde(default)]
    pub mac_address: String,
    /// Maximum transmission unit in bytes
    pub mtu: u32,
    /// Link speed as reported by the driver, `N/A` when unavailable
    pub speed: String,
    /// Duplex mode as reported by the driver, `N/A` when unavailable
    pub duplex: String,
    /// Administrative status
    pub admin_status: AdminStatus,
    /// Operational status
    pub operational_status: OperationalStatus,
}

/// Operator-configured state of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminStatus {
    Enabled,
    Disabled,
    Unknown,
}

impl std::fmt::Display for AdminStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminStatus::Enabled => write!(f, "enabled"),
            AdminStatus::Disabled => write!(f, "disabled"),
            AdminStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Observed link state of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum OperationalStatus {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
    #[serde(rename = "unknown")]
    Unknown,
}

impl std::fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationalStatus::Up => write!(f, "UP"),
            OperationalStatus::Down => write!(f, "DOWN"),
            OperationalStatus::Unknown => write!(f, "unknown"),
        }
    }
}
