//! Attribute probes
//!
//! Each probe scans whitespace-separated tool output for a marker token and
//! reads the token right after it.
//!
//! | Attribute | Tool | Marker | On failure |
//! |---|---|---|---|
//! | MTU | `ip link show` | `mtu` | [`ExtractionError`], aborts the listing |
//! | admin / operational status | `ip link show` | `state` | `unknown` |
//! | speed | `ethtool` | `Speed:` | `N/A` |
//! | duplex | `ethtool` | `Duplex:` | `N/A` |

use std::sync::Arc;

use netinv_api::{AdminStatus, OperationalStatus};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::source::{AttributeSource, SourceError};

/// Placeholder for speed and duplex when the driver does not report them
pub const NOT_AVAILABLE: &str = "N/A";

/// Outcome of a probe whose failure is recoverable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    /// The attribute was read
    Found(T),
    /// The attribute could not be read and should take its default
    Degraded,
}

impl<T> Probe<T> {
    /// Value if found, `default` otherwise
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Probe::Found(value) => value,
            Probe::Degraded => default,
        }
    }

    /// Value if found, computed from `f` otherwise
    pub fn unwrap_or_else(self, f: impl FnOnce() -> T) -> T {
        match self {
            Probe::Found(value) => value,
            Probe::Degraded => f(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Probe<U> {
        match self {
            Probe::Found(value) => Probe::Found(f(value)),
            Probe::Degraded => Probe::Degraded,
        }
    }
}

impl<T> From<Option<T>> for Probe<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Probe::Degraded, Probe::Found)
    }
}

/// Fatal attribute failures
///
/// Only the MTU is mandatory: it comes from the same always-present link tool
/// as the status, so not reading it means the toolchain is broken.
#[derive(Error, Debug, Clone)]
pub enum ExtractionError {
    /// Link information could not be fetched at all
    #[error("failed to read link information for interface {interface}: {source}")]
    LinkInfo {
        /// Interface name
        interface: String,
        /// Underlying source failure
        source: SourceError,
    },

    /// No `mtu <n>` pair in the link output
    #[error("MTU not found for interface {interface}")]
    MtuNotFound {
        /// Interface name
        interface: String,
    },

    /// The token after `mtu` is not a positive integer
    #[error("invalid MTU {value:?} for interface {interface}")]
    InvalidMtu {
        /// Interface name
        interface: String,
        /// Offending token
        value: String,
    },
}

/// Attributes scraped for one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAttributes {
    pub mtu: u32,
    pub speed: String,
    pub duplex: String,
    pub admin_status: AdminStatus,
    pub operational_status: OperationalStatus,
}

/// Token following the first occurrence of `marker` that has a successor
fn token_after<'a>(output: &'a str, marker: &str) -> Option<&'a str> {
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        fields.by_ref().find(|field| *field == marker)?;
        fields.next()
    })
}

/// Read the MTU from `ip link show` output
///
/// # Errors
/// Returns `MtuNotFound` when no `mtu` token is followed by a value, and
/// `InvalidMtu` when that value is not a positive integer.
pub fn parse_mtu(interface: &str, output: &str) -> Result<u32, ExtractionError> {
    let token = token_after(output, "mtu").ok_or_else(|| ExtractionError::MtuNotFound {
        interface: interface.to_string(),
    })?;

    match token.parse::<u32>() {
        Ok(mtu) if mtu > 0 => Ok(mtu),
        _ => Err(ExtractionError::InvalidMtu {
            interface: interface.to_string(),
            value: token.to_string(),
        }),
    }
}

/// Read the link speed from `ethtool` output
pub fn parse_speed(output: &str) -> Probe<String> {
    token_after(output, "Speed:").map(str::to_string).into()
}

/// Read the duplex mode from `ethtool` output
pub fn parse_duplex(output: &str) -> Probe<String> {
    token_after(output, "Duplex:").map(str::to_string).into()
}

/// Map an `ip link` state word to the administrative status
#[must_use]
pub fn admin_status_from_state(state: &str) -> AdminStatus {
    match state {
        "UP" => AdminStatus::Enabled,
        "DOWN" => AdminStatus::Disabled,
        _ => AdminStatus::Unknown,
    }
}

/// Map an `ip link` state word to the operational status
#[must_use]
pub fn operational_status_from_state(state: &str) -> OperationalStatus {
    match state {
        "UP" | "LOWER_UP" => OperationalStatus::Up,
        "DOWN" => OperationalStatus::Down,
        _ => OperationalStatus::Unknown,
    }
}

/// Read the administrative status from `ip link show` output
pub fn parse_admin_status(output: &str) -> Probe<AdminStatus> {
    Probe::from(token_after(output, "state")).map(admin_status_from_state)
}

/// Read the operational status from `ip link show` output
pub fn parse_operational_status(output: &str) -> Probe<OperationalStatus> {
    Probe::from(token_after(output, "state")).map(operational_status_from_state)
}

/// Runs every probe for an interface against an [`AttributeSource`]
#[derive(Clone)]
pub struct AttributeExtractor {
    source: Arc<dyn AttributeSource>,
}

impl AttributeExtractor {
    pub fn new(source: Arc<dyn AttributeSource>) -> Self {
        Self { source }
    }

    /// Scrape all attributes of one interface
    ///
    /// Link output is fetched once and feeds the MTU and status probes; driver
    /// output is fetched once and feeds speed and duplex.
    ///
    /// # Errors
    /// Returns an `ExtractionError` if the MTU cannot be read. Every other
    /// attribute falls back to its placeholder.
    #[instrument(skip(self), level = "debug")]
    pub async fn extract(&self, interface: &str) -> Result<InterfaceAttributes, ExtractionError> {
        let link = self
            .source
            .link_info(interface)
            .await
            .map_err(|source| ExtractionError::LinkInfo {
                interface: interface.to_string(),
                source,
            })?;

        let mtu = parse_mtu(interface, &link)?;
        let admin_status = parse_admin_status(&link);
        let operational_status = parse_operational_status(&link);

        let (speed, duplex) = match self.source.driver_info(interface).await {
            Ok(driver) => (parse_speed(&driver), parse_duplex(&driver)),
            Err(e) => {
                debug!(interface = %interface, error = %e, "driver settings unavailable");
                (Probe::Degraded, Probe::Degraded)
            }
        };

        Ok(InterfaceAttributes {
            mtu,
            speed: speed.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            duplex: duplex.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            admin_status: admin_status.unwrap_or(AdminStatus::Unknown),
            operational_status: operational_status.unwrap_or(OperationalStatus::Unknown),
        })
    }
}
