//! High-level inventory API

use std::sync::Arc;

use async_trait::async_trait;
use netinv_api::NetworkInterface;
use tracing::{debug, info, instrument};

use crate::enumerator::InterfaceEnumerator;
use crate::error::InventoryError;
use crate::extractor::AttributeExtractor;
use crate::source::AttributeSource;

/// Snapshot queries over the host's interfaces
#[async_trait]
pub trait InterfaceInventory: Send + Sync {
    /// List every interface with all attributes, in enumeration order
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be built. The listing is
    /// all-or-nothing.
    async fn list_all(&self) -> Result<Vec<NetworkInterface>, InventoryError>;

    /// Look up one interface by exact, case-sensitive name
    ///
    /// Takes a full snapshot and scans it linearly.
    ///
    /// # Errors
    /// Returns `InventoryError::NotFound` if no interface has that name, and
    /// any error of [`Self::list_all`] unchanged.
    async fn get_by_name(&self, name: &str) -> Result<NetworkInterface, InventoryError> {
        let interfaces = self.list_all().await?;

        interfaces
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| {
                debug!(name = %name, "interface not found");
                InventoryError::NotFound {
                    name: name.to_string(),
                }
            })
    }
}

/// Inventory service
///
/// Combines the enumerator and the attribute extractor into complete
/// interface records. Holds no state between calls: every call is a fresh
/// snapshot.
#[derive(Clone)]
pub struct InventoryService {
    enumerator: Arc<dyn InterfaceEnumerator>,
    extractor: AttributeExtractor,
}

impl InventoryService {
    /// Create a new inventory service
    pub fn new(enumerator: Arc<dyn InterfaceEnumerator>, source: Arc<dyn AttributeSource>) -> Self {
        Self {
            enumerator,
            extractor: AttributeExtractor::new(source),
        }
    }
}

#[async_trait]
impl InterfaceInventory for InventoryService {
    /// Interfaces are scraped one after another, probe by probe.
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<NetworkInterface>, InventoryError> {
        let base = self.enumerator.list_base_interfaces()?;

        let mut interfaces = Vec::with_capacity(base.len());
        for iface in base {
            let attrs = self.extractor.extract(&iface.name).await?;

            interfaces.push(NetworkInterface {
                name: iface.name,
                ip_addresses: iface.ip_addresses,
                mac_address: iface.mac_address,
                mtu: attrs.mtu,
                speed: attrs.speed,
                duplex: attrs.duplex,
                admin_status: attrs.admin_status,
                operational_status: attrs.operational_status,
            });
        }

        info!(count = interfaces.len(), "collected interfaces");

        Ok(interfaces)
    }
}
