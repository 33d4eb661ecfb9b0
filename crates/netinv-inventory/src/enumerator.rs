//! Base interface enumeration
//!
//! The base set (name, hardware address, bound addresses) comes straight from
//! the kernel through `getifaddrs(3)`; everything else is scraped later by the
//! extractor.

use std::collections::HashMap;
use std::net::IpAddr;

use tracing::{debug, instrument};

use crate::error::InventoryError;

/// Interface as known to the network stack, before attribute scraping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseInterface {
    /// Interface name
    pub name: String,
    /// Lower-case colon-separated hardware address, empty if none
    pub mac_address: String,
    /// Bound addresses without prefix length, IPv4 before IPv6
    pub ip_addresses: Vec<String>,
}

impl BaseInterface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mac_address: String::new(),
            ip_addresses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac_address = mac.into();
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.ip_addresses.push(address.into());
        self
    }
}

/// Source of the ordered base interface list
pub trait InterfaceEnumerator: Send + Sync {
    /// List interfaces in OS order
    ///
    /// # Errors
    /// Returns `InventoryError::Enumeration` if the OS query fails. No partial
    /// list is ever returned.
    fn list_base_interfaces(&self) -> Result<Vec<BaseInterface>, InventoryError>;
}

/// One `getifaddrs` entry reduced to what the inventory needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressEntry {
    /// Link-layer entry with its hardware address, if any
    Link(Option<[u8; 6]>),
    /// Network-layer address
    Ip(IpAddr),
    /// Entry without a usable address
    Other,
}

/// Format a hardware address, treating all-zero as absent
#[must_use]
pub fn format_mac(octets: [u8; 6]) -> String {
    if octets.iter().all(|b| *b == 0) {
        return String::new();
    }
    octets
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[derive(Default)]
struct Builder {
    mac_address: String,
    ipv4: Vec<String>,
    ipv6: Vec<String>,
}

/// Device an address entry belongs to
///
/// IPv4 addresses carrying a label (`eth0:1`) are reported under the label.
/// The kernel only accepts labels that start with the device name, so the
/// part before the first `:` is the device.
fn owner<'a>(name: &'a str, known: &HashMap<String, Builder>) -> &'a str {
    if known.contains_key(name) {
        return name;
    }
    name.split_once(':').map_or(name, |(device, _)| device)
}

/// Group per-address entries into interfaces
///
/// Link-layer entries define the interfaces and their order. Address entries
/// are attached to their device; a device seen only through addresses is
/// appended after the linked ones.
pub fn group_entries<I>(entries: I) -> Vec<BaseInterface>
where
    I: IntoIterator<Item = (String, AddressEntry)>,
{
    let (links, addresses): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|(_, entry)| matches!(entry, AddressEntry::Link(_)));

    let mut order: Vec<String> = Vec::new();
    let mut builders: HashMap<String, Builder> = HashMap::new();

    for (name, entry) in links {
        let builder = builders.entry(name.clone()).or_insert_with(|| {
            order.push(name);
            Builder::default()
        });
        if let AddressEntry::Link(Some(octets)) = entry {
            builder.mac_address = format_mac(octets);
        }
    }

    for (name, entry) in addresses {
        let device = owner(&name, &builders).to_string();
        let builder = builders.entry(device.clone()).or_insert_with(|| {
            order.push(device);
            Builder::default()
        });

        match entry {
            AddressEntry::Ip(IpAddr::V4(addr)) => builder.ipv4.push(addr.to_string()),
            AddressEntry::Ip(IpAddr::V6(addr)) => builder.ipv6.push(addr.to_string()),
            AddressEntry::Link(_) | AddressEntry::Other => {}
        }
    }

    order
        .into_iter()
        .filter_map(|name| {
            let builder = builders.remove(&name)?;
            let mut ip_addresses = builder.ipv4;
            ip_addresses.extend(builder.ipv6);
            Some(BaseInterface {
                name,
                mac_address: builder.mac_address,
                ip_addresses,
            })
        })
        .collect()
}

/// Enumerator backed by the host's network stack
#[derive(Debug, Clone, Default)]
pub struct SystemEnumerator;

impl SystemEnumerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "linux")]
fn classify(address: Option<&nix::sys::socket::SockaddrStorage>) -> AddressEntry {
    let Some(address) = address else {
        return AddressEntry::Other;
    };

    if let Some(sin) = address.as_sockaddr_in() {
        AddressEntry::Ip(IpAddr::V4(sin.ip()))
    } else if let Some(sin6) = address.as_sockaddr_in6() {
        AddressEntry::Ip(IpAddr::V6(sin6.ip()))
    } else if let Some(link) = address.as_link_addr() {
        AddressEntry::Link(link.addr())
    } else {
        AddressEntry::Other
    }
}

impl InterfaceEnumerator for SystemEnumerator {
    #[cfg(target_os = "linux")]
    #[instrument(skip(self), level = "debug")]
    fn list_base_interfaces(&self) -> Result<Vec<BaseInterface>, InventoryError> {
        let addrs = nix::ifaddrs::getifaddrs()
            .map_err(|e| InventoryError::Enumeration(e.to_string()))?;

        let interfaces = group_entries(
            addrs.map(|ifa| (ifa.interface_name.clone(), classify(ifa.address.as_ref()))),
        );

        debug!(count = interfaces.len(), "enumerated interfaces");

        Ok(interfaces)
    }

    #[cfg(not(target_os = "linux"))]
    fn list_base_interfaces(&self) -> Result<Vec<BaseInterface>, InventoryError> {
        Err(InventoryError::Enumeration(
            "interface enumeration is only supported on Linux".to_string(),
        ))
    }
}

/// Fixed enumerator for tests and demos
#[derive(Debug, Clone)]
pub struct StaticEnumerator {
    result: Result<Vec<BaseInterface>, String>,
}

impl StaticEnumerator {
    #[must_use]
    pub fn new(interfaces: Vec<BaseInterface>) -> Self {
        Self {
            result: Ok(interfaces),
        }
    }

    /// Enumerator whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: Err(message.into()),
        }
    }
}

impl InterfaceEnumerator for StaticEnumerator {
    fn list_base_interfaces(&self) -> Result<Vec<BaseInterface>, InventoryError> {
        self.result.clone().map_err(InventoryError::Enumeration)
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::*;

    fn entry(name: &str, entry: AddressEntry) -> (String, AddressEntry) {
        (name.to_string(), entry)
    }

    #[test]
    fn test_format_mac() {
        assert_eq!(
            format_mac([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
            "00:11:22:33:44:55"
        );
        assert_eq!(
            format_mac([0xa1, 0xb2, 0xc3, 0xd4, 0xe5, 0xf6]),
            "a1:b2:c3:d4:e5:f6"
        );
        assert_eq!(format_mac([0; 6]), "");
    }

    #[test]
    fn test_group_entries_keeps_first_seen_order() {
        // getifaddrs lists all link entries first, then IPv4, then IPv6
        let entries = vec![
            entry("lo", AddressEntry::Link(Some([0; 6]))),
            entry("eth0", AddressEntry::Link(Some([0, 0x11, 0x22, 0x33, 0x44, 0x55]))),
            entry("tun0", AddressEntry::Link(None)),
            entry("lo", AddressEntry::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST))),
            entry("eth0", AddressEntry::Ip(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10)))),
            entry("lo", AddressEntry::Ip(IpAddr::V6(Ipv6Addr::LOCALHOST))),
            entry("eth0", AddressEntry::Ip(IpAddr::V6("fe80::211:22ff:fe33:4455".parse().unwrap()))),
        ];

        let interfaces = group_entries(entries);

        assert_eq!(
            interfaces,
            vec![
                BaseInterface::new("lo")
                    .with_address("127.0.0.1")
                    .with_address("::1"),
                BaseInterface::new("eth0")
                    .with_mac("00:11:22:33:44:55")
                    .with_address("192.168.1.10")
                    .with_address("fe80::211:22ff:fe33:4455"),
                BaseInterface::new("tun0"),
            ]
        );
    }

    #[test]
    fn test_group_entries_puts_ipv4_first() {
        let entries = vec![
            entry("eth0", AddressEntry::Ip(IpAddr::V6(Ipv6Addr::LOCALHOST))),
            entry("eth0", AddressEntry::Other),
            entry("eth0", AddressEntry::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))),
        ];

        let interfaces = group_entries(entries);

        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].ip_addresses, vec!["10.0.0.1", "::1"]);
    }

    #[test]
    fn test_labelled_address_joins_its_device() {
        let entries = vec![
            entry("lo", AddressEntry::Link(Some([0; 6]))),
            entry("eth0", AddressEntry::Link(Some([0, 0x11, 0x22, 0x33, 0x44, 0x55]))),
            entry("lo", AddressEntry::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST))),
            entry("lo:1", AddressEntry::Ip(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 5)))),
            entry("eth0", AddressEntry::Ip(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10)))),
            entry("eth0:1", AddressEntry::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)))),
            entry("eth0", AddressEntry::Ip(IpAddr::V6("fe80::211:22ff:fe33:4455".parse().unwrap()))),
        ];

        let interfaces = group_entries(entries);

        assert_eq!(
            interfaces,
            vec![
                BaseInterface::new("lo")
                    .with_address("127.0.0.1")
                    .with_address("127.0.0.5"),
                BaseInterface::new("eth0")
                    .with_mac("00:11:22:33:44:55")
                    .with_address("192.168.1.10")
                    .with_address("10.0.0.5")
                    .with_address("fe80::211:22ff:fe33:4455"),
            ]
        );
    }

    #[test]
    fn test_label_before_link_entry() {
        let entries = vec![
            entry("eth0:web", AddressEntry::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)))),
            entry("eth0", AddressEntry::Link(None)),
        ];

        let interfaces = group_entries(entries);

        assert_eq!(interfaces, vec![BaseInterface::new("eth0").with_address("10.0.0.5")]);
    }

    #[test]
    fn test_static_enumerator() {
        let enumerator = StaticEnumerator::new(vec![BaseInterface::new("eth0")]);
        assert_eq!(enumerator.list_base_interfaces().unwrap().len(), 1);

        let failing = StaticEnumerator::failing("netlink socket closed");
        let err = failing.list_base_interfaces().unwrap_err();
        assert!(matches!(err, InventoryError::Enumeration(ref m) if m == "netlink socket closed"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_system_enumerator_lists_loopback() {
        let interfaces = SystemEnumerator::new().list_base_interfaces().unwrap();
        let lo = interfaces.iter().find(|i| i.name == "lo");
        assert!(lo.is_some(), "loopback missing from {interfaces:?}");
        assert!(interfaces.iter().all(|i| !i.ip_addresses.iter().any(|a| a.contains('/'))));
        // Device names never contain ':', only address labels do
        assert!(interfaces.iter().all(|i| !i.name.contains(':')));
    }
}
