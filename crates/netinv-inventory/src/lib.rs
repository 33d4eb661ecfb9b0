//! netinv-inventory: network interface inventory
//!
//! Enumerates the host's interfaces and scrapes per-interface attributes
//! (MTU, speed, duplex, link state) from the output of `ip` and `ethtool`.
//!
//! Attribute failures are split in two classes. An unreadable MTU aborts the
//! whole listing with [`ExtractionError`]; every other attribute degrades to
//! a placeholder (`N/A` or `unknown`) and the listing continues.

pub mod enumerator;
pub mod error;
pub mod extractor;
pub mod service;
pub mod source;

pub use enumerator::{BaseInterface, InterfaceEnumerator, StaticEnumerator, SystemEnumerator};
pub use error::{InventoryError, NOT_FOUND_MESSAGE};
pub use extractor::{AttributeExtractor, ExtractionError, InterfaceAttributes, Probe};
pub use service::{InterfaceInventory, InventoryService};
pub use source::{AttributeSource, CommandAttributeSource, SourceError, StaticAttributeSource};
