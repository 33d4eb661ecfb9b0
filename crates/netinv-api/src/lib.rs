//! netinv-api: Shared API types and schemas
//!
//! Contains the interface record, the response envelopes and their OpenAPI
//! schema definitions, used by both the daemon and the poller.

pub mod interfaces;
pub mod responses;

pub use interfaces::{AdminStatus, NetworkInterface, OperationalStatus};
pub use responses::{ErrorResponse, HealthResponse, NetworkInterfaces};
