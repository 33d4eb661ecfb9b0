//! API route handlers

pub mod error;
pub mod network;
pub mod system;

use netinv_api::{
    AdminStatus, ErrorResponse, HealthResponse, NetworkInterface, NetworkInterfaces,
    OperationalStatus,
};
use utoipa::OpenApi;

/// OpenAPI document for the daemon
#[derive(OpenApi)]
#[openapi(
    info(title = "netinv", description = "Network interface inventory"),
    paths(network::get_network, system::health),
    components(schemas(
        NetworkInterfaces,
        NetworkInterface,
        AdminStatus,
        OperationalStatus,
        ErrorResponse,
        HealthResponse
    )),
    tags(
        (name = "network", description = "Interface inventory"),
        (name = "system", description = "Daemon health")
    )
)]
pub struct ApiDoc;
