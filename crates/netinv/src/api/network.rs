//! Interface inventory endpoint

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use netinv_api::NetworkInterfaces;
use tracing::{debug, instrument};

use crate::api::error::AppError;
use crate::state::AppState;

/// Parameter name accepted by `/network`
pub const INTERFACE_PARAM: &str = "interface";

/// Parsed `/network` query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkQuery {
    /// No parameters
    All,
    /// `?interface=<name>` with a non-empty name
    ByName(String),
}

impl NetworkQuery {
    /// Validate the raw key/value pairs of a query string
    ///
    /// Repeated keys are kept as separate pairs, so `?interface=a&interface=b`
    /// is rejected like any other extra parameter.
    ///
    /// # Errors
    /// Returns a 400 [`AppError`] for anything but zero parameters or exactly
    /// one non-empty `interface`.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, AppError> {
        match pairs {
            [] => Ok(Self::All),
            [(key, value)] if key == INTERFACE_PARAM && !value.is_empty() => {
                Ok(Self::ByName(value.clone()))
            }
            _ => Err(AppError::bad_request()),
        }
    }
}

/// List interfaces, or look one up by name
#[utoipa::path(
    get,
    path = "/network",
    tag = "network",
    params(
        ("interface" = Option<String>, Query, description = "Exact, case-sensitive interface name")
    ),
    responses(
        (status = 200, description = "Interface snapshot", body = NetworkInterfaces),
        (status = 400, description = "Unsupported query string", body = netinv_api::ErrorResponse),
        (status = 404, description = "No interface with that name", body = netinv_api::ErrorResponse),
        (status = 500, description = "Snapshot could not be built", body = netinv_api::ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn get_network(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<NetworkInterfaces>, AppError> {
    let Query(pairs) = query.map_err(|rejection| {
        debug!(%rejection, "unparseable query string");
        AppError::bad_request()
    })?;

    let interfaces = match NetworkQuery::from_pairs(&pairs)? {
        NetworkQuery::All => state.inventory.list_all().await?,
        NetworkQuery::ByName(name) => vec![state.inventory.get_by_name(&name).await?],
    };

    Ok(Json(NetworkInterfaces::new(interfaces)))
}
