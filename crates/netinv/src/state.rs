//! Application state shared across HTTP handlers

use std::sync::Arc;

use netinv_inventory::InterfaceInventory;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Interface inventory answering `/network` queries
    pub inventory: Arc<dyn InterfaceInventory>,
}

impl AppState {
    /// Create new application state
    pub fn new(inventory: Arc<dyn InterfaceInventory>) -> Self {
        Self { inventory }
    }
}
