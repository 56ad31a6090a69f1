//! API models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod item;

pub use item::Item;

/// Request body for creating or replacing an item
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Response for item listing
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub data: Vec<Item>,
}
