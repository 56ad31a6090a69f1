//! Item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Item resource
///
/// `id` is assigned by the store and opaque to callers. `updated_at` is
/// never earlier than `created_at` and only moves on a successful update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
