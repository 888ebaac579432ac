//! Serialized ban record.

use serde::{Deserialize, Serialize};

/// One entry of the source guild's ban list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ban {
    /// Id of the banned user.
    pub user_id: String,
    /// Audit-log reason, if one was recorded.
    pub reason: Option<String>,
}
