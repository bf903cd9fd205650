// ── Site domain type ──

use serde::{Deserialize, Serialize};

/// A named grouping of access points and stations on the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Controller-assigned id. Absent on controllers that address sites by name.
    pub id: Option<String>,
    pub name: String,
}

impl Site {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Path key for site-scoped API calls.
    pub fn key(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.name)
    }
}
