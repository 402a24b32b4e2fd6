//! API resource models.

use serde::{Deserialize, Serialize};

/// A buildpack record as the cloud controller reports it. Optional fields
/// are `None` until the server supplies them; an update request sends only
/// the fields that are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buildpack {
    #[serde(default)]
    pub guid: String,

    pub name: String,

    /// Priority among buildpacks, sorted lowest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl Buildpack {
    pub fn named(name: impl Into<String>) -> Self {
        Buildpack { name: name.into(), ..Default::default() }
    }
}
