use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::GeoPoint;

/// Identifier of a site (the property whose roof is being outlined)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(pub String);

impl SiteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source record the acquisition pipeline resolves before fetching imagery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,

    pub name: String,

    /// Expected roof location; also the reference for drift checks
    pub location: GeoPoint,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Site {
    pub fn new(id: SiteId, name: impl Into<String>, location: GeoPoint) -> Self {
        Self { id, name: name.into(), location, address: None }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}
