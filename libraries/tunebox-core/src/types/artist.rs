//! Artist types

use super::{Album, ArtistId};
use serde::{Deserialize, Serialize};

/// An artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    /// Catalog imports may leave the name empty
    pub name: Option<String>,

    /// Albums by this artist (populated when listing artists)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub albums: Vec<Album>,
}

impl Artist {
    /// Name for display, falling back to the placeholder
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(super::PLACEHOLDER)
    }
}
