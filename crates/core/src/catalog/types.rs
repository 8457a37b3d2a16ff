//! Shared catalog types.

use serde::{Deserialize, Serialize};

/// Title of a movie as reported by the movie list provider.
pub type MovieTitle = String;

/// Actor name exactly as reported by the cast lookup provider.
pub type ActorName = String;

/// A movie matched by a catalog search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMatch {
    /// Catalog-specific movie ID.
    pub id: u32,
    /// Movie title.
    pub title: String,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl MovieMatch {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }
}

/// A single credited cast member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    /// Actor name.
    pub name: String,
    /// Character played, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    /// Billing order (0 = top billed).
    #[serde(default)]
    pub order: u32,
}
