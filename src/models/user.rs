//! User models: the authenticated profile and owner stubs.

use serde::{Deserialize, Serialize};

use super::common::{Image, ResourceRef};

/// User as nested inside playlists (the owner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    /// Resource identity.
    pub reference: ResourceRef,

    /// Display name. Spotify allows this to be unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Resource identity.
    pub reference: ResourceRef,

    /// Display name, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Account email, when the token scope exposes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Account country code, when the token scope exposes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Follower count.
    pub followers: u64,

    /// Profile images.
    #[serde(default)]
    pub images: Vec<Image>,
}
