//! Checkout handoff models.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Opaque reference to a hosted checkout session, carried through the
/// provider's return redirect.
#[derive(Debug, Clone, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// What the storefront hands to the provider to start a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Opaque purchase identifier (the catalog record's product id)
    pub product_id: String,
    /// Book title shown on the hosted payment page
    pub title: String,
    /// Price in minor currency units
    pub price_minor: u64,
}

/// A created hosted session: where to send the buyer, and the reference
/// the provider hands back on return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedSession {
    pub id: SessionId,
    /// URL of the provider's hosted payment page
    pub redirect_url: String,
}

/// Metadata looked up by session id after the provider redirects back,
/// used to present the post-purchase download link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// The originally supplied purchase identifier
    pub product_id: String,
    pub title: String,
}
