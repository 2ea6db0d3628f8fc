//! The hosted-provider trait boundary.

use crate::error::Result;
use crate::models::{CheckoutRequest, HostedSession, SessionId, SessionMetadata};
use async_trait::async_trait;

/// A hosted checkout provider.
///
/// The provider is an opaque external collaborator: the storefront hands it
/// a title, a price and an opaque product identifier, sends the buyer to
/// the returned URL, and on return uses the session id to look up what was
/// bought. Payment processing itself (webhooks, refunds, disputes) is the
/// provider's problem, not this trait's.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Name of the configured provider (used for logging only).
    fn name(&self) -> &str;

    /// Create a hosted session and return the redirect URL for it.
    async fn create_session(&self, request: &CheckoutRequest) -> Result<HostedSession>;

    /// Look up the metadata originally supplied for a session.
    ///
    /// Returns
    /// [`SessionNotFound`](crate::error::ErrorKind::SessionNotFound) for
    /// ids the provider does not know.
    async fn session_metadata(&self, session: &SessionId) -> Result<SessionMetadata>;
}
