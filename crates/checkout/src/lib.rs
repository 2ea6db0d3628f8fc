pub mod error;
mod mock;
mod models;
mod provider;

pub use crate::mock::MockProvider;
pub use crate::models::{CheckoutRequest, HostedSession, SessionId, SessionMetadata};
pub use crate::provider::CheckoutProvider;
use std::sync::Arc;

/// Shared handle to a configured checkout provider, constructed once and
/// injected into the storefront boundary that needs it.
pub type ProviderHandle = Arc<dyn CheckoutProvider + Send + Sync>;
