//! In-memory checkout provider for testing.

use crate::error::{ErrorKind, Result};
use crate::models::{CheckoutRequest, HostedSession, SessionId, SessionMetadata};
use crate::provider::CheckoutProvider;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// In-memory checkout provider for testing.
///
/// Records created sessions in a map behind a [`RwLock`] so the trait can
/// operate on `&self`. Session ids are sequential (`sess_test_1`, ...) and
/// redirect URLs point at a fake hosted domain. An outage can be toggled to
/// test that callers surface provider failures instead of swallowing them.
///
/// # Examples
///
/// ```
/// use bookstall_checkout::{CheckoutProvider, CheckoutRequest, MockProvider};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = MockProvider::new();
/// let session = provider
///     .create_session(&CheckoutRequest {
///         product_id: "doc-1".to_string(),
///         title: "Shadow Run".to_string(),
///         price_minor: 499,
///     })
///     .await?;
/// let metadata = provider.session_metadata(&session.id).await?;
/// assert_eq!(metadata.title, "Shadow Run");
/// # Ok(())
/// # }
/// ```
pub struct MockProvider {
    name: String,
    sessions: RwLock<HashMap<SessionId, SessionMetadata>>,
    counter: AtomicU64,
    outage: AtomicBool,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            sessions: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(0),
            outage: AtomicBool::new(false),
        }
    }

    /// Make every call fail with a provider error until cleared.
    pub fn set_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }

    fn check_outage(&self) -> Result<()> {
        if self.outage.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Provider("simulated outage".to_string()));
        }
        Ok(())
    }
}
impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckoutProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_session(&self, request: &CheckoutRequest) -> Result<HostedSession> {
        self.check_outage()?;
        if request.title.is_empty() {
            exn::bail!(ErrorKind::InvalidRequest("title must not be empty".to_string()));
        }
        if request.price_minor == 0 {
            exn::bail!(ErrorKind::InvalidRequest("price must be positive".to_string()));
        }
        let id = SessionId::from(format!("sess_test_{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1));
        self.sessions.write().await.insert(
            id.clone(),
            SessionMetadata {
                product_id: request.product_id.clone(),
                title: request.title.clone(),
            },
        );
        tracing::debug!(provider = %self.name, session = %id, "created checkout session");
        Ok(HostedSession {
            redirect_url: format!("https://checkout.invalid/pay/{id}"),
            id,
        })
    }

    async fn session_metadata(&self, session: &SessionId) -> Result<SessionMetadata> {
        self.check_outage()?;
        self.sessions
            .read()
            .await
            .get(session)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::SessionNotFound(session.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            product_id: "doc-1".to_string(),
            title: "Shadow Run".to_string(),
            price_minor: 499,
        }
    }

    #[tokio::test]
    async fn round_trips_session_metadata() {
        let provider = MockProvider::new();
        let session = provider.create_session(&request()).await.unwrap();
        assert!(session.redirect_url.contains(session.id.as_str()));

        let metadata = provider.session_metadata(&session.id).await.unwrap();
        assert_eq!(metadata.product_id, "doc-1");
        assert_eq!(metadata.title, "Shadow Run");
    }

    #[tokio::test]
    async fn session_ids_are_unique() {
        let provider = MockProvider::new();
        let first = provider.create_session(&request()).await.unwrap();
        let second = provider.create_session(&request()).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn unknown_sessions_are_not_found() {
        let provider = MockProvider::new();
        let err = provider.session_metadata(&SessionId::from("sess_missing")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::SessionNotFound(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn rejects_unusable_requests() {
        let provider = MockProvider::new();
        let mut bad = request();
        bad.title.clear();
        assert!(matches!(&*provider.create_session(&bad).await.unwrap_err(), ErrorKind::InvalidRequest(_)));

        let mut free = request();
        free.price_minor = 0;
        assert!(matches!(&*provider.create_session(&free).await.unwrap_err(), ErrorKind::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn outages_surface_as_provider_errors() {
        let provider = MockProvider::new();
        provider.set_outage(true);
        let err = provider.create_session(&request()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Provider(_)));

        provider.set_outage(false);
        assert!(provider.create_session(&request()).await.is_ok());
    }
}
