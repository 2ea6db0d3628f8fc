use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// A map from cache key to `(value, expiry)` with a fixed time-to-live.
///
/// Entries become invisible once their expiry passes; they are physically
/// dropped on the next [`insert`](Self::insert) of the same key,
/// [`invalidate`](Self::invalidate), [`clear`](Self::clear) or
/// [`purge_expired`](Self::purge_expired). Expiry uses a monotonic clock,
/// so wall-clock adjustments never resurrect or kill entries.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bookstall_cache::MemoCache;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache: MemoCache<String, u64> = MemoCache::new(Duration::from_secs(3600));
/// cache.insert("books".to_string(), 42).await;
/// assert_eq!(cache.get(&"books".to_string()).await, Some(42));
/// cache.invalidate(&"books".to_string()).await;
/// assert_eq!(cache.get(&"books".to_string()).await, None);
/// # }
/// ```
pub struct MemoCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache whose entries live for `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Clone out the live value for `key`. Expired entries read as absent.
    pub async fn get(&self, key: &K) -> Option<V> {
        let guard = self.entries.read().await;
        guard.get(key).filter(|entry| entry.expires_at > Instant::now()).map(|entry| entry.value.clone())
    }

    /// Store `value` under `key` with a fresh expiry of now + ttl.
    pub async fn insert(&self, key: K, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.entries.write().await.insert(key, Entry { value, expires_at });
    }

    /// Drop the entry for `key`, expired or not. Returns whether an entry
    /// was present. This is the explicit cache-clear signal for one key.
    pub async fn invalidate(&self, key: &K) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Drop entries whose expiry has passed. Purely housekeeping; expired
    /// entries are already invisible to [`get`](Self::get).
    pub async fn purge_expired(&self) {
        let now = Instant::now();
        let mut guard = self.entries.write().await;
        let before = guard.len();
        guard.retain(|_, entry| entry.expires_at > now);
        let dropped = before - guard.len();
        if dropped > 0 {
            tracing::debug!(dropped, "purged expired cache entries");
        }
    }
}
