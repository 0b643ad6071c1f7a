use moka::future::Cache;
use std::time::Duration;

/// Positive cache of registered emails.
/// Only taken emails are stored; a miss says nothing.
#[derive(Clone)]
pub struct TakenEmailCache {
    inner: Cache<String, bool>,
}

impl Default for TakenEmailCache {
    fn default() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(500_000) // tune based on memory
                .time_to_live(Duration::from_secs(86400)) // 24h TTL
                .build(),
        }
    }
}

impl TakenEmailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mark_taken(&self, email: &str) {
        self.inner.insert(email.to_lowercase(), true).await;
    }

    pub async fn is_taken(&self, email: &str) -> bool {
        self.inner
            .get(&email.to_lowercase())
            .await
            .unwrap_or(false)
    }

    /// Batch mark emails as taken
    pub async fn mark_batch(&self, emails: &[String]) {
        let futures: Vec<_> = emails
            .iter()
            .map(|e| self.inner.insert(e.to_lowercase(), true))
            .collect();

        // Await all insertions concurrently
        futures::future::join_all(futures).await;
    }
}
