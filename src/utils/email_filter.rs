use autoscale_cuckoo_filter::CuckooFilter;
use std::sync::{PoisonError, RwLock};

/// Expected capacity and false-positive rate.
/// Tune these based on real account counts.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

/// Probabilistic set of registered emails. A miss means the email is
/// definitely unregistered; a hit still needs confirming.
pub struct EmailFilter {
    inner: RwLock<CuckooFilter<String>>,
}

impl Default for EmailFilter {
    fn default() -> Self {
        Self {
            inner: RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)),
        }
    }
}

#[inline]
fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

impl EmailFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an email might be registered (false positives possible)
    pub fn might_exist(&self, email: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&normalize(email))
    }

    pub fn insert(&self, email: &str) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(&normalize(email));
    }

    /// Insert a batch of emails under a single write lock
    pub fn insert_batch(&self, emails: &[String]) {
        let mut filter = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        for email in emails {
            filter.add(&normalize(email));
        }
    }
}
