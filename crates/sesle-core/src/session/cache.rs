//! Lazy, single-slot session cache keyed by model identifier.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::error::Result;
use crate::session::SessionKind;

struct Loaded<S: ?Sized> {
    identifier: String,
    session: Arc<S>,
}

/// Holds at most one loaded session. A request naming a different
/// identifier replaces the slot; an identical identifier reuses the
/// cached handle, including whatever compute profile it was loaded
/// with. The identifier is the entire cache key.
pub struct ModelSlot<S: ?Sized> {
    kind: SessionKind,
    inner: Mutex<Option<Loaded<S>>>,
}

impl<S: ?Sized> ModelSlot<S> {
    pub fn new(kind: SessionKind) -> Self {
        Self {
            kind,
            inner: Mutex::new(None),
        }
    }

    /// Return the cached session for `identifier`, loading it first if
    /// the slot is empty or holds a different identifier.
    ///
    /// The compare/load/install sequence runs under one lock so two
    /// concurrent requests cannot race to install different sessions.
    /// A failed load leaves the slot unchanged; replacing a session
    /// drops the prior handle, which is released once the last
    /// in-flight request using it completes.
    pub async fn acquire<F, Fut>(&self, identifier: &str, load: F) -> Result<Arc<S>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<S>>>,
    {
        let mut slot = self.inner.lock().await;

        if let Some(loaded) = slot.as_ref() {
            if loaded.identifier == identifier {
                return Ok(loaded.session.clone());
            }
            info!(
                kind = self.kind.as_str(),
                from = %loaded.identifier,
                to = %identifier,
                "replacing cached session"
            );
        } else {
            info!(kind = self.kind.as_str(), model = %identifier, "loading session");
        }

        let session = load().await?;
        *slot = Some(Loaded {
            identifier: identifier.to_string(),
            session: session.clone(),
        });
        Ok(session)
    }

    /// Identifier of the currently cached session, if any.
    pub async fn current_identifier(&self) -> Option<String> {
        let slot = self.inner.lock().await;
        slot.as_ref().map(|loaded| loaded.identifier.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSession {
        #[allow(dead_code)]
        identifier: String,
    }

    fn slot() -> ModelSlot<FakeSession> {
        ModelSlot::new(SessionKind::Recognition)
    }

    async fn acquire_counting(
        slot: &ModelSlot<FakeSession>,
        identifier: &str,
        loads: &AtomicUsize,
    ) -> Arc<FakeSession> {
        slot.acquire(identifier, || async {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FakeSession {
                identifier: identifier.to_string(),
            }))
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn identical_identifier_loads_once() {
        let slot = slot();
        let loads = AtomicUsize::new(0);

        let first = acquire_counting(&slot, "large-v3", &loads).await;
        let second = acquire_counting(&slot, "large-v3", &loads).await;

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn changed_identifier_reloads_and_discards_prior_handle() {
        let slot = slot();
        let loads = AtomicUsize::new(0);

        let first = acquire_counting(&slot, "base", &loads).await;
        let weak = Arc::downgrade(&first);
        drop(first);

        let _second = acquire_counting(&slot, "large-v3", &loads).await;

        assert_eq!(loads.load(Ordering::SeqCst), 2);
        // The slot no longer holds the original session.
        assert!(weak.upgrade().is_none());
        assert_eq!(slot.current_identifier().await.as_deref(), Some("large-v3"));
    }

    #[tokio::test]
    async fn failed_load_leaves_slot_unchanged() {
        let slot = slot();
        let loads = AtomicUsize::new(0);

        let _first = acquire_counting(&slot, "base", &loads).await;

        let result = slot
            .acquire("medium", || async {
                Err(Error::ModelLoad("corrupt artifact".into()))
            })
            .await;
        assert!(matches!(result, Err(Error::ModelLoad(_))));

        // The prior session is still installed and served without a reload.
        assert_eq!(slot.current_identifier().await.as_deref(), Some("base"));
        let _again = acquire_counting(&slot, "base", &loads).await;
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_slot_reports_no_identifier() {
        assert_eq!(slot().current_identifier().await, None);
    }
}
