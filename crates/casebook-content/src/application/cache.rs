//! Per-game session cache.

use std::collections::HashMap;
use std::sync::Arc;

use casebook_core::error::DomainError;
use tracing::info;

use super::resolver::ContentResolver;
use crate::domain::model::{Course, Session};

/// Resolved sessions keyed by session index.
///
/// A session is resolved at most once for the lifetime of the cache; failed
/// resolutions are not cached and may be retried.
pub struct ContentCache {
    resolver: Arc<dyn ContentResolver>,
    sessions: HashMap<u32, Arc<Session>>,
}

impl ContentCache {
    /// Creates an empty cache over `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<dyn ContentResolver>) -> Self {
        Self {
            resolver,
            sessions: HashMap::new(),
        }
    }

    /// The cached session at `index`, if resolved.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<Arc<Session>> {
        self.sessions.get(&index).cloned()
    }

    /// Returns `true` if session `index` has been resolved.
    #[must_use]
    pub fn is_cached(&self, index: u32) -> bool {
        self.sessions.contains_key(&index)
    }

    /// Returns session `index`, resolving it on first use.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentNotFound` if the course has no such
    /// session, or the resolver's error.
    pub async fn resolve(&mut self, course: &Course, index: u32) -> Result<Arc<Session>, DomainError> {
        if let Some(session) = self.get(index) {
            return Ok(session);
        }
        let entry = course
            .session(index)
            .ok_or_else(|| DomainError::ContentNotFound(format!("session {index}")))?;
        let session = Arc::new(self.resolver.resolve(index, &entry.descriptor).await?);
        info!(session = index, title = %session.title, "session cached");
        self.sessions.insert(index, Arc::clone(&session));
        Ok(session)
    }
}

impl std::fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCache")
            .field("sessions", &self.sessions.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use casebook_core::geometry::Rect;

    use super::*;
    use crate::domain::model::{SessionDescriptor, SessionEntry};

    struct CountingResolver {
        calls: AtomicU32,
    }

    #[async_trait]
    impl ContentResolver for CountingResolver {
        async fn resolve(
            &self,
            index: u32,
            _descriptor: &SessionDescriptor,
        ) -> Result<Session, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if index == 1 {
                return Err(DomainError::InvalidContent("broken".into()));
            }
            Ok(Session {
                title: format!("session {index}"),
                background: None,
                levels: Vec::new(),
            })
        }
    }

    fn course() -> Course {
        let entry = |title: &str| SessionEntry {
            title: title.to_owned(),
            marker: Rect::default(),
            descriptor: SessionDescriptor(title.to_owned()),
        };
        Course {
            title: "course".to_owned(),
            sessions: vec![entry("a"), entry("b")],
        }
    }

    #[tokio::test]
    async fn test_resolve_hits_resolver_once_per_session() {
        // Arrange
        let resolver = Arc::new(CountingResolver {
            calls: AtomicU32::new(0),
        });
        let mut cache = ContentCache::new(resolver.clone());
        let course = course();

        // Act
        let first = cache.resolve(&course, 0).await.unwrap();
        let second = cache.resolve(&course, 0).await.unwrap();

        // Assert
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_cached(0));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_resolution_is_not_cached() {
        let resolver = Arc::new(CountingResolver {
            calls: AtomicU32::new(0),
        });
        let mut cache = ContentCache::new(resolver.clone());
        let course = course();

        assert!(cache.resolve(&course, 1).await.is_err());
        assert!(cache.resolve(&course, 1).await.is_err());

        assert!(!cache.is_cached(1));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_session_index_is_not_found() {
        let mut cache = ContentCache::new(Arc::new(CountingResolver {
            calls: AtomicU32::new(0),
        }));

        let result = cache.resolve(&course(), 5).await;

        assert!(matches!(result, Err(DomainError::ContentNotFound(_))));
    }
}
