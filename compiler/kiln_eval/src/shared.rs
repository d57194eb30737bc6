//! Read-only registries shared between sessions and threads.

use std::fmt;
use std::sync::Arc;

/// Immutable registry behind an `Arc`.
///
/// Host catalogs and operator tables are assembled once, then wrapped here
/// and consulted read-only by every session that holds a clone.
pub struct SharedRegistry<T>(Arc<T>);

impl<T> SharedRegistry<T> {
    pub fn new(registry: T) -> Self {
        SharedRegistry(Arc::new(registry))
    }
}

impl<T> Clone for SharedRegistry<T> {
    fn clone(&self) -> Self {
        SharedRegistry(Arc::clone(&self.0))
    }
}

impl<T> std::ops::Deref for SharedRegistry<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> From<T> for SharedRegistry<T> {
    fn from(registry: T) -> Self {
        Self::new(registry)
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedRegistry({:?})", &*self.0)
    }
}
