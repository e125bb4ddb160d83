// ABOUTME: Defines AppContext - the opaque application handle given to resolver types.
// ABOUTME: The evaluator passes it through to constructors and never inspects it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque application handle shared with constructed resolver instances.
///
/// Cloning is cheap; all clones point at the same value.
#[derive(Clone, Default)]
pub struct AppContext {
    inner: Option<Arc<dyn Any + Send + Sync>>,
}

impl AppContext {
    /// Wrap an application value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Some(Arc::new(value)),
        }
    }

    /// A context carrying nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Borrow the wrapped value if it is a `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.inner.as_deref().and_then(|v| v.downcast_ref::<T>())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("empty", &self.is_empty())
            .finish()
    }
}
