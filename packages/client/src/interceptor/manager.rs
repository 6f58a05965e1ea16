//! Ordered, prunable interceptor registry

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use super::{Interceptor, InterceptorOptions, OnFulfilled, OnRejected};

/// Registry of interceptors for one direction (requests or responses).
///
/// Handles are slot indices. Ejected slots stay behind as holes, so a
/// handle is never reused while the registry lives. Chains are built from a
/// [`snapshot`](Self::snapshot); registering or ejecting only affects
/// requests that start afterwards.
pub struct InterceptorManager<T> {
    handlers: RwLock<Vec<Option<Arc<Interceptor<T>>>>>,
}

impl<T> Default for InterceptorManager<T> {
    fn default() -> Self {
        InterceptorManager {
            handlers: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Send + 'static> InterceptorManager<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Option<Arc<Interceptor<T>>>>> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Option<Arc<Interceptor<T>>>>> {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a handler pair and return its handle.
    pub fn add(
        &self,
        fulfilled: OnFulfilled<T>,
        rejected: Option<OnRejected<T>>,
        options: InterceptorOptions,
    ) -> usize {
        self.add_interceptor(Interceptor::new(Some(fulfilled), rejected, options))
    }

    /// Register an already built entry and return its handle.
    pub fn add_interceptor(&self, interceptor: Interceptor<T>) -> usize {
        let mut handlers = self.write();
        handlers.push(Some(Arc::new(interceptor)));
        let id = handlers.len() - 1;
        trace!(id, "interceptor registered");
        id
    }

    /// Turn the slot into a hole. Returns false for unknown or ejected handles.
    pub fn eject(&self, id: usize) -> bool {
        let removed = self
            .write()
            .get_mut(id)
            .and_then(Option::take)
            .is_some();
        if removed {
            trace!(id, "interceptor ejected");
        }
        removed
    }

    /// Eject every entry. Handles issued so far are not reused.
    pub fn clear(&self) {
        for slot in self.write().iter_mut() {
            *slot = None;
        }
    }

    /// Visit live entries in registration order.
    ///
    /// Runs over a snapshot, so `visit` may register or eject entries.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&Arc<Interceptor<T>>),
    {
        for interceptor in self.snapshot() {
            visit(&interceptor);
        }
    }

    /// Live entries in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Interceptor<T>>> {
        self.read().iter().flatten().cloned().collect()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
