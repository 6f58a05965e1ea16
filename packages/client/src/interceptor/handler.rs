//! Interceptor callbacks and entries

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::config::RequestConfig;
use crate::error::{Error, Result};

type SyncFn<I, O> = Arc<dyn Fn(I) -> Result<O> + Send + Sync>;
type AsyncFn<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<O>> + Send + Sync>;

/// A callback that either returns right away or yields a future.
pub enum Handler<I, O> {
    Sync(SyncFn<I, O>),
    Async(AsyncFn<I, O>),
}

/// Runs on the value flowing through the chain.
pub type OnFulfilled<T> = Handler<T, T>;

/// Runs on the error flowing through the chain and may recover from it.
pub type OnRejected<T> = Handler<Error, T>;

/// Decides per request whether a request interceptor joins the chain.
pub type RunWhen = Arc<dyn Fn(&RequestConfig) -> bool + Send + Sync>;

impl<I, O> Clone for Handler<I, O> {
    fn clone(&self) -> Self {
        match self {
            Handler::Sync(f) => Handler::Sync(f.clone()),
            Handler::Async(f) => Handler::Async(f.clone()),
        }
    }
}

impl<I: Send + 'static, O: Send + 'static> Handler<I, O> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O> + Send + Sync + 'static,
    {
        Handler::Sync(Arc::new(f))
    }

    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
    {
        Handler::Async(Arc::new(move |input| f(input).boxed()))
    }

    #[must_use]
    pub fn is_sync(&self) -> bool {
        matches!(self, Handler::Sync(_))
    }

    pub async fn call(&self, input: I) -> Result<O> {
        match self {
            Handler::Sync(f) => f(input),
            Handler::Async(f) => f(input).await,
        }
    }
}

impl<I, O> fmt::Debug for Handler<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Handler::Sync(_) => "Handler::Sync",
            Handler::Async(_) => "Handler::Async",
        })
    }
}

/// Registration options.
#[derive(Clone, Default)]
pub struct InterceptorOptions {
    /// Declares that the handlers never suspend. Defaults to false.
    pub synchronous: bool,
    /// Request interceptors only: skip the entry when this returns false.
    pub run_when: Option<RunWhen>,
}

impl InterceptorOptions {
    #[must_use]
    pub fn synchronous() -> Self {
        InterceptorOptions {
            synchronous: true,
            run_when: None,
        }
    }

    #[must_use]
    pub fn run_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RequestConfig) -> bool + Send + Sync + 'static,
    {
        self.run_when = Some(Arc::new(predicate));
        self
    }
}

/// One registered pair of handlers.
pub struct Interceptor<T> {
    pub(crate) fulfilled: Option<OnFulfilled<T>>,
    pub(crate) rejected: Option<OnRejected<T>>,
    pub(crate) synchronous: bool,
    pub(crate) run_when: Option<RunWhen>,
}

impl<T: Send + 'static> Interceptor<T> {
    #[must_use]
    pub fn new(
        fulfilled: Option<OnFulfilled<T>>,
        rejected: Option<OnRejected<T>>,
        options: InterceptorOptions,
    ) -> Self {
        Interceptor {
            fulfilled,
            rejected,
            synchronous: options.synchronous,
            run_when: options.run_when,
        }
    }

    #[must_use]
    pub fn should_run(&self, config: &RequestConfig) -> bool {
        self.run_when.as_ref().is_none_or(|predicate| predicate(config))
    }

    /// One chain step: the fulfilment handler sees values, the rejection
    /// handler sees errors, a missing handler passes the state through.
    pub async fn apply(&self, state: Result<T>) -> Result<T> {
        match (state, &self.fulfilled, &self.rejected) {
            (Ok(value), Some(fulfilled), _) => fulfilled.call(value).await,
            (Err(err), _, Some(rejected)) => rejected.call(err).await,
            (state, _, _) => state,
        }
    }

    /// The synchronous form of this entry, if it is declared synchronous and
    /// both handlers can run without suspending.
    #[must_use]
    pub fn as_sync(&self) -> Option<SyncInterceptor<T>> {
        if !self.synchronous {
            return None;
        }
        let fulfilled = match &self.fulfilled {
            Some(Handler::Sync(f)) => Some(f.clone()),
            Some(Handler::Async(_)) => return None,
            None => None,
        };
        let rejected = match &self.rejected {
            Some(Handler::Sync(f)) => Some(f.clone()),
            Some(Handler::Async(_)) => return None,
            None => None,
        };
        Some(SyncInterceptor {
            fulfilled,
            rejected,
        })
    }
}

impl<T> fmt::Debug for Interceptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("fulfilled", &self.fulfilled)
            .field("rejected", &self.rejected)
            .field("synchronous", &self.synchronous)
            .field("run_when", &self.run_when.is_some())
            .finish()
    }
}

/// An interceptor whose handlers are plain functions.
pub struct SyncInterceptor<T> {
    fulfilled: Option<SyncFn<T, T>>,
    rejected: Option<SyncFn<Error, T>>,
}

impl<T> SyncInterceptor<T> {
    /// Same step semantics as [`Interceptor::apply`], without suspending.
    pub fn apply(&self, state: Result<T>) -> Result<T> {
        match (state, &self.fulfilled, &self.rejected) {
            (Ok(value), Some(fulfilled), _) => fulfilled(value),
            (Err(err), _, Some(rejected)) => rejected(err),
            (state, _, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error;
    use futures::FutureExt;

    fn double() -> OnFulfilled<u32> {
        Handler::from_fn(|n: u32| Ok(n * 2))
    }

    fn recover() -> OnRejected<u32> {
        Handler::from_fn(|_err: Error| Ok(0))
    }

    #[test]
    fn step_routes_values_and_errors() {
        let entry = Interceptor::new(Some(double()), Some(recover()), InterceptorOptions::default());
        assert_eq!(entry.apply(Ok(2)).now_or_never().and_then(Result::ok), Some(4));
        assert_eq!(
            entry.apply(Err(error::network("down"))).now_or_never().and_then(Result::ok),
            Some(0)
        );
    }

    #[test]
    fn missing_handlers_pass_through() {
        let entry: Interceptor<u32> = Interceptor::new(None, None, InterceptorOptions::default());
        let out = entry.apply(Err(error::network("down"))).now_or_never();
        assert!(matches!(out, Some(Err(e)) if e.is_network()));
    }

    #[test]
    fn sync_form_requires_flag_and_sync_handlers() {
        let plain = Interceptor::new(Some(double()), None, InterceptorOptions::default());
        assert!(plain.as_sync().is_none());

        let flagged = Interceptor::new(Some(double()), None, InterceptorOptions::synchronous());
        let sync = flagged.as_sync().unwrap();
        assert_eq!(sync.apply(Ok(3)).ok(), Some(6));

        let suspending = Interceptor::new(
            Some(Handler::from_async(|n: u32| async move { Ok(n) })),
            None,
            InterceptorOptions::synchronous(),
        );
        assert!(suspending.as_sync().is_none());
    }

    #[test]
    fn run_when_filters() {
        let entry: Interceptor<RequestConfig> = Interceptor::new(
            None,
            None,
            InterceptorOptions::default().run_when(|config| config.url.as_deref() == Some("/yes")),
        );
        assert!(entry.should_run(&RequestConfig::new().url("/yes")));
        assert!(!entry.should_run(&RequestConfig::new().url("/no")));
    }
}
