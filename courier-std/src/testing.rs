//! Testing utilities for Courier.
//!
//! This module provides helpers for verifying dispatch behavior.
//!
//! # Features
//!
//! - [`RecordingHandler`]: A handler that records every request it receives
//! - [`CountingProvider`]: A provider wrapper that counts scope lifecycles

use courier_core::{BoxError, Instance, InstanceProvider, Request, RequestHandler, ResolutionScope, TypeKey};
use std::{
    convert::Infallible,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records all requests it receives and answers with a
/// fixed function.
///
/// Clones share the same record, so register one clone as a singleton and
/// keep another for assertions.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::new(|req: &Greet| format!("Hello, {}", req.name));
/// services.add_singleton(recorder.clone());
///
/// mediator.send(Greet { name: "Ada".into() }).await?;
/// assert_eq!(recorder.count(), 1);
/// ```
pub struct RecordingHandler<R: Request> {
    requests: Arc<Mutex<Vec<R>>>,
    respond: Arc<dyn Fn(&R) -> R::Response + Send + Sync>,
}

impl<R: Request + Clone> RecordingHandler<R> {
    /// Create a recording handler that answers with `respond`.
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&R) -> R::Response + Send + Sync + 'static,
    {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            respond: Arc::new(respond),
        }
    }

    /// Get a clone of the recorded requests.
    pub fn requests(&self) -> Vec<R> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the number of recorded requests.
    pub fn count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<R: Request> Clone for RecordingHandler<R> {
    fn clone(&self) -> Self {
        Self {
            requests: self.requests.clone(),
            respond: self.respond.clone(),
        }
    }
}

impl<R: Request<Response = ()> + Clone> RecordingHandler<R> {
    /// Create a recording handler for a request without response.
    pub fn silent() -> Self {
        Self::new(|_| ())
    }
}

impl<R: Request + Clone> RequestHandler<R> for RecordingHandler<R> {
    type Error = Infallible;

    async fn handle(&self, request: R) -> Result<R::Response, Infallible> {
        let response = (self.respond)(&request);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Ok(response)
    }
}

// ============================================================================
// Counting Provider
// ============================================================================

#[derive(Default)]
struct Counters {
    created: AtomicUsize,
    resolved: AtomicUsize,
    released: AtomicUsize,
}

/// Wraps an [`InstanceProvider`] and counts scope creation, resolution and
/// release.
pub struct CountingProvider<P> {
    inner: P,
    counters: Arc<Counters>,
}

impl<P> CountingProvider<P> {
    /// Wrap `inner`.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            counters: Arc::default(),
        }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of scopes created.
    pub fn created(&self) -> usize {
        self.counters.created.load(Ordering::SeqCst)
    }

    /// Number of successful handler resolutions.
    pub fn resolved(&self) -> usize {
        self.counters.resolved.load(Ordering::SeqCst)
    }

    /// Number of scopes released.
    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }
}

/// Scope handed out by [`CountingProvider`].
pub struct CountingScope<S> {
    inner: S,
    counters: Arc<Counters>,
}

impl<S: ResolutionScope> ResolutionScope for CountingScope<S> {
    async fn resolve(&mut self, handler: &TypeKey) -> Result<Instance, BoxError> {
        let instance = self.inner.resolve(handler).await?;
        self.counters.resolved.fetch_add(1, Ordering::SeqCst);
        Ok(instance)
    }

    fn release(&mut self) {
        self.inner.release();
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl<P: InstanceProvider> InstanceProvider for CountingProvider<P> {
    type Scope = CountingScope<P::Scope>;

    async fn create_scope(&self) -> Result<Self::Scope, BoxError> {
        let inner = self.inner.create_scope().await?;
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        Ok(CountingScope {
            inner,
            counters: self.counters.clone(),
        })
    }
}
