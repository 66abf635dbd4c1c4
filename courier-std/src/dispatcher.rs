//! Request dispatcher.
//!
//! One dispatch runs five steps in order:
//!
//! 1. **Resolve** the request type in the [`HandlerRegistry`].
//! 2. **Acquire** a fresh scope from the [`InstanceProvider`].
//! 3. **Instantiate** the handler through that scope.
//! 4. **Invoke** the descriptor's entry point.
//! 5. **Unwrap** the outcome: a handler's error is surfaced as-is, machinery
//!    failures become [`HandlerResolutionError`] or [`InvocationError`].
//!
//! The scope is owned by the dispatch and released on every exit path,
//! including when the dispatch future is dropped mid-flight.

use crate::{
    entry::{HandlerDescriptor, InvokeFailure},
    registry::HandlerRegistry,
};
use courier_core::{
    DispatchError, HandlerResolutionError, InstanceProvider, InvocationError,
    NoHandlerFoundError, Request, ResolutionScope, TypeKey,
};
use std::{
    ops::{Deref, DerefMut},
    sync::Arc,
};

#[cfg(feature = "tracing")]
use tracing::Instrument;

/// Releases the wrapped scope when dropped.
struct ScopeGuard<S: ResolutionScope> {
    scope: S,
}

impl<S: ResolutionScope> Deref for ScopeGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.scope
    }
}

impl<S: ResolutionScope> DerefMut for ScopeGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.scope
    }
}

impl<S: ResolutionScope> Drop for ScopeGuard<S> {
    fn drop(&mut self) {
        self.scope.release();
        #[cfg(feature = "tracing")]
        tracing::trace!("resolution scope released");
    }
}

impl InvokeFailure {
    fn into_dispatch_error(self, handler: TypeKey) -> DispatchError {
        match self {
            InvokeFailure::Handler(err) => DispatchError::Handler(err),
            InvokeFailure::Instance(source) => {
                HandlerResolutionError { handler, source }.into()
            }
            InvokeFailure::Invocation(err) => err.into(),
        }
    }
}

/// Routes requests to their handlers.
///
/// The dispatcher holds the frozen registry and the instance provider it
/// was constructed with. It is cheap to share behind an `Arc` and any
/// number of dispatches may run on it concurrently.
pub struct Dispatcher<P> {
    registry: Arc<HandlerRegistry>,
    provider: P,
}

impl<P: InstanceProvider> Dispatcher<P> {
    /// Create a dispatcher over `registry`, resolving handlers from `provider`.
    pub fn new(registry: Arc<HandlerRegistry>, provider: P) -> Self {
        Self { registry, provider }
    }

    /// The registry this dispatcher reads.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// The instance provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Dispatches `request` to its handler and returns the response.
    pub async fn dispatch<R: Request>(&self, request: R) -> Result<R::Response, DispatchError> {
        let request_type = TypeKey::of::<R>();
        let descriptor = self.registry.lookup(&request_type).ok_or_else(|| {
            #[cfg(feature = "tracing")]
            tracing::debug!(request = %request_type, "no handler registered");
            NoHandlerFoundError { request_type }
        })?;

        let call = self.run::<R>(descriptor, request);

        #[cfg(feature = "tracing")]
        let call = call.instrument(tracing::debug_span!(
            "courier.dispatch",
            request = %request_type,
            handler = %descriptor.handler(),
        ));

        call.await
    }

    /// Dispatches a request that expects no response.
    pub async fn dispatch_void<R: Request<Response = ()>>(
        &self,
        request: R,
    ) -> Result<(), DispatchError> {
        self.dispatch(request).await
    }

    async fn run<R: Request>(
        &self,
        descriptor: HandlerDescriptor,
        request: R,
    ) -> Result<R::Response, DispatchError> {
        let handler = descriptor.handler();

        let scope = self
            .provider
            .create_scope()
            .await
            .map_err(|source| HandlerResolutionError { handler, source })?;
        let mut scope = ScopeGuard { scope };

        let instance = scope.resolve(&handler).await.map_err(|source| {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %source, "handler could not be resolved");
            HandlerResolutionError { handler, source }
        })?;

        #[cfg(feature = "tracing")]
        tracing::trace!("invoking handler");

        let response = descriptor
            .invoke(instance, Box::new(request))
            .await
            .map_err(|failure| {
                let err = failure.into_dispatch_error(handler);
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %err, "handler failed");
                err
            })?;

        response.downcast::<R::Response>().map(|response| *response).map_err(|_| {
            InvocationError::ResponseMismatch {
                expected: TypeKey::of::<R::Response>(),
                found: descriptor.response(),
            }
            .into()
        })
    }
}
