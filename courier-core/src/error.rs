//! Error types for Courier.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`CourierError`] - Top-level error type for all Courier operations
//! - [`ConfigurationError`] - Errors while building the handler registry
//! - [`DispatchError`] - Errors while dispatching a single request
//!
//! A handler's own failure is never translated: [`DispatchError::Handler`]
//! carries the boxed error exactly as the handler returned it.

use crate::key::TypeKey;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Courier operations.
#[derive(Error, Debug)]
pub enum CourierError {
    /// The mediator could not be configured.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A request could not be dispatched.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Errors that can occur while building the handler registry.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Registration was attempted without any module.
    #[error("no modules supplied")]
    NoModules,

    /// Two different handlers target the same request type.
    #[error("request {request} is already handled by {existing}; refusing {rejected}")]
    ConflictingHandlers {
        /// The contested request type.
        request: TypeKey,
        /// The handler registered first.
        existing: TypeKey,
        /// The handler that was refused.
        rejected: TypeKey,
    },
}

/// No handler is registered for a request type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no handler found for this request ({request_type})")]
pub struct NoHandlerFoundError {
    /// The request type that missed.
    pub request_type: TypeKey,
}

/// The instance provider could not produce a registered handler.
#[derive(Error, Debug)]
#[error("handler {handler} could not be resolved")]
pub struct HandlerResolutionError {
    /// The handler type that was requested.
    pub handler: TypeKey,
    /// What the provider reported.
    #[source]
    pub source: BoxError,
}

/// Failures produced by the invocation machinery itself.
///
/// These indicate a descriptor that does not match the values it was
/// handed, never a handler failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationError {
    /// The entry point received a request of another type.
    #[error("entry point expected request {expected}")]
    RequestMismatch {
        /// The request type the entry point accepts.
        expected: TypeKey,
    },

    /// The entry point produced a value of another type than the caller expects.
    #[error("expected response {expected}, handler produced {found}")]
    ResponseMismatch {
        /// The caller's response type.
        expected: TypeKey,
        /// The descriptor's response type.
        found: TypeKey,
    },
}

/// Errors that can occur while dispatching a request.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No handler is registered for the request type.
    #[error(transparent)]
    NoHandlerFound(#[from] NoHandlerFoundError),

    /// The provider could not produce the handler instance.
    #[error(transparent)]
    HandlerResolution(#[from] HandlerResolutionError),

    /// The invocation machinery failed.
    #[error("invocation failed: {0}")]
    Invocation(#[from] InvocationError),

    /// The handler itself failed.
    #[error(transparent)]
    Handler(BoxError),
}

impl DispatchError {
    /// Returns the handler's error if it is of type `E`.
    pub fn handler_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            DispatchError::Handler(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Consumes the error, returning the handler's own failure if there is one.
    pub fn into_handler_error(self) -> Option<BoxError> {
        match self {
            DispatchError::Handler(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true if no handler was registered for the request.
    pub fn is_no_handler(&self) -> bool {
        matches!(self, DispatchError::NoHandlerFound(_))
    }
}
