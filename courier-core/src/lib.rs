//! # courier-core
//!
//! Core traits for the Courier request mediator.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! crates that only define requests and handlers, without pulling in the
//! registry and dispatcher from `courier-std`.
//!
//! # Contract
//!
//! ## Requests ([`Request`])
//!
//! Plain data. A request carries no behavior; its concrete type is the
//! dispatch key. Fire-and-forget requests declare `Response = ()`.
//!
//! ## Handlers ([`RequestHandler`])
//!
//! Exactly one entry point, `handle`, taking the request by value and
//! resolving to the response or the handler's own error.
//!
//! ## Instance providers ([`InstanceProvider`], [`ResolutionScope`])
//!
//! Handlers are not owned by the mediator. Every dispatch opens a scope on
//! a provider, asks it for a handler instance, and releases the scope when
//! the dispatch ends.
//!
//! # Error Types
//!
//! - [`CourierError`] - Top-level error type
//! - [`ConfigurationError`] - Setup-time failures
//! - [`DispatchError`] - Per-call failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod handler;
mod key;
mod message;
mod provider;
mod sender;

// Re-exports
pub use error::{
    BoxError, ConfigurationError, CourierError, DispatchError, HandlerResolutionError,
    InvocationError, NoHandlerFoundError,
};
pub use handler::RequestHandler;
pub use key::TypeKey;
pub use message::{Message, Request};
pub use provider::{HandlerRegistrar, Instance, InstanceProvider, ResolutionScope};
pub use sender::RequestSender;
