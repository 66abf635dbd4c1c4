//! # courier-std
//!
//! Standard implementations for the Courier request mediator.
//!
//! This crate provides:
//! - **Handler entries**: [`HandlerEntry`], [`Module`], [`module!`] macro
//! - **Registry**: [`HandlerRegistry`] with [`ConflictPolicy`]
//! - **Dispatch**: [`Dispatcher`]
//! - **Instance provider**: [`ServiceCollection`], [`ServiceProvider`]
//! - **Testing**: recording handler and counting provider

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use courier_core;

// Modules
#[cfg(feature = "inventory")]
mod collected;
pub mod dispatcher;
pub mod entry;
pub mod provider;
pub mod registry;
pub mod testing;

pub use dispatcher::Dispatcher;
pub use entry::{BoxedRequest, BoxedResponse, EntryPoint, HandlerDescriptor, HandlerEntry, InvokeFailure, Module};
pub use provider::{ResolveError, ServiceCollection, ServiceProvider, ServiceScope};
pub use registry::{ConflictPolicy, HandlerRegistry, Registration};

#[cfg(feature = "inventory")]
pub use inventory;
