//! # courier - In-Process Request Mediator
//!
//! `courier` routes each typed request to exactly one registered handler,
//! invokes it, and hands back the handler's response. Callers depend on
//! requests, never on concrete handlers.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! struct Greet { name: String }
//! impl Message for Greet {}
//! impl Request for Greet { type Response = String; }
//!
//! struct GreetHandler;
//! impl RequestHandler<Greet> for GreetHandler {
//!     type Error = std::convert::Infallible;
//!
//!     async fn handle(&self, request: Greet) -> Result<String, Self::Error> {
//!         Ok(format!("Hello, {}", request.name))
//!     }
//! }
//!
//! static GREETINGS: Module = courier::module!("greetings" => [GreetHandler: Greet]);
//!
//! let mut services = ServiceCollection::new();
//! services.add_default_scoped::<GreetHandler>();
//!
//! let mediator = Mediator::from_config(&MediatorConfig::new().with_module(GREETINGS.clone()), services)?;
//! assert_eq!(mediator.send(Greet { name: "Ada".into() }).await?, "Hello, Ada");
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod config;
mod mediator;

pub use config::MediatorConfig;
pub use mediator::Mediator;

pub use courier_core::{
    // Error types
    BoxError,
    ConfigurationError,
    CourierError,
    DispatchError,
    HandlerResolutionError,
    InvocationError,
    NoHandlerFoundError,
    // Provider contract
    HandlerRegistrar,
    Instance,
    InstanceProvider,
    ResolutionScope,
    // Contract
    Message,
    Request,
    RequestHandler,
    RequestSender,
    TypeKey,
};

pub use courier_std::{
    // Registry
    ConflictPolicy,
    Dispatcher,
    HandlerDescriptor,
    HandlerEntry,
    HandlerRegistry,
    Module,
    Registration,
    // Instance provider
    ResolveError,
    ServiceCollection,
    ServiceProvider,
    ServiceScope,
    module,
};

#[cfg(feature = "inventory")]
pub use courier_std::submit_handler;

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use courier_std::testing::*;
}

/// Prelude module - common imports for Courier.
///
/// # Usage
///
/// ```rust,ignore
/// use courier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, ConflictPolicy, DispatchError, Mediator, MediatorConfig, Message, Module,
        Request, RequestHandler, RequestSender, ServiceCollection,
    };
}

#[cfg(feature = "macros")]
pub use courier_macros::{Message, Request};

#[cfg(feature = "inventory")]
pub use courier_std::inventory;
