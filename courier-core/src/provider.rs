//! Instance provider contract.
//!
//! The mediator does not construct handlers. The host application supplies
//! an [`InstanceProvider`]; each dispatch opens one [`ResolutionScope`] on
//! it, resolves the handler, and releases the scope when the call is over.
//! A scope is never shared between dispatches.

use crate::{error::BoxError, key::TypeKey};
use std::{any::Any, future::Future, sync::Arc};

/// A live, type-erased handler object produced by a scope.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Produces resolution scopes for dispatches.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot provide handler instances",
    label = "missing `InstanceProvider` implementation",
    note = "Implement `InstanceProvider` or use `courier::ServiceProvider`."
)]
pub trait InstanceProvider: Send + Sync + 'static {
    /// The scope type handed out per dispatch.
    type Scope: ResolutionScope;

    /// Opens a fresh scope whose lifetime spans one dispatch.
    fn create_scope(&self) -> impl Future<Output = Result<Self::Scope, BoxError>> + Send;
}

/// A unit of work that resolves handler instances.
pub trait ResolutionScope: Send + 'static {
    /// Produces an instance of the handler type identified by `handler`.
    ///
    /// The returned instance must be an `Arc` of exactly that type.
    fn resolve(
        &mut self,
        handler: &TypeKey,
    ) -> impl Future<Output = Result<Instance, BoxError>> + Send;

    /// Reclaims the scope's resources.
    ///
    /// Called exactly once by the dispatcher, on every exit path.
    fn release(&mut self) {}
}

/// Configuration-time surface of a provider.
///
/// During discovery the registry announces every handler type it finds so
/// the provider can mark it as instantiable.
pub trait HandlerRegistrar {
    /// Declares `handler` as a type the provider will be asked to resolve.
    fn register_handler(&mut self, handler: TypeKey);
}

impl<T: HandlerRegistrar + ?Sized> HandlerRegistrar for &mut T {
    fn register_handler(&mut self, handler: TypeKey) {
        (**self).register_handler(handler);
    }
}
