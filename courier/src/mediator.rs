//! The mediator facade.

use crate::config::MediatorConfig;
use courier_core::{ConfigurationError, DispatchError, InstanceProvider, Request, RequestSender};
use courier_std::{Dispatcher, HandlerRegistry, ServiceCollection, ServiceProvider};
use std::{future::Future, sync::Arc};

/// Sends requests to their handlers.
///
/// `Mediator` only forwards to its [`Dispatcher`]; clones share it.
///
/// # Example
/// ```ignore
/// let mut services = ServiceCollection::new();
/// services.add_scoped(|_| Ok(GreetHandler));
///
/// let config = MediatorConfig::new().with_module(GREETINGS.clone());
/// let mediator = Mediator::from_config(&config, services)?;
///
/// let greeting = mediator.send(Greet { name: "Ada".into() }).await?;
/// ```
pub struct Mediator<P> {
    dispatcher: Arc<Dispatcher<P>>,
}

impl<P> Clone for Mediator<P> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<P: InstanceProvider> Mediator<P> {
    /// Wraps an existing dispatcher.
    pub fn new(dispatcher: Dispatcher<P>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Builds a mediator over a registry and an instance provider.
    pub fn from_parts(registry: Arc<HandlerRegistry>, provider: P) -> Self {
        Self::new(Dispatcher::new(registry, provider))
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<P> {
        &self.dispatcher
    }
}

impl Mediator<ServiceProvider> {
    /// Loads the configured handlers into `services` and builds a mediator
    /// resolving from the resulting provider.
    ///
    /// Fails only when the configuration has no modules, or with
    /// [`ConflictPolicy::Reject`](courier_std::ConflictPolicy::Reject) when
    /// two handlers claim one request type.
    pub fn from_config(
        config: &MediatorConfig,
        mut services: ServiceCollection,
    ) -> Result<Self, ConfigurationError> {
        let registry = config.load_handlers(&mut services)?;

        #[cfg(feature = "tracing")]
        for handler in services.missing_handlers() {
            tracing::warn!(%handler, "handler has no service registration and cannot be resolved");
        }

        Ok(Self::from_parts(Arc::new(registry), services.build()))
    }

    /// The service provider handlers are resolved from.
    pub fn services(&self) -> &ServiceProvider {
        self.dispatcher.provider()
    }
}

impl<P: InstanceProvider> RequestSender for Mediator<P> {
    fn send<R: Request>(
        &self,
        request: R,
    ) -> impl Future<Output = Result<R::Response, DispatchError>> + Send {
        self.dispatcher.dispatch(request)
    }

    fn execute<R: Request<Response = ()>>(
        &self,
        request: R,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send {
        self.dispatcher.dispatch_void(request)
    }
}
