//! Reference instance provider.
//!
//! [`ServiceCollection`] is a small, explicit service container: services
//! are registered with a factory (per-scope lifetime) or as a ready value
//! (singleton), then frozen into a [`ServiceProvider`]. Each dispatch gets
//! its own [`ServiceScope`]; scoped services are built at most once per
//! scope and dropped when the scope is released.
//!
//! Handlers are ordinary services. The registry additionally announces every
//! handler type it discovers through [`HandlerRegistrar`]; only announced
//! types are resolvable as handlers.

use courier_core::{
    BoxError, HandlerRegistrar, Instance, InstanceProvider, ResolutionScope, TypeKey,
};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};
use thiserror::Error;

type Factory = Arc<dyn Fn(&mut ServiceScope) -> Result<Instance, BoxError> + Send + Sync>;

enum Service {
    Singleton(Instance),
    Scoped(Factory),
}

/// Errors produced while resolving a service.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No service of this type was added to the collection.
    #[error("no service registered for {0}")]
    NotRegistered(TypeKey),

    /// The type was never announced as a handler.
    #[error("{0} was not registered as a handler")]
    NotAHandler(TypeKey),

    /// The service's factory failed.
    #[error("failed to construct {service}")]
    Factory {
        /// The service being built.
        service: TypeKey,
        /// The factory's error.
        #[source]
        source: BoxError,
    },

    /// The service depends on itself.
    #[error("dependency cycle while constructing {0}")]
    Cycle(TypeKey),

    /// The stored instance is not of the requested type.
    #[error("stored instance is not a {0}")]
    TypeMismatch(TypeKey),
}

// ============================================================================
// ServiceCollection - configuration surface
// ============================================================================

/// Builder for a [`ServiceProvider`].
///
/// # Example
/// ```ignore
/// let mut services = ServiceCollection::new();
/// services
///     .add_singleton(Database::connect(url)?)
///     .add_scoped(|scope| Ok(GreetHandler { db: scope.get::<Database>()? }));
/// ```
#[derive(Default)]
pub struct ServiceCollection {
    services: HashMap<TypeKey, Service>,
    handlers: HashSet<TypeKey>,
}

impl ServiceCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a service shared by every scope.
    pub fn add_singleton<T>(&mut self, value: T) -> &mut Self
    where
        T: Send + Sync + 'static,
    {
        self.services
            .insert(TypeKey::of::<T>(), Service::Singleton(Arc::new(value)));
        self
    }

    /// Adds a service built at most once per scope by `factory`.
    pub fn add_scoped<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut ServiceScope) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let factory: Factory =
            Arc::new(move |scope: &mut ServiceScope| -> Result<Instance, BoxError> {
                Ok(Arc::new(factory(scope)?))
            });
        self.services
            .insert(TypeKey::of::<T>(), Service::Scoped(factory));
        self
    }

    /// Adds a per-scope service built with `T::default()`.
    pub fn add_default_scoped<T>(&mut self) -> &mut Self
    where
        T: Default + Send + Sync + 'static,
    {
        self.add_scoped(|_| Ok(T::default()))
    }

    /// Returns true if a service of type `T` was added.
    pub fn contains<T: 'static>(&self) -> bool {
        self.services.contains_key(&TypeKey::of::<T>())
    }

    /// Returns true if `handler` was announced by the registry.
    pub fn is_handler(&self, handler: &TypeKey) -> bool {
        self.handlers.contains(handler)
    }

    /// Announced handler types that have no service registration.
    ///
    /// Dispatching to any of these fails with a resolution error.
    pub fn missing_handlers(&self) -> Vec<TypeKey> {
        self.handlers
            .iter()
            .filter(|handler| !self.services.contains_key(handler))
            .copied()
            .collect()
    }

    /// Freeze the collection into a provider.
    pub fn build(self) -> ServiceProvider {
        ServiceProvider {
            inner: Arc::new(ProviderInner {
                services: self.services,
                handlers: self.handlers,
                next_scope: AtomicU64::new(1),
                created: AtomicUsize::new(0),
                released: AtomicUsize::new(0),
            }),
        }
    }
}

impl HandlerRegistrar for ServiceCollection {
    fn register_handler(&mut self, handler: TypeKey) {
        if self.handlers.insert(handler) {
            #[cfg(feature = "tracing")]
            tracing::trace!(%handler, "handler declared instantiable");
        }
    }
}

// ============================================================================
// ServiceProvider - frozen, shareable
// ============================================================================

struct ProviderInner {
    services: HashMap<TypeKey, Service>,
    handlers: HashSet<TypeKey>,
    next_scope: AtomicU64,
    created: AtomicUsize,
    released: AtomicUsize,
}

/// A frozen service container. Cloning shares the same services.
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

impl ServiceProvider {
    /// Opens a new scope.
    pub fn scope(&self) -> ServiceScope {
        let id = self.inner.next_scope.fetch_add(1, Ordering::Relaxed);
        self.inner.created.fetch_add(1, Ordering::Relaxed);
        ServiceScope {
            provider: self.inner.clone(),
            id,
            cache: HashMap::new(),
            resolving: Vec::new(),
            released: false,
        }
    }

    /// Number of scopes opened so far.
    pub fn scopes_created(&self) -> usize {
        self.inner.created.load(Ordering::Acquire)
    }

    /// Number of scopes released so far.
    pub fn scopes_released(&self) -> usize {
        self.inner.released.load(Ordering::Acquire)
    }

    /// Number of scopes currently open.
    pub fn live_scopes(&self) -> usize {
        self.scopes_created().saturating_sub(self.scopes_released())
    }
}

impl InstanceProvider for ServiceProvider {
    type Scope = ServiceScope;

    async fn create_scope(&self) -> Result<ServiceScope, BoxError> {
        Ok(self.scope())
    }
}

// ============================================================================
// ServiceScope - one unit of work
// ============================================================================

/// A resolution scope. Scoped services are cached until release.
pub struct ServiceScope {
    provider: Arc<ProviderInner>,
    id: u64,
    cache: HashMap<TypeKey, Instance>,
    resolving: Vec<TypeKey>,
    released: bool,
}

impl ServiceScope {
    /// Identifier unique within the provider.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Resolves a service of type `T`.
    pub fn get<T: Send + Sync + 'static>(&mut self) -> Result<Arc<T>, ResolveError> {
        let key = TypeKey::of::<T>();
        self.resolve_key(&key)?
            .downcast::<T>()
            .map_err(|_| ResolveError::TypeMismatch(key))
    }

    fn resolve_key(&mut self, key: &TypeKey) -> Result<Instance, ResolveError> {
        if let Some(instance) = self.cache.get(key) {
            return Ok(instance.clone());
        }

        let factory = match self.provider.services.get(key) {
            Some(Service::Singleton(instance)) => return Ok(instance.clone()),
            Some(Service::Scoped(factory)) => factory.clone(),
            None => return Err(ResolveError::NotRegistered(*key)),
        };

        if self.resolving.contains(key) {
            return Err(ResolveError::Cycle(*key));
        }

        self.resolving.push(*key);
        let built = factory(self);
        self.resolving.pop();

        let instance = built.map_err(|source| ResolveError::Factory {
            service: *key,
            source,
        })?;
        self.cache.insert(*key, instance.clone());
        Ok(instance)
    }
}

impl ResolutionScope for ServiceScope {
    async fn resolve(&mut self, handler: &TypeKey) -> Result<Instance, BoxError> {
        if !self.provider.handlers.contains(handler) {
            return Err(ResolveError::NotAHandler(*handler).into());
        }
        Ok(self.resolve_key(handler)?)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.cache.clear();
        self.provider.released.fetch_add(1, Ordering::Release);
    }
}

impl Drop for ServiceScope {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Clock;

    struct Repo {
        clock: Arc<Clock>,
    }

    struct Config(&'static str);

    #[test]
    fn test_singleton_shared_across_scopes() {
        let mut services = ServiceCollection::new();
        services.add_singleton(Config("prod"));
        let provider = services.build();

        let a = provider.scope().get::<Config>().unwrap();
        let b = provider.scope().get::<Config>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.0, "prod");
    }

    #[test]
    fn test_scoped_cached_within_scope_only() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();

        let mut services = ServiceCollection::new();
        services.add_default_scoped::<Clock>().add_scoped(move |scope| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Repo {
                clock: scope.get::<Clock>()?,
            })
        });
        let provider = services.build();

        let mut first = provider.scope();
        let a = first.get::<Repo>().unwrap();
        let b = first.get::<Repo>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a.clock, &first.get::<Clock>().unwrap()));

        let mut second = provider.scope();
        let c = second.get::<Repo>().unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_ne!(first.id(), second.id());
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_dependency() {
        let mut services = ServiceCollection::new();
        services.add_scoped(|scope| {
            Ok(Repo {
                clock: scope.get::<Clock>()?,
            })
        });
        let provider = services.build();

        match provider.scope().get::<Repo>() {
            Err(ResolveError::Factory { service, source }) => {
                assert!(service.is::<Repo>());
                assert!(matches!(
                    source.downcast_ref::<ResolveError>(),
                    Some(ResolveError::NotRegistered(key)) if key.is::<Clock>()
                ));
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    struct Chicken;
    struct Egg;

    #[test]
    fn test_cycle_detected() {
        let mut services = ServiceCollection::new();
        services
            .add_scoped(|scope| {
                scope.get::<Egg>()?;
                Ok(Chicken)
            })
            .add_scoped(|scope| {
                scope.get::<Chicken>()?;
                Ok(Egg)
            });
        let provider = services.build();

        let err = provider.scope().get::<Chicken>().map(|_| ()).unwrap_err();
        // Chicken -> Egg -> Chicken
        let ResolveError::Factory { source, .. } = err else {
            panic!("expected factory error");
        };
        let inner = source.downcast_ref::<ResolveError>().unwrap();
        let ResolveError::Factory { source, .. } = inner else {
            panic!("expected nested factory error");
        };
        assert!(matches!(
            source.downcast_ref::<ResolveError>(),
            Some(ResolveError::Cycle(key)) if key.is::<Chicken>()
        ));
    }

    #[tokio::test]
    async fn test_only_announced_handlers_resolve() {
        let mut services = ServiceCollection::new();
        services.add_default_scoped::<Clock>();
        let provider = services.build();

        let mut scope = provider.create_scope().await.unwrap();
        let err = scope.resolve(&TypeKey::of::<Clock>()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolveError>(),
            Some(ResolveError::NotAHandler(_))
        ));
    }

    #[tokio::test]
    async fn test_announced_handler_without_factory() {
        let mut services = ServiceCollection::new();
        services.register_handler(TypeKey::of::<Clock>());
        assert_eq!(services.missing_handlers(), vec![TypeKey::of::<Clock>()]);

        let provider = services.build();
        let mut scope = provider.scope();
        let err = scope.resolve(&TypeKey::of::<Clock>()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolveError>(),
            Some(ResolveError::NotRegistered(_))
        ));
    }

    #[test]
    fn test_release_counted_once() {
        let provider = ServiceCollection::new().build();
        let mut scope = provider.scope();
        assert_eq!(provider.live_scopes(), 1);

        scope.release();
        drop(scope);

        assert_eq!(provider.scopes_created(), 1);
        assert_eq!(provider.scopes_released(), 1);
        assert_eq!(provider.live_scopes(), 0);
    }
}
