//! Handler registry.
//!
//! The registry is built once from a set of modules and then only read.
//! Each request type maps to at most one handler. Insertion is safe under
//! concurrent writers: the first descriptor stored for a request type wins
//! and later ones are reported back instead of overwriting it.

use crate::entry::{HandlerDescriptor, Module};
use courier_core::{ConfigurationError, HandlerRegistrar, TypeKey};
use dashmap::{DashMap, mapref::entry::Entry};

/// What to do when two different handlers target the same request type.
///
/// Registering the *same* handler type twice is never a conflict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Keep the handler discovered first and ignore later ones.
    #[default]
    FirstWins,
    /// Fail registration with [`ConfigurationError::ConflictingHandlers`].
    Reject,
}

/// Outcome of a single [`HandlerRegistry::insert`].
#[derive(Debug, Clone, Copy)]
pub enum Registration {
    /// The descriptor was stored.
    Inserted,
    /// The same handler type already owns the request type.
    AlreadyRegistered,
    /// A different handler already owns the request type.
    Conflict {
        /// The descriptor that stays registered.
        existing: HandlerDescriptor,
    },
}

// ============================================================================
// HandlerRegistry - request type -> handler descriptor
// ============================================================================

/// Index from request type to handler descriptor.
///
/// # Example
/// ```ignore
/// let mut services = ServiceCollection::new();
/// let registry = HandlerRegistry::register(&[GREETINGS], &mut services)?;
///
/// let descriptor = registry.lookup(&TypeKey::of::<Greet>());
/// ```
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: DashMap<TypeKey, HandlerDescriptor>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovers every handler in `modules` with [`ConflictPolicy::FirstWins`].
    ///
    /// Each discovered handler type is announced to `registrar` so the
    /// instance provider can resolve it later. Fails if `modules` is empty;
    /// modules that declare no handlers at all produce an empty registry.
    pub fn register<G>(modules: &[Module], registrar: &mut G) -> Result<Self, ConfigurationError>
    where
        G: HandlerRegistrar + ?Sized,
    {
        Self::register_with_policy(modules, registrar, ConflictPolicy::FirstWins)
    }

    /// Discovers every handler in `modules` using `policy` for conflicts.
    ///
    /// Handler types are announced to `registrar` only if discovery succeeds.
    pub fn register_with_policy<G>(
        modules: &[Module],
        registrar: &mut G,
        policy: ConflictPolicy,
    ) -> Result<Self, ConfigurationError>
    where
        G: HandlerRegistrar + ?Sized,
    {
        if modules.is_empty() {
            return Err(ConfigurationError::NoModules);
        }

        let registry = Self::new();
        // Announced only once every module is accepted, so a rejected
        // registration leaves the registrar untouched.
        let mut discovered = Vec::new();
        for module in modules {
            for entry in module.entries() {
                let descriptor = entry.descriptor();

                match registry.insert(descriptor) {
                    Registration::Inserted => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            module = module.name(),
                            request = %descriptor.request(),
                            handler = %descriptor.handler(),
                            "registered handler"
                        );
                    }
                    Registration::AlreadyRegistered => {}
                    Registration::Conflict { existing } => match policy {
                        ConflictPolicy::Reject => {
                            return Err(ConfigurationError::ConflictingHandlers {
                                request: descriptor.request(),
                                existing: existing.handler(),
                                rejected: descriptor.handler(),
                            });
                        }
                        ConflictPolicy::FirstWins => {
                            #[cfg(feature = "tracing")]
                            tracing::warn!(
                                module = module.name(),
                                request = %descriptor.request(),
                                kept = %existing.handler(),
                                ignored = %descriptor.handler(),
                                "request already has a handler, ignoring"
                            );
                        }
                    },
                }
                discovered.push(descriptor.handler());
            }
        }

        for handler in discovered {
            registrar.register_handler(handler);
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            modules = modules.len(),
            handlers = registry.len(),
            "handler discovery complete"
        );

        Ok(registry)
    }

    /// Stores `descriptor` unless its request type is already taken.
    ///
    /// Safe to call from several threads at once; exactly one descriptor per
    /// request type is ever stored and it is never replaced.
    pub fn insert(&self, descriptor: HandlerDescriptor) -> Registration {
        match self.handlers.entry(descriptor.request()) {
            Entry::Occupied(slot) => {
                let existing = *slot.get();
                if existing.handler() == descriptor.handler() {
                    Registration::AlreadyRegistered
                } else {
                    Registration::Conflict { existing }
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
                Registration::Inserted
            }
        }
    }

    /// Returns the descriptor registered for `request`.
    pub fn lookup(&self, request: &TypeKey) -> Option<HandlerDescriptor> {
        self.handlers.get(request).map(|slot| *slot)
    }

    /// Returns true if a handler is registered for `request`.
    pub fn contains(&self, request: &TypeKey) -> bool {
        self.handlers.contains_key(request)
    }

    /// Snapshot of every registered descriptor, in no particular order.
    pub fn descriptors(&self) -> Vec<HandlerDescriptor> {
        self.handlers.iter().map(|slot| *slot.value()).collect()
    }

    /// Get the number of registered request types.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
