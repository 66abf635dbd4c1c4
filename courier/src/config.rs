//! Mediator configuration.

use courier_core::{ConfigurationError, HandlerRegistrar};
use courier_std::{ConflictPolicy, HandlerRegistry, Module};

/// Modules and policies used to build a mediator.
///
/// Modules are added one at a time; nothing is discovered until
/// [`load_handlers`](Self::load_handlers) runs.
///
/// # Example
/// ```ignore
/// let config = MediatorConfig::new()
///     .with_module(GREETINGS.clone())
///     .with_module(Module::new("admin").with_handler::<BanHandler, Ban>())
///     .conflict_policy(ConflictPolicy::Reject);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MediatorConfig {
    modules: Vec<Module>,
    conflict_policy: ConflictPolicy,
}

impl MediatorConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module.
    pub fn add_module(&mut self, module: Module) -> &mut Self {
        self.modules.push(module);
        self
    }

    /// Adds a module (builder version).
    pub fn with_module(mut self, module: Module) -> Self {
        self.add_module(module);
        self
    }

    /// Sets how conflicting handlers for one request type are treated.
    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// The configured modules, in insertion order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// The configured conflict policy.
    pub fn policy(&self) -> ConflictPolicy {
        self.conflict_policy
    }

    /// Discovers the handlers of every configured module.
    ///
    /// Each handler type is announced to `registrar`.
    pub fn load_handlers<G>(&self, registrar: &mut G) -> Result<HandlerRegistry, ConfigurationError>
    where
        G: HandlerRegistrar + ?Sized,
    {
        HandlerRegistry::register_with_policy(&self.modules, registrar, self.conflict_policy)
    }
}
