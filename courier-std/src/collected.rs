//! Link-time handler collection via `inventory`.
//!
//! Handlers submitted with [`submit_handler!`](crate::submit_handler) anywhere
//! in the final binary can be gathered into one [`Module`].

use crate::entry::{HandlerEntry, Module};

inventory::collect!(HandlerEntry);

impl Module {
    /// Gathers every submitted handler entry into a module named `name`.
    ///
    /// The order of entries is unspecified.
    pub fn collected(name: &'static str) -> Self {
        let mut module = Module::new(name);
        for entry in inventory::iter::<HandlerEntry> {
            module.push(*entry);
        }
        module
    }
}

/// Submits a handler to the link-time collection.
///
/// ```rust,ignore
/// courier::submit_handler!(GreetHandler, Greet);
///
/// let module = Module::collected("app");
/// ```
#[macro_export]
macro_rules! submit_handler {
    ($handler:ty, $request:ty) => {
        $crate::inventory::submit! {
            $crate::HandlerEntry::of::<$handler, $request>()
        }
    };
}
