//! Handler entries and modules.
//!
//! A [`HandlerEntry`] is the compile-time description of one handler: which
//! request it takes, which type implements it, and a typed entry point that
//! calls [`RequestHandler::handle`] on a type-erased instance. Entries are
//! `const`-constructible, so a [`Module`] can be a plain static list.

use courier_core::{BoxError, Instance, InvocationError, Request, RequestHandler, TypeKey};
use futures::future::BoxFuture;
use std::{any::Any, borrow::Cow, fmt};

/// A request moved into the entry point.
pub type BoxedRequest = Box<dyn Any + Send>;

/// A response produced by the entry point.
pub type BoxedResponse = Box<dyn Any + Send>;

/// The typed function stored in every descriptor.
pub type EntryPoint =
    fn(Instance, BoxedRequest) -> BoxFuture<'static, Result<BoxedResponse, InvokeFailure>>;

/// How an entry point call failed.
///
/// Only [`InvokeFailure::Handler`] comes from user code; the other variants
/// are produced by the entry point itself.
#[derive(Debug)]
pub enum InvokeFailure {
    /// The handler returned an error.
    Handler(BoxError),
    /// The instance was not of the handler type.
    Instance(BoxError),
    /// The request did not match the entry point.
    Invocation(InvocationError),
}

fn invoke<H, R>(
    instance: Instance,
    request: BoxedRequest,
) -> BoxFuture<'static, Result<BoxedResponse, InvokeFailure>>
where
    H: RequestHandler<R>,
    R: Request,
{
    Box::pin(async move {
        let handler = instance.downcast::<H>().map_err(|_| {
            InvokeFailure::Instance(
                format!("provider returned an instance that is not {}", TypeKey::of::<H>()).into(),
            )
        })?;
        let request = request.downcast::<R>().map_err(|_| {
            InvokeFailure::Invocation(InvocationError::RequestMismatch {
                expected: TypeKey::of::<R>(),
            })
        })?;

        match <H as RequestHandler<R>>::handle(&handler, *request).await {
            Ok(response) => Ok(Box::new(response) as BoxedResponse),
            Err(err) => Err(InvokeFailure::Handler(Box::new(err))),
        }
    })
}

/// The static description of one handler.
#[derive(Clone, Copy)]
pub struct HandlerEntry {
    request: fn() -> TypeKey,
    handler: fn() -> TypeKey,
    response: fn() -> TypeKey,
    invoke: EntryPoint,
}

impl HandlerEntry {
    /// Describes handler `H` for request `R`.
    pub const fn of<H, R>() -> Self
    where
        H: RequestHandler<R>,
        R: Request,
    {
        Self {
            request: TypeKey::of::<R>,
            handler: TypeKey::of::<H>,
            response: TypeKey::of::<R::Response>,
            invoke: invoke::<H, R>,
        }
    }

    /// The request type this entry handles.
    pub fn request(&self) -> TypeKey {
        (self.request)()
    }

    /// The handler type.
    pub fn handler(&self) -> TypeKey {
        (self.handler)()
    }

    /// Resolves the entry into the descriptor stored by the registry.
    pub fn descriptor(&self) -> HandlerDescriptor {
        HandlerDescriptor {
            request: (self.request)(),
            handler: (self.handler)(),
            response: (self.response)(),
            invoke: self.invoke,
        }
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("request", &self.request())
            .field("handler", &self.handler())
            .finish()
    }
}

/// An immutable registry record: request type, handler type, response type
/// and the entry point.
///
/// Descriptors are `Copy`; the registry stores and hands them out whole.
#[derive(Clone, Copy)]
pub struct HandlerDescriptor {
    request: TypeKey,
    handler: TypeKey,
    response: TypeKey,
    invoke: EntryPoint,
}

impl HandlerDescriptor {
    /// The request type.
    pub fn request(&self) -> TypeKey {
        self.request
    }

    /// The handler type the provider is asked for.
    pub fn handler(&self) -> TypeKey {
        self.handler
    }

    /// The response type the entry point produces.
    pub fn response(&self) -> TypeKey {
        self.response
    }

    /// Calls the entry point.
    pub fn invoke(
        &self,
        instance: Instance,
        request: BoxedRequest,
    ) -> BoxFuture<'static, Result<BoxedResponse, InvokeFailure>> {
        (self.invoke)(instance, request)
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("request", &self.request)
            .field("handler", &self.handler)
            .field("response", &self.response)
            .finish()
    }
}

/// A named collection of handler entries.
///
/// Modules are the unit of registration: the mediator is configured with one
/// or more of them and discovers handlers by walking their entries.
///
/// # Example
///
/// ```rust,ignore
/// // Built at compile time
/// static GREETINGS: Module = courier::module!("greetings" => [GreetHandler: Greet]);
///
/// // Built at runtime
/// let admin = Module::new("admin").with_handler::<BanHandler, Ban>();
/// ```
#[derive(Clone, Debug)]
pub struct Module {
    name: Cow<'static, str>,
    entries: Cow<'static, [HandlerEntry]>,
}

impl Module {
    /// Creates an empty module.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            entries: Cow::Owned(Vec::new()),
        }
    }

    /// Creates a module over a static list of entries.
    pub const fn from_static(name: &'static str, entries: &'static [HandlerEntry]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            entries: Cow::Borrowed(entries),
        }
    }

    /// Adds handler `H` for request `R`.
    pub fn with_handler<H, R>(mut self) -> Self
    where
        H: RequestHandler<R>,
        R: Request,
    {
        self.push(HandlerEntry::of::<H, R>());
        self
    }

    /// Adds an entry.
    pub fn push(&mut self, entry: HandlerEntry) {
        self.entries.to_mut().push(entry);
    }

    /// The module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entries in declaration order.
    pub fn entries(&self) -> &[HandlerEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the module declares no handlers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a [`Module`] from `Handler: Request` pairs.
///
/// The expansion is a constant expression, so it can initialize a `static`.
///
/// ```rust,ignore
/// static ORDERS: Module = module!("orders" => [
///     PlaceOrderHandler: PlaceOrder,
///     CancelOrderHandler: CancelOrder,
/// ]);
/// ```
#[macro_export]
macro_rules! module {
    ($name:expr => [$($handler:ty : $request:ty),* $(,)?]) => {{
        const ENTRIES: &[$crate::HandlerEntry] = &[
            $($crate::HandlerEntry::of::<$handler, $request>()),*
        ];
        $crate::Module::from_static($name, ENTRIES)
    }};
}
