//! Message and request marker traits.

/// A marker trait for values that travel through the mediator.
///
/// Messages must be `Send + Sync + 'static` to be safe for async use.
///
/// # Example
///
/// ```rust,ignore
/// struct Ping;
///
/// impl Message for Ping {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "All requests in Courier must be thread-safe and static."
)]
pub trait Message: Send + Sync + 'static {}

// Common Message implementations
impl Message for () {}
impl Message for String {}
impl Message for &'static str {}
impl<T: Message> Message for Box<T> {}
impl<T: Message> Message for std::sync::Arc<T> {}
impl<T: Message> Message for Vec<T> {}
impl<T: Message> Message for Option<T> {}

/// A message that is routed to exactly one handler.
///
/// The associated `Response` is what the handler produces. Requests that
/// expect nothing back use `()`.
///
/// # Example
///
/// ```rust,ignore
/// struct Greet { name: String }
///
/// impl Message for Greet {}
/// impl Request for Greet {
///     type Response = String;
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a Request",
    label = "missing `Request` implementation",
    note = "Implement `Request` (or derive it) and declare the `Response` type."
)]
pub trait Request: Message {
    /// The value produced by the handler of this request.
    type Response: Send + 'static;
}
