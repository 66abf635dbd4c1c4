//! # Handler contract
//!
//! A handler is the unit of business logic bound to one request type. The
//! mediator never constructs handlers itself; it receives instances from an
//! [`InstanceProvider`] and calls [`RequestHandler::handle`] on them.
//!
//! A single type may handle several request types by implementing the trait
//! once per request.
//!
//! [`InstanceProvider`]: crate::InstanceProvider

use crate::message::Request;
use std::future::Future;

/// The handler of one request type.
///
/// # Example
///
/// ```rust,ignore
/// struct GreetHandler;
///
/// impl RequestHandler<Greet> for GreetHandler {
///     type Error = std::convert::Infallible;
///
///     async fn handle(&self, request: Greet) -> Result<String, Self::Error> {
///         Ok(format!("Hello, {}", request.name))
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle requests of type `{R}`",
    label = "missing `RequestHandler<{R}>` implementation",
    note = "Handlers must implement the `handle` method for the request type `{R}`."
)]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    /// The error raised by this handler. Callers receive it unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Handles the request.
    fn handle(&self, request: R) -> impl Future<Output = Result<R::Response, Self::Error>> + Send;
}
