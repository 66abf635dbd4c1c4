//! Sender trait: the public face of the mediator.

use crate::{error::DispatchError, message::Request};
use std::future::Future;

/// Sends requests to their handlers.
///
/// Both operations are pure delegation to a dispatcher; implementations add
/// no behavior of their own.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot send requests",
    label = "missing `RequestSender` implementation",
    note = "Use `courier::Mediator` or implement `RequestSender`."
)]
pub trait RequestSender: Send + Sync {
    /// Sends a request and returns the handler's response.
    fn send<R: Request>(
        &self,
        request: R,
    ) -> impl Future<Output = Result<R::Response, DispatchError>> + Send;

    /// Sends a request that expects no response.
    fn execute<R: Request<Response = ()>>(
        &self,
        request: R,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send {
        self.send(request)
    }
}
