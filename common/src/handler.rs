//! Generic [`Handler`] abstraction.

use std::future::Future;

/// Executor of operations described by `Args`.
pub trait Handler<Args = ()> {
    /// Value produced by a successful execution.
    type Ok;

    /// Error produced by a failed execution.
    type Err;

    /// Performs the operation described by the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
