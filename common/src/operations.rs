//! Operation markers for [`Handler`]s.

use std::marker::PhantomData;

use crate::Handler;

/// Insertion of the carried value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Update of the carried value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Deletion of the carried value.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Selection described by the carried value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Lock acquisition described by the carried value.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Start of a long-running routine.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Single run of a routine's unit of work.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Opening of a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Result of a [`Transact`] operation.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Commitment of an opened transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selection of `W` keyed by `B`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the selected value.
    _what: PhantomData<W>,

    /// Key to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] out of the provided key.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Unwraps this [`By`] into the key it selects by.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
