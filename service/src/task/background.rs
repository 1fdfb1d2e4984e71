//! Driver of [`Task`]s running behind the server.

use std::{
    error::Error,
    future::{Future, IntoFuture},
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;

#[cfg(doc)]
use crate::Task;

/// Set of background [`Task`]s, driven as a single future.
#[derive(Debug, Default)]
pub struct Background {
    /// [`task::LocalSet`] the [`Task`]s are spawned onto.
    set: task::LocalSet,

    /// [`task::JoinHandle`]s of the spawned [`Task`]s.
    handles: Vec<task::JoinHandle<Result<(), Box<dyn Error + 'static>>>>,
}

impl Background {
    /// Spawns the provided [`Task`] future onto this [`Background`] set.
    pub fn spawn<F, E>(&mut self, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        self.handles.push(self.set.spawn_local(
            future.map_err(|e| Box::<dyn Error + 'static>::from(Box::new(e))),
        ));
    }
}

impl IntoFuture for Background {
    type Output = Result<(), Box<dyn Error>>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        // The `set` drives the spawned `Task`s, while the `handles` surface
        // their failures (and panics) as soon as they happen.
        let finished = future::try_join_all(handles.into_iter().map(|h| {
            h.map(|r| match r {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(e) => {
                    Err(Box::<dyn Error + 'static>::from(Box::new(e)))
                }
            })
        }));
        future::try_join(set.map(Ok), finished)
            .map_ok(drop)
            .boxed_local()
    }
}
