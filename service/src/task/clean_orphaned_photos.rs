//! [`CleanOrphanedPhotos`] [`Task`].

use std::{collections::HashSet, convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Select, Start};
use derive_more::{Display, Error as StdError, From};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Helper;
use crate::{
    domain::helper,
    infra::{
        database,
        storage::{self, Object, ObjectPath, StoredObject},
        Database, Storage,
    },
    Service,
};

use super::Task;

/// Configuration for [`CleanOrphanedPhotos`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between orphaned photos cleaning.
    pub interval: time::Duration,

    /// Timeout after which an unreferenced photo is considered orphaned.
    ///
    /// Covers photos of in-flight [`Helper`] creations, which are uploaded
    /// before the [`Helper`] itself is persisted.
    pub timeout: time::Duration,
}

/// [`Task`] for cleaning photos not referenced by any [`Helper`] from the
/// object [`Storage`].
#[derive(Clone, Copy, Debug)]
pub struct CleanOrphanedPhotos<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, St> Task<Start<By<CleanOrphanedPhotos<Self>, Config>>>
    for Service<Db, St>
where
    CleanOrphanedPhotos<Service<Db, St>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<CleanOrphanedPhotos<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = CleanOrphanedPhotos {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::CleanOrphanedPhotos` failed: {e}");
            });
        }
    }
}

impl<Db, St> Task<Perform<()>> for CleanOrphanedPhotos<Service<Db, St>>
where
    Db: Database<
        Select<By<Vec<helper::PhotoUrl>, ()>>,
        Ok = Vec<helper::PhotoUrl>,
        Err = Traced<database::Error>,
    >,
    St: Storage<
            Select<By<Vec<StoredObject>, ()>>,
            Ok = Vec<StoredObject>,
            Err = Traced<storage::Error>,
        > + Storage<
            Delete<By<Object, Vec<ObjectPath>>>,
            Ok = (),
            Err = Traced<storage::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let referenced = self
            .service
            .database()
            .execute(Select(By::<Vec<helper::PhotoUrl>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .collect::<HashSet<_>>();

        let deadline = storage::CreationDateTime::now() - self.config.timeout;
        let orphaned = self
            .service
            .storage()
            .execute(Select(By::<Vec<StoredObject>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .filter(|o| {
                o.created_at < deadline && !referenced.contains(&o.url)
            })
            .map(|o| o.path)
            .collect::<Vec<_>>();
        if orphaned.is_empty() {
            return Ok(());
        }

        self.service
            .storage()
            .execute(Delete(By::<Object, _>::new(orphaned)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`CleanOrphanedPhotos`] [`Task`] execution.
#[derive(Debug, Display, From, StdError)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),
}
