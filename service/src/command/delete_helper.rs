//! [`Command`] for deleting a [`Helper`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{helper, Helper},
    infra::{database, storage, Database, Storage},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Helper`].
///
/// Removes the [`Helper`]'s photos from the object [`Storage`] along with its
/// record, though a failed [`Storage`] removal doesn't abort the deletion:
/// leftover objects are reaped by the [`task::CleanOrphanedPhotos`] anyway.
///
/// [`task::CleanOrphanedPhotos`]: crate::task::CleanOrphanedPhotos
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteHelper {
    /// ID of the [`Helper`] to delete.
    pub id: helper::Id,
}

impl<Db, St> Command<DeleteHelper> for Service<Db, St>
where
    Db: Database<
            Select<By<Option<Helper>, helper::Id>>,
            Ok = Option<Helper>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Delete<By<Helper, helper::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
    St: Storage<
        Delete<By<storage::Object, Vec<helper::PhotoUrl>>>,
        Err = Traced<storage::Error>,
    >,
{
    type Ok = Helper;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteHelper) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteHelper { id } = cmd;

        let helper = self
            .database()
            .execute(Select(By::<Option<Helper>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::HelperNotExists(id))
            .map_err(tracerr::wrap!())?;

        let photos = helper.photos.iter().cloned().collect::<Vec<_>>();
        if let Err(e) = self
            .storage()
            .execute(Delete(By::<storage::Object, _>::new(photos)))
            .await
        {
            log::warn!(
                "Failed to remove photos of `Helper(id: {id})` from the \
                 object storage: {e}",
            );
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Delete(By::<Helper, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(helper)
    }
}

/// Error of [`DeleteHelper`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Helper`] with the provided ID does not exist.
    #[display("`Helper(id: {_0})` does not exist")]
    #[from(ignore)]
    HelperNotExists(#[error(not(source))] helper::Id),
}

#[cfg(test)]
mod spec {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use common::operations::{By, Commit, Delete, Select, Transact};
    use futures::executor::block_on;
    use secrecy::SecretBox;
    use tracerr::Traced;

    use crate::{
        domain::{helper, session, Helper},
        infra::{database, storage},
        task, Config, Service,
    };

    use super::{Command, Database, DeleteHelper, ExecutionError, Storage};

    #[derive(Clone, Debug, Default)]
    struct FakeDb(Arc<Mutex<Vec<Helper>>>);

    impl Database<Transact> for FakeDb {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Database<Select<By<Option<Helper>, helper::Id>>> for FakeDb {
        type Ok = Option<Helper>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Helper>, helper::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id = by.into_inner();
            Ok(self.0.lock().unwrap().iter().find(|h| h.id == id).cloned())
        }
    }

    impl Database<Delete<By<Helper, helper::Id>>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Delete(by): Delete<By<Helper, helper::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id = by.into_inner();
            self.0.lock().unwrap().retain(|h| h.id != id);
            Ok(())
        }
    }

    impl Database<Commit> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    #[derive(Clone, Debug, Default)]
    struct FakeStorage(Arc<Mutex<Vec<helper::PhotoUrl>>>);

    impl Storage<Delete<By<storage::Object, Vec<helper::PhotoUrl>>>>
        for FakeStorage
    {
        type Ok = ();
        type Err = Traced<storage::Error>;

        async fn execute(
            &self,
            Delete(by): Delete<By<storage::Object, Vec<helper::PhotoUrl>>>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.lock().unwrap().extend(by.into_inner());
            Ok(())
        }
    }

    fn config() -> Config {
        Config {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(b"test"),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(b"test"),
            admin_password: SecretBox::new(Box::new(session::Password::from(
                "password",
            ))),
            clean_orphaned_photos: task::clean_orphaned_photos::Config {
                interval: Duration::from_secs(60),
                timeout: Duration::from_secs(60),
            },
        }
    }

    fn stored_helper() -> Helper {
        Helper {
            id: helper::Id::new(),
            display_id: Some("MAID0001".parse().unwrap()),
            name: "Helper".parse().unwrap(),
            age: 30,
            nationality: "Kenya".parse().unwrap(),
            eta_days: 30,
            experience_years: None,
            photos: helper::Photos::new(vec![
                "https://cdn.example.com/photos/one.jpg".parse().unwrap(),
            ])
            .unwrap(),
            notes: None,
            created_at: helper::CreationDateTime::now(),
        }
    }

    #[test]
    fn removes_record_and_photos() {
        let existing = stored_helper();
        let id = existing.id;
        let db = FakeDb(Arc::new(Mutex::new(vec![existing])));
        let st = FakeStorage::default();
        let svc = Service {
            config: config(),
            database: db.clone(),
            storage: st.clone(),
        };

        let deleted = block_on(svc.execute(DeleteHelper { id })).unwrap();

        assert_eq!(deleted.id, id);
        assert!(db.0.lock().unwrap().is_empty());
        assert_eq!(
            st.0.lock().unwrap()[0].to_string(),
            "https://cdn.example.com/photos/one.jpg",
        );
    }

    #[test]
    fn fails_on_unknown_helper() {
        let svc = Service {
            config: config(),
            database: FakeDb::default(),
            storage: FakeStorage::default(),
        };

        let err = block_on(svc.execute(DeleteHelper {
            id: helper::Id::new(),
        }))
        .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::HelperNotExists(_)));
    }
}
