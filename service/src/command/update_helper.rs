//! [`Command`] for updating an existing [`Helper`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::helper::{DisplayId, Nationality, Photos};
use crate::{
    domain::{helper, Helper},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Helper`].
///
/// Replaces the [`Nationality`] and [`Photos`] of the [`Helper`], keeping
/// everything else (its [`DisplayId`] above all) intact.
#[derive(Clone, Debug)]
pub struct UpdateHelper {
    /// ID of the [`Helper`] to update.
    pub id: helper::Id,

    /// New [`Nationality`] of the [`Helper`].
    pub nationality: helper::Nationality,

    /// New [`Photos`] of the [`Helper`].
    pub photos: helper::Photos,
}

impl<Db, St> Command<UpdateHelper> for Service<Db, St>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Helper, helper::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Helper>, helper::Id>>,
            Ok = Option<Helper>,
            Err = Traced<database::Error>,
        > + Database<Update<Helper>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Helper;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateHelper) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateHelper { id, nationality, photos } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent updates of the same `Helper`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut helper = tx
            .execute(Select(By::<Option<Helper>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::HelperNotExists(id))
            .map_err(tracerr::wrap!())?;

        helper.nationality = nationality;
        helper.photos = photos;

        tx.execute(Update(helper.clone()))
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

/// Error of [`UpdateHelper`] [`Command`] execution.
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

    use common::operations::{By, Commit, Lock, Select, Transact, Update};
    use futures::executor::block_on;
    use secrecy::SecretBox;
    use tracerr::Traced;

    use crate::{
        domain::{helper, session, Helper},
        infra::database,
        task, Config, Service,
    };

    use super::{Command, Database, ExecutionError, UpdateHelper};

    #[derive(Clone, Debug, Default)]
    struct FakeDb(Arc<Mutex<Vec<Helper>>>);

    impl Database<Transact> for FakeDb {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Database<Lock<By<Helper, helper::Id>>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Lock<By<Helper, helper::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(())
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

    impl Database<Update<Helper>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(helper): Update<Helper>,
        ) -> Result<Self::Ok, Self::Err> {
            let mut helpers = self.0.lock().unwrap();
            if let Some(h) = helpers.iter_mut().find(|h| h.id == helper.id) {
                *h = helper;
            }
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
            notes: Some("Speaks Arabic".parse().unwrap()),
            created_at: helper::CreationDateTime::now(),
        }
    }

    #[test]
    fn replaces_nationality_and_photos_only() {
        let existing = stored_helper();
        let id = existing.id;
        let db = FakeDb(Arc::new(Mutex::new(vec![existing])));
        let svc = Service {
            config: config(),
            database: db.clone(),
            storage: (),
        };

        let updated = block_on(svc.execute(UpdateHelper {
            id,
            nationality: "Philippines".parse().unwrap(),
            photos: helper::Photos::new(vec![
                "https://cdn.example.com/photos/two.jpg".parse().unwrap(),
            ])
            .unwrap(),
        }))
        .unwrap();

        assert_eq!(updated.nationality.to_string(), "Philippines");
        assert_eq!(
            updated.photos.iter().next().unwrap().to_string(),
            "https://cdn.example.com/photos/two.jpg",
        );
        // Everything else is preserved.
        assert_eq!(updated.display_id.unwrap().to_string(), "MAID0001");
        assert_eq!(updated.name.to_string(), "Helper");
        assert_eq!(updated.notes.unwrap().to_string(), "Speaks Arabic");

        let stored = db.0.lock().unwrap();
        assert_eq!(stored[0].nationality.to_string(), "Philippines");
    }

    #[test]
    fn fails_on_unknown_helper() {
        let svc = Service {
            config: config(),
            database: FakeDb::default(),
            storage: (),
        };

        let err = block_on(svc.execute(UpdateHelper {
            id: helper::Id::new(),
            nationality: "Kenya".parse().unwrap(),
            photos: helper::Photos::new(vec![
                "https://cdn.example.com/photos/one.jpg".parse().unwrap(),
            ])
            .unwrap(),
        }))
        .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::HelperNotExists(_)));
    }
}
