//! [`Command`] for creating a new [`Helper`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
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

/// [`Command`] for creating a new [`Helper`].
///
/// Only the [`Nationality`] and [`Photos`] are chosen by the admin, the rest
/// of the profile is seeded with defaults and edited later.
#[derive(Clone, Debug)]
pub struct CreateHelper {
    /// [`Nationality`] of a new [`Helper`].
    pub nationality: helper::Nationality,

    /// [`Photos`] of a new [`Helper`].
    pub photos: helper::Photos,
}

impl CreateHelper {
    /// Default [`helper::Name`] of a new [`Helper`].
    const DEFAULT_NAME: &'static str = "Helper";

    /// Default [`helper::Age`] of a new [`Helper`].
    const DEFAULT_AGE: helper::Age = 30;

    /// Default [`helper::EtaDays`] of a new [`Helper`].
    const DEFAULT_ETA_DAYS: helper::EtaDays = 30;

    /// Name of the database constraint keeping [`DisplayId`]s unique.
    const DISPLAY_ID_CONSTRAINT: &'static str = "helpers_display_id_key";
}

impl<Db, St> Command<CreateHelper> for Service<Db, St>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<helper::DisplayId, ()>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Helper>, ()>>,
            Ok = Vec<Helper>,
            Err = Traced<database::Error>,
        > + Database<Insert<Helper>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Helper;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateHelper) -> Result<Self::Ok, Self::Err> {
        use CreateHelper as Cmd;
        use ExecutionError as E;

        let CreateHelper { nationality, photos } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serialize `DisplayId` assignment across concurrent creations.
        tx.execute(Lock(By::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Vec<Helper>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let display_id = helper::DisplayId::next(&existing);

        // SAFETY: `DEFAULT_NAME` is a statically known valid `Name`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let name = unsafe { helper::Name::new_unchecked(Cmd::DEFAULT_NAME) };

        let helper = Helper {
            id: helper::Id::new(),
            display_id: Some(display_id.clone()),
            name,
            age: Cmd::DEFAULT_AGE,
            nationality,
            eta_days: Cmd::DEFAULT_ETA_DAYS,
            experience_years: None,
            photos,
            notes: None,
            created_at: DateTime::now().coerce(),
        };

        if let Err(e) = tx.execute(Insert(helper.clone())).await {
            // The unique constraint backstops the advisory lock, should the
            // same `DisplayId` be assigned concurrently anyway.
            if e.as_ref()
                .is_unique_violation(Some(Cmd::DISPLAY_ID_CONSTRAINT))
            {
                return Err(tracerr::new!(E::DisplayIdTaken(display_id)));
            }
            return Err(e).map_err(tracerr::map_from_and_wrap!(=> E));
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(helper)
    }
}

/// Error of [`CreateHelper`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`DisplayId`] picked for the new [`Helper`] has been concurrently
    /// assigned to another one.
    #[display("`DisplayId({_0})` is already assigned")]
    #[from(ignore)]
    DisplayIdTaken(#[error(not(source))] helper::DisplayId),
}

#[cfg(test)]
mod spec {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use common::operations::{By, Commit, Insert, Lock, Select, Transact};
    use futures::executor::block_on;
    use secrecy::SecretBox;
    use tracerr::Traced;

    use crate::{
        domain::{helper, session, Helper},
        infra::database,
        task, Config, Service,
    };

    use super::{Command, CreateHelper, Database};

    #[derive(Clone, Debug, Default)]
    struct FakeDb(Arc<Mutex<Vec<Helper>>>);

    impl Database<Transact> for FakeDb {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Database<Lock<By<helper::DisplayId, ()>>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Lock<By<helper::DisplayId, ()>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    impl Database<Select<By<Vec<Helper>, ()>>> for FakeDb {
        type Ok = Vec<Helper>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<Vec<Helper>, ()>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    impl Database<Insert<Helper>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(helper): Insert<Helper>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.lock().unwrap().push(helper);
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

    fn service<Db, St>(database: Db, storage: St) -> Service<Db, St> {
        Service {
            config: config(),
            database,
            storage,
        }
    }

    fn cmd() -> CreateHelper {
        CreateHelper {
            nationality: "Kenya".parse().unwrap(),
            photos: helper::Photos::new(vec![
                "https://cdn.example.com/photos/one.jpg".parse().unwrap(),
            ])
            .unwrap(),
        }
    }

    fn stored_helper(display_id: Option<helper::DisplayId>) -> Helper {
        Helper {
            id: helper::Id::new(),
            display_id,
            name: "Helper".parse().unwrap(),
            age: 30,
            nationality: "Kenya".parse().unwrap(),
            eta_days: 30,
            experience_years: None,
            photos: helper::Photos::new(vec![
                "https://cdn.example.com/photos/two.jpg".parse().unwrap(),
            ])
            .unwrap(),
            notes: None,
            created_at: helper::CreationDateTime::now(),
        }
    }

    #[test]
    fn assigns_first_display_id() {
        let db = FakeDb::default();
        let svc = service(db.clone(), ());

        let created = block_on(svc.execute(cmd())).unwrap();

        assert_eq!(created.display_id.unwrap().to_string(), "MAID0001");
        assert_eq!(db.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn assigns_display_id_above_existing_ones() {
        let db = FakeDb(Arc::new(Mutex::new(vec![stored_helper(Some(
            "MAID0007".parse().unwrap(),
        ))])));
        let svc = service(db, ());

        let created = block_on(svc.execute(cmd())).unwrap();

        assert_eq!(created.display_id.unwrap().to_string(), "MAID0008");
    }

    #[test]
    fn seeds_profile_defaults() {
        let svc = service(FakeDb::default(), ());

        let created = block_on(svc.execute(cmd())).unwrap();

        assert_eq!(created.name.to_string(), "Helper");
        assert_eq!(created.age, 30);
        assert_eq!(created.eta_days, 30);
        assert_eq!(created.experience_years, None);
        assert_eq!(created.notes, None);
    }
}
