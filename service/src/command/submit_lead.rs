//! [`Command`] for submitting a new [`Lead`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{
    lead::{Email, HelperDisplayId, Message, Name, Phone},
    Helper,
};
use crate::{
    domain::{lead, Lead},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for submitting a new [`Lead`].
///
/// Issued by site visitors, so requires no authorization.
#[derive(Clone, Debug)]
pub struct SubmitLead {
    /// [`HelperDisplayId`] of the [`Helper`] the visitor is asking about.
    pub helper_display_id: lead::HelperDisplayId,

    /// [`Name`] of the visitor.
    pub name: lead::Name,

    /// Contact [`Phone`] of the visitor.
    pub phone: lead::Phone,

    /// Contact [`Email`] of the visitor, if provided.
    pub email: Option<lead::Email>,

    /// Free-form [`Message`] of the visitor, if provided.
    pub message: Option<lead::Message>,
}

impl<Db, St> Command<SubmitLead> for Service<Db, St>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Lead>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Lead;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SubmitLead) -> Result<Self::Ok, Self::Err> {
        let SubmitLead {
            helper_display_id,
            name,
            phone,
            email,
            message,
        } = cmd;

        let lead = Lead {
            id: lead::Id::new(),
            helper_display_id,
            name,
            phone,
            email,
            message,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;
        tx.execute(Insert(lead.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(lead)
    }
}

/// Error of [`SubmitLead`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use common::operations::{Commit, Insert, Transact};
    use futures::executor::block_on;
    use secrecy::SecretBox;
    use tracerr::Traced;

    use crate::{
        domain::{session, Lead},
        infra::database,
        task, Config, Service,
    };

    use super::{Command, Database, SubmitLead};

    #[derive(Clone, Debug, Default)]
    struct FakeDb(Arc<Mutex<Vec<Lead>>>);

    impl Database<Transact> for FakeDb {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Database<Insert<Lead>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(lead): Insert<Lead>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.lock().unwrap().push(lead);
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

    #[test]
    fn stores_quoted_display_id_verbatim() {
        let db = FakeDb::default();
        let svc = Service {
            config: config(),
            database: db.clone(),
            storage: (),
        };

        let submitted = block_on(svc.execute(SubmitLead {
            helper_display_id: "MAID0003".parse().unwrap(),
            name: "Aisha".parse().unwrap(),
            phone: "0501234567".parse().unwrap(),
            email: None,
            message: Some("When is she available?".parse().unwrap()),
        }))
        .unwrap();

        assert_eq!(submitted.helper_display_id.to_string(), "MAID0003");
        assert_eq!(db.0.lock().unwrap().len(), 1);
    }
}
