//! [`Command`] for authorizing the back-office admin.

use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{session, Session},
    Service,
};

use super::Command;

/// [`Command`] for authorizing the back-office admin.
#[derive(Clone, Debug, From)]
pub struct AuthorizeSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db, St> Command<AuthorizeSession> for Service<Db, St> {
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeSession { token } = cmd;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config.jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        Ok(session)
    }
}

/// Error of [`AuthorizeSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use futures::executor::block_on;
    use secrecy::SecretBox;

    use crate::{
        command::CreateSession, domain::session, task, Config, Service,
    };

    use super::{AuthorizeSession, Command};

    fn service() -> Service<(), ()> {
        Service {
            config: Config {
                jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                    b"test",
                ),
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    b"test",
                ),
                admin_password: SecretBox::new(Box::new(
                    session::Password::from("correct horse"),
                )),
                clean_orphaned_photos: task::clean_orphaned_photos::Config {
                    interval: Duration::from_secs(60),
                    timeout: Duration::from_secs(60),
                },
            },
            database: (),
            storage: (),
        }
    }

    #[test]
    fn authorizes_issued_token() {
        let svc = service();

        let out = block_on(svc.execute(CreateSession {
            password: SecretBox::new(Box::new(session::Password::from(
                "correct horse",
            ))),
        }))
        .unwrap();

        let session = block_on(svc.execute(AuthorizeSession {
            token: out.token,
        }))
        .unwrap();

        assert_eq!(
            session.expires_at.unix_timestamp(),
            out.expires_at.unix_timestamp(),
        );
    }

    #[test]
    fn rejects_garbage_token() {
        let svc = service();

        let result = block_on(svc.execute(AuthorizeSession {
            token: "not.a.token".parse().unwrap(),
        }));

        assert!(result.is_err());
    }
}
