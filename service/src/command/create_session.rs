//! [`Command`] for creating a [`Session`].

use std::time::Duration;

use common::DateTime;
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::session::{Password, Token};
use crate::{
    domain::{session, Session},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`] of the back-office admin.
#[derive(Debug, From)]
pub struct CreateSession {
    /// [`Password`] to authenticate with.
    pub password: SecretBox<session::Password>,
}

impl CreateSession {
    /// [`Duration`] of [`Session`] expiration.
    const EXPIRATION_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
}

/// Output of [`CreateSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`DateTime`] when the [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<Db, St> Command<CreateSession> for Service<Db, St> {
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSession,
    ) -> Result<Self::Ok, Self::Err> {
        use CreateSession as Cmd;
        use ExecutionError as E;

        let CreateSession { password } = cmd;

        if password.expose_secret()
            != self.config.admin_password.expose_secret()
        {
            return Err(tracerr::new!(E::WrongPassword));
        }

        let expires_at = (DateTime::now() + Cmd::EXPIRATION_DURATION).coerce();
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &Session { expires_at },
            &self.config.jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output { token, expires_at })
    }
}

/// Error of [`CreateSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`CreateSession`] contains a wrong [`Password`].
    ///
    /// [`Password`]: session::Password
    #[display("Wrong admin `Password`")]
    WrongPassword,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use futures::executor::block_on;
    use secrecy::SecretBox;

    use crate::{domain::session, task, Config, Service};

    use super::{Command, CreateSession, ExecutionError};

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
    fn issues_token_for_correct_password() {
        let svc = service();

        let out = block_on(svc.execute(CreateSession {
            password: SecretBox::new(Box::new(session::Password::from(
                "correct horse",
            ))),
        }))
        .unwrap();

        assert!(!out.token.as_ref().is_empty());
    }

    #[test]
    fn rejects_wrong_password() {
        let svc = service();

        let err = block_on(svc.execute(CreateSession {
            password: SecretBox::new(Box::new(session::Password::from(
                "battery staple",
            ))),
        }))
        .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::WrongPassword));
    }
}
