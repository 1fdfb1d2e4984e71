//! [`Session`]-related definitions.
//!
//! [`Session`]: crate::Session

use common::DateTime;
use derive_more::{AsRef, From, Into};
use juniper::{GraphQLObject, GraphQLScalar};
use service::{command, domain};

use crate::{api::scalar, Context};

/// `Session` access token.
#[derive(AsRef, Clone, Debug, From, GraphQLScalar, Into)]
#[graphql(
    name = "AuthToken",
    with = scalar::Via::<domain::session::Token>,
)]
pub struct Token(domain::session::Token);

/// Password of the back-office admin.
#[derive(AsRef, Clone, Debug, From, GraphQLScalar, Into)]
#[graphql(
    name = "AdminPassword",
    with = scalar::Via::<domain::session::Password>,
)]
pub struct Password(domain::session::Password);

/// Information about the current `Session`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Session {
    /// `DateTime` when the current `Session` expires.
    pub expires_at: DateTime,
}

/// Result of a `Session` creation.
#[derive(Clone, Debug, From, GraphQLObject)]
#[graphql(context = Context, name = "CreateSessionResult")]
pub struct CreateResult {
    /// Access token of the created `Session`.
    pub token: Token,

    /// `DateTime` when the created `Session` expires.
    pub expires_at: DateTime,
}

impl From<command::create_session::Output> for CreateResult {
    fn from(output: command::create_session::Output) -> Self {
        let command::create_session::Output { token, expires_at } = output;
        Self {
            token: token.into(),
            expires_at: expires_at.coerce(),
        }
    }
}
