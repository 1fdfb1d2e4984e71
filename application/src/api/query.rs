//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Fetches the catalog of `Helper`s, in their creation order.
    ///
    /// The optional `displayId` argument narrows the catalog down to the
    /// `Helper`s whose displayed identifier contains it, case-insensitively.
    #[tracing::instrument(
        skip_all,
        fields(
            display_id = ?display_id,
            gql.name = "helpers",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn helpers(
        display_id: Option<String>,
        ctx: &Context,
    ) -> Result<Vec<api::Helper>, Error> {
        ctx.service()
            .execute(query::helpers::List { display_id })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|helpers| helpers.into_iter().map(Into::into).collect())
    }

    /// Returns the `Helper` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `HELPER_NOT_EXISTS` - the `Helper` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "helper",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn helper(
        id: api::helper::Id,
        ctx: &Context,
    ) -> Result<api::Helper, Error> {
        ctx.service()
            .execute(query::helper::ById(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| HelperError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches all the submitted `Lead`s, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current HTTP request is not
    ///                              authorized.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "leads",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn leads(ctx: &Context) -> Result<Vec<api::Lead>, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(query::leads::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|leads| leads.into_iter().map(Into::into).collect())
    }

    /// Returns information about the current `Session`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current HTTP request is not
    ///                              authorized.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "session",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn session(
        ctx: &Context,
    ) -> Result<api::session::Session, Error> {
        let session = ctx.current_session().await?;
        Ok(api::session::Session {
            expires_at: session.expires_at,
        })
    }
}

define_error! {
    enum HelperError {
        #[code = "HELPER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Helper` with the specified ID does not exist"]
        NotExists,
    }
}
