//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, domain::helper, query, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Session` for the back-office admin.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_PASSWORD` - provided `AdminPassword` is wrong.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_session(
        password: api::session::Password,
        ctx: &Context,
    ) -> Result<api::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateSession {
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Creates a new `Helper` with the provided nationality and photos.
    ///
    /// The identifier displayed in the catalog is assigned automatically, and
    /// the rest of the profile is seeded with defaults to be edited later.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current HTTP request is not
    ///                              authorized;
    /// - `NO_PHOTOS` - at least one `HelperPhotoUrl` must be provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createHelper",
            nationality = %nationality,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_helper(
        nationality: api::helper::Nationality,
        photos: Vec<api::helper::PhotoUrl>,
        ctx: &Context,
    ) -> Result<api::Helper, Error> {
        _ = ctx.current_session().await?;

        let photos =
            helper::Photos::new(photos.into_iter().map(Into::into).collect())
                .ok_or_else(|| PhotosError::Empty.into())
                .map_err(ctx.error())?;

        let created = ctx
            .service()
            .execute(command::CreateHelper {
                nationality: nationality.into(),
                photos,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        // Re-queried, so the returned `Helper` carries the identifier as
        // displayed in the catalog.
        ctx.service()
            .execute(query::helper::ById(created.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::HelperError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Helper` with the provided ID, replacing its nationality
    /// and photos.
    ///
    /// The identifier displayed in the catalog is kept intact.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current HTTP request is not
    ///                              authorized;
    /// - `HELPER_NOT_EXISTS` - the `Helper` with the specified ID does not
    ///                         exist;
    /// - `NO_PHOTOS` - at least one `HelperPhotoUrl` must be provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateHelper",
            id = %id,
            nationality = %nationality,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_helper(
        id: api::helper::Id,
        nationality: api::helper::Nationality,
        photos: Vec<api::helper::PhotoUrl>,
        ctx: &Context,
    ) -> Result<api::Helper, Error> {
        _ = ctx.current_session().await?;

        let photos =
            helper::Photos::new(photos.into_iter().map(Into::into).collect())
                .ok_or_else(|| PhotosError::Empty.into())
                .map_err(ctx.error())?;

        let updated = ctx
            .service()
            .execute(command::UpdateHelper {
                id: id.into(),
                nationality: nationality.into(),
                photos,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        // Re-queried, so the returned `Helper` carries the identifier as
        // displayed in the catalog.
        ctx.service()
            .execute(query::helper::ById(updated.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::HelperError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Helper` with the provided ID, returning the ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current HTTP request is not
    ///                              authorized;
    /// - `HELPER_NOT_EXISTS` - the `Helper` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteHelper",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_helper(
        id: api::helper::Id,
        ctx: &Context,
    ) -> Result<api::helper::Id, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(command::DeleteHelper { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|helper| helper.id.into())
    }

    /// Submits a new `Lead` about the `Helper` with the quoted identifier.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "submitLead",
            email = ?email,
            helper_display_id = %helper_display_id,
            message = ?message,
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = %phone,
        ),
    )]
    pub async fn submit_lead(
        helper_display_id: api::lead::HelperDisplayId,
        name: api::lead::Name,
        phone: api::lead::Phone,
        email: Option<api::lead::Email>,
        message: Option<api::lead::Message>,
        ctx: &Context,
    ) -> Result<api::Lead, Error> {
        ctx.service()
            .execute(command::SubmitLead {
                helper_display_id: helper_display_id.into(),
                name: name.into(),
                phone: phone.into(),
                email: email.map(Into::into),
                message: message.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum PhotosError {
        #[code = "NO_PHOTOS"]
        #[status = BAD_REQUEST]
        #[message = "At least one `HelperPhotoUrl` must be provided"]
        Empty,
    }
}

impl AsError for command::create_helper::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "DISPLAY_ID_TAKEN"]
                #[status = CONFLICT]
                #[message = "Identifier picked for the new `Helper` has been \
                             assigned concurrently"]
                DisplayIdTaken,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::DisplayIdTaken(_) => Error::DisplayIdTaken.into(),
        })
    }
}

impl AsError for command::update_helper::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::HelperNotExists(_) => {
                Some(api::query::HelperError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_helper::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::HelperNotExists(_) => {
                Some(api::query::HelperError::NotExists.into())
            }
        }
    }
}

impl AsError for command::create_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_PASSWORD"]
                #[status = FORBIDDEN]
                #[message = "Wrong admin password"]
                WrongPassword,
            }
        }

        match self {
            Self::JsonWebTokenEncodeError(_) => None,
            Self::WrongPassword => Some(Error::WrongPassword.into()),
        }
    }
}
