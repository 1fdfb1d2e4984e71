//! Application providing HTTP API for interacting with the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;

use std::sync::Arc;

use axum::{
    extract::{Multipart, WebSocketUpgrade},
    response::{IntoResponse, Response},
    Extension, Json,
};
use derive_more::Debug;
use juniper::{http::GraphQLBatchResponse, DefaultScalarValue, ScalarValue};
use juniper_axum::{extract::JuniperRequest, subscriptions};
use juniper_graphql_ws::ConnectionConfig;
use service::{
    command::{self, Command as _},
    infra::storage::ImageFormat,
};
// Used in binary.
use axum_client_ip as _;
use refinery as _;
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::{Context, Session},
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service =
    service::Service<service::infra::Postgres, service::infra::Supabase>;

/// [`juniper`] GraphQL response.
#[derive(Debug)]
pub struct JuniperResponse<S = DefaultScalarValue>
where
    S: ScalarValue,
{
    /// Status code of the response.
    pub status_code: http::StatusCode,

    /// Underlying GraphQL response.
    #[debug(skip)]
    pub response: GraphQLBatchResponse<S>,
}

impl<S> IntoResponse for JuniperResponse<S>
where
    S: ScalarValue,
{
    fn into_response(self) -> Response {
        let Self {
            status_code,
            response,
        } = self;

        if response.is_ok() {
            Json(response).into_response()
        } else {
            (status_code, Json(response)).into_response()
        }
    }
}

/// GraphQL API handler.
pub async fn graphql(
    Extension(schema): Extension<Arc<api::Schema>>,
    context: Context,
    JuniperRequest(gql_request): JuniperRequest,
) -> JuniperResponse {
    JuniperResponse {
        status_code: context.error_status_code(),
        response: gql_request.execute(&*schema, &context).await,
    }
}

/// GraphQL subscriptions handler.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
pub async fn subscriptions(
    Extension(schema): Extension<Arc<api::Schema>>,
    mut context: Context,
    ws: WebSocketUpgrade,
) -> Response {
    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .max_frame_size(1024)
        .max_message_size(1024)
        .write_buffer_size(512)
        .max_write_buffer_size(1024)
        .on_upgrade(move |socket| {
            subscriptions::serve_ws(socket, schema, move |vars| async move {
                context.apply_subscription_variables(&vars).map(|()| {
                    ConnectionConfig::new(context)
                        .with_max_in_flight_operations(10)
                })
            })
        })
}

/// `Helper` photos upload handler.
///
/// Accepts a `multipart/form-data` request with one or more file fields,
/// stores every file, and responds with a JSON array of their public URLs.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the current HTTP request is not authorized;
/// - `NO_FILES` - the request carries no file fields;
/// - `UNSUPPORTED_IMAGE_FORMAT` - a file is not a JPEG, PNG or WebP image;
/// - `PHOTO_TOO_LARGE` - a file exceeds the allowed maximum size.
pub async fn photos(
    context: Context,
    mut multipart: Multipart,
) -> Result<Json<Vec<String>>, Error> {
    _ = context.current_session().await?;

    let mut urls = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(AsError::into_error)?
    {
        let Some(filename) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };
        let format = field
            .content_type()
            .and_then(ImageFormat::from_mime)
            .ok_or_else(|| Error::from(PhotoError::UnsupportedFormat))?;
        let bytes = field.bytes().await.map_err(AsError::into_error)?;

        let url = context
            .service()
            .execute(command::UploadPhoto {
                filename,
                format,
                bytes,
            })
            .await
            .map_err(AsError::into_error)?;
        urls.push(url.to_string());
    }
    if urls.is_empty() {
        return Err(PhotoError::NoFiles.into());
    }

    Ok(Json(urls))
}

define_error! {
    enum PhotoError {
        #[code = "NO_FILES"]
        #[status = BAD_REQUEST]
        #[message = "No photo files provided"]
        NoFiles,

        #[code = "UNSUPPORTED_IMAGE_FORMAT"]
        #[status = UNSUPPORTED_MEDIA_TYPE]
        #[message = "Only JPEG, PNG and WebP photos are supported"]
        UnsupportedFormat,
    }
}

impl AsError for command::upload_photo::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PHOTO_TOO_LARGE"]
                #[status = PAYLOAD_TOO_LARGE]
                #[message = "Photo exceeds the allowed maximum size"]
                TooLarge,
            }
        }

        match self {
            Self::Storage(e) => e.try_as_error(),
            Self::TooLarge(_) => Some(Error::TooLarge.into()),
        }
    }
}
