//! [`Command`] definition.

pub mod authorize_session;
pub mod create_helper;
pub mod create_session;
pub mod delete_helper;
pub mod submit_lead;
pub mod update_helper;
pub mod upload_photo;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_session::AuthorizeSession, create_helper::CreateHelper,
    create_session::CreateSession, delete_helper::DeleteHelper,
    submit_lead::SubmitLead, update_helper::UpdateHelper,
    upload_photo::UploadPhoto,
};
