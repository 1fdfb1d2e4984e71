//! [`Task`]s running in the background of the [`Service`].
//!
//! [`Service`]: crate::Service

mod background;
pub mod clean_orphaned_photos;

pub use common::Handler as Task;

pub use self::{
    background::Background, clean_orphaned_photos::CleanOrphanedPhotos,
};
