//! Object [`Storage`]-related implementations.

#[cfg(feature = "supabase")]
pub mod supabase;

use std::sync::LazyLock;

use bytes::Bytes;
#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, Error as StdError, From, Into};
use regex::Regex;
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Helper;
use crate::domain::helper;

#[cfg(feature = "supabase")]
pub use self::supabase::Supabase;

/// Object storage operation.
pub use common::Handler as Storage;

/// [`Storage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Supabase`] error.
    #[cfg(feature = "supabase")]
    Supabase(supabase::Error),
}

/// Object to be uploaded into the [`Storage`].
#[derive(Clone, Debug)]
pub struct Object {
    /// [`ObjectPath`] to store the [`Object`] under.
    pub path: ObjectPath,

    /// [`ImageFormat`] of the [`Object`].
    pub format: ImageFormat,

    /// Raw contents of the [`Object`].
    pub bytes: Bytes,
}

/// [`Object`] stored in the [`Storage`], as reported by its listing.
#[derive(Clone, Debug)]
pub struct StoredObject {
    /// [`ObjectPath`] of the [`Object`].
    pub path: ObjectPath,

    /// Public [`helper::PhotoUrl`] the [`Object`] is served under.
    pub url: helper::PhotoUrl,

    /// [`DateTime`] when the [`Object`] was uploaded.
    pub created_at: CreationDateTime,
}

/// Format of an uploaded image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    /// JPEG image.
    Jpeg,

    /// PNG image.
    Png,

    /// WebP image.
    Webp,
}

impl ImageFormat {
    /// Parses an [`ImageFormat`] out of the provided MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Returns the MIME type of this [`ImageFormat`].
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

/// Path of an [`Object`] in the [`Storage`] bucket.
#[derive(AsRef, Clone, Debug, Display, Eq, From, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct ObjectPath(String);

impl ObjectPath {
    /// Folder of the [`Storage`] bucket all the [`Helper`] photos are stored
    /// under.
    pub const PHOTOS_FOLDER: &'static str = "helpers";

    /// Generates a new unique [`ObjectPath`] for the provided client-side
    /// `filename`.
    ///
    /// The filename is sanitized down to lowercase alphanumerics, dots and
    /// hyphens, and suffixed with a random discriminator, so equally named
    /// uploads don't collide.
    #[must_use]
    pub fn generate(filename: &str) -> Self {
        let (stem, extension) = filename
            .rsplit_once('.')
            .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
            .unwrap_or((filename, "jpg"));

        let mut discriminator = Uuid::new_v4().simple().to_string();
        discriminator.truncate(8);

        Self(format!(
            "{}/{}_{discriminator}.{}",
            Self::PHOTOS_FOLDER,
            Self::sanitize(stem),
            extension.to_lowercase(),
        ))
    }

    /// Sanitizes the provided filename `stem` for use in an [`ObjectPath`].
    fn sanitize(stem: &str) -> String {
        /// Regular expression matching the characters to replace.
        static FORBIDDEN: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"[^a-zA-Z0-9.-]").expect("valid regex")
        });

        /// Regular expression matching runs of consecutive replacements.
        static COLLAPSED: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"_{2,}").expect("valid regex"));

        let stem = FORBIDDEN.replace_all(stem, "_");
        COLLAPSED.replace_all(&stem, "_").to_lowercase()
    }
}

/// [`DateTime`] of an [`Object`] upload.
pub type CreationDateTime = DateTimeOf<(Object, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::ObjectPath;

    #[test]
    fn generates_sanitized_paths() {
        let path = ObjectPath::generate("My Photo (1).JPG");
        let path: &str = path.as_ref();

        assert!(
            path.starts_with("helpers/my_photo_1"),
            "unexpected path: {path}",
        );
        assert!(path.ends_with(".jpg"), "unexpected path: {path}");
    }

    #[test]
    fn generated_paths_are_unique() {
        assert_ne!(
            ObjectPath::generate("photo.jpg"),
            ObjectPath::generate("photo.jpg"),
        );
    }

    #[test]
    fn falls_back_to_jpg_extension() {
        let path = ObjectPath::generate("portrait");
        let path: &str = path.as_ref();

        assert!(path.ends_with(".jpg"), "unexpected path: {path}");
    }
}
