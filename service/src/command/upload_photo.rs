//! [`Command`] for uploading a [`Helper`]'s photo.

use bytes::Bytes;
use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Helper;
use crate::{
    domain::helper,
    infra::{
        storage::{self, ImageFormat, Object, ObjectPath},
        Storage,
    },
    Service,
};

use super::Command;

/// [`Command`] for uploading a [`Helper`]'s photo to the object [`Storage`].
///
/// Photos are uploaded before the [`Helper`] itself is created or updated,
/// and referenced by the returned [`helper::PhotoUrl`] afterwards.
#[derive(Clone, Debug)]
pub struct UploadPhoto {
    /// Client-side filename of the photo.
    pub filename: String,

    /// [`ImageFormat`] of the photo.
    pub format: ImageFormat,

    /// Raw contents of the photo.
    pub bytes: Bytes,
}

impl UploadPhoto {
    /// Maximum allowed size of an uploaded photo, in bytes.
    pub const MAX_SIZE: usize = 2 * 1024 * 1024;
}

impl<Db, St> Command<UploadPhoto> for Service<Db, St>
where
    St: Storage<
        Insert<Object>,
        Ok = helper::PhotoUrl,
        Err = Traced<storage::Error>,
    >,
{
    type Ok = helper::PhotoUrl;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UploadPhoto) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UploadPhoto { filename, format, bytes } = cmd;

        if bytes.len() > UploadPhoto::MAX_SIZE {
            return Err(tracerr::new!(E::TooLarge(bytes.len())));
        }

        self.storage()
            .execute(Insert(Object {
                path: ObjectPath::generate(&filename),
                format,
                bytes,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`UploadPhoto`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Object [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),

    /// Uploaded photo exceeds [`UploadPhoto::MAX_SIZE`].
    #[display("Photo of {_0} bytes exceeds the allowed maximum")]
    #[from(ignore)]
    TooLarge(#[error(not(source))] usize),
}

#[cfg(test)]
mod spec {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use bytes::Bytes;
    use common::operations::Insert;
    use futures::executor::block_on;
    use secrecy::SecretBox;
    use tracerr::Traced;

    use crate::{
        domain::{helper, session},
        infra::storage::{self, ImageFormat, Object, ObjectPath},
        task, Config, Service,
    };

    use super::{Command, ExecutionError, Storage, UploadPhoto};

    #[derive(Clone, Debug, Default)]
    struct FakeStorage(Arc<Mutex<Vec<ObjectPath>>>);

    impl Storage<Insert<Object>> for FakeStorage {
        type Ok = helper::PhotoUrl;
        type Err = Traced<storage::Error>;

        async fn execute(
            &self,
            Insert(object): Insert<Object>,
        ) -> Result<Self::Ok, Self::Err> {
            let url = format!("https://cdn.example.com/{}", object.path);
            self.0.lock().unwrap().push(object.path);
            Ok(url.parse().unwrap())
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

    fn service(storage: FakeStorage) -> Service<(), FakeStorage> {
        Service {
            config: config(),
            database: (),
            storage,
        }
    }

    #[test]
    fn stores_photo_and_returns_its_url() {
        let st = FakeStorage::default();
        let svc = service(st.clone());

        let url = block_on(svc.execute(UploadPhoto {
            filename: "My Photo.jpg".to_string(),
            format: ImageFormat::Jpeg,
            bytes: Bytes::from_static(b"binary"),
        }))
        .unwrap();

        let paths = st.0.lock().unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(
            url.to_string(),
            format!("https://cdn.example.com/{}", paths[0]),
        );
    }

    #[test]
    fn rejects_oversized_photo() {
        let svc = service(FakeStorage::default());

        let err = block_on(svc.execute(UploadPhoto {
            filename: "big.jpg".to_string(),
            format: ImageFormat::Jpeg,
            bytes: Bytes::from(vec![0; UploadPhoto::MAX_SIZE + 1]),
        }))
        .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::TooLarge(_)));
        assert!(svc.storage().0.lock().unwrap().is_empty());
    }
}
