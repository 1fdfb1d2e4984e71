//! [`Supabase`] Storage implementation of the object [`Storage`].

use common::{datetime, operations::{By, Delete, Insert, Select}};
use derive_more::{Display, Error as StdError, From};
use reqwest::{header, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use tracerr::Traced;

use crate::{
    domain::helper,
    infra::{
        storage::{self, CreationDateTime, Object, ObjectPath, StoredObject},
        Storage,
    },
};

/// [`Supabase`] Storage client.
///
/// [`Supabase`]: https://supabase.com/docs/guides/storage
#[derive(Clone, Debug)]
pub struct Supabase {
    /// Base URL of the Supabase project.
    url: String,

    /// Name of the bucket the [`Object`]s are stored in.
    bucket: String,

    /// Service role key authorizing [`Storage`] operations.
    key: SecretString,

    /// HTTP client to perform requests with.
    client: reqwest::Client,
}

impl Supabase {
    /// Creates a new [`Supabase`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create a new HTTP client.
    pub fn new(conf: Config) -> Result<Self, Traced<storage::Error>> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self {
            url: conf.url.trim_end_matches('/').to_owned(),
            bucket: conf.bucket,
            key: conf.key,
            client,
        })
    }

    /// Returns the URL the provided [`ObjectPath`] is uploaded to.
    fn object_url(&self, path: &ObjectPath) -> String {
        format!("{}/storage/v1/object/{}/{path}", self.url, self.bucket)
    }

    /// Returns the public URL the provided [`ObjectPath`] is served under.
    fn public_url(&self, path: &ObjectPath) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.url, self.bucket,
        )
    }

    /// Extracts the [`ObjectPath`] out of the provided public URL, if it
    /// points into this client's bucket.
    fn object_path(&self, url: &helper::PhotoUrl) -> Option<ObjectPath> {
        let prefix =
            format!("{}/storage/v1/object/public/{}/", self.url, self.bucket);
        let url: &str = url.as_ref();
        url.strip_prefix(prefix.as_str()).map(Into::into)
    }

    /// Ensures the provided `response` reports a successful HTTP status.
    fn ensure_success(
        response: &reqwest::Response,
    ) -> Result<(), Traced<storage::Error>> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(tracerr::new!(Error::UnexpectedStatus(status)))
                .map_err(tracerr::map_from)
        }
    }
}

impl Storage<Insert<Object>> for Supabase {
    type Ok = helper::PhotoUrl;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Insert(object): Insert<Object>,
    ) -> Result<Self::Ok, Self::Err> {
        let Object { path, format, bytes } = object;

        let response = self
            .client
            .post(self.object_url(&path))
            .bearer_auth(self.key.expose_secret())
            .header(header::CONTENT_TYPE, format.mime())
            .body(bytes)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Self::ensure_success(&response).map_err(tracerr::wrap!())?;

        let url = self.public_url(&path);
        // SAFETY: The URL is formatted by this client, so is guaranteed to
        //         be valid.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let url = unsafe { helper::PhotoUrl::new_unchecked(url) };
        Ok(url)
    }
}

impl Storage<Delete<By<Object, Vec<ObjectPath>>>> for Supabase {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Object, Vec<ObjectPath>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let paths = by.into_inner();
        if paths.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .delete(format!("{}/storage/v1/object/{}", self.url, self.bucket))
            .bearer_auth(self.key.expose_secret())
            .json(&RemoveRequest {
                prefixes: paths.into_iter().map(Into::into).collect(),
            })
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Self::ensure_success(&response).map_err(tracerr::wrap!())
    }
}

impl Storage<Delete<By<Object, Vec<helper::PhotoUrl>>>> for Supabase
where
    Self: Storage<
        Delete<By<Object, Vec<ObjectPath>>>,
        Ok = (),
        Err = Traced<storage::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Object, Vec<helper::PhotoUrl>>>,
    ) -> Result<Self::Ok, Self::Err> {
        // URLs pointing outside this client's bucket cannot be removed, so
        // are skipped.
        let paths = by
            .into_inner()
            .iter()
            .filter_map(|url| self.object_path(url))
            .collect::<Vec<_>>();
        self.execute(Delete(By::new(paths)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Storage<Select<By<Vec<StoredObject>, ()>>> for Supabase {
    type Ok = Vec<StoredObject>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<StoredObject>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        /// Number of entries requested per listing page.
        const PAGE_LIMIT: usize = 100;

        let url =
            format!("{}/storage/v1/object/list/{}", self.url, self.bucket);

        let mut objects = Vec::new();
        let mut offset = 0;
        loop {
            let response = self
                .client
                .post(&url)
                .bearer_auth(self.key.expose_secret())
                .json(&ListRequest {
                    prefix: ObjectPath::PHOTOS_FOLDER,
                    limit: PAGE_LIMIT,
                    offset,
                })
                .send()
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)?;
            Self::ensure_success(&response).map_err(tracerr::wrap!())?;

            let entries = response
                .json::<Vec<ListedEntry>>()
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)?;
            let page_len = entries.len();

            for entry in entries {
                // Folder placeholders carry no creation timestamp.
                let Some(created_at) = entry.created_at else {
                    continue;
                };

                let path = ObjectPath::from(format!(
                    "{}/{}",
                    ObjectPath::PHOTOS_FOLDER,
                    entry.name,
                ));
                let url = self.public_url(&path);
                // SAFETY: The URL is formatted by this client, so is
                //         guaranteed to be valid.
                #[expect(unsafe_code, reason = "invariants are preserved")]
                let url = unsafe { helper::PhotoUrl::new_unchecked(url) };

                objects.push(StoredObject {
                    path,
                    url,
                    created_at: CreationDateTime::from_rfc3339(&created_at)
                        .map_err(tracerr::from_and_wrap!(=> Error))
                        .map_err(tracerr::map_from)?,
                });
            }

            if page_len < PAGE_LIMIT {
                return Ok(objects);
            }
            offset += PAGE_LIMIT;
        }
    }
}

/// [`Supabase`] client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the Supabase project.
    pub url: String,

    /// Name of the bucket to store [`Object`]s in.
    pub bucket: String,

    /// Service role key to authorize [`Storage`] operations with.
    pub key: SecretString,
}

/// [`Supabase`] Storage error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to perform an HTTP request.
    #[display("HTTP request failed: {_0}")]
    Http(reqwest::Error),

    /// [`Supabase`] Storage responded with an unexpected HTTP status.
    #[display("Unexpected HTTP response status: {_0}")]
    #[from(ignore)]
    UnexpectedStatus(#[error(not(source))] StatusCode),

    /// Failed to parse a timestamp of a listed entry.
    #[display("Failed to parse `created_at` timestamp: {_0}")]
    Timestamp(datetime::ParseError),
}

/// Body of a [`Supabase`] Storage removal request.
#[derive(Debug, Serialize)]
struct RemoveRequest {
    /// Paths of the [`Object`]s to remove.
    prefixes: Vec<String>,
}

/// Body of a [`Supabase`] Storage listing request.
#[derive(Debug, Serialize)]
struct ListRequest {
    /// Folder to list the [`Object`]s under.
    prefix: &'static str,

    /// Maximum number of entries to return.
    limit: usize,

    /// Number of entries to skip.
    offset: usize,
}

/// Single entry of a [`Supabase`] Storage listing response.
#[derive(Debug, Deserialize)]
struct ListedEntry {
    /// Filename of the entry inside the listed folder.
    name: String,

    /// [RFC 3339] timestamp of the entry creation, if any.
    ///
    /// [`None`] for folder placeholder entries.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    created_at: Option<String>,
}

#[cfg(test)]
mod spec {
    use super::{helper, Config, ObjectPath, Supabase};

    fn client() -> Supabase {
        Supabase::new(Config {
            url: "http://127.0.0.1:54321/".to_string(),
            bucket: "photos".to_string(),
            key: "service-role-key".into(),
        })
        .unwrap()
    }

    #[test]
    fn public_url_round_trips_into_object_path() {
        let supabase = client();
        let path = ObjectPath::from("helpers/2f0e.jpg");

        let url = supabase.public_url(&path);
        assert_eq!(
            url,
            "http://127.0.0.1:54321/storage/v1/object/public/photos\
             /helpers/2f0e.jpg",
        );

        let url = url.parse::<helper::PhotoUrl>().unwrap();
        assert_eq!(supabase.object_path(&url), Some(path));
    }

    #[test]
    fn skips_urls_outside_the_bucket() {
        let supabase = client();

        let url = "https://elsewhere.example.com/photos/helpers/2f0e.jpg"
            .parse::<helper::PhotoUrl>()
            .unwrap();

        assert!(supabase.object_path(&url).is_none());
    }
}
