//! [`Query`] collection related to [`Helper`]s.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{helper, Helper},
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] listing all [`Helper`]s in their creation order, with resolved
/// [`helper::DisplayId`]s.
#[derive(Clone, Debug, Default)]
pub struct List {
    /// Part of a resolved [`helper::DisplayId`] to filter the listing by,
    /// case-insensitively.
    pub display_id: Option<String>,
}

impl<Db, St> Query<List> for Service<Db, St>
where
    Db: Database<
        Select<By<Vec<Helper>, ()>>,
        Ok = Vec<Helper>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<read::helper::Listed>;
    type Err = Traced<database::Error>;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        let List { display_id } = query;

        // `DisplayId` resolution is positional, so even a filtered listing
        // selects the whole collection.
        let all = self
            .database()
            .execute(Select(By::<Vec<Helper>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        let needle = display_id.map(|s| s.to_lowercase());
        Ok(all
            .iter()
            .map(|h| read::helper::Listed {
                display_id: helper::DisplayId::resolve(h, &all),
                helper: h.clone(),
            })
            .filter(|listed| {
                needle.as_ref().map_or(true, |needle| {
                    let id: &str = listed.display_id.as_ref();
                    id.to_lowercase().contains(needle.as_str())
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod spec {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use common::operations::{By, Select};
    use futures::executor::block_on;
    use secrecy::SecretBox;
    use tracerr::Traced;

    use crate::{
        domain::{helper, session, Helper},
        infra::database,
        task, Config, Service,
    };

    use super::{Database, List, Query};

    #[derive(Clone, Debug, Default)]
    struct FakeDb(Arc<Mutex<Vec<Helper>>>);

    impl Database<Select<By<Vec<Helper>, ()>>> for FakeDb {
        type Ok = Vec<Helper>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<Vec<Helper>, ()>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.0.lock().unwrap().clone())
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

    fn stored_helper(display_id: Option<&str>) -> Helper {
        Helper {
            id: helper::Id::new(),
            display_id: display_id.map(|id| id.parse().unwrap()),
            name: "Helper".parse().unwrap(),
            age: 30,
            nationality: "Kenya".parse().unwrap(),
            eta_days: 30,
            experience_years: None,
            photos: helper::Photos::new(vec![
                "https://cdn.example.com/photos/one.jpg".parse().unwrap(),
            ])
            .unwrap(),
            notes: None,
            created_at: helper::CreationDateTime::now(),
        }
    }

    fn service(helpers: Vec<Helper>) -> Service<FakeDb, ()> {
        Service {
            config: config(),
            database: FakeDb(Arc::new(Mutex::new(helpers))),
            storage: (),
        }
    }

    #[test]
    fn resolves_display_ids_positionally() {
        let svc = service(vec![
            stored_helper(Some("MAID0042")),
            stored_helper(None),
            stored_helper(None),
        ]);

        let listed = block_on(svc.execute(List::default())).unwrap();

        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].display_id.to_string(), "MAID0042");
        assert_eq!(listed[1].display_id.to_string(), "MAID0002");
        assert_eq!(listed[2].display_id.to_string(), "MAID0003");
    }

    #[test]
    fn filters_by_display_id_case_insensitively() {
        let svc = service(vec![
            stored_helper(Some("MAID0011")),
            stored_helper(Some("MAID0021")),
            stored_helper(None),
        ]);

        let listed = block_on(svc.execute(List {
            display_id: Some("maid002".to_string()),
        }))
        .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_id.to_string(), "MAID0021");
    }

    #[test]
    fn filter_matches_resolved_fallbacks_too() {
        let svc = service(vec![stored_helper(None), stored_helper(None)]);

        let listed = block_on(svc.execute(List {
            display_id: Some("0002".to_string()),
        }))
        .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_id.to_string(), "MAID0002");
    }
}
