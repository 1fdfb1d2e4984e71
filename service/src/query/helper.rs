//! [`Query`] collection related to a single [`Helper`].

use common::operations::{By, Select};
use derive_more::From;
use tracerr::Traced;

use crate::{
    domain::{helper, Helper},
    infra::{database, Database},
    read, Query, Service,
};

/// Queries a single [`Helper`] by its [`helper::Id`], with its
/// [`helper::DisplayId`] resolved.
#[derive(Clone, Copy, Debug, From)]
pub struct ById(pub helper::Id);

impl<Db, St> Query<ById> for Service<Db, St>
where
    Db: Database<
        Select<By<Vec<Helper>, ()>>,
        Ok = Vec<Helper>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<read::helper::Listed>;
    type Err = Traced<database::Error>;

    async fn execute(&self, ById(id): ById) -> Result<Self::Ok, Self::Err> {
        // `DisplayId` resolution is positional, so a single lookup still
        // selects the whole collection.
        let all = self
            .database()
            .execute(Select(By::<Vec<Helper>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(all.iter().find(|h| h.id == id).map(|h| {
            read::helper::Listed {
                display_id: helper::DisplayId::resolve(h, &all),
                helper: h.clone(),
            }
        }))
    }
}
