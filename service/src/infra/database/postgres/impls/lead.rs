//! [`Lead`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::Lead,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Vec<Lead>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Lead>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<Lead>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, helper_display_id, \
                   name, phone, email, message, \
                   created_at \
            FROM leads \
            ORDER BY created_at DESC, id DESC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Lead {
                id: row.get("id"),
                helper_display_id: row.get("helper_display_id"),
                name: row.get("name"),
                phone: row.get("phone"),
                email: row.get("email"),
                message: row.get("message"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

impl<C> Database<Insert<Lead>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(lead): Insert<Lead>,
    ) -> Result<Self::Ok, Self::Err> {
        let Lead {
            id,
            helper_display_id,
            name,
            phone,
            email,
            message,
            created_at,
        } = lead;

        const SQL: &str = "\
            INSERT INTO leads (\
                id, helper_display_id, \
                name, phone, email, message, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, \
                $2::VARCHAR, \
                $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, \
                $7::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &helper_display_id,
                &name,
                &phone,
                &email,
                &message,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
