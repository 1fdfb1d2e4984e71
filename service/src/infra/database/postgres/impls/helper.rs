//! [`Helper`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{helper, Helper},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Vec<Helper>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Helper>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<Helper>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Creation order drives `helper::DisplayId` resolution, so it must be
        // stable.
        const SQL: &str = "\
            SELECT id, display_id, name, age, nationality, \
                   eta_days, experience_years, \
                   photos, notes, \
                   created_at \
            FROM helpers \
            ORDER BY created_at, id";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Helper {
                id: row.get("id"),
                display_id: row.get("display_id"),
                name: row.get("name"),
                age: u8::try_from(row.get::<_, i32>("age"))
                    .expect("`age` overflow"),
                nationality: row.get("nationality"),
                eta_days: u16::try_from(row.get::<_, i32>("eta_days"))
                    .expect("`eta_days` overflow"),
                experience_years: row
                    .get::<_, Option<i32>>("experience_years")
                    .map(u8::try_from)
                    .transpose()
                    .expect("`experience_years` overflow"),
                photos: row.get("photos"),
                notes: row.get("notes"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Helper>, helper::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Helper>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Helper>, helper::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: helper::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, display_id, name, age, nationality, \
                   eta_days, experience_years, \
                   photos, notes, \
                   created_at \
            FROM helpers \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Helper {
                id: row.get("id"),
                display_id: row.get("display_id"),
                name: row.get("name"),
                age: u8::try_from(row.get::<_, i32>("age"))
                    .expect("`age` overflow"),
                nationality: row.get("nationality"),
                eta_days: u16::try_from(row.get::<_, i32>("eta_days"))
                    .expect("`eta_days` overflow"),
                experience_years: row
                    .get::<_, Option<i32>>("experience_years")
                    .map(u8::try_from)
                    .transpose()
                    .expect("`experience_years` overflow"),
                photos: row.get("photos"),
                notes: row.get("notes"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<Helper>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Helper>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(helper): Insert<Helper>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(helper)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Helper>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(helper): Update<Helper>,
    ) -> Result<Self::Ok, Self::Err> {
        let Helper {
            id,
            display_id,
            name,
            age,
            nationality,
            eta_days,
            experience_years,
            photos,
            notes,
            created_at,
        } = helper;

        let age = i32::from(age);
        let eta_days = i32::from(eta_days);
        let experience_years = experience_years.map(i32::from);

        const SQL: &str = "\
            INSERT INTO helpers (\
                id, display_id, name, age, nationality, \
                eta_days, experience_years, \
                photos, notes, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, \
                $2::VARCHAR, \
                $3::VARCHAR, \
                $4::INT4, \
                $5::VARCHAR, \
                $6::INT4, $7::INT4, \
                $8::TEXT[], \
                $9::VARCHAR, \
                $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET display_id = EXCLUDED.display_id, \
                name = EXCLUDED.name, \
                age = EXCLUDED.age, \
                nationality = EXCLUDED.nationality, \
                eta_days = EXCLUDED.eta_days, \
                experience_years = EXCLUDED.experience_years, \
                photos = EXCLUDED.photos, \
                notes = EXCLUDED.notes, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &display_id,
                &name,
                &age,
                &nationality,
                &eta_days,
                &experience_years,
                &photos,
                &notes,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Helper, helper::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Helper, helper::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: helper::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM helpers \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Helper, helper::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Helper, helper::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: helper::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO helpers_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<helper::DisplayId, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(_): Lock<By<helper::DisplayId, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        /// Key of the transaction-scoped advisory lock serializing
        /// [`helper::DisplayId`] assignment (`MAID` in ASCII).
        const KEY: i64 = 0x4D41_4944;

        const SQL: &str = "\
            SELECT PG_ADVISORY_XACT_LOCK($1::INT8)";
        self.query(SQL, &[&KEY])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<helper::PhotoUrl>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<helper::PhotoUrl>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<helper::PhotoUrl>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT UNNEST(photos) AS url \
            FROM helpers";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("url"))
            .collect())
    }
}
