//! [`Helper`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, read};
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// A domestic helper listed in the catalog.
#[derive(Clone, Debug, From)]
pub struct Helper(read::helper::Listed);

/// A domestic helper listed in the catalog.
#[graphql_object(context = Context)]
impl Helper {
    /// Unique identifier of this `Helper`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Helper.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.helper.id.into()
    }

    /// Human-facing identifier of this `Helper`, as displayed in the catalog.
    ///
    /// `Helper`s predating identifier assignment fall back to their position
    /// in the catalog.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Helper.displayId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn display_id(&self) -> DisplayId {
        self.0.display_id.clone().into()
    }

    /// Name of this `Helper`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Helper.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn name(&self) -> Name {
        self.0.helper.name.clone().into()
    }

    /// Age of this `Helper`, in years.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Helper.age",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn age(&self) -> i32 {
        self.0.helper.age.into()
    }

    /// Nationality of this `Helper`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Helper.nationality",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn nationality(&self) -> Nationality {
        self.0.helper.nationality.clone().into()
    }

    /// Estimated number of days until this `Helper` is available.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Helper.etaDays",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn eta_days(&self) -> i32 {
        self.0.helper.eta_days.into()
    }

    /// Years of prior work experience of this `Helper`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Helper.experienceYears",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn experience_years(&self) -> Option<i32> {
        self.0.helper.experience_years.map(Into::into)
    }

    /// Photos of this `Helper`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Helper.photos",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn photos(&self) -> Vec<PhotoUrl> {
        self.0.helper.photos.iter().cloned().map(Into::into).collect()
    }

    /// Additional notes about this `Helper`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Helper.notes",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn notes(&self) -> Option<Notes> {
        self.0.helper.notes.clone().map(Into::into)
    }

    /// `DateTime` when this `Helper` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Helper.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.helper.created_at.coerce()
    }
}

/// Unique identifier of a `Helper`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::helper::Id)]
#[into(domain::helper::Id)]
#[graphql(name = "HelperId", transparent)]
pub struct Id(Uuid);

/// Human-facing identifier of a `Helper`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HelperDisplayId",
    with = scalar::Via::<domain::helper::DisplayId>,
)]
pub struct DisplayId(domain::helper::DisplayId);

/// Name of a `Helper`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HelperName",
    with = scalar::Via::<domain::helper::Name>,
)]
pub struct Name(domain::helper::Name);

/// Nationality of a `Helper`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HelperNationality",
    with = scalar::Via::<domain::helper::Nationality>,
)]
pub struct Nationality(domain::helper::Nationality);

/// Additional notes about a `Helper`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HelperNotes",
    with = scalar::Via::<domain::helper::Notes>,
)]
pub struct Notes(domain::helper::Notes);

/// Public URL of a `Helper`'s photo.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HelperPhotoUrl",
    with = scalar::Via::<domain::helper::PhotoUrl>,
)]
pub struct PhotoUrl(domain::helper::PhotoUrl);
