//! [`Lead`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// An inquiry submitted by a site visitor about a `Helper`.
#[derive(Clone, Debug, From)]
pub struct Lead(domain::Lead);

/// An inquiry submitted by a site visitor about a `Helper`.
#[graphql_object(context = Context)]
impl Lead {
    /// Unique identifier of this `Lead`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Helper` identifier quoted by the visitor, verbatim.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.helperDisplayId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn helper_display_id(&self) -> HelperDisplayId {
        self.0.helper_display_id.clone().into()
    }

    /// Name the visitor introduced themselves with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Contact phone number of the visitor.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn phone(&self) -> Phone {
        self.0.phone.clone().into()
    }

    /// Contact email of the visitor, if provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn email(&self) -> Option<Email> {
        self.0.email.clone().map(Into::into)
    }

    /// Free-form message of the visitor, if provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.message",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn message(&self) -> Option<Message> {
        self.0.message.clone().map(Into::into)
    }

    /// `DateTime` when this `Lead` was submitted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Lead.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Lead`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::lead::Id)]
#[into(domain::lead::Id)]
#[graphql(name = "LeadId", transparent)]
pub struct Id(Uuid);

/// `Helper` identifier quoted in a `Lead`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LeadHelperDisplayId",
    with = scalar::Via::<domain::lead::HelperDisplayId>,
)]
pub struct HelperDisplayId(domain::lead::HelperDisplayId);

/// Name of a `Lead`'s visitor.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LeadName",
    with = scalar::Via::<domain::lead::Name>,
)]
pub struct Name(domain::lead::Name);

/// Contact phone number of a `Lead`'s visitor.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LeadPhone",
    with = scalar::Via::<domain::lead::Phone>,
)]
pub struct Phone(domain::lead::Phone);

/// Contact email of a `Lead`'s visitor.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LeadEmail",
    with = scalar::Via::<domain::lead::Email>,
)]
pub struct Email(domain::lead::Email);

/// Free-form message attached to a `Lead`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LeadMessage",
    with = scalar::Via::<domain::lead::Message>,
)]
pub struct Message(domain::lead::Message);
