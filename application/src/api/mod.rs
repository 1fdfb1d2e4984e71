//! GraphQL API definitions.

pub mod helper;
pub mod lead;
mod mutation;
mod query;
pub mod scalar;
pub mod session;
mod subscription;

pub use self::{
    helper::Helper, lead::Lead, mutation::Mutation, query::Query,
    subscription::Subscription,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;
