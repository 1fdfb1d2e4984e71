//! [`Query`] collection related to [`Lead`]s.

use common::operations::By;

use crate::domain::Lead;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all [`Lead`]s, newest first.
pub type List = DatabaseQuery<By<Vec<Lead>, ()>>;
