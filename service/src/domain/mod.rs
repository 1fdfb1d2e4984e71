//! Domain entities and their invariants.

pub mod helper;
pub mod lead;
pub mod session;

pub use self::{helper::Helper, lead::Lead, session::Session};
