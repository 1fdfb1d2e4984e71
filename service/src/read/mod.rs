//! Read models shaped for querying.

pub mod helper;

pub use self::helper::Listed;
