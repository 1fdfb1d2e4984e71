//! [`Helper`]-related read definitions.

use crate::domain::{helper, Helper};

/// [`Helper`] as listed in the catalog, with its [`helper::DisplayId`]
/// resolved.
#[derive(Clone, Debug)]
pub struct Listed {
    /// The listed [`Helper`] itself.
    pub helper: Helper,

    /// Resolved [`helper::DisplayId`] of the [`Helper`]: the stored one when
    /// present, or the positional fallback otherwise.
    pub display_id: helper::DisplayId,
}
