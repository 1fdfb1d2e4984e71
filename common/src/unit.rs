//! Marker types.

/// Marker type branding a value as describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type branding a value as describing an entity expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;
