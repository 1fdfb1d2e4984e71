//! [`Helper`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domestic helper profile listed in the catalog.
#[derive(Clone, Debug)]
pub struct Helper {
    /// Unique identifier of this [`Helper`].
    pub id: Id,

    /// Human-facing [`DisplayId`] of this [`Helper`].
    ///
    /// [`None`] for [`Helper`]s predating [`DisplayId`] assignment.
    pub display_id: Option<DisplayId>,

    /// [`Name`] of this [`Helper`].
    pub name: Name,

    /// [`Age`] of this [`Helper`].
    pub age: Age,

    /// [`Nationality`] of this [`Helper`].
    pub nationality: Nationality,

    /// Estimated number of days until this [`Helper`] is available.
    pub eta_days: EtaDays,

    /// Years of prior work experience of this [`Helper`], if any.
    pub experience_years: Option<ExperienceYears>,

    /// [`Photos`] of this [`Helper`].
    pub photos: Photos,

    /// Additional [`Notes`] about this [`Helper`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Helper`] was created.
    pub created_at: CreationDateTime,
}

/// Unique identifier of a [`Helper`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Generates a new random [`Helper`] [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Human-facing identifier of a [`Helper`], as shown in the catalog and
/// quoted by visitors in their inquiries.
///
/// Canonically formatted as the [`DisplayId::PREFIX`] followed by a non-empty
/// sequence of digits (`MAID0001`), but legacy values may carry any shape.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct DisplayId(String);

impl DisplayId {
    /// Literal prefix of every canonically formatted [`DisplayId`].
    pub const PREFIX: &'static str = "MAID";

    /// Width the number of a canonically formatted [`DisplayId`] is
    /// zero-padded to.
    const NUMBER_WIDTH: usize = 4;

    /// Creates a new [`DisplayId`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `id` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a new [`DisplayId`] if the given `id` is canonically
    /// formatted.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a canonically formatted
    /// [`DisplayId`].
    fn check(id: impl AsRef<str>) -> bool {
        /// Regular expression for checking a [`DisplayId`] canonical format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(&format!(r"^{}\d+$", DisplayId::PREFIX))
                .expect("valid regex")
        });

        REGEX.is_match(id.as_ref())
    }

    /// Returns the number carried by this [`DisplayId`], if any.
    ///
    /// Legacy values may surround the number with arbitrary text, so the
    /// match is not anchored.
    #[must_use]
    pub fn number(&self) -> Option<u64> {
        /// Regular expression for extracting a [`DisplayId`] number.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(&format!(r"{}(\d+)", DisplayId::PREFIX))
                .expect("valid regex")
        });

        REGEX
            .captures(self.as_ref())
            .and_then(|caps| caps.get(1))
            .and_then(|num| num.as_str().parse().ok())
    }

    /// Returns the [`DisplayId`] to assign to the next created [`Helper`].
    ///
    /// This is the maximum number carried by the `existing` [`Helper`]s'
    /// [`DisplayId`]s incremented by 1, or `MAID0001` when there is none.
    /// Absent [`DisplayId`]s and ones carrying no recognizable number are
    /// ignored.
    #[must_use]
    pub fn next<'h>(existing: impl IntoIterator<Item = &'h Helper>) -> Self {
        existing
            .into_iter()
            .filter_map(|h| h.display_id.as_ref())
            .filter_map(Self::number)
            .max()
            .map_or_else(
                || Self::from_number(1),
                |max| Self::from_number(max + 1),
            )
    }

    /// Resolves the [`DisplayId`] to show for the provided [`Helper`].
    ///
    /// A stored [`DisplayId`] is returned verbatim, even when it's not
    /// canonically formatted. [`Helper`]s without one fall back to their
    /// 1-based position in `all` (expected to be ordered by creation),
    /// zero-padded the same way as assigned [`DisplayId`]s. A [`Helper`]
    /// missing from `all` resolves to the `MAID0000` sentinel.
    #[must_use]
    pub fn resolve(helper: &Helper, all: &[Helper]) -> Self {
        if let Some(id) = &helper.display_id {
            return id.clone();
        }
        all.iter()
            .zip(1..)
            .find_map(|(h, position)| {
                (h.id == helper.id).then(|| Self::from_number(position))
            })
            .unwrap_or_else(|| Self::from_number(0))
    }

    /// Formats the provided `num` as a [`DisplayId`], zero-padding it to
    /// [`DisplayId::NUMBER_WIDTH`] digits.
    ///
    /// Numbers wider than that widen the [`DisplayId`] silently.
    fn from_number(num: u64) -> Self {
        Self(format!(
            "{}{num:0width$}",
            Self::PREFIX,
            width = Self::NUMBER_WIDTH,
        ))
    }
}

impl FromStr for DisplayId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `DisplayId`")
    }
}

/// Name a [`Helper`] is presented under.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && (1..=100).contains(&name.chars().count())
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Age of a [`Helper`], in years.
pub type Age = u8;

/// Estimated number of days until a [`Helper`] is available for hire.
pub type EtaDays = u16;

/// Years of prior work experience of a [`Helper`].
pub type ExperienceYears = u8;

/// Nationality of a [`Helper`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Nationality(String);

impl Nationality {
    /// Creates a new [`Nationality`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `nationality` matches the
    /// format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(nationality: impl Into<String>) -> Self {
        Self(nationality.into())
    }

    /// Creates a new [`Nationality`] if the given `nationality` is valid.
    #[must_use]
    pub fn new(nationality: impl Into<String>) -> Option<Self> {
        let nationality = nationality.into();
        Self::check(&nationality).then_some(Self(nationality))
    }

    /// Checks whether the given `nationality` is a valid [`Nationality`].
    fn check(nationality: impl AsRef<str>) -> bool {
        let nationality = nationality.as_ref();
        nationality.trim() == nationality
            && (1..=128).contains(&nationality.chars().count())
    }
}

impl FromStr for Nationality {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Nationality`")
    }
}

/// Free-form notes about a [`Helper`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Notes(String);

impl Notes {
    /// Creates new [`Notes`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `notes` match the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(notes: impl Into<String>) -> Self {
        Self(notes.into())
    }

    /// Creates new [`Notes`] if the given `notes` are valid.
    #[must_use]
    pub fn new(notes: impl Into<String>) -> Option<Self> {
        let notes = notes.into();
        Self::check(&notes).then_some(Self(notes))
    }

    /// Checks whether the given `notes` are valid [`Notes`].
    fn check(notes: impl AsRef<str>) -> bool {
        (1..=1000).contains(&notes.as_ref().chars().count())
    }
}

impl FromStr for Notes {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Notes`")
    }
}

/// Public URL of a [`Helper`]'s photo in the object storage.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PhotoUrl(String);

impl PhotoUrl {
    /// Creates a new [`PhotoUrl`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `url` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Creates a new [`PhotoUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`PhotoUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        url.trim() == url && (1..=2048).contains(&url.chars().count())
    }
}

impl FromStr for PhotoUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `PhotoUrl`")
    }
}

/// Ordered collection of a [`Helper`]'s photos.
///
/// Guaranteed to contain at least one [`PhotoUrl`].
#[derive(AsRef, Clone, Debug, Eq, Into, PartialEq)]
#[as_ref(forward)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Photos(Vec<PhotoUrl>);

impl Photos {
    /// Creates new [`Photos`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `photos` are non-empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(photos: Vec<PhotoUrl>) -> Self {
        Self(photos)
    }

    /// Creates new [`Photos`] if the given `photos` contain at least one
    /// [`PhotoUrl`].
    #[must_use]
    pub fn new(photos: Vec<PhotoUrl>) -> Option<Self> {
        (!photos.is_empty()).then_some(Self(photos))
    }

    /// Iterates over the [`PhotoUrl`]s of these [`Photos`].
    pub fn iter(&self) -> impl Iterator<Item = &PhotoUrl> {
        self.0.iter()
    }
}

/// [`DateTime`] of a [`Helper`] creation.
pub type CreationDateTime = DateTimeOf<(Helper, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{CreationDateTime, DisplayId, Helper, Id, Photos};

    fn display_id(id: &str) -> DisplayId {
        id.parse().unwrap()
    }

    fn legacy_display_id(id: &str) -> DisplayId {
        // Not canonically formatted, occurs in legacy data only.
        #[expect(unsafe_code, reason = "intentional")]
        unsafe {
            DisplayId::new_unchecked(id)
        }
    }

    fn helper(display_id: Option<DisplayId>) -> Helper {
        Helper {
            id: Id::new(),
            display_id,
            name: "Helper".parse().unwrap(),
            age: 30,
            nationality: "Kenya".parse().unwrap(),
            eta_days: 30,
            experience_years: None,
            photos: Photos::new(vec![
                "https://cdn.example.com/photos/one.jpg".parse().unwrap(),
            ])
            .unwrap(),
            notes: None,
            created_at: CreationDateTime::now(),
        }
    }

    #[test]
    fn next_exceeds_every_existing_number() {
        let existing = vec![
            helper(Some(display_id("MAID0001"))),
            helper(Some(display_id("MAID0042"))),
            helper(Some(display_id("MAID0003"))),
        ];

        assert_eq!(DisplayId::next(&existing).to_string(), "MAID0043");
    }

    #[test]
    fn next_starts_from_one() {
        assert_eq!(DisplayId::next(&[]).to_string(), "MAID0001");
    }

    #[test]
    fn next_ignores_absent_and_malformed() {
        let existing = vec![
            helper(Some(display_id("MAID0007"))),
            helper(None),
            helper(Some(legacy_display_id("HLP-9"))),
            helper(Some(legacy_display_id(""))),
        ];

        assert_eq!(DisplayId::next(&existing).to_string(), "MAID0008");
    }

    #[test]
    fn next_widens_beyond_four_digits() {
        let existing = vec![helper(Some(display_id("MAID9999")))];

        assert_eq!(DisplayId::next(&existing).to_string(), "MAID10000");
    }

    #[test]
    fn resolve_returns_stored_verbatim() {
        let all = vec![
            helper(Some(legacy_display_id("LEGACY-7"))),
            helper(Some(display_id("MAID0002"))),
        ];

        assert_eq!(DisplayId::resolve(&all[0], &all).to_string(), "LEGACY-7");
        assert_eq!(DisplayId::resolve(&all[1], &all).to_string(), "MAID0002");
    }

    #[test]
    fn resolve_falls_back_to_position() {
        let all = vec![helper(None), helper(None), helper(None)];

        assert_eq!(DisplayId::resolve(&all[0], &all).to_string(), "MAID0001");
        assert_eq!(DisplayId::resolve(&all[2], &all).to_string(), "MAID0003");
    }

    #[test]
    fn resolve_counts_position_among_all_helpers() {
        let all = vec![helper(Some(display_id("MAID0007"))), helper(None)];

        assert_eq!(DisplayId::resolve(&all[1], &all).to_string(), "MAID0002");
    }

    #[test]
    fn resolve_unknown_helper_to_sentinel() {
        let all = vec![helper(None), helper(None)];

        let resolved = DisplayId::resolve(&helper(None), &all);
        assert_eq!(resolved.to_string(), "MAID0000");
    }

    #[test]
    fn next_and_resolve_are_idempotent() {
        let all = vec![helper(Some(display_id("MAID0005"))), helper(None)];

        assert_eq!(DisplayId::next(&all), DisplayId::next(&all));
        assert_eq!(
            DisplayId::resolve(&all[1], &all),
            DisplayId::resolve(&all[1], &all),
        );
    }

    #[test]
    fn photos_require_at_least_one() {
        assert!(Photos::new(vec![]).is_none());
    }
}
