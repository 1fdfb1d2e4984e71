//! [`Lead`] definitions.

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

#[cfg(doc)]
use super::{helper, Helper};

/// Inquiry submitted by a site visitor about a [`Helper`].
#[derive(Clone, Debug)]
pub struct Lead {
    /// Unique identifier of this [`Lead`].
    pub id: Id,

    /// [`helper::DisplayId`] of the [`Helper`] this [`Lead`] is about, as
    /// shown to the visitor at submission time.
    ///
    /// Kept as free text, since the referenced [`Helper`] may be deleted
    /// later, or the visitor may have typed it by hand.
    pub helper_display_id: HelperDisplayId,

    /// [`Name`] the visitor introduced themselves with.
    pub name: Name,

    /// Contact [`Phone`] of the visitor.
    pub phone: Phone,

    /// Contact [`Email`] of the visitor, if provided.
    pub email: Option<Email>,

    /// Free-form [`Message`] of the visitor, if provided.
    pub message: Option<Message>,

    /// [`DateTime`] when this [`Lead`] was submitted.
    pub created_at: CreationDateTime,
}

/// Unique identifier of a [`Lead`].
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
    /// Generates a new random [`Lead`] [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// [`helper::DisplayId`] quoted in a [`Lead`], verbatim.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct HelperDisplayId(String);

impl HelperDisplayId {
    /// Creates a new [`HelperDisplayId`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `id` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a new [`HelperDisplayId`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`HelperDisplayId`].
    fn check(id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        id.trim() == id && (1..=512).contains(&id.chars().count())
    }
}

impl FromStr for HelperDisplayId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `HelperDisplayId`")
    }
}

/// Name of a [`Lead`]'s visitor.
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

/// Saudi mobile phone number of a [`Lead`]'s visitor.
///
/// Stored as typed by the visitor, separators included.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    ///
    /// Spaces, dashes and parentheses are stripped before matching, so
    /// `050 123 4567` and `0501234567` are equally accepted.
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format (Saudi mobile
        /// numbers, optionally prefixed with the country code).
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(\+966|0)?5\d{8}$").expect("valid regex")
        });

        let number = number.as_ref();
        if number.is_empty() || number.chars().count() > 64 {
            return false;
        }
        let cleaned = number
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
            .collect::<String>();
        REGEX.is_match(&cleaned)
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Email address of a [`Lead`]'s visitor.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                "^([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                  |\\x5c[\\x00-\\x7f])*\\x22)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x22))*\\x40\
                  ([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d))*$",
            )
            .expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Free-form message attached to a [`Lead`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Message(String);

impl Message {
    /// Creates a new [`Message`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `message` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Creates a new [`Message`] if the given `message` is valid.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        Self::check(&message).then_some(Self(message))
    }

    /// Checks whether the given `message` is a valid [`Message`].
    fn check(message: impl AsRef<str>) -> bool {
        (1..=1000).contains(&message.as_ref().chars().count())
    }
}

impl FromStr for Message {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Message`")
    }
}

/// [`DateTime`] of a [`Lead`] submission.
pub type CreationDateTime = DateTimeOf<(Lead, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Email, Message, Name, Phone};

    #[test]
    fn accepts_saudi_mobile_numbers() {
        for number in [
            "0501234567",
            "501234567",
            "+966501234567",
            "050 123 4567",
            "050-123-4567",
            "(050) 123 4567",
        ] {
            assert!(Phone::new(number).is_some(), "rejected {number}");
        }
    }

    #[test]
    fn rejects_non_saudi_numbers() {
        for number in [
            "",
            "12345",
            "0601234567",
            "+15551234567",
            "05012345678",
            "not a phone",
        ] {
            assert!(Phone::new(number).is_none(), "accepted {number}");
        }
    }

    #[test]
    fn rejects_padded_and_overlong_names() {
        assert!(Name::new("Aisha Al-Harbi").is_some());
        assert!(Name::new("").is_none());
        assert!(Name::new(" Aisha").is_none());
        assert!(Name::new("x".repeat(101)).is_none());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(Email::new("visitor@example.com").is_some());
        assert!(Email::new("not-an-email").is_none());
        assert!(Email::new("two words@example.com").is_none());
    }

    #[test]
    fn caps_message_length() {
        assert!(Message::new("When is she available?").is_some());
        assert!(Message::new("").is_none());
        assert!(Message::new("x".repeat(1000)).is_some());
        assert!(Message::new("x".repeat(1001)).is_none());
    }
}
