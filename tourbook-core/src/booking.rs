//! Booking status and tour guide references

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Lifecycle state of a booking
///
/// Every booking starts `In Review`. A guide moves it to `Accepted` or
/// `Rejected`; nothing moves it back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    #[default]
    #[serde(rename = "In Review")]
    InReview,
    Accepted,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::InReview => "In Review",
            BookingStatus::Accepted => "Accepted",
            BookingStatus::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::InReview)
    }

    /// Compute the status after an explicit status update.
    ///
    /// Only terminal targets are allowed. A terminal booking may be
    /// switched to the other terminal state, which older clients rely on.
    pub fn transition(self, to: BookingStatus) -> Result<BookingStatus> {
        if !to.is_terminal() {
            return Err(Error::TransitionNotAllowed {
                from: self.to_string(),
                to: to.to_string(),
            });
        }
        Ok(to)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "In Review" => Ok(BookingStatus::InReview),
            "Accepted" => Ok(BookingStatus::Accepted),
            "Rejected" => Ok(BookingStatus::Rejected),
            other => Err(Error::UnknownStatus(other.to_string())),
        }
    }
}

/// Separator used by the composite `tourGuide` field
pub const GUIDE_REF_SEPARATOR: &str = ", ";

/// A tour guide as referenced from a booking (`"name, email"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideRef {
    pub name: String,
    pub email: String,
}

impl GuideRef {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for GuideRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, GUIDE_REF_SEPARATOR, self.email)
    }
}

impl FromStr for GuideRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(GUIDE_REF_SEPARATOR);
        let (name, email) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(email), None) => (name.trim(), email.trim()),
            _ => return Err(Error::InvalidGuideRef(s.to_string())),
        };
        if name.is_empty() || !email.contains('@') {
            return Err(Error::InvalidGuideRef(s.to_string()));
        }
        Ok(GuideRef::new(name, email))
    }
}
