//! Times in certificates.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use chrono::{DateTime, Timelike, Utc};
use crate::element::Element;
use crate::error::{Error, UnexpectedTypeError};
use crate::time::{GeneralizedTime, UtcTime};


//------------ Time ----------------------------------------------------------

/// A point in time as used by certificates.
///
/// ```text
/// Time ::= CHOICE {
///      utcTime        UTCTime,
///      generalTime    GeneralizedTime }
/// ```
///
/// Times in the years 1950 through 2049 are encoded as UTCTime, all other
/// times as GeneralizedTime. Certificate times have a resolution of one
/// second.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Time {
    Utc(UtcTime),
    Generalized(GeneralizedTime),
}

impl Time {
    /// Creates a time choosing the encoding from the year.
    pub fn new(time: DateTime<Utc>) -> Self {
        let time = time.with_nanosecond(0).unwrap_or(time);
        match UtcTime::new(time) {
            Ok(utc) => Time::Utc(utc),
            Err(_) => Time::Generalized(GeneralizedTime::new(time)),
        }
    }

    /// Returns the current time.
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Returns the point in time.
    pub fn to_datetime(self) -> DateTime<Utc> {
        match self {
            Time::Utc(time) => time.to_datetime(),
            Time::Generalized(time) => time.to_datetime(),
        }
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        match *element {
            Element::UtcTime(time) => Ok(Time::Utc(time)),
            Element::GeneralizedTime(time) => Ok(Time::Generalized(time)),
            _ => {
                Err(UnexpectedTypeError::new(
                    "UTCTime or GeneralizedTime", element.tag()
                ).into())
            }
        }
    }

    pub fn to_element(self) -> Element {
        match self {
            Time::Utc(time) => Element::UtcTime(time),
            Time::Generalized(time) => Element::GeneralizedTime(time),
        }
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(time: DateTime<Utc>) -> Self {
        Self::new(time)
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_datetime().cmp(&other.to_datetime())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.to_datetime().fmt(f)
    }
}


//------------ Validity ------------------------------------------------------

/// The validity period of a certificate.
///
/// ```text
/// Validity ::= SEQUENCE {
///      notBefore      Time,
///      notAfter       Time  }
/// ```
///
/// Both ends are included in the period.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Validity {
    not_before: Time,
    not_after: Time,
}

impl Validity {
    pub fn new(not_before: Time, not_after: Time) -> Self {
        Validity { not_before, not_after }
    }

    /// Creates a validity period starting now and lasting `duration`.
    pub fn from_now(duration: chrono::Duration) -> Self {
        let now = Utc::now();
        Validity::new(Time::new(now), Time::new(now + duration))
    }

    pub fn not_before(&self) -> Time {
        self.not_before
    }

    pub fn not_after(&self) -> Time {
        self.not_after
    }

    /// Returns whether `time` is within the period.
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.not_before.to_datetime() <= time
            && time <= self.not_after.to_datetime()
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let not_before = Time::from_element(fields.take()?)?;
        let not_after = Time::from_element(fields.take()?)?;
        fields.finish()?;
        Ok(Validity { not_before, not_after })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence([
            self.not_before.to_element(), self.not_after.to_element()
        ])
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use chrono::TimeZone;
    use super::*;

    #[test]
    fn choice() {
        let utc = Time::new(Utc.with_ymd_and_hms(2049, 12, 31, 23, 59, 59).unwrap());
        assert!(matches!(utc, Time::Utc(_)));
        let gen = Time::new(Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap());
        assert!(matches!(gen, Time::Generalized(_)));
        assert_eq!(
            gen.to_element().to_der().as_ref(),
            b"\x18\x0f20500101000000Z"
        );
        let old = Time::new(Utc.with_ymd_and_hms(1949, 1, 1, 0, 0, 0).unwrap());
        assert!(matches!(old, Time::Generalized(_)));
        assert!(utc < gen);
    }

    #[test]
    fn validity() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let validity = Validity::new(start.into(), end.into());
        assert!(validity.contains(start));
        assert!(validity.contains(end));
        assert!(!validity.contains(end + chrono::Duration::seconds(1)));
        let decoded = Validity::from_element(&validity.to_element()).unwrap();
        assert_eq!(decoded, validity);
    }
}
