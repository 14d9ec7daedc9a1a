//! UTCTime and GeneralizedTime.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use crate::decode::ContentError;
use crate::encode::{PrimitiveContent, Target};
use crate::ident::Tag;
use crate::mode::Mode;


//------------ UtcTime -------------------------------------------------------

/// A UTCTime value.
///
/// The value holds a point in time with a resolution of one second between
/// the years 1950 and 2049.
///
/// # BER Encoding
///
/// The content octets are the ASCII string `YYMMDDHHMMSSZ`. Two-digit years
/// from 50 to 99 are in the twentieth century, all others in the
/// twenty-first. We only accept this exact form, i.e., seconds are
/// mandatory and the time must be given in UTC. This is what both DER and
/// RFC 5280 require and what practically all encoders produce.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UtcTime(DateTime<Utc>);

impl UtcTime {
    /// Creates a value from a point in time.
    ///
    /// Returns an error if the year is outside of 1950 to 2049. Fractions of
    /// a second are dropped.
    pub fn new(time: DateTime<Utc>) -> Result<Self, ContentError> {
        if !(1950..2050).contains(&time.year()) {
            return Err("year out of range for UTCTime".into())
        }
        Ok(UtcTime(truncate_nanos(time)))
    }

    /// Creates a value from its content octets.
    pub fn from_content(content: &[u8]) -> Result<Self, ContentError> {
        if content.len() != 13 || content[12] != b'Z' {
            return Err("invalid UTCTime".into())
        }
        let year = digits(&content[0..2])?;
        let year = if year >= 50 { year + 1900 } else { year + 2000 };
        let time = from_parts(
            year as i32, &content[2..12], 0
        ).ok_or(ContentError::from_static("invalid UTCTime"))?;
        Ok(UtcTime(time))
    }

    /// Returns the point in time.
    pub fn to_datetime(self) -> DateTime<Utc> {
        self.0
    }

    fn to_content(self) -> String {
        self.0.format("%y%m%d%H%M%SZ").to_string()
    }
}

impl PrimitiveContent for UtcTime {
    const TAG: Tag = Tag::UTC_TIME;

    fn encoded_len(&self, _: Mode) -> usize {
        13
    }

    fn write_encoded<T: Target>(
        &self, _: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(self.to_content().as_bytes())
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").fmt(f)
    }
}


//------------ GeneralizedTime -----------------------------------------------

/// A GeneralizedTime value.
///
/// # BER Encoding
///
/// The content octets are the ASCII string `YYYYMMDDHHMMSS[.fff]Z`. The
/// optional fraction of a second must not be empty and must not end in a
/// zero digit. We only accept this form which is the one required by DER
/// and RFC 5280. The fraction can have at most nine digits.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GeneralizedTime(DateTime<Utc>);

impl GeneralizedTime {
    /// Creates a value from a point in time.
    pub fn new(time: DateTime<Utc>) -> Self {
        GeneralizedTime(time)
    }

    /// Creates a value from its content octets.
    pub fn from_content(content: &[u8]) -> Result<Self, ContentError> {
        if content.len() < 15 || content.last() != Some(&b'Z') {
            return Err("invalid GeneralizedTime".into())
        }
        let year = digits(&content[0..4])?;
        let fraction = &content[14..content.len() - 1];
        let nanos = if fraction.is_empty() {
            0
        }
        else {
            let digits_part = &fraction[1..];
            if fraction[0] != b'.' || digits_part.is_empty()
                || digits_part.len() > 9
                || digits_part.last() == Some(&b'0')
            {
                return Err("invalid fraction in GeneralizedTime".into())
            }
            digits(digits_part)? * 10u32.pow(9 - digits_part.len() as u32)
        };
        let time = from_parts(
            year as i32, &content[4..14], nanos
        ).ok_or(ContentError::from_static("invalid GeneralizedTime"))?;
        Ok(GeneralizedTime(time))
    }

    /// Returns the point in time.
    pub fn to_datetime(self) -> DateTime<Utc> {
        self.0
    }

    fn to_content(self) -> String {
        let mut res = self.0.format("%Y%m%d%H%M%S").to_string();
        let nanos = self.0.nanosecond();
        if nanos != 0 {
            let fraction = format!("{:09}", nanos);
            res.push('.');
            res.push_str(fraction.trim_end_matches('0'));
        }
        res.push('Z');
        res
    }
}

impl PrimitiveContent for GeneralizedTime {
    const TAG: Tag = Tag::GENERALIZED_TIME;

    fn encoded_len(&self, _: Mode) -> usize {
        self.to_content().len()
    }

    fn write_encoded<T: Target>(
        &self, _: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(self.to_content().as_bytes())
    }
}

impl fmt::Display for GeneralizedTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.format("%Y-%m-%dT%H:%M:%S%.fZ").fmt(f)
    }
}


//------------ Helpers -------------------------------------------------------

/// Parses a sequence of ASCII digits.
fn digits(octets: &[u8]) -> Result<u32, ContentError> {
    octets.iter().try_fold(0u32, |res, &ch| {
        if ch.is_ascii_digit() {
            Ok(res * 10 + u32::from(ch - b'0'))
        }
        else {
            Err(ContentError::from_static("invalid digit in time value"))
        }
    })
}

/// Assembles a time from the year and `MMDDHHMMSS`.
fn from_parts(
    year: i32, rest: &[u8], nanos: u32
) -> Option<DateTime<Utc>> {
    let field = |idx: usize| digits(&rest[idx..idx + 2]).ok();
    let naive = NaiveDate::from_ymd_opt(year, field(0)?, field(2)?)?
        .and_hms_nano_opt(field(4)?, field(6)?, field(8)?, nanos)?;
    if naive.second() > 59 {
        return None
    }
    Some(Utc.from_utc_datetime(&naive))
}

/// Drops the fractional part of the seconds.
fn truncate_nanos(time: DateTime<Utc>) -> DateTime<Utc> {
    time.with_nanosecond(0).unwrap_or(time)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode::Values;

    #[test]
    fn utc_time() {
        let time = UtcTime::from_content(b"491231235959Z").unwrap();
        assert_eq!(time.to_datetime().year(), 2049);
        let time = UtcTime::from_content(b"500101000000Z").unwrap();
        assert_eq!(time.to_datetime().year(), 1950);
        assert_eq!(
            time.encode().to_vec(Mode::Der),
            b"\x17\x0d500101000000Z"
        );
        assert!(UtcTime::from_content(b"5001010000Z").is_err());
        assert!(UtcTime::from_content(b"500101000000+0100").is_err());
        assert!(UtcTime::from_content(b"501301000000Z").is_err());
        assert!(UtcTime::new(
            Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap()
        ).is_err());
    }

    #[test]
    fn generalized_time() {
        let time = GeneralizedTime::from_content(b"20240229123456Z").unwrap();
        assert_eq!(time.to_datetime().day(), 29);
        let time = GeneralizedTime::from_content(
            b"20240229123456.25Z"
        ).unwrap();
        assert_eq!(time.to_datetime().nanosecond(), 250_000_000);
        assert_eq!(time.to_content(), "20240229123456.25Z");
        assert!(GeneralizedTime::from_content(b"20240229123456.Z").is_err());
        assert!(
            GeneralizedTime::from_content(b"20240229123456.250Z").is_err()
        );
        assert!(GeneralizedTime::from_content(b"20230229123456Z").is_err());
        assert!(GeneralizedTime::from_content(b"2024022912Z").is_err());
    }
}
