//! Time-point (`TP`) and time-delta (`TD`) value representation.
//!
//! Both literal types share one underlying representation: a signed
//! second count plus a non-negative nanosecond remainder, following the
//! floor convention (`-1.25s` is `secs = -2, nanos = 750_000_000`). `TP`
//! values are interpreted as an offset from the DTN epoch
//! (2000-01-01T00:00:00Z); `TD` values are a plain duration. Conversion
//! between `TP` and `TD` is forbidden (§4.1.1).

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::{Error, Result};

/// Seconds between the POSIX epoch (1970-01-01T00:00:00Z) and the DTN
/// epoch (2000-01-01T00:00:00Z).
pub const DTN_EPOCH_UNIX_OFFSET: i64 = 946_684_800;

/// A signed seconds-plus-nanoseconds timespec, shared by `TP` and `TD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpec {
    /// Whole seconds (may be negative).
    pub secs: i64,
    /// Nanosecond remainder, always in `0..1_000_000_000`.
    pub nanos: u32,
}

impl TimeSpec {
    /// The zero timespec.
    pub const ZERO: TimeSpec = TimeSpec { secs: 0, nanos: 0 };

    /// Builds a timespec from whole seconds with no fractional part.
    #[must_use]
    pub fn from_secs(secs: i64) -> Self {
        Self { secs, nanos: 0 }
    }

    /// Builds a timespec from a floating-point second count, using the
    /// floor convention for the fractional remainder.
    pub fn from_f64_secs(v: f64) -> Result<Self> {
        if !v.is_finite() {
            return Err(Error::bad_value("timespec value must be finite"));
        }
        let secs = v.floor();
        let frac = v - secs;
        let nanos = (frac * 1_000_000_000.0).round() as i64;
        let (secs, nanos) = if nanos >= 1_000_000_000 {
            (secs as i64 + 1, 0)
        } else {
            (secs as i64, nanos as u32)
        };
        Ok(Self { secs, nanos })
    }

    /// Returns the value as a floating-point second count.
    #[must_use]
    pub fn as_f64_secs(self) -> f64 {
        self.secs as f64 + (self.nanos as f64 / 1_000_000_000.0)
    }

    /// True if there is no sub-second remainder.
    #[must_use]
    pub fn is_whole(self) -> bool {
        self.nanos == 0
    }

    /// Normalizes this value into a CBOR decimal-fraction pair
    /// `(exponent, mantissa)` with `exponent` in `[-9, 0]`, stripping
    /// trailing factors of ten from the mantissa (§4.2).
    ///
    /// Returns `None` when the value is whole (callers should then encode
    /// a bare integer instead).
    #[must_use]
    pub fn as_decimal_fraction(self) -> Option<(i8, i64)> {
        if self.is_whole() {
            return None;
        }
        let total_nanos: i128 = self.secs as i128 * 1_000_000_000 + self.nanos as i128;
        let mut mantissa = total_nanos;
        let mut exponent: i8 = -9;
        while exponent < 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            exponent += 1;
        }
        Some((exponent, mantissa as i64))
    }

    /// Builds a timespec from a CBOR decimal-fraction pair: the value is
    /// `mantissa * 10^exponent` seconds.
    pub fn from_decimal_fraction(exponent: i64, mantissa: i64) -> Result<Self> {
        if !(-9..=9).contains(&exponent) {
            return Err(Error::bad_value(format!("timespec exponent {exponent} out of [-9,9]")));
        }
        let total_nanos: i128 = if exponent < 0 {
            let pow = 10i128.pow((9 + exponent) as u32);
            mantissa as i128 * pow
        } else {
            mantissa as i128 * 1_000_000_000 * 10i128.pow(exponent as u32)
        };
        let secs = total_nanos.div_euclid(1_000_000_000);
        let nanos = total_nanos.rem_euclid(1_000_000_000);
        Ok(Self {
            secs: secs as i64,
            nanos: nanos as u32,
        })
    }

    /// Interprets this value as a `TP` offset from the DTN epoch and
    /// returns the corresponding UTC date-time.
    #[must_use]
    pub fn to_utc(self) -> DateTime<Utc> {
        let unix_secs = self.secs + DTN_EPOCH_UNIX_OFFSET;
        Utc.timestamp_opt(unix_secs, self.nanos).single().unwrap_or_else(|| {
            // Out-of-range timestamps still need a total function; clamp to
            // the nearest representable instant rather than panicking.
            if unix_secs < 0 {
                DateTime::<Utc>::from_naive_utc_and_offset(
                    NaiveDate::MIN.and_hms_opt(0, 0, 0).unwrap_or_default(),
                    Utc,
                )
            } else {
                DateTime::<Utc>::from_naive_utc_and_offset(
                    NaiveDate::MAX.and_hms_opt(23, 59, 59).unwrap_or_default(),
                    Utc,
                )
            }
        })
    }

    /// Builds a `TP` timespec from a UTC date-time.
    #[must_use]
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self {
            secs: dt.timestamp() - DTN_EPOCH_UNIX_OFFSET,
            nanos: dt.timestamp_subsec_nanos(),
        }
    }
}
