#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

//! Byte counts and their binary multiples.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;
use std::str::FromStr;

/// Multiplier between two consecutive named units.
const STANDARD: u64 = 1024;

/// A number of bytes.
///
/// Named multiples are binary: one kilobyte is 1024 bytes, one megabyte is
/// 1024 kilobytes and so on up to the petabyte. Text suffixes parsed by
/// [`Size::from_str`] follow the same convention, so `"10MB"` and `"10MiB"`
/// mean the same thing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "SizeRepr", into = "u64")]
pub struct Size(u64);

impl Size {
    pub const BYTE: Size = Size(1);
    pub const KILOBYTE: Size = Size(Self::BYTE.0 * STANDARD);
    pub const MEGABYTE: Size = Size(Self::KILOBYTE.0 * STANDARD);
    pub const GIGABYTE: Size = Size(Self::MEGABYTE.0 * STANDARD);
    pub const TERABYTE: Size = Size(Self::GIGABYTE.0 * STANDARD);
    pub const PETABYTE: Size = Size(Self::TERABYTE.0 * STANDARD);

    const UNITS: [(Size, &'static str); 6] = [
        (Self::PETABYTE, "PiB"),
        (Self::TERABYTE, "TiB"),
        (Self::GIGABYTE, "GiB"),
        (Self::MEGABYTE, "MiB"),
        (Self::KILOBYTE, "KiB"),
        (Self::BYTE, "B"),
    ];

    #[must_use]
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn checked_mul(self, factor: u64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }
}

impl From<u64> for Size {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}

impl From<Size> for u64 {
    fn from(size: Size) -> Self {
        size.0
    }
}

impl Mul<u64> for Size {
    type Output = Size;
    fn mul(self, rhs: u64) -> Size {
        self.checked_mul(rhs)
            .expect("overflow when multiplying size")
    }
}

impl Mul<Size> for u64 {
    type Output = Size;
    fn mul(self, rhs: Size) -> Size {
        rhs.checked_mul(self)
            .expect("overflow when multiplying size")
    }
}

impl fmt::Display for Size {
    /// Prints the largest unit that divides the value exactly, e.g. `10 MiB`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0 B");
        }
        for (unit, label) in Self::UNITS {
            if self.0 % unit.0 == 0 {
                return write!(f, "{} {label}", self.0 / unit.0);
            }
        }
        write!(f, "{} B", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeParseError {
    #[error("size is empty")]
    Empty,
    #[error("invalid size number: {input:?}")]
    InvalidNumber { input: String },
    #[error("unknown size unit: {unit:?}")]
    UnknownUnit { unit: String },
    #[error("size {input:?} does not fit in 64 bits")]
    Overflow { input: String },
}

impl FromStr for Size {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SizeParseError::Empty);
        }
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, unit) = trimmed.split_at(split);
        let value: u64 = digits.parse().map_err(|_| SizeParseError::InvalidNumber {
            input: trimmed.to_string(),
        })?;
        let multiple = match unit.trim().to_ascii_lowercase().as_str() {
            "" | "b" => Self::BYTE,
            "k" | "kb" | "kib" => Self::KILOBYTE,
            "m" | "mb" | "mib" => Self::MEGABYTE,
            "g" | "gb" | "gib" => Self::GIGABYTE,
            "t" | "tb" | "tib" => Self::TERABYTE,
            "p" | "pb" | "pib" => Self::PETABYTE,
            _ => {
                return Err(SizeParseError::UnknownUnit {
                    unit: unit.trim().to_string(),
                })
            }
        };
        multiple
            .checked_mul(value)
            .ok_or_else(|| SizeParseError::Overflow {
                input: trimmed.to_string(),
            })
    }
}

/// Accepted serde forms: a plain byte count or a suffixed string.
#[derive(Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Bytes(u64),
    Text(String),
}

impl TryFrom<SizeRepr> for Size {
    type Error = SizeParseError;

    fn try_from(repr: SizeRepr) -> Result<Self, Self::Error> {
        match repr {
            SizeRepr::Bytes(bytes) => Ok(Self(bytes)),
            SizeRepr::Text(text) => text.parse(),
        }
    }
}
