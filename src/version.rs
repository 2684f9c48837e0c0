//! PDF version numbers.
//!
//! Versions are totally ordered so that minimum-version floors can be
//! compared directly (`ctx.version < PdfVersion::V1_7`).

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A PDF version as declared in the file header or the catalog's /Version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PdfVersion {
    /// PDF 1.0
    V1_0,
    /// PDF 1.1
    V1_1,
    /// PDF 1.2
    V1_2,
    /// PDF 1.3
    V1_3,
    /// PDF 1.4
    V1_4,
    /// PDF 1.5
    V1_5,
    /// PDF 1.6
    V1_6,
    /// PDF 1.7
    V1_7,
    /// PDF 2.0
    V2_0,
}

impl PdfVersion {
    /// Earliest version this crate knows about.
    pub const EARLIEST: PdfVersion = PdfVersion::V1_0;

    /// Latest version this crate knows about.
    pub const LATEST: PdfVersion = PdfVersion::V2_0;

    /// Build a version from the (major, minor) pair a header parser returns.
    pub fn from_numbers(major: u8, minor: u8) -> Result<Self> {
        let version = match (major, minor) {
            (1, 0) => PdfVersion::V1_0,
            (1, 1) => PdfVersion::V1_1,
            (1, 2) => PdfVersion::V1_2,
            (1, 3) => PdfVersion::V1_3,
            (1, 4) => PdfVersion::V1_4,
            (1, 5) => PdfVersion::V1_5,
            (1, 6) => PdfVersion::V1_6,
            (1, 7) => PdfVersion::V1_7,
            (2, 0) => PdfVersion::V2_0,
            _ => return Err(Error::UnsupportedVersion(format!("{}.{}", major, minor))),
        };
        Ok(version)
    }

    /// (major, minor) pair.
    pub fn numbers(&self) -> (u8, u8) {
        match self {
            PdfVersion::V1_0 => (1, 0),
            PdfVersion::V1_1 => (1, 1),
            PdfVersion::V1_2 => (1, 2),
            PdfVersion::V1_3 => (1, 3),
            PdfVersion::V1_4 => (1, 4),
            PdfVersion::V1_5 => (1, 5),
            PdfVersion::V1_6 => (1, 6),
            PdfVersion::V1_7 => (1, 7),
            PdfVersion::V2_0 => (2, 0),
        }
    }
}

impl FromStr for PdfVersion {
    type Err = Error;

    /// Parse `"1.7"`, or a full header line such as `"%PDF-1.7"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("%PDF-").unwrap_or(s);
        let bytes = s.as_bytes();

        if bytes.len() != 3 || bytes[1] != b'.' {
            return Err(Error::UnsupportedVersion(s.to_string()));
        }
        if !bytes[0].is_ascii_digit() || !bytes[2].is_ascii_digit() {
            return Err(Error::UnsupportedVersion(s.to_string()));
        }

        Self::from_numbers(bytes[0] - b'0', bytes[2] - b'0')
    }
}

impl fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor) = self.numbers();
        write!(f, "{}.{}", major, minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(PdfVersion::V1_0 < PdfVersion::V1_4);
        assert!(PdfVersion::V1_7 < PdfVersion::V2_0);
        assert_eq!(PdfVersion::EARLIEST, PdfVersion::V1_0);
    }

    #[test]
    fn test_parse_plain_and_header_forms() {
        assert_eq!("1.7".parse::<PdfVersion>().unwrap(), PdfVersion::V1_7);
        assert_eq!("%PDF-1.4".parse::<PdfVersion>().unwrap(), PdfVersion::V1_4);
        assert_eq!("2.0".parse::<PdfVersion>().unwrap(), PdfVersion::V2_0);
    }

    #[test]
    fn test_parse_rejects_unknown_versions() {
        assert!(matches!("1.8".parse::<PdfVersion>(), Err(Error::UnsupportedVersion(_))));
        assert!("3.0".parse::<PdfVersion>().is_err());
        assert!("1,7".parse::<PdfVersion>().is_err());
        assert!("".parse::<PdfVersion>().is_err());
    }

    #[test]
    fn test_display_round_trips_numbers() {
        assert_eq!(PdfVersion::V1_3.to_string(), "1.3");
        assert_eq!(PdfVersion::from_numbers(1, 6).unwrap(), PdfVersion::V1_6);
    }
}
