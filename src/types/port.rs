//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSet` resolves a textual port specification into a deduplicated set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
///
/// Using a newtype prevents accidental misuse of raw u16 values
/// and ensures port numbers are always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Create a Port without validation. Use only when the value is known valid.
    #[inline]
    pub const fn new_unchecked(port: u16) -> Self {
        Self(port)
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value as u32))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u32),
    #[error("invalid port token: {0:?}")]
    InvalidToken(String),
    #[error("invalid port range: start ({0}) exceeds end ({1})")]
    InvalidRange(u16, u16),
}

/// A deduplicated set of ports resolved from a specification string.
///
/// Supported formats:
/// - Single port: "80"
/// - Comma-separated: "80,443,8080"
/// - Inclusive range: "1-1000"
/// - Mixed: "22,80,443,8000-9000"
///
/// Whitespace around tokens and around the range separator is tolerated,
/// and empty tokens are skipped, so "22, 80, 100 - 102" and "22,,80" both
/// parse. An empty specification resolves to the empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSet(BTreeSet<Port>);

impl PortSet {
    /// Create an empty port set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Insert a port. Returns false if it was already present.
    pub fn insert(&mut self, port: Port) -> bool {
        self.0.insert(port)
    }

    /// Check whether a port is in the set.
    pub fn contains(&self, port: Port) -> bool {
        self.0.contains(&port)
    }

    /// Number of unique ports in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.0.iter().copied()
    }

    /// Commonly scanned ports, used by the CLI when no specification is given.
    pub fn common() -> Self {
        const SINGLES: &[u16] = &[
            9, 25, 37, 41, 42, 53, 88, 101, 102, 107, 113, 115, 123, 135, 143, 152, 153, 156, 158,
            161, 162, 170, 179, 194, 201, 209, 213, 218, 220, 259, 264, 311, 318, 323, 366, 369,
            371, 383, 384, 387, 389, 401, 411, 427, 464, 465, 500, 512, 517, 518, 520, 524, 525,
            530, 531, 532, 533, 540, 542, 543, 544, 546, 547, 548, 550, 554, 556, 560, 561, 563,
            587, 591, 593, 604, 631, 636, 639, 646, 647, 648, 652, 654, 665, 666, 674, 691, 692,
            695, 698, 699, 700, 701, 702, 706, 711, 712, 720, 749, 750, 782, 829, 860, 873, 901,
            902, 911, 981, 989, 990, 991, 992, 993, 995, 1234, 1337, 2020, 2121, 2222, 2525, 4444,
            6969, 8080, 8181, 12345, 31337, 54321, 65535,
        ];
        const RANGES: &[(u16, u16)] = &[
            (20, 23),
            (67, 70),
            (79, 82),
            (109, 111),
            (117, 119),
            (137, 139),
            (443, 445),
            (513, 515),
        ];

        let mut set = Self::new();
        for &p in SINGLES {
            if let Some(port) = Port::new(p) {
                set.insert(port);
            }
        }
        for &(start, end) in RANGES {
            for p in start..=end {
                if let Some(port) = Port::new(p) {
                    set.insert(port);
                }
            }
        }
        set
    }
}

impl FromStr for PortSet {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Self::new();

        for token in s.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            if let Some((start, end)) = token.split_once('-') {
                let start = parse_bound(start)?;
                let end = parse_bound(end)?;
                if start.as_u16() > end.as_u16() {
                    return Err(PortError::InvalidRange(start.as_u16(), end.as_u16()));
                }
                for p in start.as_u16()..=end.as_u16() {
                    set.insert(Port::new_unchecked(p));
                }
            } else {
                set.insert(parse_bound(token)?);
            }
        }

        Ok(set)
    }
}

impl FromIterator<Port> for PortSet {
    fn from_iter<I: IntoIterator<Item = Port>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for PortSet {
    type Item = Port;
    type IntoIter = std::collections::btree_set::IntoIter<Port>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Parse one numeric bound, widened to u32 so out-of-range values are
/// reported as such rather than as parse failures.
fn parse_bound(s: &str) -> Result<Port, PortError> {
    let s = s.trim();
    let value: u32 = s
        .parse()
        .map_err(|_| PortError::InvalidToken(s.to_string()))?;
    u16::try_from(value)
        .ok()
        .and_then(Port::new)
        .ok_or(PortError::OutOfRange(value))
}
