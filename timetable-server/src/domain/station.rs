//! Station name type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized station name.
///
/// Spreadsheet header cells carry stray line breaks, tabs, repeated spaces
/// and the occasional control character. A `StationName` is trimmed, has
/// every whitespace run collapsed to a single space and has all other
/// control characters removed, so two spellings that differ only in those
/// respects compare equal.
///
/// # Examples
///
/// ```
/// use timetable_server::domain::StationName;
///
/// let a = StationName::new("  Central \n");
/// let b = StationName::new("Central");
/// assert_eq!(a, b);
///
/// let c = StationName::new("Plaza\t\tMayor");
/// assert_eq!(c.as_str(), "Plaza Mayor");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StationName(String);

impl StationName {
    /// Normalize a raw station label.
    pub fn new(raw: &str) -> Self {
        let mut out = String::with_capacity(raw.len());
        let mut pending_space = false;

        for c in raw.chars() {
            if c.is_whitespace() {
                pending_space = true;
                continue;
            }
            if c.is_control() {
                continue;
            }
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }

        Self(out)
    }

    /// Placeholder name for a header cell that is empty.
    ///
    /// `column` is the zero-based grid column; the placeholder is 1-based
    /// (`Station_1` for column 0).
    pub fn placeholder(column: usize) -> Self {
        Self(format!("Station_{}", column + 1))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if nothing but whitespace and control characters was given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for StationName {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for StationName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<StationName> for String {
    fn from(name: StationName) -> Self {
        name.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({:?})", self.0)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Normalizing twice changes nothing
        #[test]
        fn idempotent(s in "\\PC*") {
            let once = StationName::new(&s);
            let twice = StationName::new(once.as_str());
            prop_assert_eq!(once, twice);
        }

        /// Surrounding whitespace never affects identity
        #[test]
        fn padding_ignored(s in "[A-Za-z ]{0,20}", pad in "[ \t\n\r]{0,5}") {
            let padded = format!("{pad}{s}{pad}");
            prop_assert_eq!(StationName::new(&padded), StationName::new(&s));
        }

        /// Output never has leading, trailing or doubled spaces
        #[test]
        fn no_stray_spaces(s in "[a-z \t\n]{0,30}") {
            let name = StationName::new(&s);
            prop_assert!(!name.as_str().starts_with(' '));
            prop_assert!(!name.as_str().ends_with(' '));
            prop_assert!(!name.as_str().contains("  "));
        }
    }
}
