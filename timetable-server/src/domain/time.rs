//! Time-of-day handling for timetable cells.
//!
//! Spreadsheet exports encode departure times in several ways: as a
//! fraction of a day (`0.5` is noon), as a date-time value, or as literal
//! text such as `"08:30"`. Everything that can be read as a clock time is
//! normalized to a 24-hour `HH:MM` value; anything else is kept as trimmed
//! text so no information is lost.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minutes in a day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A normalized time of day.
///
/// Clock values order chronologically and always sort before text values.
///
/// # Examples
///
/// ```
/// use timetable_server::domain::TimeOfDay;
///
/// assert_eq!(TimeOfDay::from_day_fraction(0.5).unwrap().to_string(), "12:00");
/// assert_eq!(TimeOfDay::parse("8:05").to_string(), "08:05");
/// assert_eq!(TimeOfDay::parse(" see note ").to_string(), "see note");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeOfDay {
    /// Minutes since midnight, always below [`MINUTES_PER_DAY`].
    Clock(u16),
    /// Trimmed text that does not read as a clock time.
    Text(String),
}

impl TimeOfDay {
    /// Build a clock time from minutes since midnight, wrapping at 24 hours.
    pub fn from_minutes(minutes: u32) -> Self {
        TimeOfDay::Clock((minutes % MINUTES_PER_DAY) as u16)
    }

    /// Build a clock time from hour and minute components.
    ///
    /// Returns `None` when either component is out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(TimeOfDay::Clock((hour * 60 + minute) as u16))
    }

    /// Convert a fractional day number (as stored by spreadsheets).
    ///
    /// `total_minutes = round(value * 1440)`, wrapped at 24 hours so that
    /// date-time serial numbers keep only their time part. Returns `None`
    /// for negative or non-finite input.
    ///
    /// ```
    /// use timetable_server::domain::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::from_day_fraction(1.0 / 24.0).unwrap().to_string(), "01:00");
    /// assert_eq!(TimeOfDay::from_day_fraction(45000.25).unwrap().to_string(), "06:00");
    /// assert!(TimeOfDay::from_day_fraction(-0.1).is_none());
    /// ```
    pub fn from_day_fraction(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let total = (value * MINUTES_PER_DAY as f64).round();
        let wrapped = total.rem_euclid(MINUTES_PER_DAY as f64) as u32;
        Some(Self::from_minutes(wrapped))
    }

    /// Parse text, falling back to the trimmed text itself.
    ///
    /// Accepted clock forms are `H:MM`, `HH:MM` and `HH:MM:SS` (seconds are
    /// dropped).
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match parse_clock(trimmed) {
            Some(minutes) => TimeOfDay::Clock(minutes),
            None => TimeOfDay::Text(trimmed.to_string()),
        }
    }

    /// Minutes since midnight, if this is a clock time.
    pub fn minutes(&self) -> Option<u16> {
        match self {
            TimeOfDay::Clock(m) => Some(*m),
            TimeOfDay::Text(_) => None,
        }
    }

    /// Returns true if this is a clock time.
    pub fn is_clock(&self) -> bool {
        matches!(self, TimeOfDay::Clock(_))
    }
}

/// Parse `H:MM`, `HH:MM` or `HH:MM:SS` into minutes since midnight.
pub fn parse_clock(s: &str) -> Option<u16> {
    let mut parts = s.split(':');
    let hour = parts.next()?;
    let minute = parts.next()?;
    let second = parts.next();
    if parts.next().is_some() {
        return None;
    }

    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    let hour = parse_digits(hour)?;
    let minute = parse_digits(minute)?;
    if let Some(second) = second {
        if second.len() != 2 || parse_digits(second)? > 59 {
            return None;
        }
    }

    TimeOfDay::from_hm(hour, minute).and_then(|t| t.minutes())
}

/// Parse a short run of ASCII digits.
fn parse_digits(s: &str) -> Option<u32> {
    s.bytes().try_fold(0u32, |acc, b| {
        let digit = (b as char).to_digit(10)?;
        Some(acc * 10 + digit)
    })
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOfDay::Clock(_) => write!(f, "TimeOfDay({})", self),
            TimeOfDay::Text(text) => write!(f, "TimeOfDay(text {:?})", text),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOfDay::Clock(m) => write!(f, "{:02}:{:02}", m / 60, m % 60),
            TimeOfDay::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TimeOfDay::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_examples() {
        assert_eq!(TimeOfDay::from_day_fraction(0.5).unwrap().to_string(), "12:00");
        assert_eq!(
            TimeOfDay::from_day_fraction(0.041666666).unwrap().to_string(),
            "01:00"
        );
        assert_eq!(TimeOfDay::from_day_fraction(0.0).unwrap().to_string(), "00:00");
        // 08:30 = 510 minutes
        assert_eq!(
            TimeOfDay::from_day_fraction(510.0 / 1440.0).unwrap().to_string(),
            "08:30"
        );
    }

    #[test]
    fn fraction_wraps_at_midnight() {
        assert_eq!(TimeOfDay::from_day_fraction(1.0).unwrap().to_string(), "00:00");
        assert_eq!(TimeOfDay::from_day_fraction(0.99999).unwrap().to_string(), "00:00");
    }

    #[test]
    fn fraction_rejects_bad_numbers() {
        assert!(TimeOfDay::from_day_fraction(f64::NAN).is_none());
        assert!(TimeOfDay::from_day_fraction(f64::INFINITY).is_none());
        assert!(TimeOfDay::from_day_fraction(-1.0).is_none());
    }

    #[test]
    fn literal_text_passes_through() {
        assert_eq!(TimeOfDay::parse("08:30").to_string(), "08:30");
        assert_eq!(TimeOfDay::parse(" 23:59 ").to_string(), "23:59");
        assert_eq!(TimeOfDay::parse("7:05").to_string(), "07:05");
        assert_eq!(TimeOfDay::parse("07:05:59").to_string(), "07:05");
    }

    #[test]
    fn non_clock_text_is_kept() {
        assert_eq!(TimeOfDay::parse("24:00"), TimeOfDay::Text("24:00".into()));
        assert_eq!(TimeOfDay::parse("8.30"), TimeOfDay::Text("8.30".into()));
        assert_eq!(TimeOfDay::parse(" x "), TimeOfDay::Text("x".into()));
        assert_eq!(TimeOfDay::parse("08:3"), TimeOfDay::Text("08:3".into()));
        assert_eq!(TimeOfDay::parse("08:30:99"), TimeOfDay::Text("08:30:99".into()));
    }

    #[test]
    fn clock_sorts_chronologically_before_text() {
        let mut times = vec![
            TimeOfDay::parse("note"),
            TimeOfDay::parse("10:00"),
            TimeOfDay::parse("9:15"),
        ];
        times.sort();
        let rendered: Vec<_> = times.iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered, vec!["09:15", "10:00", "note"]);
    }

    #[test]
    fn from_hm_bounds() {
        assert!(TimeOfDay::from_hm(23, 59).is_some());
        assert!(TimeOfDay::from_hm(24, 0).is_none());
        assert!(TimeOfDay::from_hm(12, 60).is_none());
    }

    #[test]
    fn serde_as_string() {
        let t = TimeOfDay::parse("8:30");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"08:30\"");
        let back: TimeOfDay = serde_json::from_str("\"08:30\"").unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", TimeOfDay::parse("08:30")), "TimeOfDay(08:30)");
        assert_eq!(
            format!("{:?}", TimeOfDay::parse("x")),
            "TimeOfDay(text \"x\")"
        );
    }
}
