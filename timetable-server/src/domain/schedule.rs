//! Schedule variant identity: transport mode, day group and direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid schedule key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid schedule key {input:?}: {reason}")]
pub struct InvalidScheduleKey {
    input: String,
    reason: &'static str,
}

/// Transport mode of a timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Train,
    Metro,
    /// No transport token was found in the source metadata.
    Unknown,
}

impl Transport {
    pub const ALL: [Transport; 3] = [Transport::Train, Transport::Metro, Transport::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Train => "train",
            Transport::Metro => "metro",
            Transport::Unknown => "unknown",
        }
    }

    /// Look up a transport by its canonical name or its Spanish token.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tren" => Some(Transport::Train),
            _ => Self::ALL.into_iter().find(|t| t.as_str() == name),
        }
    }
}

/// Group of days a timetable applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayGroup {
    Weekday,
    Saturday,
    Sunday,
    Weekend,
    SaturdaySunday,
    /// No day token was found in the source metadata.
    General,
}

impl DayGroup {
    pub const ALL: [DayGroup; 6] = [
        DayGroup::Weekday,
        DayGroup::Saturday,
        DayGroup::Sunday,
        DayGroup::Weekend,
        DayGroup::SaturdaySunday,
        DayGroup::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayGroup::Weekday => "weekday",
            DayGroup::Saturday => "saturday",
            DayGroup::Sunday => "sunday",
            DayGroup::Weekend => "weekend",
            DayGroup::SaturdaySunday => "saturday_sunday",
            DayGroup::General => "general",
        }
    }

    /// Look up a day group by its canonical name or its Spanish token.
    ///
    /// ```
    /// use timetable_server::domain::DayGroup;
    ///
    /// assert_eq!(DayGroup::from_name("lunes_a_viernes"), Some(DayGroup::Weekday));
    /// assert_eq!(DayGroup::from_name("sabado-domingo"), Some(DayGroup::SaturdaySunday));
    /// assert_eq!(DayGroup::from_name("Weekday"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lunes_a_viernes" | "lunes-viernes" | "lunes_viernes" => Some(DayGroup::Weekday),
            "sabado" => Some(DayGroup::Saturday),
            "domingo" => Some(DayGroup::Sunday),
            "fin_de_semana" => Some(DayGroup::Weekend),
            "sabado_domingo" | "sabado-domingo" => Some(DayGroup::SaturdaySunday),
            _ => Self::ALL.into_iter().find(|d| d.as_str() == name),
        }
    }
}

/// Direction of travel along a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outbound,
    Return,
    /// No direction token was found in the source metadata.
    Unknown,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::Outbound, Direction::Return, Direction::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outbound => "outbound",
            Direction::Return => "return",
            Direction::Unknown => "unknown",
        }
    }

    /// Look up a direction by its canonical name or its Spanish token.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ida" => Some(Direction::Outbound),
            "vuelta" => Some(Direction::Return),
            _ => Self::ALL.into_iter().find(|d| d.as_str() == name),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Transport, DayGroup, Direction);

/// Identity of one timetable variant, e.g. "metro / weekday / outbound".
///
/// The string form joins the three parts with underscores:
///
/// ```
/// use timetable_server::domain::{DayGroup, Direction, ScheduleKey, Transport};
///
/// let key = ScheduleKey::new(Transport::Train, DayGroup::SaturdaySunday, Direction::Return);
/// assert_eq!(key.to_string(), "train_saturday_sunday_return");
/// assert_eq!("train_saturday_sunday_return".parse::<ScheduleKey>().unwrap(), key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleKey {
    pub transport: Transport,
    pub day_group: DayGroup,
    pub direction: Direction,
}

impl ScheduleKey {
    pub fn new(transport: Transport, day_group: DayGroup, direction: Direction) -> Self {
        Self {
            transport,
            day_group,
            direction,
        }
    }
}

impl fmt::Display for ScheduleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.transport, self.day_group, self.direction)
    }
}

impl FromStr for ScheduleKey {
    type Err = InvalidScheduleKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| InvalidScheduleKey {
            input: s.to_string(),
            reason,
        };

        let (transport, rest) = s.split_once('_').ok_or_else(|| invalid("missing separator"))?;
        let (day_group, direction) = rest
            .rsplit_once('_')
            .ok_or_else(|| invalid("missing separator"))?;

        let transport = Transport::ALL
            .into_iter()
            .find(|t| t.as_str() == transport)
            .ok_or_else(|| invalid("unknown transport"))?;
        let day_group = DayGroup::ALL
            .into_iter()
            .find(|d| d.as_str() == day_group)
            .ok_or_else(|| invalid("unknown day group"))?;
        let direction = Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == direction)
            .ok_or_else(|| invalid("unknown direction"))?;

        Ok(Self::new(transport, day_group, direction))
    }
}

impl Serialize for ScheduleKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScheduleKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
