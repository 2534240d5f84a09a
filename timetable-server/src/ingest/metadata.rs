//! Schedule metadata extraction from free text.
//!
//! Source files are named after the timetable they hold, e.g.
//! `TREN LUNES A VIERNES IDA` or `METRO SABADO VUELTA`. These functions map
//! such text to the [`ScheduleKey`] fields. They are pure and never fail:
//! anything unrecognised takes the field's default.
//!
//! Matching is case- and accent-insensitive. The transport is found anywhere
//! in the text, so `HorariosMetroIda` is a metro timetable. Days and
//! directions must be whole words, so `ida` inside `salida` is not a
//! direction.

use crate::domain::{DayGroup, Direction, ScheduleKey, Transport};

const TRANSPORT_TOKENS: &[(&str, Transport)] = &[
    ("tren", Transport::Train),
    ("train", Transport::Train),
    ("metro", Transport::Metro),
    ("subway", Transport::Metro),
];

const DIRECTION_WORDS: &[(&str, Direction)] = &[
    ("ida", Direction::Outbound),
    ("outbound", Direction::Outbound),
    ("vuelta", Direction::Return),
    ("regreso", Direction::Return),
    ("return", Direction::Return),
    ("inbound", Direction::Return),
];

const SATURDAY: &[&str] = &["sabado", "sabados", "saturday", "saturdays"];
const SUNDAY: &[&str] = &["domingo", "domingos", "sunday", "sundays", "festivo", "festivos"];

/// Extract all three key fields.
///
/// # Examples
///
/// ```
/// use timetable_server::domain::{DayGroup, Direction, Transport};
/// use timetable_server::ingest::extract_schedule_key;
///
/// let key = extract_schedule_key("TREN SÁBADO DOMINGO VUELTA.csv");
/// assert_eq!(key.transport, Transport::Train);
/// assert_eq!(key.day_group, DayGroup::SaturdaySunday);
/// assert_eq!(key.direction, Direction::Return);
/// ```
pub fn extract_schedule_key(text: &str) -> ScheduleKey {
    let folded = fold(text);
    let words = words(&folded);
    ScheduleKey::new(
        transport_of(&folded),
        day_group_of(&words),
        direction_of(&words),
    )
}

/// Extract the transport mode; defaults to [`Transport::Unknown`].
///
/// When several tokens occur, the one starting earliest wins.
pub fn extract_transport(text: &str) -> Transport {
    transport_of(&fold(text))
}

/// Extract the day group; defaults to [`DayGroup::General`].
///
/// Patterns are tried in priority order: a weekday range beats a
/// Saturday-and-Sunday pair, which beats a weekend word, which beats a
/// single day.
pub fn extract_day_group(text: &str) -> DayGroup {
    day_group_of(&words(&fold(text)))
}

/// Extract the direction; defaults to [`Direction::Unknown`].
pub fn extract_direction(text: &str) -> Direction {
    direction_of(&words(&fold(text)))
}

fn transport_of(folded: &str) -> Transport {
    TRANSPORT_TOKENS
        .iter()
        .filter_map(|(token, transport)| folded.find(token).map(|at| (at, *transport)))
        .min_by_key(|(at, _)| *at)
        .map_or(Transport::Unknown, |(_, transport)| transport)
}

fn direction_of(words: &[String]) -> Direction {
    first_match(words, DIRECTION_WORDS).unwrap_or(Direction::Unknown)
}

fn day_group_of(words: &[String]) -> DayGroup {
    let has = |w: &str| words.iter().any(|x| x == w);
    let has_any = |ws: &[&str]| ws.iter().any(|w| has(w));

    let weekday = (has("lunes") && has("viernes"))
        || (has("monday") && has("friday"))
        || has_any(&["weekday", "weekdays", "laborable", "laborables"]);
    if weekday {
        return DayGroup::Weekday;
    }

    if has_any(SATURDAY) && has_any(SUNDAY) {
        return DayGroup::SaturdaySunday;
    }

    if has_any(&["weekend", "weekends", "finde"]) || has_phrase(words, &["fin", "de", "semana"]) {
        return DayGroup::Weekend;
    }

    if has_any(SATURDAY) {
        return DayGroup::Saturday;
    }
    if has_any(SUNDAY) {
        return DayGroup::Sunday;
    }

    DayGroup::General
}

/// The value of the table entry whose word appears earliest in `words`.
fn first_match<T: Copy>(words: &[String], table: &[(&str, T)]) -> Option<T> {
    words
        .iter()
        .find_map(|w| table.iter().find(|(token, _)| token == w).map(|(_, v)| *v))
}

fn has_phrase(words: &[String], phrase: &[&str]) -> bool {
    words
        .windows(phrase.len())
        .any(|window| window.iter().zip(phrase).all(|(w, p)| w == p))
}

/// Lowercase and accent-fold.
fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect()
}

/// Alphanumeric words of folded text.
fn words(folded: &str) -> Vec<String> {
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}
