//! Point-rows normalization.

use super::Normalizer;
use super::classify::is_point_row;
use crate::domain::{Leg, ScheduleKey, StationName};
use crate::tabular::{Cell, Grid, row_cell};

/// Turns `origin, departure, destination, arrival` rows into legs.
///
/// Every row gets the same schedule key. A first row whose time columns
/// hold no times is a header and is skipped. Rows with an empty origin or
/// destination, or with either time missing, are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointRowsNormalizer;

impl Normalizer for PointRowsNormalizer {
    fn normalize(&self, key: ScheduleKey, grid: &Grid) -> Vec<Leg> {
        let rows = grid.rows();
        let skip = match rows.first() {
            Some(first) if is_header(first) => 1,
            _ => 0,
        };

        rows.iter()
            .skip(skip)
            .filter_map(|row| {
                let origin = StationName::new(&row_cell(row, 0).as_text());
                let destination = StationName::new(&row_cell(row, 2).as_text());
                if origin.is_empty() || destination.is_empty() {
                    return None;
                }
                let departure = row_cell(row, 1).to_time_of_day()?;
                let arrival = row_cell(row, 3).to_time_of_day()?;
                Some(Leg::new(key, origin, departure, destination, arrival))
            })
            .collect()
    }
}

fn is_header(row: &[Cell]) -> bool {
    !is_point_row(row) && !row_cell(row, 1).is_time_like() && !row_cell(row, 3).is_time_like()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DayGroup, Direction, TimeOfDay, Transport};

    fn key() -> ScheduleKey {
        ScheduleKey::new(Transport::Metro, DayGroup::Saturday, Direction::Return)
    }

    #[test]
    fn maps_columns_in_order() {
        let grid = Grid::from_text(vec![
            vec!["Central", "08:00", "Plaza", "08:10"],
            vec!["Plaza", "0.3541667", "Calle Sol", "0.3611111"],
        ]);
        let legs = PointRowsNormalizer.normalize(key(), &grid);
        assert_eq!(legs.len(), 2);

        assert_eq!(legs[0].origin.as_str(), "Central");
        assert_eq!(legs[0].departure_time, TimeOfDay::parse("08:00"));
        assert_eq!(legs[0].destination.as_str(), "Plaza");
        assert_eq!(legs[0].arrival_time, TimeOfDay::parse("08:10"));

        assert_eq!(legs[1].departure_time.to_string(), "08:30");
        assert_eq!(legs[1].arrival_time.to_string(), "08:40");
        assert!(legs.iter().all(|l| l.key() == key()));
    }

    #[test]
    fn notes_column_is_ignored() {
        let grid = Grid::from_text(vec![
            vec!["Origen", "Salida", "Destino", "Llegada", "Observaciones"],
            vec!["Central", "08:00", "Plaza", "08:10", "solo laborables"],
        ]);
        let legs = PointRowsNormalizer.normalize(key(), &grid);
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].origin.as_str(), "Central");
        assert_eq!(legs[0].destination.as_str(), "Plaza");
        assert_eq!(legs[0].arrival_time, TimeOfDay::parse("08:10"));
    }

    #[test]
    fn header_row_is_skipped() {
        let grid = Grid::from_text(vec![
            vec!["Estacion salida", "Hora salida", "Estacion llegada", "Hora llegada"],
            vec!["Central", "08:00", "Plaza", "08:10"],
        ]);
        let legs = PointRowsNormalizer.normalize(key(), &grid);
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].origin.as_str(), "Central");
    }

    #[test]
    fn rows_without_endpoints_are_dropped() {
        let grid = Grid::from_text(vec![
            vec!["Central", "08:00", "Plaza", "08:10"],
            vec!["", "08:20", "Plaza", "08:30"],
            vec!["Central", "08:40", "  ", "08:50"],
            vec!["Central", "", "Plaza", "09:10"],
        ]);
        let legs = PointRowsNormalizer.normalize(key(), &grid);
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].departure_time.to_string(), "08:00");
    }

    #[test]
    fn station_names_are_normalized() {
        let grid = Grid::from_text(vec![vec!["  Estación   Central ", "08:00", "Plaza\tMayor", "08:10"]]);
        let legs = PointRowsNormalizer.normalize(key(), &grid);
        assert_eq!(legs[0].origin.as_str(), "Estación Central");
        assert_eq!(legs[0].destination.as_str(), "Plaza Mayor");
    }
}
