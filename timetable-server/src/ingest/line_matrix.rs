//! Line-matrix normalization.

use super::Normalizer;
use crate::domain::{Leg, ScheduleKey, StationName, TimeOfDay};
use crate::tabular::{Cell, Grid, row_cell};

/// Turns a station-header grid into legs between adjacent stations.
///
/// For every run row and every adjacent column pair where both times are
/// present, one leg is emitted. A missing time means the run does not stop
/// there; no leg crosses the gap but the rest of the run is still used.
///
/// A leading column that never holds a time in any run row is a run label
/// column (train numbers, notes) and is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineMatrixNormalizer;

impl Normalizer for LineMatrixNormalizer {
    fn normalize(&self, key: ScheduleKey, grid: &Grid) -> Vec<Leg> {
        let Some((header, runs)) = grid.rows().split_first() else {
            return Vec::new();
        };

        let first = if has_label_column(runs) { 1 } else { 0 };
        let columns = first..grid.width();
        let stations: Vec<StationName> = columns
            .clone()
            .map(|column| station_name(row_cell(header, column), column))
            .collect();

        let mut legs = Vec::new();
        for run in runs {
            let times: Vec<Option<TimeOfDay>> = columns
                .clone()
                .map(|column| row_cell(run, column).to_time_of_day())
                .collect();

            for (i, pair) in times.windows(2).enumerate() {
                let [Some(departure), Some(arrival)] = pair else {
                    continue;
                };
                legs.push(Leg::new(
                    key,
                    stations[i].clone(),
                    departure.clone(),
                    stations[i + 1].clone(),
                    arrival.clone(),
                ));
            }
        }

        legs
    }
}

/// The station named by a header cell, or a positional placeholder.
fn station_name(cell: &Cell, column: usize) -> StationName {
    let name = StationName::new(&cell.as_text());
    if name.is_empty() {
        StationName::placeholder(column)
    } else {
        name
    }
}

fn has_label_column(runs: &[Vec<Cell>]) -> bool {
    let col0_has_time = runs.iter().any(|run| row_cell(run, 0).is_time_like());
    let elsewhere_has_time = runs
        .iter()
        .any(|run| run.iter().skip(1).any(Cell::is_time_like));
    !col0_has_time && elsewhere_has_time
}
