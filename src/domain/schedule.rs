use serde::Serialize;

use crate::domain::csv::CsvRow;

/// One published schedule entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleItem {
    pub day: String,
    pub time: String,
    pub location: String,
}

impl ScheduleItem {
    pub fn new(day: impl Into<String>, time: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            time: time.into(),
            location: location.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.day.is_empty() && self.time.is_empty() && self.location.is_empty()
    }
}

/// Column positions resolved from the header row.
///
/// `None` means the header was not found; projection then falls back to the
/// column's conventional position (day = 0, time = 1, location = 2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleColumns {
    pub day: Option<usize>,
    pub time: Option<usize>,
    pub location: Option<usize>,
}

impl ScheduleColumns {
    const DAY_FALLBACK: usize = 0;
    const TIME_FALLBACK: usize = 1;
    const LOCATION_FALLBACK: usize = 2;

    /// Locate `day`, `time` and `location`, ignoring case and whitespace.
    pub fn resolve(header: &CsvRow) -> Self {
        let headers = header.normalized_headers();
        let position = |name: &str| headers.iter().position(|h| h == name);

        Self {
            day: position("day"),
            time: position("time"),
            location: position("location"),
        }
    }

    /// Project a data row into a `ScheduleItem`; `None` for separator rows
    /// whose three values are all empty.
    pub fn project(&self, row: &CsvRow) -> Option<ScheduleItem> {
        let item = ScheduleItem::new(
            row.get(self.day.unwrap_or(Self::DAY_FALLBACK)),
            row.get(self.time.unwrap_or(Self::TIME_FALLBACK)),
            row.get(self.location.unwrap_or(Self::LOCATION_FALLBACK)),
        );

        if item.is_blank() {
            None
        } else {
            Some(item)
        }
    }
}

/// Treat the first row as the header and project the rest, in order.
pub fn schedule_from_rows(rows: &[CsvRow]) -> Vec<ScheduleItem> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    let columns = ScheduleColumns::resolve(header);
    data.iter().filter_map(|row| columns.project(row)).collect()
}
