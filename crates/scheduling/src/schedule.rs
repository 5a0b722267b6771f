//! Weekly schedule — per-weekday allowed send intervals parsed from CSV.

use std::path::Path;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading a schedule or building a resolver on top
/// of one.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule header is missing column {0:?}")]
    MissingColumn(&'static str),

    #[error("schedule line {line}: expected {expected} fields, got {got}")]
    ShortRow {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("schedule line {line}: invalid day {value:?} (expected an integer)")]
    InvalidDay { line: usize, value: String },

    #[error("schedule line {line}: day {day} out of range (0 = Monday .. 6 = Sunday)")]
    DayOutOfRange { line: usize, day: i64 },

    #[error("schedule line {line}: invalid time {value:?} (expected HH:MM)")]
    InvalidTime { line: usize, value: String },

    #[error("schedule line {line}: interval start {start} is not before end {end}")]
    InvertedInterval {
        line: usize,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("unknown timezone {0:?} (expected an IANA name such as America/New_York)")]
    InvalidTimezone(String),

    #[error("failed to read schedule file: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A clock-time range within a single day during which sending is allowed.
///
/// Containment is half-open: `start` is inside, `end` is not. Intervals
/// never cross midnight; a window that spans it is written as two rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeInterval {
    /// Build an interval, rejecting `start >= end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Whether `t` falls inside `[start, end)`.
    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t < self.end
    }
}

/// Allowed send intervals for each day of the week.
///
/// Days are Monday-indexed (0 = Monday .. 6 = Sunday) and each day's
/// intervals are kept sorted ascending by start time. Overlapping
/// intervals on the same day are tolerated; resolution only ever takes
/// the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: [Vec<TimeInterval>; 7],
}

impl WeeklySchedule {
    /// Parse CSV text with a `DAY,START_TIME,END_TIME` header row.
    ///
    /// Columns are located by header name, so column order does not
    /// matter and extra columns are ignored. Fields are trimmed. Blank
    /// lines are skipped; any other malformed row fails the whole parse.
    pub fn parse_csv(data: &str) -> Result<Self, ScheduleError> {
        let mut lines = data
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines.next().ok_or(ScheduleError::MissingColumn("DAY"))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let day_col = find_column(&columns, "DAY")?;
        let start_col = find_column(&columns, "START_TIME")?;
        let end_col = find_column(&columns, "END_TIME")?;
        let width = columns.len();

        let mut schedule = Self::default();
        for (idx, row) in lines {
            let line = idx + 1;
            let fields: Vec<&str> = row.split(',').map(str::trim).collect();
            if fields.len() < width {
                return Err(ScheduleError::ShortRow {
                    line,
                    expected: width,
                    got: fields.len(),
                });
            }

            let day = parse_day(fields[day_col], line)?;
            let start = parse_clock_time(fields[start_col], line)?;
            let end = parse_clock_time(fields[end_col], line)?;
            let interval = TimeInterval::new(start, end)
                .ok_or(ScheduleError::InvertedInterval { line, start, end })?;

            schedule.days[day].push(interval);
        }

        for day in &mut schedule.days {
            day.sort_by_key(|iv| iv.start);
        }

        tracing::debug!(
            intervals = schedule.interval_count(),
            "parsed weekly schedule"
        );
        Ok(schedule)
    }

    /// Read and parse a schedule CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let data = std::fs::read_to_string(path)?;
        Self::parse_csv(&data)
    }

    /// Intervals allowed on `weekday`, sorted ascending by start time.
    pub fn intervals_for(&self, weekday: Weekday) -> &[TimeInterval] {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    /// Insert an interval directly, keeping the day's list sorted.
    pub fn add(&mut self, weekday: Weekday, interval: TimeInterval) {
        let day = &mut self.days[weekday.num_days_from_monday() as usize];
        day.push(interval);
        day.sort_by_key(|iv| iv.start);
    }

    /// True when no day has any interval.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    /// Total number of intervals across the week.
    pub fn interval_count(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    pub(crate) fn intervals_for_index(&self, day: usize) -> &[TimeInterval] {
        &self.days[day]
    }
}

fn find_column(columns: &[&str], name: &'static str) -> Result<usize, ScheduleError> {
    columns
        .iter()
        .position(|c| *c == name)
        .ok_or(ScheduleError::MissingColumn(name))
}

fn parse_day(field: &str, line: usize) -> Result<usize, ScheduleError> {
    let day: i64 = field.parse().map_err(|_| ScheduleError::InvalidDay {
        line,
        value: field.to_string(),
    })?;
    if !(0..7).contains(&day) {
        return Err(ScheduleError::DayOutOfRange { line, day });
    }
    Ok(day as usize)
}

fn parse_clock_time(field: &str, line: usize) -> Result<NaiveTime, ScheduleError> {
    let invalid = || ScheduleError::InvalidTime {
        line,
        value: field.to_string(),
    };
    let (hour, minute) = field.split_once(':').ok_or_else(invalid)?;
    let hour: u32 = hour.trim().parse().map_err(|_| invalid())?;
    let minute: u32 = minute.trim().parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    const BASIC_CSV: &str = "\
DAY,START_TIME,END_TIME
0,09:00,12:00
0,13:00,15:00
1,10:00,14:00
";

    // 1. Parsing ------------------------------------------------------------

    #[test]
    fn test_parse_basic_schedule() {
        let schedule = WeeklySchedule::parse_csv(BASIC_CSV).unwrap();

        let monday = schedule.intervals_for(Weekday::Mon);
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0], TimeInterval::new(t(9, 0), t(12, 0)).unwrap());
        assert_eq!(monday[1], TimeInterval::new(t(13, 0), t(15, 0)).unwrap());

        let tuesday = schedule.intervals_for(Weekday::Tue);
        assert_eq!(tuesday.len(), 1);
        assert_eq!(tuesday[0], TimeInterval::new(t(10, 0), t(14, 0)).unwrap());

        for weekday in [
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert!(schedule.intervals_for(weekday).is_empty());
        }
        assert_eq!(schedule.interval_count(), 3);
    }

    #[test]
    fn test_rows_sorted_by_start_within_day() {
        let csv = "\
DAY,START_TIME,END_TIME
2,14:00,16:00
2,08:30,09:30
2,10:00,11:00
";
        let schedule = WeeklySchedule::parse_csv(csv).unwrap();
        let starts: Vec<NaiveTime> = schedule
            .intervals_for(Weekday::Wed)
            .iter()
            .map(|iv| iv.start)
            .collect();
        assert_eq!(starts, vec![t(8, 30), t(10, 0), t(14, 0)]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let csv = "DAY, START_TIME, END_TIME\n 0 , 10:00 , 11:00 \n";
        let schedule = WeeklySchedule::parse_csv(csv).unwrap();
        assert_eq!(
            schedule.intervals_for(Weekday::Mon),
            &[TimeInterval::new(t(10, 0), t(11, 0)).unwrap()]
        );
    }

    #[test]
    fn test_columns_located_by_header_name() {
        let csv = "\
END_TIME,DAY,START_TIME
17:00,4,09:00
";
        let schedule = WeeklySchedule::parse_csv(csv).unwrap();
        assert_eq!(
            schedule.intervals_for(Weekday::Fri),
            &[TimeInterval::new(t(9, 0), t(17, 0)).unwrap()]
        );
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = "DAY,START_TIME,END_TIME\n\n0,10:00,11:00\n\n";
        let schedule = WeeklySchedule::parse_csv(csv).unwrap();
        assert_eq!(schedule.interval_count(), 1);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = WeeklySchedule::parse_csv(BASIC_CSV).unwrap();
        let b = WeeklySchedule::parse_csv(BASIC_CSV).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_add_keeps_day_sorted() {
        let mut schedule = WeeklySchedule::default();
        schedule.add(Weekday::Thu, TimeInterval::new(t(14, 0), t(16, 0)).unwrap());
        schedule.add(Weekday::Thu, TimeInterval::new(t(9, 0), t(10, 0)).unwrap());

        let thursday = schedule.intervals_for(Weekday::Thu);
        assert_eq!(thursday[0].start, t(9, 0));
        assert_eq!(thursday[1].start, t(14, 0));
        assert!(!schedule.is_empty());
    }

    // 2. Rejected input -----------------------------------------------------

    #[test]
    fn test_missing_column_rejected() {
        let err = WeeklySchedule::parse_csv("DAY,START_TIME\n0,10:00\n").unwrap_err();
        assert!(matches!(err, ScheduleError::MissingColumn("END_TIME")));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(WeeklySchedule::parse_csv("").is_err());
    }

    #[test]
    fn test_short_row_rejected() {
        let err = WeeklySchedule::parse_csv("DAY,START_TIME,END_TIME\n0,10:00\n").unwrap_err();
        assert!(matches!(err, ScheduleError::ShortRow { line: 2, .. }));
    }

    #[test]
    fn test_non_numeric_day_rejected() {
        let err =
            WeeklySchedule::parse_csv("DAY,START_TIME,END_TIME\nmonday,10:00,11:00\n").unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDay { line: 2, .. }));
    }

    #[test]
    fn test_day_out_of_range_rejected() {
        let err =
            WeeklySchedule::parse_csv("DAY,START_TIME,END_TIME\n7,10:00,11:00\n").unwrap_err();
        assert!(matches!(err, ScheduleError::DayOutOfRange { day: 7, .. }));

        let err =
            WeeklySchedule::parse_csv("DAY,START_TIME,END_TIME\n-1,10:00,11:00\n").unwrap_err();
        assert!(matches!(err, ScheduleError::DayOutOfRange { day: -1, .. }));
    }

    #[test]
    fn test_bad_clock_times_rejected() {
        for bad in ["25:00", "10:75", "10.30", "1000", "10:00:30", ""] {
            let csv = format!("DAY,START_TIME,END_TIME\n0,{bad},11:00\n");
            let err = WeeklySchedule::parse_csv(&csv).unwrap_err();
            assert!(
                matches!(err, ScheduleError::InvalidTime { .. }),
                "expected InvalidTime for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_inverted_interval_rejected() {
        let err =
            WeeklySchedule::parse_csv("DAY,START_TIME,END_TIME\n0,14:00,10:00\n").unwrap_err();
        assert!(matches!(err, ScheduleError::InvertedInterval { .. }));

        // Zero-width intervals are inverted too.
        let err =
            WeeklySchedule::parse_csv("DAY,START_TIME,END_TIME\n0,10:00,10:00\n").unwrap_err();
        assert!(matches!(err, ScheduleError::InvertedInterval { .. }));
    }

    // 3. Containment --------------------------------------------------------

    #[test]
    fn test_interval_containment_is_half_open() {
        let iv = TimeInterval::new(t(9, 0), t(12, 0)).unwrap();
        assert!(iv.contains(t(9, 0)));
        assert!(iv.contains(t(11, 59)));
        assert!(!iv.contains(t(12, 0)));
        assert!(!iv.contains(t(8, 59)));
    }

    #[test]
    fn test_empty_schedule_reports_empty() {
        let schedule = WeeklySchedule::parse_csv("DAY,START_TIME,END_TIME\n").unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.interval_count(), 0);
    }
}
