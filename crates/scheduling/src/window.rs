//! Send-window resolution — decides whether a message goes out now or at a
//! jittered instant inside the next allowed window.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use rand::Rng;
use tracing::{debug, info};

use crate::schedule::{ScheduleError, TimeInterval, WeeklySchedule};

/// Outcome of a send-window query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendDecision {
    /// The instant falls inside an allowed interval; send immediately.
    SendNow,
    /// Hold the message and send it at this instant.
    SendAt(DateTime<Utc>),
    /// The schedule has no interval on any day; the message cannot be
    /// scheduled at all.
    NoWindowAvailable,
}

/// Resolves send instants against a weekly schedule in a recipient's
/// timezone.
///
/// A query is a function of the schedule, the timezone, and the queried
/// instant only (plus the jitter draw); the resolver holds no mutable
/// state and can be shared freely.
#[derive(Debug, Clone)]
pub struct SendWindowResolver {
    schedule: WeeklySchedule,
    tz: Tz,
}

impl SendWindowResolver {
    /// Build a resolver for `timezone`, an IANA name such as
    /// `America/Los_Angeles`.
    pub fn new(schedule: WeeklySchedule, timezone: &str) -> Result<Self, ScheduleError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| ScheduleError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { schedule, tz })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    /// Decide against the real clock.
    pub fn decide(&self) -> SendDecision {
        self.decide_at(Utc::now())
    }

    /// Decide as of `now`.
    ///
    /// The instant is localized to the resolver's timezone before any
    /// weekday or clock-time comparison, so a schedule written for a
    /// recipient in Los Angeles behaves the same wherever the caller
    /// runs.
    pub fn decide_at(&self, now: DateTime<Utc>) -> SendDecision {
        let local = now.with_timezone(&self.tz);
        let weekday = local.weekday().num_days_from_monday() as usize;
        let now_time = local.time();

        // Today first: an interval containing `now` wins outright;
        // otherwise the earliest interval still ahead of `now` becomes
        // the candidate. Lists are sorted, so the first match is the
        // earliest.
        let mut candidate: Option<(TimeInterval, i64)> = None;
        for interval in self.schedule.intervals_for_index(weekday) {
            if interval.contains(now_time) {
                debug!(timezone = %self.tz, local = %local, "inside send window");
                return SendDecision::SendNow;
            }
            if interval.start > now_time {
                candidate = Some((*interval, 0));
                break;
            }
        }

        // Nothing left today: scan tomorrow through six days out and take
        // the first day with any interval. A schedule whose only windows
        // are earlier today therefore yields no window at all rather than
        // wrapping around to the same weekday next week.
        if candidate.is_none() {
            for offset in 1..7 {
                let day = (weekday + offset) % 7;
                if let Some(interval) = self.schedule.intervals_for_index(day).first() {
                    candidate = Some((*interval, offset as i64));
                    break;
                }
            }
        }

        let Some((interval, add_days)) = candidate else {
            info!(timezone = %self.tz, "no allowed send window in schedule");
            return SendDecision::NoWindowAvailable;
        };

        let send_time = draw_in_interval(&interval);
        let date = local.date_naive() + Duration::days(add_days);
        let target = resolve_wall_time(self.tz, date.and_time(send_time));
        debug!(
            timezone = %self.tz,
            target = %target,
            days_ahead = add_days,
            "scheduled send inside next window"
        );
        SendDecision::SendAt(target.with_timezone(&Utc))
    }
}

/// Draw a random send time inside `interval`, truncated to the minute.
///
/// The draw range is inclusive of the interval end even though
/// containment is half-open, so a scheduled send can land exactly on
/// `end`.
fn draw_in_interval(interval: &TimeInterval) -> NaiveTime {
    let start_secs = interval.start.num_seconds_from_midnight();
    let end_secs = interval.end.num_seconds_from_midnight();
    let secs = rand::thread_rng().gen_range(start_secs..=end_secs);
    NaiveTime::from_hms_opt(secs / 3600, (secs % 3600) / 60, 0).unwrap_or_default()
}

/// Map a wall-clock datetime onto a real instant in `tz`.
///
/// Ambiguous wall times (clocks rolled back) take the earlier mapping.
/// Nonexistent wall times (clocks sprang forward over them) are nudged
/// later until they exist.
fn resolve_wall_time(tz: Tz, wall: NaiveDateTime) -> DateTime<Tz> {
    let mut cursor = wall;
    loop {
        match tz.from_local_datetime(&cursor) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earlier, _) => return earlier,
            LocalResult::None => cursor += Duration::minutes(30),
        }
    }
}
