//! Integration test for the full schedule flow: CSV file on disk, parsed
//! schedule, resolver decisions across a week of instants.

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
    use chrono_tz::America::New_York;
    use outreach_scheduling::{SendDecision, SendWindowResolver, WeeklySchedule};

    /// Business-hours schedule: weekdays 09:00-12:00 and 13:00-17:00.
    fn business_hours_csv() -> String {
        let mut csv = String::from("DAY,START_TIME,END_TIME\n");
        for day in 0..5 {
            csv.push_str(&format!("{day},09:00,12:00\n"));
            csv.push_str(&format!("{day},13:00,17:00\n"));
        }
        csv
    }

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{name}-{}.csv", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_schedule_from_file() {
        let path = write_temp_csv("outreach-business-hours", &business_hours_csv());
        let schedule = WeeklySchedule::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(schedule.interval_count(), 10);
        assert_eq!(schedule.intervals_for(Weekday::Fri).len(), 2);
        assert!(schedule.intervals_for(Weekday::Sat).is_empty());
        assert!(schedule.intervals_for(Weekday::Sun).is_empty());
    }

    #[test]
    fn test_load_missing_file_errors() {
        let path = std::env::temp_dir().join("outreach-no-such-schedule.csv");
        assert!(WeeklySchedule::load(&path).is_err());
    }

    #[test]
    fn test_week_of_decisions_lands_inside_business_hours() {
        let schedule = WeeklySchedule::parse_csv(&business_hours_csv()).unwrap();
        let resolver = SendWindowResolver::new(schedule, "America/New_York").unwrap();

        // Sweep hourly instants across a full week starting Monday
        // 2025-06-02 00:00 New York time.
        let start = New_York
            .with_ymd_and_hms(2025, 6, 2, 0, 0, 0)
            .unwrap()
            .with_timezone(&Utc);

        for hour in 0..(7 * 24) {
            let now: DateTime<Utc> = start + Duration::hours(hour);
            let local_now = now.with_timezone(&New_York);

            match resolver.decide_at(now) {
                SendDecision::SendNow => {
                    let t = local_now.time();
                    let in_morning = t >= NaiveTime::from_hms_opt(9, 0, 0).unwrap()
                        && t < NaiveTime::from_hms_opt(12, 0, 0).unwrap();
                    let in_afternoon = t >= NaiveTime::from_hms_opt(13, 0, 0).unwrap()
                        && t < NaiveTime::from_hms_opt(17, 0, 0).unwrap();
                    assert!(
                        (in_morning || in_afternoon)
                            && local_now.weekday().num_days_from_monday() < 5,
                        "SendNow outside business hours at {local_now}"
                    );
                }
                SendDecision::SendAt(at) => {
                    assert!(at > now, "scheduled instant {at} is not in the future of {now}");
                    let local_at = at.with_timezone(&New_York);
                    let t = local_at.time();
                    assert!(
                        local_at.weekday().num_days_from_monday() < 5,
                        "scheduled onto a weekend: {local_at}"
                    );
                    assert!(
                        (t >= NaiveTime::from_hms_opt(9, 0, 0).unwrap()
                            && t <= NaiveTime::from_hms_opt(12, 0, 0).unwrap())
                            || (t >= NaiveTime::from_hms_opt(13, 0, 0).unwrap()
                                && t <= NaiveTime::from_hms_opt(17, 0, 0).unwrap()),
                        "scheduled outside any window: {local_at}"
                    );
                }
                SendDecision::NoWindowAvailable => {
                    // Only reachable on Fridays after 17:00 would roll to
                    // Monday, so a full business-hours week never gets here.
                    panic!("no window found at {local_now}");
                }
            }
        }
    }

    #[test]
    fn test_single_window_week_boundary() {
        // Sunday-only schedule queried on Sunday after the window: every
        // other day is empty and the same Sunday next week is out of reach.
        let schedule =
            WeeklySchedule::parse_csv("DAY,START_TIME,END_TIME\n6,08:00,09:00\n").unwrap();
        let resolver = SendWindowResolver::new(schedule, "America/New_York").unwrap();

        // 2025-06-08 is a Sunday.
        let sunday_noon = New_York
            .with_ymd_and_hms(2025, 6, 8, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            resolver.decide_at(sunday_noon),
            SendDecision::NoWindowAvailable
        );

        // Saturday still reaches it one day ahead.
        let saturday_noon = New_York
            .with_ymd_and_hms(2025, 6, 7, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        match resolver.decide_at(saturday_noon) {
            SendDecision::SendAt(at) => {
                let local = at.with_timezone(&New_York);
                assert_eq!(local.weekday(), Weekday::Sun);
            }
            other => panic!("expected SendAt, got {other:?}"),
        }
    }
}
