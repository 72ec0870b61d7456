//! Unit tests for cs-schedule.

use cs_core::{Calendar, Tick};

use crate::{CronSchedule, Interval, Schedule, ScheduleError};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DAY: i64 = 86_400;

/// The first `n` fire times of `schedule` starting at `start`.
fn fires<S: Schedule>(schedule: &S, start: Tick, cal: &Calendar, n: usize) -> Vec<i64> {
    let mut out = Vec::with_capacity(n);
    let mut t = schedule.first_fire(start, cal).unwrap();
    for _ in 0..n {
        out.push(t.0);
        t = schedule.next_fire(t, cal).unwrap();
    }
    out
}

fn cron(expr: &str) -> CronSchedule {
    expr.parse().unwrap()
}

fn brussels() -> Calendar {
    Calendar::from_name("Europe/Brussels").unwrap()
}

// ── Interval ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod interval {
    use super::*;

    #[test]
    fn fires_at_start_then_every_period() {
        let every_minute = Interval::minutes(1).unwrap();
        assert_eq!(fires(&every_minute, Tick(0), &Calendar::utc(), 3), vec![0, 60, 120]);
    }

    #[test]
    fn units_add_up() {
        let i = Interval::new(5, 1, 1, 1).unwrap();
        assert_eq!(i.period_secs(), 5 + 60 + 3_600 + DAY);
        assert_eq!(i.to_string(), format!("every {}s", 5 + 60 + 3_600 + DAY));
    }

    #[test]
    fn non_positive_total_is_rejected() {
        assert!(matches!(Interval::new(0, 0, 0, 0), Err(ScheduleError::Config(_))));
        assert!(matches!(Interval::seconds(-5), Err(ScheduleError::Config(_))));
        // Negative parts are fine as long as the total is positive.
        assert_eq!(Interval::new(-30, 1, 0, 0).unwrap().period_secs(), 30);
    }

    #[test]
    fn next_fire_past_tick_range_is_an_error() {
        let i = Interval::days(365).unwrap();
        let last = Tick(i64::MAX - 10);
        assert!(matches!(i.next_fire(last, &Calendar::utc()), Err(ScheduleError::Config(_))));
    }

    #[test]
    fn interval_ignores_calendar() {
        let i = Interval::hours(1).unwrap();
        assert_eq!(fires(&i, Tick(1_616_893_200), &brussels(), 2), vec![1_616_893_200, 1_616_896_800]);
    }

    #[test]
    fn fire_count_over_horizon() {
        // Fire times strictly before T: floor((T - 1) / 60) + 1 for T > 0.
        let i = Interval::seconds(60).unwrap();
        let horizon = 3_600;
        let mut t = i.first_fire(Tick(0), &Calendar::utc()).unwrap();
        let mut count = 0;
        while t.0 < horizon {
            count += 1;
            t = i.next_fire(t, &Calendar::utc()).unwrap();
        }
        assert_eq!(count, 60);
    }
}

// ── Cron ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cron_parse {
    use super::*;

    #[test]
    fn expression_is_normalised() {
        let c: CronSchedule = "  */2   *  * * * ".parse().unwrap();
        assert_eq!(c.expression(), "*/2 * * * *");
        assert_eq!(c.to_string(), "cron(*/2 * * * *)");
    }

    #[test]
    fn builder_defaults_to_star() {
        let built = CronSchedule::builder().minute("*/5").hour("8-17").build().unwrap();
        assert_eq!(built, cron("*/5 8-17 * * *"));
    }

    #[test]
    fn out_of_range_names_the_field() {
        match "60 * * * *".parse::<CronSchedule>() {
            Err(ScheduleError::InvalidCron { field, .. }) => assert_eq!(field, "minute"),
            other => panic!("unexpected {other:?}"),
        }
        match CronSchedule::new("*", "*", "0", "*", "*") {
            Err(ScheduleError::InvalidCron { field, .. }) => assert_eq!(field, "day"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(CronSchedule::new("*", "*", "*", "13", "*").is_err());
        assert!(CronSchedule::new("*", "*", "*", "*", "8").is_err());
    }

    #[test]
    fn malformed_fields_are_rejected() {
        for bad in ["*/0 * * * *", "5-1 * * * *", "a * * * *", ", * * * *", "1-x * * * *"] {
            assert!(bad.parse::<CronSchedule>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn wrong_field_count_is_config_error() {
        assert!(matches!("* * *".parse::<CronSchedule>(), Err(ScheduleError::Config(_))));
        assert!(matches!("* * * * * *".parse::<CronSchedule>(), Err(ScheduleError::Config(_))));
    }
}

#[cfg(test)]
mod cron_fire {
    use super::*;

    #[test]
    fn every_two_minutes_from_epoch() {
        assert_eq!(fires(&cron("*/2 * * * *"), Tick(0), &Calendar::utc(), 3), vec![0, 120, 240]);
    }

    #[test]
    fn start_on_boundary_fires_at_start() {
        let c = cron("*/2 * * * *");
        assert_eq!(c.first_fire(Tick(240), &Calendar::utc()).unwrap(), Tick(240));
    }

    #[test]
    fn start_just_after_boundary_waits_for_next() {
        let c = cron("*/2 * * * *");
        assert_eq!(c.first_fire(Tick(1), &Calendar::utc()).unwrap(), Tick(120));
        assert_eq!(c.first_fire(Tick(119), &Calendar::utc()).unwrap(), Tick(120));
    }

    #[test]
    fn next_fire_is_strictly_later() {
        let c = cron("* * * * *");
        assert_eq!(c.next_fire(Tick(60), &Calendar::utc()).unwrap(), Tick(120));
        assert_eq!(c.next_fire(Tick(61), &Calendar::utc()).unwrap(), Tick(120));
    }

    #[test]
    fn lists_ranges_and_steps_combine() {
        let c = cron("1,2,10-12/2 * * * *");
        assert_eq!(fires(&c, Tick(0), &Calendar::utc(), 5), vec![60, 120, 600, 720, 3_660]);
    }

    #[test]
    fn number_with_step_runs_to_field_end() {
        let c = cron("50/5 * * * *");
        assert_eq!(fires(&c, Tick(0), &Calendar::utc(), 3), vec![3_000, 3_300, 3_600 + 3_000]);
    }

    #[test]
    fn hour_and_minute() {
        assert_eq!(fires(&cron("0 12 * * *"), Tick(0), &Calendar::utc(), 2), vec![43_200, 43_200 + DAY]);
    }

    #[test]
    fn weekday_zero_and_seven_are_sunday() {
        // 1970-01-01 was a Thursday; the first Sunday is the 4th.
        let sunday = 3 * DAY;
        assert_eq!(cron("0 0 * * 0").first_fire(Tick(0), &Calendar::utc()).unwrap(), Tick(sunday));
        assert_eq!(cron("0 0 * * 7").first_fire(Tick(0), &Calendar::utc()).unwrap(), Tick(sunday));
        assert_eq!(cron("0 0 * * 1").first_fire(Tick(0), &Calendar::utc()).unwrap(), Tick(4 * DAY));
    }

    #[test]
    fn restricted_day_and_weekday_match_either() {
        // Monday the 5th comes before the 15th.
        let c = cron("0 0 15 * 1");
        assert_eq!(fires(&c, Tick(0), &Calendar::utc(), 3), vec![4 * DAY, 11 * DAY, 14 * DAY]);
    }

    #[test]
    fn starred_weekday_leaves_day_of_month_alone() {
        let c = cron("0 0 13 * */2");
        assert_eq!(c.first_fire(Tick(0), &Calendar::utc()).unwrap(), Tick(12 * DAY));
    }

    #[test]
    fn month_rolls_over_year_end() {
        // 1970-12-01 00:00 UTC.
        let dec_first = 28_857_600;
        let c = cron("0 0 1 1 *");
        assert_eq!(c.first_fire(Tick(dec_first), &Calendar::utc()).unwrap(), Tick(31_536_000));
    }

    #[test]
    fn impossible_date_is_no_match() {
        let c = cron("0 0 30 2 *");
        assert!(matches!(c.first_fire(Tick(0), &Calendar::utc()), Err(ScheduleError::NoMatch(_))));
    }

    #[test]
    fn wall_clock_follows_run_timezone() {
        // 2021-01-01 00:00 UTC is 01:00 in Brussels.
        let c = cron("0 2 * * *");
        assert_eq!(c.first_fire(Tick(1_609_459_200), &brussels()).unwrap(), Tick(1_609_459_200 + 3_600));
    }

    #[test]
    fn dst_gap_is_skipped() {
        // 02:30 does not exist in Brussels on 2021-03-28.
        let c = cron("30 2 * * *");
        let mar_27 = 1_616_808_600; // 02:30 CET
        assert_eq!(c.next_fire(Tick(mar_27), &brussels()).unwrap(), Tick(1_616_977_800));
    }

    #[test]
    fn dst_fold_uses_earliest_and_stays_increasing() {
        let c = cron("30 2 * * *");
        let oct_31_cest = 1_635_640_200;
        assert_eq!(c.next_fire(Tick(oct_31_cest - DAY), &brussels()).unwrap(), Tick(oct_31_cest));
        assert_eq!(c.next_fire(Tick(oct_31_cest), &brussels()).unwrap(), Tick(1_635_730_200));

        let every_minute = cron("* * * * *");
        let times = fires(&every_minute, Tick(oct_31_cest - 3_600), &brussels(), 200);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }
}

// ── WakeQueue ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wake_queue {
    use cs_core::{ProcessId, SimInstant};

    use crate::WakeQueue;

    fn at(subticks: i64) -> SimInstant {
        SimInstant(subticks)
    }

    #[test]
    fn pops_in_instant_then_insertion_order() {
        let mut q = WakeQueue::new();
        q.push(at(20), ProcessId(0));
        q.push(at(10), ProcessId(1));
        q.push(at(10), ProcessId(2));
        assert_eq!(q.len(), 3);
        assert_eq!(q.instant_count(), 2);

        let limit = at(100);
        assert_eq!(q.pop_before(limit), Some((at(10), ProcessId(1))));
        assert_eq!(q.pop_before(limit), Some((at(10), ProcessId(2))));
        assert_eq!(q.pop_before(limit), Some((at(20), ProcessId(0))));
        assert_eq!(q.pop_before(limit), None);
        assert!(q.is_empty());
    }

    #[test]
    fn limit_is_exclusive() {
        let mut q = WakeQueue::new();
        q.push(at(50), ProcessId(3));
        assert_eq!(q.pop_before(at(50)), None);
        assert_eq!(q.next_instant(), Some(at(50)));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_before(at(51)), Some((at(50), ProcessId(3))));
    }

    #[test]
    fn same_process_may_appear_twice() {
        let mut q = WakeQueue::new();
        q.push(at(1), ProcessId(0));
        q.push(at(2), ProcessId(0));
        assert_eq!(q.len(), 2);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.next_instant(), None);
    }
}
