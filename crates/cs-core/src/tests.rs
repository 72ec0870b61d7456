//! Unit tests for cs-core primitives.

#[cfg(test)]
mod ids {
    use crate::ProcessId;

    #[test]
    fn index_roundtrip() {
        let id = ProcessId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ProcessId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(ProcessId(0) < ProcessId(1));
        assert!(ProcessId(100) > ProcessId(99));
    }

    #[test]
    fn display() {
        assert_eq!(ProcessId(7).to_string(), "ProcessId(7)");
    }
}

#[cfg(test)]
mod time {
    use chrono::{Duration, NaiveDate, TimeZone};
    use chrono_tz::Tz;

    use crate::{Calendar, CoreError, SUBTICKS_PER_TICK, SimInstant, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(100);
        assert_eq!(t + 5, Tick(105));
        assert_eq!(t - 5, Tick(95));
        assert_eq!(Tick(105) - t, 5);
        assert_eq!(t.since(Tick(140)), -40);
        assert_eq!(t.to_string(), "T100");
    }

    #[test]
    fn instant_floor_and_phase() {
        let i = SimInstant::at_tick(Tick(10)).after_subticks(5_000);
        assert_eq!(i.tick(), Tick(10));
        assert_eq!(i.phase(), 5_000);
        assert_eq!(i.to_string(), "T10.005000");
    }

    #[test]
    fn instant_floor_is_euclidean_for_negative_ticks() {
        let i = SimInstant::at_tick(Tick(-1)).after_subticks(10);
        assert_eq!(i.tick(), Tick(-1));
        assert_eq!(i.phase(), 10);
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        assert_eq!(Tick(100).checked_add(5), Some(Tick(105)));
        assert_eq!(Tick(100).checked_add(i64::MAX), None);
        assert_eq!(SimInstant::checked_at_tick(Tick(7)), Some(SimInstant(7 * SUBTICKS_PER_TICK)));
        assert_eq!(SimInstant::checked_at_tick(Tick(10_000_000_000_000)), None);
        assert_eq!(SimInstant::checked_at_tick(Tick(-10_000_000_000_000)), None);
    }

    #[test]
    fn after_ticks_keeps_phase() {
        let i = SimInstant(7 * SUBTICKS_PER_TICK + 995_000);
        let j = i.after_ticks(60);
        assert_eq!(j.tick(), Tick(67));
        assert_eq!(j.phase(), 995_000);
    }

    #[test]
    fn delay_conversion_rejects_negative_and_nan() {
        assert_eq!(SimInstant::delay_to_subticks(0.005).unwrap(), 5_000);
        assert_eq!(SimInstant::delay_to_subticks(0.0).unwrap(), 0);
        assert!(matches!(SimInstant::delay_to_subticks(-0.5), Err(CoreError::InvalidDelay(_))));
        assert!(SimInstant::delay_to_subticks(f64::NAN).is_err());
        assert!(SimInstant::delay_to_subticks(f64::INFINITY).is_err());
    }

    #[test]
    fn calendar_round_trip_whole_seconds() {
        let cal = Calendar::from_name("Europe/Brussels").unwrap();
        for secs in [0_i64, 1_609_459_200, 1_616_893_199, 1_616_893_200, 1_635_642_000, -86_400] {
            let dt = cal.to_datetime(Tick(secs)).unwrap();
            assert_eq!(cal.to_tick(&dt).unwrap(), Tick(secs), "round trip of {secs}");
        }
    }

    #[test]
    fn calendar_rejects_foreign_timezone() {
        let cal = Calendar::utc();
        let dt = Tz::Europe__Brussels.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(cal.to_tick(&dt), Err(CoreError::Config(_))));
    }

    #[test]
    fn unknown_timezone_is_config_error() {
        assert!(matches!(Calendar::from_name("Mars/Olympus"), Err(CoreError::Config(_))));
    }

    #[test]
    fn local_to_tick_handles_dst_gap_and_fold() {
        let cal = Calendar::from_name("Europe/Brussels").unwrap();
        // 2021-03-28 02:30 does not exist in Brussels.
        let gap = NaiveDate::from_ymd_opt(2021, 3, 28).unwrap().and_hms_opt(2, 30, 0).unwrap();
        assert_eq!(cal.local_to_tick(&gap), None);
        // 2021-10-31 02:30 happens twice; the earliest is CEST (UTC+2).
        let fold = NaiveDate::from_ymd_opt(2021, 10, 31).unwrap().and_hms_opt(2, 30, 0).unwrap();
        assert_eq!(cal.local_to_tick(&fold), Some(Tick(1_635_640_200)));
    }

    #[test]
    fn span_truncates_to_whole_seconds() {
        assert_eq!(Calendar::span_to_ticks(Duration::minutes(2)), 120);
        assert_eq!(Calendar::span_to_ticks(Duration::milliseconds(2_900)), 2);
    }

    #[test]
    fn format_is_rfc3339_in_run_timezone() {
        let cal = Calendar::from_name("Europe/Brussels").unwrap();
        assert_eq!(cal.format(Tick(1_609_459_200)).unwrap(), "2021-01-01T01:00:00+01:00");
    }
}

#[cfg(test)]
mod value {
    use crate::Value;

    #[test]
    fn infer_prefers_bool_int_float_then_string() {
        assert_eq!(Value::infer("true"), Value::Bool(true));
        assert_eq!(Value::infer(" 42 "), Value::Int(42));
        assert_eq!(Value::infer("4.5"), Value::Float(4.5));
        assert_eq!(Value::infer("on"), Value::Str("on".into()));
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::from(3).as_f64(), Some(3.0));
        assert_eq!(Value::from(2.5).as_i64(), None);
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(true).kind(), "bool");
    }

    #[test]
    fn display_is_plain() {
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from("abc").to_string(), "abc");
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, RunConfig, StartAt, Tick};

    #[test]
    fn default_starts_at_epoch_in_utc() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.start_tick().unwrap(), Tick(0));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rfc3339_start() {
        let cfg = RunConfig { start: StartAt::Text("2021-01-01T00:00:00Z".into()), ..RunConfig::default() };
        assert_eq!(cfg.start_tick().unwrap(), Tick(1_609_459_200));
    }

    #[test]
    fn naive_start_uses_run_timezone() {
        let cfg = RunConfig {
            start:    StartAt::Text("2021-01-01T01:00:00".into()),
            timezone: "Europe/Brussels".into(),
            ..RunConfig::default()
        };
        assert_eq!(cfg.start_tick().unwrap(), Tick(1_609_459_200));
    }

    #[test]
    fn garbage_start_is_config_error() {
        let cfg = RunConfig { start: StartAt::Text("yesterday".into()), ..RunConfig::default() };
        assert!(matches!(cfg.start_tick(), Err(CoreError::Config(_))));
    }

    #[test]
    fn negative_duration_fails_validation() {
        let cfg = RunConfig { duration_secs: -1, ..RunConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_and_name_same_stream() {
        let mut a = SimRng::for_entity(7, "inputs");
        let mut b = SimRng::for_entity(7, "inputs");
        let xs: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn different_names_diverge() {
        let mut a = SimRng::for_entity(7, "inputs");
        let mut b = SimRng::for_entity(7, "sensor");
        let xs: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn gen_range_stays_in_bounds() {
        let mut r = SimRng::new(1);
        for _ in 0..100 {
            let n: i64 = r.gen_range(0..100);
            assert!((0..100).contains(&n));
        }
    }
}
