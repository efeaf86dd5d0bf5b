#[cfg(test)]
mod tests {
    use crate::timezone::*;
    use bookline_common::BooklineError;
    use chrono::{NaiveDate, TimeZone, Timelike};
    use chrono_tz::Tz;

    #[test]
    fn test_validate_accepts_only_the_four_us_zones() {
        assert!(validate("America/New_York"));
        assert!(validate("America/Chicago"));
        assert!(validate("America/Denver"));
        assert!(validate("America/Los_Angeles"));

        assert!(!validate("Europe/London"));
        assert!(!validate("America/Phoenix"));
        assert!(!validate("america/new_york"));
        assert!(!validate(" America/New_York"));
        assert!(!validate(""));
    }

    #[test]
    fn test_timezone_id_parse_reports_invalid_timezone() {
        let id = TimeZoneId::parse(Some("America/Denver")).unwrap();
        assert_eq!(id.name(), "America/Denver");
        assert_eq!(id.tz(), Tz::America__Denver);

        assert!(matches!(
            TimeZoneId::parse(Some("Europe/London")),
            Err(BooklineError::InvalidTimezone(_))
        ));
        assert!(matches!(
            TimeZoneId::parse(None),
            Err(BooklineError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_naive_input_is_wall_clock_in_caller_zone() {
        let parsed = parse_instant("2024-01-01T09:00", Tz::America__New_York).unwrap();
        assert!(parsed.has_time);
        assert_eq!(
            parsed.instant,
            Tz::America__New_York
                .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
                .unwrap()
        );

        let spaced = parse_instant("2024-01-01 09:00:00", Tz::America__New_York).unwrap();
        assert_eq!(spaced.instant, parsed.instant);
    }

    #[test]
    fn test_offset_input_keeps_absolute_instant() {
        let parsed = parse_instant("2024-01-01T14:00:00Z", Tz::America__Chicago).unwrap();
        assert_eq!(parsed.instant.hour(), 8);
        assert_eq!(parsed.instant.timezone(), Tz::America__Chicago);
    }

    #[test]
    fn test_date_only_is_midnight_without_time() {
        let parsed = parse_instant("2024-03-15", Tz::America__Los_Angeles).unwrap();
        assert!(!parsed.has_time);
        assert_eq!(parsed.instant.hour(), 0);
        assert_eq!(parsed.instant.minute(), 0);
    }

    #[test]
    fn test_twelve_hour_clock_form() {
        let parsed = parse_instant("2024-01-01 02:30 PM", Tz::America__Denver).unwrap();
        assert_eq!(parsed.instant.hour(), 14);
        assert_eq!(parsed.instant.minute(), 30);
    }

    #[test]
    fn test_garbage_is_invalid_instant() {
        let err = parse_instant("next tuesday-ish", Tz::America__New_York).unwrap_err();
        assert!(matches!(err, BooklineError::InvalidInstant(_)));
    }

    #[test]
    fn test_convert_preserves_absolute_time() {
        let ledger = convert(
            "2024-01-01T09:00",
            Tz::America__New_York,
            Tz::Asia__Kolkata,
        )
        .unwrap();

        // 09:00 EST = 14:00 UTC = 19:30 IST
        assert_eq!(ledger.timezone(), Tz::Asia__Kolkata);
        assert_eq!((ledger.hour(), ledger.minute()), (19, 30));
        assert_eq!(
            ledger,
            Tz::America__New_York
                .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_spring_forward_gap_moves_forward_one_hour() {
        // 2024-03-10 02:30 does not exist in New York
        let naive = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let resolved = resolve_local(naive, Tz::America__New_York).unwrap();
        assert_eq!((resolved.hour(), resolved.minute()), (3, 30));
    }

    #[test]
    fn test_fall_back_ambiguity_takes_earlier_instant() {
        // 2024-11-03 01:30 happens twice in Chicago
        let naive = NaiveDate::from_ymd_opt(2024, 11, 3)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let resolved = resolve_local(naive, Tz::America__Chicago).unwrap();
        let later = resolved + chrono::Duration::hours(1);
        assert_eq!((later.hour(), later.minute()), (1, 30));
    }

    #[test]
    fn test_unmappable_time_at_calendar_limit_is_invalid_instant() {
        let err = parse_instant("+262142-12-31T23:30", Tz::America__New_York).unwrap_err();
        assert!(matches!(err, BooklineError::InvalidInstant(_)));

        let near_limit = parse_instant("+262142-12-30", Tz::America__New_York).unwrap_err();
        assert!(matches!(near_limit, BooklineError::InvalidInstant(_)));

        let naive = NaiveDate::MAX.and_hms_opt(23, 30, 0).unwrap();
        assert!(matches!(
            resolve_local(naive, Tz::America__New_York),
            Err(BooklineError::InvalidInstant(_))
        ));
    }

    #[test]
    fn test_end_of_day_is_last_second() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = end_of_day(date, Tz::America__New_York).unwrap();
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
    }
}
