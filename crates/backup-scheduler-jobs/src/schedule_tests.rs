use super::*;
use chrono::{Duration, Utc};

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn next(expr: &str, after: &str) -> DateTime<Utc> {
    ScheduleHandle::parse(expr)
        .unwrap()
        .next_after(&at(after))
        .unwrap()
}

#[test]
fn test_normalize_five_fields() {
    assert_eq!(normalize("0 2 * * *").unwrap(), "0 0 2 * * *");
    assert_eq!(normalize("*/15 * * * *").unwrap(), "0 */15 * * * *");
}

#[test]
fn test_normalize_six_fields_keeps_seconds() {
    assert_eq!(normalize("30 0 2 * * *").unwrap(), "30 0 2 * * *");
}

#[test]
fn test_normalize_day_of_week() {
    assert_eq!(normalize("0 0 * * 0").unwrap(), "0 0 0 * * 1");
    assert_eq!(normalize("0 0 * * 7").unwrap(), "0 0 0 * * 1");
    assert_eq!(normalize("0 0 * * 1-5").unwrap(), "0 0 0 * * 2-6");
    assert_eq!(normalize("0 0 * * 1,3,6").unwrap(), "0 0 0 * * 2,4,7");
    assert_eq!(normalize("0 0 * * 5-7").unwrap(), "0 0 0 * * 6-7,1");
    assert_eq!(normalize("0 0 * * */2").unwrap(), "0 0 0 * * */2");
    assert_eq!(normalize("0 0 * * MON-FRI").unwrap(), "0 0 0 * * MON-FRI");
}

#[test]
fn test_normalize_descriptor_passthrough() {
    assert_eq!(normalize(" @daily ").unwrap(), "@daily");
}

#[test]
fn test_normalize_rejects_wrong_field_count() {
    assert!(normalize("* * * *").is_err());
    assert!(normalize("0 0 0 1 1 * 2030 extra").is_err());
    assert!(normalize("   ").is_err());
}

#[test]
fn test_daily_at_two() {
    assert_eq!(
        next("0 2 * * *", "2024-01-01T00:00:00Z"),
        at("2024-01-01T02:00:00Z")
    );
    assert_eq!(
        next("0 2 * * *", "2024-01-01T02:00:00Z"),
        at("2024-01-02T02:00:00Z")
    );
}

#[test]
fn test_every_minute_fires_within_sixty_seconds() {
    let handle = ScheduleHandle::parse("* * * * *").unwrap();
    for start in [
        "2024-03-10T10:15:30Z",
        "2024-03-10T10:15:00Z",
        "2024-12-31T23:59:59Z",
    ] {
        let from = at(start);
        let fire = handle.next_after(&from).unwrap();
        assert!(fire > from);
        assert!(fire - from <= Duration::seconds(60));
    }
}

#[test]
fn test_six_field_seconds_step() {
    assert_eq!(
        next("*/10 * * * * *", "2024-01-01T10:00:01Z"),
        at("2024-01-01T10:00:10Z")
    );
}

#[test]
fn test_weekday_range() {
    // 2024-01-06 is a Saturday
    assert_eq!(
        next("30 8 * * 1-5", "2024-01-06T00:00:00Z"),
        at("2024-01-08T08:30:00Z")
    );
}

#[test]
fn test_sunday_as_zero_and_seven() {
    // 2024-01-01 is a Monday
    let expected = at("2024-01-07T12:00:00Z");
    assert_eq!(next("0 12 * * 0", "2024-01-01T00:00:00Z"), expected);
    assert_eq!(next("0 12 * * 7", "2024-01-01T00:00:00Z"), expected);
}

#[test]
fn test_range_ending_on_sunday() {
    assert_eq!(
        next("0 0 * * 5-7", "2024-01-01T00:00:00Z"),
        at("2024-01-05T00:00:00Z")
    );
    assert_eq!(
        next("0 0 * * 5-7", "2024-01-06T01:00:00Z"),
        at("2024-01-07T00:00:00Z")
    );
}

#[test]
fn test_list_and_step() {
    assert_eq!(
        next("0 0,12 * * *", "2024-01-01T01:00:00Z"),
        at("2024-01-01T12:00:00Z")
    );
    assert_eq!(
        next("*/20 * * * *", "2024-01-01T01:41:00Z"),
        at("2024-01-01T02:00:00Z")
    );
}

#[test]
fn test_split_day_fields() {
    assert_eq!(split_day_fields("0 0 0 * * 2"), vec!["0 0 0 * * 2"]);
    assert_eq!(split_day_fields("0 0 0 1 * *"), vec!["0 0 0 1 * *"]);
    assert_eq!(split_day_fields("0 0 0 */2 * 2"), vec!["0 0 0 */2 * 2"]);
    assert_eq!(
        split_day_fields("0 0 0 1,15 * 2"),
        vec!["0 0 0 1,15 * *", "0 0 0 * * 2"]
    );
    assert_eq!(split_day_fields("@weekly"), vec!["@weekly"]);
}

#[test]
fn test_day_of_month_or_day_of_week() {
    // 2024-01-02 is a Tuesday: the next Monday comes before the next 1st.
    assert_eq!(
        next("0 0 1 * 1", "2024-01-02T00:00:00Z"),
        at("2024-01-08T00:00:00Z")
    );
    // 2024-01-29 is a Monday: the 1st of February comes before the next Monday.
    assert_eq!(
        next("0 0 1 * 1", "2024-01-29T00:00:00Z"),
        at("2024-02-01T00:00:00Z")
    );
}

#[test]
fn test_daily_descriptor() {
    assert_eq!(
        next("@daily", "2024-01-01T10:00:00Z"),
        at("2024-01-02T00:00:00Z")
    );
}

#[test]
fn test_invalid_expressions() {
    for expr in ["not a cron", "0 25 * * *", "61 * * * *", "* * * *", ""] {
        assert!(ScheduleHandle::parse(expr).is_err(), "{expr} should fail");
    }
}

#[test]
fn test_expression_keeps_original_text() {
    let handle = ScheduleHandle::parse(" 0 2 * * * ").unwrap();
    assert_eq!(handle.expression(), "0 2 * * *");
    assert!(handle.next_fire().is_some());
}
