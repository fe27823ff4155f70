use chrono::{NaiveDate, Timelike};
use taskboard_core::{Deadline, DeadlineParseError};

#[test]
fn format_then_parse_round_trips_to_the_minute() {
    let value = NaiveDate::from_ymd_opt(2025, 12, 31)
        .and_then(|day| day.and_hms_opt(23, 59, 48))
        .expect("fixture time should be valid");
    let deadline = Deadline::from_datetime(value);
    let text = deadline.to_string();

    assert_eq!(text, "2025-12-31 | 23:59");
    let parsed = Deadline::parse(&text).expect("formatted deadline should parse");
    assert_eq!(parsed, deadline);
    assert_eq!(parsed.as_datetime(), value.with_second(0).expect("second 0 should be valid"));
}

#[test]
fn form_input_and_canonical_text_agree() {
    let from_form = Deadline::from_input("2025-04-02T19:00").expect("form input should parse");
    let canonical = Deadline::parse("2025-04-02 | 19:00").expect("canonical text should parse");
    assert_eq!(from_form, canonical);
    assert_eq!(
        Deadline::from_input("2025-04-02 | 19:00").expect("canonical text should be accepted as input"),
        canonical
    );
    assert_eq!(
        Deadline::parse(" 2025-04-02 | 19:00 ").expect("surrounding spaces should be trimmed"),
        canonical
    );
}

#[test]
fn malformed_text_is_rejected() {
    for raw in ["", "2025-04-02", "2025-4-2 | 9:00", "2025-04-02 | 19:00 extra", "19:00 | 2025-04-02"] {
        assert!(
            matches!(Deadline::parse(raw), Err(DeadlineParseError::Shape(_))),
            "{raw:?} should be a shape error"
        );
    }
    assert!(matches!(
        Deadline::from_input("2025-02-29T10:00"),
        Err(DeadlineParseError::OutOfRange(_))
    ));
}

#[test]
fn deadlines_order_chronologically() {
    let earlier = Deadline::parse("2025-04-02 | 16:00").expect("earlier deadline should parse");
    let later = Deadline::parse("2025-04-02 | 19:00").expect("later deadline should parse");
    assert!(earlier < later);
}

#[test]
fn serde_uses_canonical_text() {
    let deadline = Deadline::parse("2025-04-02 | 19:00").expect("deadline should parse");
    let json = serde_json::to_string(&deadline).expect("deadline should serialize");
    assert_eq!(json, "\"2025-04-02 | 19:00\"");
    assert_eq!(serde_json::from_str::<Deadline>(&json).expect("deadline should deserialize"), deadline);
    assert!(serde_json::from_str::<Deadline>("\"2025-04-02T19:00\"").is_err());
}
