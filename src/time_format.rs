//! Conversion between the canonical 24-hour "HH:MM:SS" storage format and the
//! user-facing 12-hour "HH:MM AM/PM" format.
//!
//! The two functions are not exact inverses at the midnight boundary:
//! `to_24_hour("12:00 am")` is "00:00:00" and `to_12_hour("00:00:00")` is
//! "12:00 AM", so the round trip still denotes the same wall-clock time.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeFormatError {
    #[error("malformed time string {0:?}")]
    Malformed(String),

    #[error("missing am/pm meridiem in {0:?}")]
    MissingMeridiem(String),

    #[error("hour out of range in {0:?}")]
    HourOutOfRange(String),

    #[error("minute out of range in {0:?}")]
    MinuteOutOfRange(String),
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Parses a 12-hour time like "9:00 am", "12 PM" or "11:30pm" and renders it
/// in the canonical 24-hour storage format "HH:MM:00".
///
/// Minutes default to "00" when omitted; the meridiem is case-insensitive and
/// required. Seconds are always "00".
pub fn to_24_hour(time: &str) -> Result<String, TimeFormatError> {
    let lower = time.trim().to_ascii_lowercase();
    let (clock, meridiem) = if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim_end(), Meridiem::Am)
    } else if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim_end(), Meridiem::Pm)
    } else {
        return Err(TimeFormatError::MissingMeridiem(time.to_string()));
    };

    let (hour_part, minute_part) = match clock.split_once(':') {
        Some((hour, minute)) => (hour, minute),
        None => (clock, "00"),
    };

    let hour: u32 = hour_part
        .parse()
        .map_err(|_| TimeFormatError::Malformed(time.to_string()))?;
    let minute: u32 = minute_part
        .parse()
        .map_err(|_| TimeFormatError::Malformed(time.to_string()))?;

    if hour == 0 || hour > 12 {
        return Err(TimeFormatError::HourOutOfRange(time.to_string()));
    }
    if minute > 59 {
        return Err(TimeFormatError::MinuteOutOfRange(time.to_string()));
    }

    let hour = match (meridiem, hour) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Pm, hour) if hour != 12 => hour + 12,
        (_, hour) => hour,
    };

    Ok(format!("{:02}:{:02}:00", hour, minute))
}

/// Renders a canonical 24-hour time "HH:MM[:SS]" as "HH:MM AM/PM".
///
/// Seconds are accepted and discarded. Hour 0 maps to 12 AM, hour 12 stays
/// 12 PM.
pub fn to_12_hour(time: &str) -> Result<String, TimeFormatError> {
    let mut parts = time.trim().splitn(3, ':');
    let hour_part = parts
        .next()
        .ok_or_else(|| TimeFormatError::Malformed(time.to_string()))?;
    let minute_part = parts
        .next()
        .ok_or_else(|| TimeFormatError::Malformed(time.to_string()))?;

    let hour: u32 = hour_part
        .parse()
        .map_err(|_| TimeFormatError::Malformed(time.to_string()))?;
    let minute: u32 = minute_part
        .parse()
        .map_err(|_| TimeFormatError::Malformed(time.to_string()))?;

    if hour > 23 {
        return Err(TimeFormatError::HourOutOfRange(time.to_string()));
    }
    if minute > 59 {
        return Err(TimeFormatError::MinuteOutOfRange(time.to_string()));
    }

    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let hour = match hour % 12 {
        0 => 12,
        hour => hour,
    };

    Ok(format!("{:02}:{:02} {}", hour, minute, meridiem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("12:00 am", "00:00:00" ; "midnight")]
    #[test_case("12:00 pm", "12:00:00" ; "noon")]
    #[test_case("9:00 AM", "09:00:00" ; "single digit hour")]
    #[test_case("9 am", "09:00:00" ; "minutes omitted")]
    #[test_case("11:30pm", "23:30:00" ; "no space before meridiem")]
    #[test_case("5:00 PM", "17:00:00" ; "afternoon")]
    fn converts_to_24_hour(input: &str, expected: &str) {
        assert_eq!(to_24_hour(input).unwrap(), expected);
    }

    #[test_case("00:00:00", "12:00 AM" ; "midnight")]
    #[test_case("12:00:00", "12:00 PM" ; "noon")]
    #[test_case("13:00:00", "01:00 PM" ; "early afternoon")]
    #[test_case("09:15:00", "09:15 AM" ; "morning with minutes")]
    #[test_case("23:59", "11:59 PM" ; "seconds omitted")]
    fn converts_to_12_hour(input: &str, expected: &str) {
        assert_eq!(to_12_hour(input).unwrap(), expected);
    }

    #[test]
    fn round_trips_every_on_the_hour_value() {
        for hour in 0..24u32 {
            let canonical = format!("{:02}:00:00", hour);
            let twelve = to_12_hour(&canonical).unwrap();
            assert_eq!(
                to_24_hour(&twelve).unwrap(),
                canonical,
                "round trip failed for hour {hour}"
            );
        }
    }

    #[test]
    fn round_trips_non_zero_minutes() {
        assert_eq!(
            to_24_hour(&to_12_hour("18:45:00").unwrap()).unwrap(),
            "18:45:00"
        );
        assert_eq!(
            to_12_hour(&to_24_hour("9:05 am").unwrap()).unwrap(),
            "09:05 AM"
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            to_24_hour("9:00"),
            Err(TimeFormatError::MissingMeridiem("9:00".to_string()))
        );
        assert!(matches!(
            to_24_hour("half past nine am"),
            Err(TimeFormatError::Malformed(_))
        ));
        assert_eq!(
            to_24_hour("13:00 pm"),
            Err(TimeFormatError::HourOutOfRange("13:00 pm".to_string()))
        );
        assert_eq!(
            to_24_hour("9:75 pm"),
            Err(TimeFormatError::MinuteOutOfRange("9:75 pm".to_string()))
        );
        assert!(matches!(
            to_12_hour("25:00:00"),
            Err(TimeFormatError::HourOutOfRange(_))
        ));
        assert!(matches!(to_12_hour("9"), Err(TimeFormatError::Malformed(_))));
    }

    proptest! {
        #[test]
        fn round_trip_preserves_wall_clock(hour in 1u32..=12, minute in 0u32..60, pm in any::<bool>()) {
            let meridiem = if pm { "pm" } else { "am" };
            let input = format!("{}:{:02} {}", hour, minute, meridiem);

            let canonical = to_24_hour(&input).unwrap();
            let rendered = to_12_hour(&canonical).unwrap();

            // Same wall-clock time, format-normalized: "9:00 am" -> "09:00 AM".
            prop_assert_eq!(rendered, format!("{:02}:{:02} {}", hour, minute, meridiem.to_uppercase()));
            prop_assert_eq!(to_24_hour(&to_12_hour(&canonical).unwrap()).unwrap(), canonical);
        }
    }
}
