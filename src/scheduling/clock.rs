//! Conversion between seconds-from-midnight and "HH:MM" labels

use crate::error::{AppError, AppResult};

use super::SECONDS_PER_DAY;

/// Format an offset from midnight as a zero-padded 24-hour "HH:MM" label
pub fn format_clock(offset: i32) -> String {
    let hours = offset / 3600;
    let minutes = (offset % 3600) / 60;
    format!("{:02}:{:02}", hours, minutes)
}

/// Parse an "HH:MM" label into seconds from midnight.
///
/// Single-digit hours ("9:30") are accepted so that legacy clients keep
/// working; minutes must always have two digits.
pub fn parse_clock(label: &str) -> AppResult<i32> {
    let invalid = || AppError::Validation(format!("Invalid time label '{}' (use HH:MM)", label));

    let (hh, mm) = label.trim().split_once(':').ok_or_else(invalid)?;
    if hh.is_empty() || hh.len() > 2 || mm.len() != 2 {
        return Err(invalid());
    }
    if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = hh.parse().map_err(|_| invalid())?;
    let minutes: i32 = mm.parse().map_err(|_| invalid())?;
    if hours >= 24 || minutes >= 60 {
        return Err(invalid());
    }

    let offset = hours * 3600 + minutes * 60;
    debug_assert!(offset < SECONDS_PER_DAY);
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(1800), "00:30");
        assert_eq!(format_clock(9 * 3600), "09:00");
        assert_eq!(format_clock(23 * 3600 + 1800), "23:30");
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("00:00").unwrap(), 0);
        assert_eq!(parse_clock("09:30").unwrap(), 9 * 3600 + 1800);
        assert_eq!(parse_clock("9:30").unwrap(), 9 * 3600 + 1800);
        assert_eq!(parse_clock("23:59").unwrap(), 86_340);
    }

    #[test]
    fn test_parse_clock_rejects_malformed() {
        for label in ["", "0930", "9:0", "24:00", "10:60", "ab:cd", "10:", ":30", "-1:30", "100:00"] {
            assert!(
                matches!(parse_clock(label), Err(AppError::Validation(_))),
                "label {:?} should be rejected",
                label
            );
        }
    }

    #[test]
    fn test_round_trip_on_grid() {
        for offset in (0..86_400).step_by(1800) {
            assert_eq!(parse_clock(&format_clock(offset)).unwrap(), offset);
        }
    }
}
