//! Slot grid generation for a building's operating window

use crate::error::{AppError, AppResult};

use super::{format_clock, SECONDS_PER_DAY};

/// One slot of a building grid, before it is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSlot {
    pub label: String,
    pub offset: i32,
}

/// Check an operating window against the grid rules without generating it
pub fn validate_window(start: i32, end: i32, duration: i32) -> AppResult<()> {
    if duration <= 0 {
        return Err(AppError::Validation("Slot duration must be positive".to_string()));
    }
    if start < 0 || end >= SECONDS_PER_DAY {
        return Err(AppError::Validation(format!(
            "Operating hours must lie within one day (got {}..{})",
            start, end
        )));
    }
    if start >= end {
        return Err(AppError::Validation(
            "start_time must be earlier than end_time".to_string(),
        ));
    }
    if start % duration != 0 || end % duration != 0 {
        return Err(AppError::Validation(format!(
            "Operating hours must be multiples of {} seconds",
            duration
        )));
    }
    Ok(())
}

/// Generate the ordered slot grid covering `start..=end`.
///
/// The closing offset itself is part of the grid: a building open from
/// 00:00 to 01:00 has the slots 00:00, 00:30 and 01:00.
pub fn generate_slots(start: i32, end: i32, duration: i32) -> AppResult<Vec<GridSlot>> {
    validate_window(start, end, duration)?;

    let slots = (start..=end)
        .step_by(duration as usize)
        .map(|offset| GridSlot {
            label: format_clock(offset),
            offset,
        })
        .collect();

    Ok(slots)
}
