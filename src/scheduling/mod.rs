//! Half-hour slot arithmetic shared by buildings and orders
//!
//! Operating hours are stored as offsets in seconds from midnight. A building's
//! grid is the inclusive sequence of offsets from its opening to its closing
//! offset, one slot every [`SLOT_DURATION_SECS`].

pub mod clock;
pub mod grid;

pub use clock::{format_clock, parse_clock};
pub use grid::{generate_slots, GridSlot};

/// Length of a single bookable slot (30 minutes)
pub const SLOT_DURATION_SECS: i32 = 1800;

/// Seconds in a calendar day
pub const SECONDS_PER_DAY: i32 = 86_400;
