//! Generate bookable slots inside a time window.
//!
//! Walks a cursor from the window start, emitting `[cursor, cursor + duration)`
//! while it still fits, then skipping the buffer before the next slot. The
//! buffer sits only between slots, so it never affects whether the last slot
//! fits.

use crate::model::{Slot, SlotOrigin};
use crate::time::WallTime;

/// Generate the ordered, non-overlapping slots that fit in
/// `[window_start, window_end)`.
///
/// Slots are tagged [`SlotOrigin::Regular`]; callers re-tag them when the
/// window comes from an ad-hoc slot. A window too small for one slot, an
/// inverted window, or a zero duration all yield an empty list.
///
/// For a window of `w` minutes the result holds
/// `floor((w + buffer) / (duration + buffer))` slots.
pub fn generate(
    window_start: WallTime,
    window_end: WallTime,
    duration_minutes: u32,
    buffer_minutes: u32,
) -> Vec<Slot> {
    if duration_minutes == 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut cursor = window_start;

    while let Some(slot_end) = cursor.checked_add_minutes(duration_minutes) {
        if slot_end > window_end {
            break;
        }
        slots.push(Slot::new(cursor, slot_end, SlotOrigin::Regular));

        // Past end of day the next slot cannot fit either.
        match slot_end.checked_add_minutes(buffer_minutes) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    slots
}
