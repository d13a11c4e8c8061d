//! Property-based tests for slot generation using proptest.
//!
//! These check invariants that must hold for *any* valid window, not just the
//! worked examples in `generator_tests.rs`.

use proptest::prelude::*;
use slot_engine::time::MINUTES_PER_DAY;
use slot_engine::{generate, WallTime};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A window `[start, end)` inside one day with `end > start`.
fn arb_window() -> impl Strategy<Value = (u32, u32)> {
    (0u32..MINUTES_PER_DAY).prop_flat_map(|start| (Just(start), (start + 1)..=MINUTES_PER_DAY))
}

fn arb_duration() -> impl Strategy<Value = u32> {
    15u32..=180
}

fn arb_buffer() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), 1u32..=60]
}

fn wall(minutes: u32) -> WallTime {
    WallTime::from_minutes(minutes).unwrap()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: No two slots overlap, and output is strictly ordered
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_are_ordered_and_disjoint(
        (start, end) in arb_window(),
        dur in arb_duration(),
        buf in arb_buffer(),
    ) {
        let slots = generate(wall(start), wall(end), dur, buf);

        for pair in slots.windows(2) {
            prop_assert!(pair[0].start_time < pair[1].start_time);
            prop_assert!(
                !pair[0].overlaps(&pair[1]),
                "{} overlaps {}",
                pair[0],
                pair[1]
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Every slot is exactly `duration` long and inside the window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_have_exact_duration_and_fit(
        (start, end) in arb_window(),
        dur in arb_duration(),
        buf in arb_buffer(),
    ) {
        let slots = generate(wall(start), wall(end), dur, buf);

        for slot in &slots {
            prop_assert_eq!(slot.duration_minutes(), dur);
            prop_assert!(slot.start_time >= wall(start));
            prop_assert!(slot.end_time <= wall(end));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Slot count is floor((window + buffer) / (duration + buffer))
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slot_count_matches_closed_form(
        (start, end) in arb_window(),
        dur in arb_duration(),
        buf in arb_buffer(),
    ) {
        let slots = generate(wall(start), wall(end), dur, buf);
        let expected = ((end - start) + buf) / (dur + buf);

        prop_assert_eq!(slots.len() as u32, expected);
    }
}

// ---------------------------------------------------------------------------
// Property 4: Consecutive slots are exactly `duration + buffer` apart
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn consecutive_slots_step_by_duration_plus_buffer(
        (start, end) in arb_window(),
        dur in arb_duration(),
        buf in arb_buffer(),
    ) {
        let slots = generate(wall(start), wall(end), dur, buf);

        if let Some(first) = slots.first() {
            prop_assert_eq!(first.start_time, wall(start));
        }
        for pair in slots.windows(2) {
            let gap = pair[1].start_time.minutes() - pair[0].start_time.minutes();
            prop_assert_eq!(gap, dur + buf);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: A window shorter than one duration yields nothing
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn short_window_is_empty(
        start in 0u32..(MINUTES_PER_DAY - 180),
        dur in arb_duration(),
        buf in arb_buffer(),
        shortfall in 1u32..=15,
    ) {
        let end = start + dur - shortfall;
        prop_assert!(generate(wall(start), wall(end), dur, buf).is_empty());
    }
}
