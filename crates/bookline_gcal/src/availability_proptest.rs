#[cfg(test)]
mod tests {
    use crate::availability::free_slots;
    use crate::slots::{generate, Slot};
    use crate::test_support::{ny, LEDGER, NY};
    use bookline_common::models::BusyInterval;
    use chrono::Duration;
    use proptest::prelude::*;

    // Busy intervals as minute offsets from 2024-01-01 00:00 New York time
    fn busy_from_minutes(intervals: &[(i64, i64)]) -> Vec<BusyInterval> {
        let base = ny(2024, 1, 1, 0, 0);
        intervals
            .iter()
            .map(|(offset, length)| {
                let start = base + Duration::minutes(*offset);
                BusyInterval::new(
                    start.with_timezone(&LEDGER),
                    (start + Duration::minutes(*length)).with_timezone(&LEDGER),
                )
            })
            .collect()
    }

    fn candidates(start_offset: i64, span_hours: i64) -> Vec<Slot> {
        let start = ny(2024, 1, 1, 0, 0) + Duration::minutes(start_offset);
        generate(start, start + Duration::hours(span_hours), NY, Duration::minutes(60)).collect()
    }

    proptest! {
        // A slot is kept exactly when it ends at or before, or starts at or after, every busy interval
        #[test]
        fn test_slot_kept_iff_disjoint_from_all_busy(
            start_offset in 0..600i64,
            span_hours in 1..48i64,
            intervals in proptest::collection::vec((0..3000i64, 1..240i64), 0..8),
        ) {
            let all = candidates(start_offset, span_hours);
            let busy = busy_from_minutes(&intervals);
            let free = free_slots(all.clone(), &busy, LEDGER);

            for slot in &all {
                let (start, end) = slot.in_zone(LEDGER);
                let disjoint = busy.iter().all(|b| end <= b.start || start >= b.end);
                prop_assert_eq!(free.contains(slot), disjoint);
            }
        }

        // Output is strictly increasing and a subsequence of generation order
        #[test]
        fn test_free_slots_preserve_order(
            start_offset in 0..600i64,
            span_hours in 1..48i64,
            intervals in proptest::collection::vec((0..3000i64, 1..240i64), 0..8),
        ) {
            let all = candidates(start_offset, span_hours);
            let free = free_slots(all.clone(), &busy_from_minutes(&intervals), LEDGER);

            prop_assert!(free.windows(2).all(|pair| pair[0].start < pair[1].start));

            let mut remaining = all.iter();
            for slot in &free {
                prop_assert!(remaining.any(|candidate| candidate == slot));
            }
        }

        // Consecutive slots are spaced by exactly the slot duration
        #[test]
        fn test_generated_slots_are_evenly_spaced(
            start_offset in 0..600i64,
            span_hours in 1..72i64,
        ) {
            let all = candidates(start_offset, span_hours);
            prop_assert_eq!(all.len() as i64, span_hours);
            for pair in all.windows(2) {
                prop_assert_eq!(pair[1].start - pair[0].start, Duration::minutes(60));
            }
        }

        // A busy interval ending exactly at a slot start never blocks it
        #[test]
        fn test_adjacent_busy_never_blocks(
            start_offset in 0..600i64,
            busy_length in 1..600i64,
        ) {
            let all = candidates(start_offset, 1);
            let slot_start = start_offset;
            let busy = busy_from_minutes(&[(slot_start - busy_length, busy_length), (slot_start + 60, busy_length)]);
            let free = free_slots(all.clone(), &busy, LEDGER);
            prop_assert_eq!(free, all);
        }
    }
}
