//! Cyclic ("circle method") schedule construction.
//!
//! When the roster size admits it, rotating the roster through the lanes one
//! position per heat places every racer in every lane exactly once. No search
//! is involved and the balance holds by construction.

use crate::models::{Heat, LaneAssignment, Participant};

/// Small roster sizes known to admit a perfectly balanced cyclic schedule.
const SOLVABLE_SIZES: [usize; 8] = [6, 7, 8, 12, 16, 18, 24, 32];

/// Whether a perfectly lane-balanced cyclic schedule exists for
/// `participant_count` racers on `lane_count` lanes.
///
/// Closed-form membership test: powers of two, the curated sizes in
/// [`SOLVABLE_SIZES`], or a roster of exactly `L` or `L + 1` racers.
pub fn is_known_solvable(participant_count: usize, lane_count: usize) -> bool {
    participant_count.is_power_of_two()
        || SOLVABLE_SIZES.contains(&participant_count)
        || participant_count == lane_count
        || lane_count.checked_add(1) == Some(participant_count)
}

/// Build `N` heats by cyclic offset: heat `h`, lane `l` (both 0-based) holds
/// the racer at index `(h + l) mod N`.
///
/// Callers must check [`is_known_solvable`] first; the construction is run
/// regardless and its balance is only guaranteed for solvable sizes. Yields
/// nothing when fewer than two lanes would be filled.
pub fn circle_method(participants: &[Participant], lane_count: usize) -> Vec<Heat> {
    let n = participants.len();
    let lanes_used = lane_count.min(n);
    if lanes_used < 2 {
        return Vec::new();
    }

    (0..n)
        .map(|h| {
            let lanes = (0..lanes_used)
                .map(|l| LaneAssignment::new(l as u32 + 1, &participants[(h + l) % n]))
                .collect();
            Heat::new(h as u32 + 1, lanes)
        })
        .collect()
}
