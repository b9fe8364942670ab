//! Choosing which racers run in the next heat.

use rustc_hash::FxHashMap;

use crate::models::Participant;

/// Pick up to `max_cars` racers from `pool`, fewest heats run first, ties by
/// car number.
///
/// Always taking the least-raced racers keeps every pool member within one
/// heat of every other.
pub fn select_cars_for_heat(
    pool: &[Participant],
    heats_run: &FxHashMap<u32, u32>,
    max_cars: usize,
) -> Vec<Participant> {
    let mut candidates: Vec<&Participant> = pool.iter().collect();
    candidates.sort_by_key(|p| {
        (
            heats_run.get(&p.car_number).copied().unwrap_or(0),
            p.car_number,
        )
    });
    candidates
        .into_iter()
        .take(max_cars)
        .cloned()
        .collect()
}
