//! Greedy heat composition with exact per-heat lane assignment.
//!
//! Used whenever the circle method cannot guarantee balance, or when racers
//! are grouped into speed tiers. Each pool (the whole roster, or one tier) is
//! scheduled independently: one heat per pool member, each heat taking the
//! least-raced racers and placing them with [`assign_lanes_balanced`].

mod composition;
mod lane_search;

pub use composition::select_cars_for_heat;
pub use lane_search::{assign_lanes_balanced, LaneUsage};

use rustc_hash::FxHashMap;

use crate::config::SchedulerOptions;
use crate::log_heats;
use crate::models::{Heat, Participant};
use crate::speed::SpeedTier;

/// Schedule the roster with the greedy engine.
///
/// With `speed_groups`, each tier is scheduled on its own and the heats are
/// concatenated tier by tier, fastest tier first; `participants` is then
/// unused. Heat numbers run contiguously from 1.
pub fn greedy_heuristic(
    participants: &[Participant],
    lane_count: usize,
    speed_groups: Option<&[SpeedTier]>,
    options: &SchedulerOptions,
) -> Vec<Heat> {
    let pools: Vec<&[Participant]> = match speed_groups {
        Some(groups) => groups.iter().map(|g| g.as_slice()).collect(),
        None => vec![participants],
    };

    let mut heats = Vec::new();
    for (tier, pool) in pools.into_iter().enumerate() {
        let first_heat_number = heats.len() as u32 + 1;
        log_heats!(
            options.verbosity,
            "Scheduling pool {} ({} racers) from heat {}",
            tier,
            pool.len(),
            first_heat_number
        );
        heats.extend(schedule_pool(pool, lane_count, first_heat_number, options));
    }
    heats
}

/// Run `pool.len()` rounds of composition and lane assignment.
fn schedule_pool(
    pool: &[Participant],
    lane_count: usize,
    first_heat_number: u32,
    options: &SchedulerOptions,
) -> Vec<Heat> {
    let effective_lanes = lane_count.min(pool.len());
    let mut heats_run: FxHashMap<u32, u32> = FxHashMap::default();
    let mut lane_usage: LaneUsage = FxHashMap::default();
    let mut heats: Vec<Heat> = Vec::with_capacity(pool.len());

    for _round in 0..pool.len() {
        let selected = select_cars_for_heat(pool, &heats_run, effective_lanes);
        if selected.len() < 2 {
            log_heats!(
                options.verbosity,
                "  Dropping heat with {} racer(s) from pool of {}",
                selected.len(),
                pool.len()
            );
            continue;
        }

        let assignments = assign_lanes_balanced(&selected, &lane_usage, effective_lanes, options);
        for assignment in &assignments {
            *heats_run.entry(assignment.car_number).or_insert(0) += 1;
            let counts = lane_usage
                .entry(assignment.car_number)
                .or_insert_with(|| vec![0; effective_lanes]);
            counts[assignment.lane as usize - 1] += 1;
        }

        let heat_number = first_heat_number + heats.len() as u32;
        log_heats!(
            options.verbosity,
            "  Heat {}: {:?}",
            heat_number,
            assignments
                .iter()
                .map(|a| (a.lane, a.car_number))
                .collect::<Vec<_>>()
        );
        heats.push(Heat::new(heat_number, assignments));
    }

    heats
}
