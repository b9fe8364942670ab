//! Speed estimation and speed-tier grouping from prior heat results.

use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{Participant, RaceResult};

/// Synthetic milliseconds per finishing place for manually ranked heats.
///
/// Place 1 counts as 1000 ms, place 2 as 2000 ms and so on. Mixed with real
/// timing data this scale is arbitrary; it is kept as-is so schedules match
/// those produced by earlier releases.
pub const MANUAL_PLACE_PROXY_MS: f64 = 1000.0;

/// An ordered group of racers of similar speed, at most `lane_count` long.
pub type SpeedTier = Vec<Participant>;

/// Keep only the accepted result for each heat: the one with the latest
/// timestamp. On an exact timestamp tie the later entry wins.
///
/// Returned in heat-number order.
pub fn accepted_results(results: &[RaceResult]) -> Vec<RaceResult> {
    let mut latest: BTreeMap<u32, &RaceResult> = BTreeMap::new();
    for result in results {
        let heat = result.heat_number();
        match latest.get(&heat) {
            Some(current) if current.timestamp() > result.timestamp() => {}
            _ => {
                latest.insert(heat, result);
            }
        }
    }
    latest.into_values().cloned().collect()
}

/// Mean race time per car across every accepted result it appears in.
///
/// Cars with no usable data map to `f64::INFINITY` so they sort last.
/// Timed results lacking a lane roster are skipped, as are individual times
/// that are not finite and non-negative.
pub fn calculate_average_times(
    participants: &[Participant],
    results: &[RaceResult],
) -> BTreeMap<u32, f64> {
    let roster: FxHashSet<u32> = participants.iter().map(|p| p.car_number).collect();
    let mut samples: FxHashMap<u32, (f64, u32)> = FxHashMap::default();

    let mut record = |car_number: u32, time: f64| {
        if !roster.contains(&car_number) {
            return;
        }
        let entry = samples.entry(car_number).or_insert((0.0, 0));
        entry.0 += time;
        entry.1 += 1;
    };

    for result in results {
        match result {
            RaceResult::Timed {
                times_ms, lanes, ..
            } => {
                let Some(lanes) = lanes else {
                    continue;
                };
                for (lane, time) in times_ms {
                    if !time.is_finite() || *time < 0.0 {
                        continue;
                    }
                    if let Some(assignment) = lanes.iter().find(|a| a.lane == *lane) {
                        record(assignment.car_number, *time);
                    }
                }
            }
            RaceResult::RankedManual { rankings, .. } => {
                for placement in rankings {
                    record(
                        placement.car_number,
                        placement.place as f64 * MANUAL_PLACE_PROXY_MS,
                    );
                }
            }
        }
    }

    participants
        .iter()
        .map(|p| {
            let average = match samples.get(&p.car_number) {
                Some(&(total, count)) if count > 0 => total / count as f64,
                _ => f64::INFINITY,
            };
            (p.car_number, average)
        })
        .collect()
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Partition racers into tiers of at most `lane_count`, fastest first.
///
/// Sorted by average time, then car number.
pub fn group_by_speed(
    participants: &[Participant],
    results: &[RaceResult],
    lane_count: usize,
) -> Vec<SpeedTier> {
    let averages = calculate_average_times(participants, results);
    let mut sorted: Vec<Participant> = participants.to_vec();
    sorted.sort_by(|a, b| {
        let ta = averages.get(&a.car_number).copied().unwrap_or(f64::INFINITY);
        let tb = averages.get(&b.car_number).copied().unwrap_or(f64::INFINITY);
        cmp_f64(ta, tb).then(a.car_number.cmp(&b.car_number))
    });

    sorted
        .chunks(lane_count.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}
