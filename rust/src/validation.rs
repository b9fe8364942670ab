//! Independent lane balance audit of a finished schedule.

use std::collections::BTreeMap;

use crate::models::{Algorithm, LaneBalanceReport, Schedule};

/// Per-car lane counts recomputed from the heats alone.
///
/// Each car's vector covers lanes `1..=k`, where `k` is the largest heat that
/// car raced in (index 0 is lane 1). Ordered by car number.
pub fn lane_usage(schedule: &Schedule) -> BTreeMap<u32, Vec<u32>> {
    let mut widths: BTreeMap<u32, usize> = BTreeMap::new();
    let mut usage: BTreeMap<u32, Vec<u32>> = BTreeMap::new();

    for heat in &schedule.heats {
        for assignment in &heat.lanes {
            let width = widths.entry(assignment.car_number).or_insert(0);
            *width = (*width).max(heat.lanes.len());

            let counts = usage.entry(assignment.car_number).or_default();
            let index = (assignment.lane as usize).saturating_sub(1);
            if counts.len() <= index {
                counts.resize(index + 1, 0);
            }
            counts[index] += 1;
        }
    }

    for (car, counts) in usage.iter_mut() {
        let width = widths.get(car).copied().unwrap_or(0);
        if counts.len() < width {
            counts.resize(width, 0);
        }
    }
    usage
}

/// Check every car's lane spread against what the producing algorithm
/// promises: 0 for the circle method, 1 otherwise.
///
/// Violations are reported, never raised.
pub fn validate_lane_balance(schedule: &Schedule) -> LaneBalanceReport {
    let allowed = match schedule.metadata.algorithm {
        Algorithm::CircleMethod => 0,
        Algorithm::GreedyHeuristic | Algorithm::SpeedMatchedGreedy => 1,
    };

    let errors: Vec<String> = lane_usage(schedule)
        .into_iter()
        .filter_map(|(car, counts)| {
            let max = counts.iter().copied().max().unwrap_or(0);
            let min = counts.iter().copied().min().unwrap_or(0);
            let spread = max - min;
            (spread > allowed).then(|| {
                format!(
                    "Car {}: lane usage spread {} exceeds allowed {} (per-lane counts {:?})",
                    car, spread, allowed, counts
                )
            })
        })
        .collect();

    LaneBalanceReport {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerOptions;
    use crate::models::{Heat, LaneAssignment, Participant, ScheduleMetadata};
    use crate::schedule::generate_schedule;

    fn roster(n: u32) -> Vec<Participant> {
        (1..=n)
            .map(|i| Participant::new(i, format!("Car {}", i)))
            .collect()
    }

    fn hand_built(algorithm: Algorithm, heats: Vec<Vec<(u32, u32)>>) -> Schedule {
        let heats: Vec<Heat> = heats
            .into_iter()
            .enumerate()
            .map(|(i, lanes)| {
                Heat::new(
                    i as u32 + 1,
                    lanes
                        .into_iter()
                        .map(|(lane, car)| LaneAssignment::new(lane, &Participant::new(car, "")))
                        .collect(),
                )
            })
            .collect();
        let mut schedule = Schedule {
            heats,
            metadata: ScheduleMetadata {
                algorithm,
                total_heats: 0,
                cars_per_heat: vec![],
                lane_count: 2,
                lane_balance_perfect: algorithm == Algorithm::CircleMethod,
                speed_matched: false,
                tier_count: 1,
                frozen_heats: 0,
            },
        };
        schedule.refresh_counts();
        schedule
    }

    #[test]
    fn test_circle_schedule_is_perfect() {
        let schedule = generate_schedule(&roster(8), 6, &[], &SchedulerOptions::default()).unwrap();
        let report = validate_lane_balance(&schedule);
        assert!(report.valid, "{:?}", report.errors);
        assert!(lane_usage(&schedule).values().all(|c| c == &vec![1; 6]));
    }

    #[test]
    fn test_greedy_ten_on_six_is_valid() {
        let schedule =
            generate_schedule(&roster(10), 6, &[], &SchedulerOptions::default()).unwrap();
        assert_eq!(schedule.metadata.algorithm, Algorithm::GreedyHeuristic);
        let report = validate_lane_balance(&schedule);
        assert!(report.valid, "{:?}", report.errors);
        for counts in lane_usage(&schedule).values() {
            let spread = counts.iter().max().unwrap() - counts.iter().min().unwrap();
            assert!(spread <= 1);
        }
    }

    #[test]
    fn test_unused_lane_counts_as_zero() {
        let schedule = hand_built(
            Algorithm::GreedyHeuristic,
            vec![vec![(1, 1), (2, 2)], vec![(1, 1), (2, 2)]],
        );
        let usage = lane_usage(&schedule);
        assert_eq!(usage[&1], vec![2, 0]);
        assert_eq!(usage[&2], vec![0, 2]);

        let report = validate_lane_balance(&schedule);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("Car 1:"));
    }

    #[test]
    fn test_circle_claim_tolerates_nothing() {
        let heats = vec![vec![(1, 1), (2, 2)], vec![(1, 2), (2, 1)], vec![(1, 1), (2, 2)]];
        let greedy = hand_built(Algorithm::GreedyHeuristic, heats.clone());
        assert!(validate_lane_balance(&greedy).valid);

        let circle = hand_built(Algorithm::CircleMethod, heats);
        let report = validate_lane_balance(&circle);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_empty_schedule_is_valid() {
        let schedule = hand_built(Algorithm::GreedyHeuristic, vec![]);
        assert_eq!(
            validate_lane_balance(&schedule),
            LaneBalanceReport {
                valid: true,
                errors: vec![],
            }
        );
    }
}
