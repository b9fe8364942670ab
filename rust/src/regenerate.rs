//! Rebuilding the unraced part of a live schedule after the roster changes.
//!
//! Heats up to and including the last completed heat are frozen verbatim.
//! The remainder is generated from scratch for the new roster and renumbered
//! to continue the heat sequence.

use crate::config::SchedulerOptions;
use crate::log_decisions;
use crate::models::{Participant, RaceResult, Schedule};
use crate::schedule::{generate_schedule, SchedulerError};

/// Regenerate after one or more racers left.
///
/// Fails with `InsufficientParticipants` when fewer than two racers remain;
/// deciding what happens then is up to the caller.
pub fn regenerate_after_removal(
    schedule: &Schedule,
    remaining_participants: &[Participant],
    current_heat_number: u32,
    lane_count: usize,
    results: &[RaceResult],
    options: &SchedulerOptions,
) -> Result<Schedule, SchedulerError> {
    if remaining_participants.len() < 2 {
        return Err(SchedulerError::InsufficientParticipants {
            count: remaining_participants.len(),
        });
    }
    log_decisions!(
        options.verbosity,
        "Regenerating after removal: {} racers remain, heats 1..={} frozen",
        remaining_participants.len(),
        current_heat_number
    );
    splice(
        schedule,
        remaining_participants,
        current_heat_number,
        lane_count,
        results,
        options,
    )
}

/// Regenerate after late arrivals joined the roster.
///
/// `all_participants` is the full roster including the newcomers.
pub fn regenerate_after_late_arrival(
    schedule: &Schedule,
    all_participants: &[Participant],
    current_heat_number: u32,
    lane_count: usize,
    results: &[RaceResult],
    options: &SchedulerOptions,
) -> Result<Schedule, SchedulerError> {
    log_decisions!(
        options.verbosity,
        "Regenerating after late arrival: {} racers, heats 1..={} frozen",
        all_participants.len(),
        current_heat_number
    );
    splice(
        schedule,
        all_participants,
        current_heat_number,
        lane_count,
        results,
        options,
    )
}

fn splice(
    schedule: &Schedule,
    participants: &[Participant],
    current_heat_number: u32,
    lane_count: usize,
    results: &[RaceResult],
    options: &SchedulerOptions,
) -> Result<Schedule, SchedulerError> {
    let frozen: Vec<_> = schedule
        .heats
        .iter()
        .filter(|h| h.heat_number <= current_heat_number)
        .cloned()
        .collect();

    let mut regenerated = generate_schedule(participants, lane_count, results, options)?;
    for heat in &mut regenerated.heats {
        heat.heat_number += current_heat_number;
    }

    let frozen_heats = frozen.len();
    let mut heats = frozen;
    heats.append(&mut regenerated.heats);

    let mut spliced = Schedule {
        heats,
        metadata: regenerated.metadata,
    };
    spliced.metadata.frozen_heats = frozen_heats;
    if frozen_heats > 0 {
        spliced.metadata.lane_balance_perfect = false;
    }
    spliced.refresh_counts();
    Ok(spliced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Algorithm, Placement};
    use chrono::NaiveDate;

    fn roster(n: u32) -> Vec<Participant> {
        (1..=n)
            .map(|i| Participant::new(i, format!("Car {}", i)))
            .collect()
    }

    fn base_schedule(n: u32) -> Schedule {
        generate_schedule(&roster(n), 6, &[], &SchedulerOptions::default()).unwrap()
    }

    #[test]
    fn test_removal_preserves_completed_heats() {
        let original = base_schedule(8);
        let remaining: Vec<Participant> = roster(8)
            .into_iter()
            .filter(|p| p.car_number != 3)
            .collect();

        let updated = regenerate_after_removal(
            &original,
            &remaining,
            5,
            6,
            &[],
            &SchedulerOptions::default(),
        )
        .unwrap();

        assert_eq!(&updated.heats[..5], &original.heats[..5]);
        for heat in updated.heats.iter().filter(|h| h.heat_number > 5) {
            assert!(!heat.contains(3), "car 3 raced in heat {}", heat.heat_number);
        }
        // 7 racers is a circle-method size: 7 fresh heats.
        assert_eq!(updated.metadata.algorithm, Algorithm::CircleMethod);
        assert_eq!(updated.heats.len(), 12);
        assert_eq!(updated.metadata.total_heats, 12);
        assert_eq!(updated.metadata.frozen_heats, 5);
        assert!(!updated.metadata.lane_balance_perfect);
    }

    #[test]
    fn test_removal_with_results_regenerates_by_speed() {
        let original =
            generate_schedule(&roster(8), 4, &[], &SchedulerOptions::default()).unwrap();
        assert_eq!(original.metadata.algorithm, Algorithm::CircleMethod);
        let remaining: Vec<Participant> = roster(8)
            .into_iter()
            .filter(|p| p.car_number != 3)
            .collect();
        // Heat 1 finished in descending car-number order.
        let results = vec![RaceResult::RankedManual {
            heat_number: 1,
            rankings: (1..=8u32)
                .rev()
                .enumerate()
                .map(|(i, car)| Placement::new(car, i as u32 + 1))
                .collect(),
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }];

        let updated = regenerate_after_removal(
            &original,
            &remaining,
            4,
            4,
            &results,
            &SchedulerOptions::default(),
        )
        .unwrap();

        assert_eq!(&updated.heats[..4], &original.heats[..4]);
        assert_eq!(updated.metadata.algorithm, Algorithm::SpeedMatchedGreedy);
        assert!(updated.metadata.speed_matched);
        assert_eq!(updated.metadata.tier_count, 2);
        assert_eq!(updated.metadata.frozen_heats, 4);
        // Tiers [8, 7, 6, 5] and [4, 2, 1]: 4 + 3 fresh heats.
        let numbers: Vec<u32> = updated.heats.iter().map(|h| h.heat_number).collect();
        assert_eq!(numbers, (1..=11).collect::<Vec<u32>>());
        for heat in &updated.heats[4..] {
            assert!(!heat.contains(3), "car 3 raced in heat {}", heat.heat_number);
        }
        for heat in &updated.heats[4..8] {
            assert!(heat.lanes.iter().all(|a| a.car_number >= 5));
        }
        for heat in &updated.heats[8..] {
            assert_eq!(heat.lanes.len(), 3);
            assert!(heat.lanes.iter().all(|a| a.car_number <= 4));
        }
    }

    #[test]
    fn test_regenerated_heats_are_renumbered_contiguously() {
        let original = base_schedule(8);
        let updated = regenerate_after_removal(
            &original,
            &roster(7),
            5,
            6,
            &[],
            &SchedulerOptions::default(),
        )
        .unwrap();
        let numbers: Vec<u32> = updated.heats.iter().map(|h| h.heat_number).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<u32>>());
        // Relative order of the fresh heats is kept.
        let fresh = generate_schedule(&roster(7), 6, &[], &SchedulerOptions::default()).unwrap();
        assert_eq!(updated.heats[5].lanes, fresh.heats[0].lanes);
    }

    #[test]
    fn test_removal_below_two_fails() {
        let original = base_schedule(8);
        let err = regenerate_after_removal(
            &original,
            &roster(1),
            5,
            6,
            &[],
            &SchedulerOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, SchedulerError::InsufficientParticipants { count: 1 });
    }

    #[test]
    fn test_late_arrival_races_after_cutoff() {
        let original = base_schedule(8);
        let updated = regenerate_after_late_arrival(
            &original,
            &roster(9),
            3,
            6,
            &[],
            &SchedulerOptions::default(),
        )
        .unwrap();

        assert_eq!(&updated.heats[..3], &original.heats[..3]);
        assert!(updated
            .heats
            .iter()
            .any(|h| h.heat_number > 3 && h.contains(9)));
        assert!(updated.heats[..3].iter().all(|h| !h.contains(9)));
        assert_eq!(updated.metadata.algorithm, Algorithm::GreedyHeuristic);
        assert_eq!(updated.metadata.total_heats, 3 + 9);
    }

    #[test]
    fn test_cutoff_zero_regenerates_everything() {
        let original = base_schedule(8);
        let updated = regenerate_after_late_arrival(
            &original,
            &roster(10),
            0,
            6,
            &[],
            &SchedulerOptions::default(),
        )
        .unwrap();
        let fresh = generate_schedule(&roster(10), 6, &[], &SchedulerOptions::default()).unwrap();
        assert_eq!(updated.heats, fresh.heats);
        assert_eq!(updated.metadata.frozen_heats, 0);
    }
}
