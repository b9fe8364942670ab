//! Algorithm selection and top-level schedule generation.

use thiserror::Error;

use crate::circle::{circle_method, is_known_solvable};
use crate::config::SchedulerOptions;
use crate::greedy::greedy_heuristic;
use crate::log_decisions;
use crate::models::{Algorithm, Participant, RaceResult, Schedule, ScheduleMetadata};
use crate::speed::{accepted_results, group_by_speed};

/// Errors raised by schedule generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("At least 2 participants are required to schedule heats, got {count}")]
    InsufficientParticipants { count: usize },
}

/// Choose the pipeline for a roster of `participant_count` racers.
///
/// 1. No results and a solvable size: circle method.
/// 2. Results present and speed matching on: speed-matched greedy.
/// 3. Otherwise: untiered greedy.
pub fn select_algorithm(
    participant_count: usize,
    lane_count: usize,
    results: &[RaceResult],
    options: &SchedulerOptions,
) -> Algorithm {
    if results.is_empty() && is_known_solvable(participant_count, lane_count) {
        Algorithm::CircleMethod
    } else if !results.is_empty() && options.speed_matching {
        Algorithm::SpeedMatchedGreedy
    } else {
        Algorithm::GreedyHeuristic
    }
}

/// Build a fresh schedule for `participants`.
///
/// `results` may contain superseded entries; only the latest result per heat
/// is used. A speed tier too small to fill a two-car heat gets no heats.
pub fn generate_schedule(
    participants: &[Participant],
    lane_count: usize,
    results: &[RaceResult],
    options: &SchedulerOptions,
) -> Result<Schedule, SchedulerError> {
    if participants.len() < 2 {
        return Err(SchedulerError::InsufficientParticipants {
            count: participants.len(),
        });
    }

    let accepted = accepted_results(results);
    let algorithm = select_algorithm(participants.len(), lane_count, &accepted, options);
    log_decisions!(
        options.verbosity,
        "Selected {} for {} racers on {} lanes ({} accepted results)",
        algorithm,
        participants.len(),
        lane_count,
        accepted.len()
    );

    let (heats, tier_count) = match algorithm {
        Algorithm::CircleMethod => (circle_method(participants, lane_count), 1),
        Algorithm::SpeedMatchedGreedy => {
            let tiers = group_by_speed(participants, &accepted, lane_count);
            log_decisions!(
                options.verbosity,
                "Speed tiers: {:?}",
                tiers
                    .iter()
                    .map(|t| t.iter().map(|p| p.car_number).collect::<Vec<_>>())
                    .collect::<Vec<_>>()
            );
            let heats =
                greedy_heuristic(participants, lane_count, Some(tiers.as_slice()), options);
            (heats, tiers.len())
        }
        Algorithm::GreedyHeuristic => {
            let heats = greedy_heuristic(participants, lane_count, None, options);
            (heats, 1)
        }
    };

    let mut schedule = Schedule {
        heats,
        metadata: ScheduleMetadata {
            algorithm,
            total_heats: 0,
            cars_per_heat: Vec::new(),
            lane_count: lane_count.min(participants.len()),
            lane_balance_perfect: algorithm == Algorithm::CircleMethod,
            speed_matched: algorithm == Algorithm::SpeedMatchedGreedy,
            tier_count,
            frozen_heats: 0,
        },
    };
    schedule.refresh_counts();
    Ok(schedule)
}
