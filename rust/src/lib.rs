//! Lane-balanced heat scheduling for round-robin racing events.
//!
//! Every racer should see every lane as evenly as possible. Rosters of a
//! solvable size get a cyclic schedule with perfect balance; all others get a
//! greedy schedule balanced to within one race per lane, optionally grouped
//! into speed tiers once results exist. Live schedules can be regenerated
//! after racers leave or arrive without touching heats already run.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDateTime;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::BTreeMap;

pub mod circle;
mod config;
pub mod greedy;
pub mod logging;
mod models;
pub mod regenerate;
pub mod schedule;
pub mod speed;
pub mod validation;

pub use circle::{circle_method, is_known_solvable};
pub use config::{SchedulerOptions, DEFAULT_SEARCH_NODE_BUDGET};
pub use greedy::{assign_lanes_balanced, greedy_heuristic, select_cars_for_heat, LaneUsage};
pub use models::{
    Algorithm, Heat, LaneAssignment, LaneBalanceReport, Participant, Placement, RaceResult,
    Schedule, ScheduleMetadata,
};
pub use regenerate::{regenerate_after_late_arrival, regenerate_after_removal};
pub use schedule::{generate_schedule, select_algorithm, SchedulerError};
pub use speed::{
    accepted_results, calculate_average_times, group_by_speed, SpeedTier, MANUAL_PLACE_PROXY_MS,
};
pub use validation::{lane_usage, validate_lane_balance};

/// Heat result (PyO3 wrapper around [`RaceResult`]).
#[pyclass(name = "RaceResult")]
#[derive(Clone, Debug)]
pub struct PyRaceResult {
    pub inner: RaceResult,
}

#[pymethods]
impl PyRaceResult {
    /// Electronically timed heat. `times_ms` is keyed by lane; `lanes` maps
    /// lanes to cars and is required for the times to count.
    #[staticmethod]
    #[pyo3(signature = (heat_number, times_ms, timestamp, lanes=None))]
    fn timed(
        heat_number: u32,
        times_ms: BTreeMap<u32, f64>,
        timestamp: NaiveDateTime,
        lanes: Option<Vec<LaneAssignment>>,
    ) -> Self {
        Self {
            inner: RaceResult::Timed {
                heat_number,
                times_ms,
                lanes,
                timestamp,
            },
        }
    }

    /// Manually ranked heat.
    #[staticmethod]
    fn ranked(heat_number: u32, rankings: Vec<Placement>, timestamp: NaiveDateTime) -> Self {
        Self {
            inner: RaceResult::RankedManual {
                heat_number,
                rankings,
                timestamp,
            },
        }
    }

    #[getter]
    fn heat_number(&self) -> u32 {
        self.inner.heat_number()
    }

    #[getter]
    fn timestamp(&self) -> NaiveDateTime {
        self.inner.timestamp()
    }

    #[getter]
    fn kind(&self) -> &'static str {
        match self.inner {
            RaceResult::Timed { .. } => "timed",
            RaceResult::RankedManual { .. } => "ranked_manual",
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "RaceResult(kind={}, heat_number={}, timestamp={})",
            self.kind(),
            self.heat_number(),
            self.timestamp()
        )
    }
}

fn into_results(results: Option<Vec<PyRaceResult>>) -> Vec<RaceResult> {
    results
        .unwrap_or_default()
        .into_iter()
        .map(|r| r.inner)
        .collect()
}

fn to_py_err(err: SchedulerError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Generate a full schedule for the roster.
///
/// # Raises
/// * ValueError if fewer than 2 participants are given
#[pyfunction]
#[pyo3(name = "generate_schedule", signature = (participants, lane_count, results=None, options=None))]
fn py_generate_schedule(
    participants: Vec<Participant>,
    lane_count: usize,
    results: Option<Vec<PyRaceResult>>,
    options: Option<SchedulerOptions>,
) -> PyResult<Schedule> {
    let options = options.unwrap_or_default();
    generate_schedule(&participants, lane_count, &into_results(results), &options)
        .map_err(to_py_err)
}

/// Keep heats up to `current_heat_number` and reschedule the rest without the
/// removed racers.
///
/// # Raises
/// * ValueError if fewer than 2 participants remain
#[pyfunction]
#[pyo3(name = "regenerate_after_removal", signature = (schedule, remaining_participants, current_heat_number, lane_count, results=None, options=None))]
fn py_regenerate_after_removal(
    schedule: Schedule,
    remaining_participants: Vec<Participant>,
    current_heat_number: u32,
    lane_count: usize,
    results: Option<Vec<PyRaceResult>>,
    options: Option<SchedulerOptions>,
) -> PyResult<Schedule> {
    let options = options.unwrap_or_default();
    regenerate_after_removal(
        &schedule,
        &remaining_participants,
        current_heat_number,
        lane_count,
        &into_results(results),
        &options,
    )
    .map_err(to_py_err)
}

/// Keep heats up to `current_heat_number` and reschedule the rest including
/// late arrivals.
#[pyfunction]
#[pyo3(name = "regenerate_after_late_arrival", signature = (schedule, all_participants, current_heat_number, lane_count, results=None, options=None))]
fn py_regenerate_after_late_arrival(
    schedule: Schedule,
    all_participants: Vec<Participant>,
    current_heat_number: u32,
    lane_count: usize,
    results: Option<Vec<PyRaceResult>>,
    options: Option<SchedulerOptions>,
) -> PyResult<Schedule> {
    let options = options.unwrap_or_default();
    regenerate_after_late_arrival(
        &schedule,
        &all_participants,
        current_heat_number,
        lane_count,
        &into_results(results),
        &options,
    )
    .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "select_algorithm", signature = (participant_count, lane_count, results=None, options=None))]
fn py_select_algorithm(
    participant_count: usize,
    lane_count: usize,
    results: Option<Vec<PyRaceResult>>,
    options: Option<SchedulerOptions>,
) -> Algorithm {
    let options = options.unwrap_or_default();
    select_algorithm(
        participant_count,
        lane_count,
        &into_results(results),
        &options,
    )
}

#[pyfunction]
#[pyo3(name = "is_known_solvable")]
fn py_is_known_solvable(participant_count: usize, lane_count: usize) -> bool {
    is_known_solvable(participant_count, lane_count)
}

#[pyfunction]
#[pyo3(name = "circle_method")]
fn py_circle_method(participants: Vec<Participant>, lane_count: usize) -> Vec<Heat> {
    circle_method(&participants, lane_count)
}

#[pyfunction]
#[pyo3(name = "greedy_heuristic", signature = (participants, lane_count, speed_groups=None, options=None))]
fn py_greedy_heuristic(
    participants: Vec<Participant>,
    lane_count: usize,
    speed_groups: Option<Vec<SpeedTier>>,
    options: Option<SchedulerOptions>,
) -> Vec<Heat> {
    let options = options.unwrap_or_default();
    greedy_heuristic(
        &participants,
        lane_count,
        speed_groups.as_deref(),
        &options,
    )
}

/// Average time per car number; cars with no data map to infinity.
#[pyfunction]
#[pyo3(name = "calculate_average_times", signature = (participants, results=None))]
fn py_calculate_average_times(
    participants: Vec<Participant>,
    results: Option<Vec<PyRaceResult>>,
) -> BTreeMap<u32, f64> {
    calculate_average_times(&participants, &into_results(results))
}

#[pyfunction]
#[pyo3(name = "group_by_speed", signature = (participants, lane_count, results=None))]
fn py_group_by_speed(
    participants: Vec<Participant>,
    lane_count: usize,
    results: Option<Vec<PyRaceResult>>,
) -> Vec<SpeedTier> {
    group_by_speed(&participants, &into_results(results), lane_count)
}

#[pyfunction]
#[pyo3(name = "validate_lane_balance")]
fn py_validate_lane_balance(schedule: Schedule) -> LaneBalanceReport {
    validate_lane_balance(&schedule)
}

#[pyfunction]
#[pyo3(name = "lane_usage")]
fn py_lane_usage(schedule: Schedule) -> BTreeMap<u32, Vec<u32>> {
    lane_usage(&schedule)
}

/// The heatsched.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Data types
    m.add_class::<Participant>()?;
    m.add_class::<LaneAssignment>()?;
    m.add_class::<Heat>()?;
    m.add_class::<Algorithm>()?;
    m.add_class::<ScheduleMetadata>()?;
    m.add_class::<Schedule>()?;
    m.add_class::<Placement>()?;
    m.add_class::<PyRaceResult>()?;
    m.add_class::<LaneBalanceReport>()?;

    // Config types
    m.add_class::<SchedulerOptions>()?;

    // Scheduling
    m.add_function(wrap_pyfunction!(py_generate_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_regenerate_after_removal, m)?)?;
    m.add_function(wrap_pyfunction!(py_regenerate_after_late_arrival, m)?)?;
    m.add_function(wrap_pyfunction!(py_select_algorithm, m)?)?;
    m.add_function(wrap_pyfunction!(py_is_known_solvable, m)?)?;
    m.add_function(wrap_pyfunction!(py_circle_method, m)?)?;
    m.add_function(wrap_pyfunction!(py_greedy_heuristic, m)?)?;

    // Speed and audit
    m.add_function(wrap_pyfunction!(py_calculate_average_times, m)?)?;
    m.add_function(wrap_pyfunction!(py_group_by_speed, m)?)?;
    m.add_function(wrap_pyfunction!(py_validate_lane_balance, m)?)?;
    m.add_function(wrap_pyfunction!(py_lane_usage, m)?)?;

    Ok(())
}
