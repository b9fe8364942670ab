//! Core data types for heat scheduling.

use chrono::NaiveDateTime;
use pyo3::prelude::*;
use std::collections::BTreeMap;
use std::fmt;

/// A racer on the roster. `car_number` is the identity key.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    #[pyo3(get, set)]
    pub car_number: u32,
    #[pyo3(get, set)]
    pub name: String,
}

impl Participant {
    pub fn new(car_number: u32, name: impl Into<String>) -> Self {
        Self {
            car_number,
            name: name.into(),
        }
    }
}

#[pymethods]
impl Participant {
    #[new]
    fn py_new(car_number: u32, name: String) -> Self {
        Self { car_number, name }
    }

    fn __repr__(&self) -> String {
        format!(
            "Participant(car_number={}, name={:?})",
            self.car_number, self.name
        )
    }
}

/// One racer placed on one lane (1-based) of a heat.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaneAssignment {
    #[pyo3(get, set)]
    pub lane: u32,
    #[pyo3(get, set)]
    pub car_number: u32,
    #[pyo3(get, set)]
    pub name: String,
}

impl LaneAssignment {
    pub fn new(lane: u32, participant: &Participant) -> Self {
        Self {
            lane,
            car_number: participant.car_number,
            name: participant.name.clone(),
        }
    }
}

#[pymethods]
impl LaneAssignment {
    #[new]
    fn py_new(lane: u32, car_number: u32, name: String) -> Self {
        Self {
            lane,
            car_number,
            name,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "LaneAssignment(lane={}, car_number={}, name={:?})",
            self.lane, self.car_number, self.name
        )
    }
}

/// A single heat. `lanes` is ordered by lane number.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heat {
    #[pyo3(get, set)]
    pub heat_number: u32,
    #[pyo3(get, set)]
    pub lanes: Vec<LaneAssignment>,
}

impl Heat {
    pub fn new(heat_number: u32, lanes: Vec<LaneAssignment>) -> Self {
        Self { heat_number, lanes }
    }

    pub fn contains(&self, car_number: u32) -> bool {
        self.lanes.iter().any(|a| a.car_number == car_number)
    }
}

#[pymethods]
impl Heat {
    #[new]
    fn py_new(heat_number: u32, lanes: Vec<LaneAssignment>) -> Self {
        Self::new(heat_number, lanes)
    }

    fn __repr__(&self) -> String {
        let cars: Vec<u32> = self.lanes.iter().map(|a| a.car_number).collect();
        format!("Heat(heat_number={}, cars={:?})", self.heat_number, cars)
    }
}

/// Which pipeline produced a schedule.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    CircleMethod,
    GreedyHeuristic,
    SpeedMatchedGreedy,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::CircleMethod => "circle_method",
            Algorithm::GreedyHeuristic => "greedy_heuristic",
            Algorithm::SpeedMatchedGreedy => "speed_matched_greedy",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive facts about how a schedule was built.
///
/// Never read back by the scheduler itself.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleMetadata {
    #[pyo3(get)]
    pub algorithm: Algorithm,
    #[pyo3(get)]
    pub total_heats: usize,
    /// Number of cars in each heat, in heat order.
    #[pyo3(get)]
    pub cars_per_heat: Vec<usize>,
    /// `min(lane_count, participants)` for the generation that produced the
    /// unfrozen heats.
    #[pyo3(get)]
    pub lane_count: usize,
    #[pyo3(get)]
    pub lane_balance_perfect: bool,
    #[pyo3(get)]
    pub speed_matched: bool,
    /// Number of speed tiers scheduled (1 when untiered).
    #[pyo3(get)]
    pub tier_count: usize,
    /// Heats carried over verbatim by a regeneration.
    #[pyo3(get)]
    pub frozen_heats: usize,
}

#[pymethods]
impl ScheduleMetadata {
    fn __repr__(&self) -> String {
        format!(
            "ScheduleMetadata(algorithm={}, total_heats={}, lane_balance_perfect={}, speed_matched={})",
            self.algorithm, self.total_heats, self.lane_balance_perfect, self.speed_matched
        )
    }
}

/// A complete heat schedule.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    #[pyo3(get)]
    pub heats: Vec<Heat>,
    #[pyo3(get)]
    pub metadata: ScheduleMetadata,
}

impl Schedule {
    /// Recompute the heat-derived metadata fields after `heats` changed.
    pub(crate) fn refresh_counts(&mut self) {
        self.metadata.total_heats = self.heats.len();
        self.metadata.cars_per_heat = self.heats.iter().map(|h| h.lanes.len()).collect();
    }
}

#[pymethods]
impl Schedule {
    fn __repr__(&self) -> String {
        format!(
            "Schedule(heats={}, algorithm={})",
            self.heats.len(),
            self.metadata.algorithm
        )
    }
}

/// A manually entered finishing place.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    #[pyo3(get, set)]
    pub car_number: u32,
    #[pyo3(get, set)]
    pub place: u32,
}

#[pymethods]
impl Placement {
    #[new]
    pub fn new(car_number: u32, place: u32) -> Self {
        Self { car_number, place }
    }

    fn __repr__(&self) -> String {
        format!(
            "Placement(car_number={}, place={})",
            self.car_number, self.place
        )
    }
}

/// Outcome of one heat.
#[derive(Clone, Debug, PartialEq)]
pub enum RaceResult {
    /// Electronic timing, keyed by lane.
    ///
    /// `lanes` maps those lanes back to cars; without it the times cannot be
    /// attributed and the result is ignored for speed estimates.
    Timed {
        heat_number: u32,
        times_ms: BTreeMap<u32, f64>,
        lanes: Option<Vec<LaneAssignment>>,
        timestamp: NaiveDateTime,
    },
    /// Finishing order typed in by hand.
    RankedManual {
        heat_number: u32,
        rankings: Vec<Placement>,
        timestamp: NaiveDateTime,
    },
}

impl RaceResult {
    pub fn heat_number(&self) -> u32 {
        match self {
            RaceResult::Timed { heat_number, .. }
            | RaceResult::RankedManual { heat_number, .. } => *heat_number,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            RaceResult::Timed { timestamp, .. } | RaceResult::RankedManual { timestamp, .. } => {
                *timestamp
            }
        }
    }
}

/// Outcome of a lane balance audit.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaneBalanceReport {
    #[pyo3(get)]
    pub valid: bool,
    #[pyo3(get)]
    pub errors: Vec<String>,
}

#[pymethods]
impl LaneBalanceReport {
    fn __repr__(&self) -> String {
        format!(
            "LaneBalanceReport(valid={}, errors={})",
            self.valid,
            self.errors.len()
        )
    }
}
