//! Configuration for schedule generation.

use pyo3::prelude::*;

/// Default node budget for the lane assignment search.
///
/// Eight lanes need at most 8! leaves, well under this.
pub const DEFAULT_SEARCH_NODE_BUDGET: u64 = 2_000_000;

/// Options controlling algorithm selection and search limits.
#[pyclass]
#[derive(Clone, Debug)]
pub struct SchedulerOptions {
    /// Group racers into speed tiers when prior results exist.
    #[pyo3(get, set)]
    pub speed_matching: bool,
    /// Verbosity level: 0=silent, 1=decisions, 2=heats, 3=search.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Maximum search nodes visited per heat before settling for the best
    /// assignment found so far.
    #[pyo3(get, set)]
    pub search_node_budget: u64,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            speed_matching: true,
            verbosity: 0,
            search_node_budget: DEFAULT_SEARCH_NODE_BUDGET,
        }
    }
}

#[pymethods]
impl SchedulerOptions {
    #[new]
    #[pyo3(signature = (speed_matching=None, verbosity=None, search_node_budget=None))]
    fn new(
        speed_matching: Option<bool>,
        verbosity: Option<u8>,
        search_node_budget: Option<u64>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            speed_matching: speed_matching.unwrap_or(defaults.speed_matching),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            search_node_budget: search_node_budget.unwrap_or(defaults.search_node_budget),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SchedulerOptions(speed_matching={}, verbosity={}, search_node_budget={})",
            self.speed_matching, self.verbosity, self.search_node_budget
        )
    }
}
