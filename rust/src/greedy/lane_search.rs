//! Exact lane assignment by bounded backtracking.
//!
//! For the racers of one heat, tries every permutation of lanes and keeps the
//! one minimizing the worst per-racer lane spread (max lane count minus min
//! lane count) after the heat is added. Racers are explored in input order
//! and lanes in ascending order, so among equally good assignments the first
//! one found wins.

use rustc_hash::FxHashMap;

use crate::config::SchedulerOptions;
use crate::log_search;
use crate::models::{LaneAssignment, Participant};

/// Per-car lane counts, indexed by 0-based lane.
pub type LaneUsage = FxHashMap<u32, Vec<u32>>;

/// Spread of `counts` if `lane` were used once more.
fn spread_after(counts: Option<&Vec<u32>>, lane: usize, lanes: usize) -> u32 {
    let mut max = 0;
    let mut min = u32::MAX;
    for l in 0..lanes {
        let base = counts.and_then(|c| c.get(l)).copied().unwrap_or(0);
        let value = if l == lane { base + 1 } else { base };
        max = max.max(value);
        min = min.min(value);
    }
    max.saturating_sub(min)
}

struct LaneSearch<'a> {
    cars: &'a [Participant],
    usage: &'a LaneUsage,
    lanes: usize,
    budget: u64,
    verbosity: u8,
    nodes: u64,
    exhausted: bool,
    used: Vec<bool>,
    current: Vec<usize>,
    best: Option<Vec<usize>>,
    best_worst: u32,
}

impl<'a> LaneSearch<'a> {
    fn new(
        cars: &'a [Participant],
        usage: &'a LaneUsage,
        lanes: usize,
        options: &SchedulerOptions,
    ) -> Self {
        Self {
            cars,
            usage,
            lanes,
            budget: options.search_node_budget,
            verbosity: options.verbosity,
            nodes: 0,
            exhausted: false,
            used: vec![false; lanes],
            current: Vec::with_capacity(cars.len()),
            best: None,
            best_worst: u32::MAX,
        }
    }

    fn descend(&mut self, depth: usize, worst: u32) {
        // A complete assignment must exist before the budget may cut the search.
        if self.best.is_some() && self.nodes >= self.budget {
            self.exhausted = true;
            return;
        }
        self.nodes += 1;

        if depth == self.cars.len() {
            if worst < self.best_worst {
                log_search!(
                    self.verbosity,
                    "    New best lane assignment {:?} (worst spread {})",
                    self.current,
                    worst
                );
                self.best_worst = worst;
                self.best = Some(self.current.clone());
            }
            return;
        }

        let usage = self.usage;
        let counts = usage.get(&self.cars[depth].car_number);
        for lane in 0..self.lanes {
            if self.used[lane] {
                continue;
            }
            let bound = worst.max(spread_after(counts, lane, self.lanes));
            if bound >= self.best_worst {
                continue;
            }
            self.used[lane] = true;
            self.current.push(lane);
            self.descend(depth + 1, bound);
            self.current.pop();
            self.used[lane] = false;
            if self.exhausted {
                return;
            }
        }
    }
}

/// Assign each selected racer a distinct lane in `1..=effective_lanes`,
/// minimizing the largest lane spread any of them ends up with.
///
/// Returns the assignments ordered by lane. Racers beyond `effective_lanes`
/// are not placed.
pub fn assign_lanes_balanced(
    selected: &[Participant],
    lane_usage: &LaneUsage,
    effective_lanes: usize,
    options: &SchedulerOptions,
) -> Vec<LaneAssignment> {
    let cars = &selected[..selected.len().min(effective_lanes)];
    if cars.is_empty() {
        return Vec::new();
    }

    let mut search = LaneSearch::new(cars, lane_usage, effective_lanes, options);
    search.descend(0, 0);

    if search.exhausted {
        log_search!(
            options.verbosity,
            "    Lane search budget of {} nodes exhausted, using best found (worst spread {})",
            options.search_node_budget,
            search.best_worst
        );
    }

    let Some(best) = search.best else {
        return Vec::new();
    };
    let mut assignments: Vec<LaneAssignment> = cars
        .iter()
        .zip(best)
        .map(|(car, lane)| LaneAssignment::new(lane as u32 + 1, car))
        .collect();
    assignments.sort_by_key(|a| a.lane);
    assignments
}
