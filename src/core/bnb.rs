//! Best-first branch-and-bound over the 0/1 matching program.
//!
//! Each node carries its own lower/upper bound vectors and is evaluated by a
//! `RelaxationOracle`. Nodes whose relaxation is infeasible or cannot beat
//! the incumbent are pruned; integral relaxations become incumbent
//! candidates; fractional ones are split on their most fractional variable.
//! The search stops when the queue is empty, when the iteration or
//! wall-clock budget runs out, or when the incumbent is within the
//! early-termination fraction of the node bound being branched on.
//!
//! Nodes never share state, so the order in which they are expanded only
//! affects which incumbent is found first, never correctness.

use crate::core::greedy::GreedySolver;
use crate::core::local_search::LocalSearchRefiner;
use crate::core::params::SolverParams;
use crate::core::problem::Problem;
use crate::core::solution::{most_fractional, Solution};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Instant;

/// A sub-problem: every variable boxed to `[lower[i], upper[i]]`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Relaxation value inherited from the parent, +inf at the root
    pub bound: f64,
    pub depth: usize,
}

impl SearchNode {
    pub fn root(num_variables: usize) -> Self {
        Self {
            lower: vec![0.0; num_variables],
            upper: vec![1.0; num_variables],
            bound: f64::INFINITY,
            depth: 0,
        }
    }

    /// Split on `var` at `value`: `(x <= floor(value), x >= ceil(value))`
    pub fn branch(&self, var: usize, value: f64, bound: f64) -> (SearchNode, SearchNode) {
        let mut down = self.clone();
        down.upper[var] = value.floor();
        down.bound = bound;
        down.depth += 1;

        let mut up = self.clone();
        up.lower[var] = value.ceil();
        up.bound = bound;
        up.depth += 1;

        (down, up)
    }
}

/// Estimates the best objective reachable inside a node
pub trait RelaxationOracle {
    fn relax(&mut self, problem: &Problem, node: &SearchNode) -> Solution;
}

/// Why the search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every open node was expanded or pruned
    Exhausted,
    IterationLimit,
    TimeLimit,
    /// The incumbent came within the early-termination fraction of the bound
    GapClosed,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminationReason::Exhausted => "exhausted",
            TerminationReason::IterationLimit => "iteration limit",
            TerminationReason::TimeLimit => "time limit",
            TerminationReason::GapClosed => "gap closed",
        };
        f.write_str(name)
    }
}

/// Counters collected during one search
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BnbStatistics {
    pub iterations: u64,
    pub max_depth: u64,
    pub branches: u64,
    pub prunings_infeasible: u64,
    pub prunings_bound: u64,
    pub incumbent_updates: u64,
    pub elapsed_seconds: f64,
}

impl BnbStatistics {
    #[inline]
    fn on_iteration(&mut self, depth: usize) {
        self.iterations = self.iterations.saturating_add(1);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    #[inline]
    fn on_branch(&mut self) {
        self.branches = self.branches.saturating_add(1);
    }

    #[inline]
    fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    fn on_incumbent(&mut self) {
        self.incumbent_updates = self.incumbent_updates.saturating_add(1);
    }
}

impl fmt::Display for BnbStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iterations={} depth={} branches={} pruned(infeasible={}, bound={}) incumbents={} elapsed={:.3}s",
            self.iterations,
            self.max_depth,
            self.branches,
            self.prunings_infeasible,
            self.prunings_bound,
            self.incumbent_updates,
            self.elapsed_seconds
        )
    }
}

/// What the search produced
#[derive(Debug, Clone)]
pub struct BnbOutcome {
    /// Best integral solution, or the infeasible placeholder
    pub solution: Solution,
    pub termination: TerminationReason,
    pub statistics: BnbStatistics,
}

/// Heap entry: highest bound first, then oldest first
#[derive(Debug)]
struct QueuedNode {
    node: SearchNode,
    sequence: u64,
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.node
            .bound
            .total_cmp(&other.node.bound)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

#[derive(Debug, Default)]
struct NodeQueue {
    heap: BinaryHeap<QueuedNode>,
    pushed: u64,
}

impl NodeQueue {
    fn push(&mut self, node: SearchNode) {
        self.heap.push(QueuedNode {
            node,
            sequence: self.pushed,
        });
        self.pushed += 1;
    }

    fn pop(&mut self) -> Option<SearchNode> {
        self.heap.pop().map(|queued| queued.node)
    }
}

/// Exact solver for the matching program
#[derive(Debug, Clone, Copy)]
pub struct BranchAndBoundSolver {
    params: SolverParams,
}

impl BranchAndBoundSolver {
    pub fn new(params: SolverParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Solve with the local-search refiner, seeded by a greedy solution
    pub fn solve(&self, problem: &Problem) -> BnbOutcome {
        let start = GreedySolver::new(self.params.tolerance).solve(problem);
        let mut oracle =
            LocalSearchRefiner::new(start, self.params.local_search_passes, self.params.tolerance);
        self.solve_with_oracle(problem, &mut oracle)
    }

    /// Solve using a caller-provided relaxation oracle
    pub fn solve_with_oracle<O>(&self, problem: &Problem, oracle: &mut O) -> BnbOutcome
    where
        O: RelaxationOracle,
    {
        let started = Instant::now();
        let deadline = started.checked_add(self.params.time_limit);
        let tolerance = self.params.tolerance;
        let threshold = self.params.early_termination_threshold;

        let mut statistics = BnbStatistics::default();
        let mut incumbent = Solution::infeasible();
        let mut queue = NodeQueue::default();
        queue.push(SearchNode::root(problem.num_variables()));

        let termination = loop {
            if statistics.iterations >= self.params.max_iterations as u64 {
                break TerminationReason::IterationLimit;
            }
            if deadline.map_or(false, |deadline| Instant::now() >= deadline) {
                break TerminationReason::TimeLimit;
            }
            let Some(node) = queue.pop() else {
                break TerminationReason::Exhausted;
            };

            statistics.on_iteration(node.depth);
            let relaxed = oracle.relax(problem, &node);

            if !relaxed.is_feasible {
                tracing::trace!("Pruned infeasible node at depth {}", node.depth);
                statistics.on_pruning_infeasible();
                continue;
            }

            if incumbent.is_feasible && relaxed.objective_value <= incumbent.objective_value {
                tracing::trace!(
                    "Pruned node at depth {} (bound {} <= incumbent {})",
                    node.depth,
                    relaxed.objective_value,
                    incumbent.objective_value
                );
                statistics.on_pruning_bound();
                continue;
            }

            match most_fractional(&relaxed.values, tolerance) {
                None => {
                    tracing::trace!(
                        "New incumbent {} at depth {}",
                        relaxed.objective_value,
                        node.depth
                    );
                    incumbent = relaxed;
                    statistics.on_incumbent();
                }
                Some(var) => {
                    if incumbent.is_feasible
                        && relaxed.objective_value * threshold <= incumbent.objective_value
                    {
                        break TerminationReason::GapClosed;
                    }

                    let (down, up) = node.branch(var, relaxed.values[var], relaxed.objective_value);
                    tracing::trace!(
                        "Branching on variable {} (value {}) at depth {}",
                        var,
                        relaxed.values[var],
                        node.depth
                    );
                    queue.push(down);
                    queue.push(up);
                    statistics.on_branch();
                }
            }
        };

        statistics.elapsed_seconds = started.elapsed().as_secs_f64();
        tracing::debug!(
            "Branch-and-bound stopped ({}): objective {}, {}",
            termination,
            incumbent.objective_value,
            statistics
        );

        BnbOutcome {
            solution: incumbent,
            termination,
            statistics,
        }
    }
}

impl Default for BranchAndBoundSolver {
    fn default() -> Self {
        Self::new(SolverParams::default())
    }
}
