//! 0/1 program describing one matching run.
//!
//! A variable is a (requester, provider, slot) triple that both sides can
//! attend and that the requester asked for. Three families of "at most one"
//! constraints keep the assignment bookable, and the objective weights each
//! variable exponentially by preference rank so a better rank always
//! outweighs every worse rank combined.

use crate::models::MatchingInput;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A candidate meeting; `index` is its position in every value vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub index: usize,
    pub requester_id: String,
    pub provider_id: String,
    pub slot: String,
    /// 0 = most preferred
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    AtMost,
}

/// Which booking rule a constraint enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    /// A requester cannot double-book a slot
    RequesterSlot,
    /// A provider cannot double-book a slot
    ProviderSlot,
    /// The same pair meets at most once
    RequesterProvider,
}

/// Linear inequality over the full variable vector
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub family: ConstraintFamily,
    /// Dense, one entry per variable, each 0 or 1
    pub coefficients: Vec<f64>,
    pub rhs: f64,
    pub kind: ConstraintKind,
    support: Vec<usize>,
}

impl Constraint {
    /// `sum(x[i] for i in members) <= 1`
    pub fn at_most_one(family: ConstraintFamily, num_variables: usize, members: &[usize]) -> Self {
        let mut coefficients = vec![0.0; num_variables];
        for &member in members {
            coefficients[member] = 1.0;
        }

        Self {
            family,
            coefficients,
            rhs: 1.0,
            kind: ConstraintKind::AtMost,
            support: members.to_vec(),
        }
    }

    /// Indices with a non-zero coefficient
    #[inline]
    pub fn support(&self) -> &[usize] {
        &self.support
    }

    #[inline]
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.support
            .iter()
            .map(|&i| self.coefficients[i] * values.get(i).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether `activity` (a precomputed lhs) respects the bound
    #[inline]
    pub fn admits(&self, activity: f64, tolerance: f64) -> bool {
        match self.kind {
            ConstraintKind::AtMost => activity <= self.rhs + tolerance,
        }
    }

    #[inline]
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.admits(self.lhs(values), tolerance)
    }
}

/// Weight of a preference at `rank` out of `preference_count`
///
/// `base^(preference_count - rank - 1)`, so the last choice weighs 1.
#[inline]
pub fn preference_weight(base: f64, preference_count: usize, rank: usize) -> f64 {
    let exponent = preference_count.saturating_sub(rank + 1);
    base.powi(i32::try_from(exponent).unwrap_or(i32::MAX))
}

/// Variables, constraints and objective for one solve
#[derive(Debug, Clone)]
pub struct Problem {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Vec<f64>,
    columns: Vec<Vec<usize>>,
}

impl Problem {
    /// Build the model from an input
    ///
    /// Variables are generated in requester order, then preference rank, then
    /// event slot order; that order is also the solvers' tie-break order.
    /// Preferences naming an unknown provider, and repeats of a provider
    /// already ranked higher, produce no variables.
    pub fn build(input: &MatchingInput, weight_base: f64) -> Self {
        let provider_slots: HashMap<&str, HashSet<&str>> = input
            .providers
            .iter()
            .map(|p| {
                (
                    p.id.as_str(),
                    p.available_slots.iter().map(String::as_str).collect(),
                )
            })
            .collect();

        let mut variables = Vec::new();
        let mut objective = Vec::new();

        for requester in &input.requesters {
            let requester_slots: HashSet<&str> =
                requester.available_slots.iter().map(String::as_str).collect();
            let preference_count = requester.preferences.len();
            let mut ranked = HashSet::new();

            for (rank, provider_id) in requester.preferences.iter().enumerate() {
                if !ranked.insert(provider_id.as_str()) {
                    continue;
                }
                let Some(available) = provider_slots.get(provider_id.as_str()) else {
                    continue;
                };

                let weight = preference_weight(weight_base, preference_count, rank);
                for slot in &input.slots {
                    if requester_slots.contains(slot.as_str()) && available.contains(slot.as_str()) {
                        variables.push(Variable {
                            index: variables.len(),
                            requester_id: requester.id.clone(),
                            provider_id: provider_id.clone(),
                            slot: slot.clone(),
                            rank,
                        });
                        objective.push(weight);
                    }
                }
            }
        }

        let constraints = build_constraints(&variables);
        Self::from_parts(variables, constraints, objective)
    }

    /// Assemble a problem from explicit parts
    ///
    /// `objective` must have one entry per variable and every constraint must
    /// be sized to the variable count.
    pub fn from_parts(
        variables: Vec<Variable>,
        constraints: Vec<Constraint>,
        objective: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(variables.len(), objective.len());
        debug_assert!(constraints
            .iter()
            .all(|c| c.coefficients.len() == variables.len()));

        let mut columns = vec![Vec::new(); variables.len()];
        for (row, constraint) in constraints.iter().enumerate() {
            for &var in constraint.support() {
                columns[var].push(row);
            }
        }

        Self {
            variables,
            constraints,
            objective,
            columns,
        }
    }

    #[inline]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[inline]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Rows in which `var` has a non-zero coefficient
    #[inline]
    pub fn column(&self, var: usize) -> &[usize] {
        &self.columns[var]
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .zip(values)
            .map(|(weight, value)| weight * value)
            .sum()
    }

    /// Left-hand side of every constraint
    pub fn activities(&self, values: &[f64]) -> Vec<f64> {
        self.constraints.iter().map(|c| c.lhs(values)).collect()
    }

    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.num_variables()
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(values, tolerance))
    }

    /// Whether every row activity respects its bound
    pub fn activities_feasible(&self, activities: &[f64], tolerance: f64) -> bool {
        self.constraints
            .iter()
            .zip(activities)
            .all(|(c, &activity)| c.admits(activity, tolerance))
    }

    /// Whether moving `var` by `delta` keeps every row it touches feasible
    pub fn admits_shift(&self, var: usize, delta: f64, activities: &[f64], tolerance: f64) -> bool {
        self.columns[var].iter().all(|&row| {
            let constraint = &self.constraints[row];
            constraint.admits(activities[row] + constraint.coefficients[var] * delta, tolerance)
        })
    }

    /// Apply a move of `var` by `delta` to the row activities
    pub fn shift(&self, var: usize, delta: f64, activities: &mut [f64]) {
        for &row in &self.columns[var] {
            activities[row] += self.constraints[row].coefficients[var] * delta;
        }
    }

    /// Whether `var` sits in a row that is currently over its bound
    pub fn in_violated_row(&self, var: usize, activities: &[f64], tolerance: f64) -> bool {
        self.columns[var]
            .iter()
            .any(|&row| !self.constraints[row].admits(activities[row], tolerance))
    }
}

fn build_constraints(variables: &[Variable]) -> Vec<Constraint> {
    let n = variables.len();
    let families = [
        (
            ConstraintFamily::RequesterSlot,
            group_by(variables, |v| (v.requester_id.as_str(), v.slot.as_str())),
        ),
        (
            ConstraintFamily::ProviderSlot,
            group_by(variables, |v| (v.provider_id.as_str(), v.slot.as_str())),
        ),
        (
            ConstraintFamily::RequesterProvider,
            group_by(variables, |v| (v.requester_id.as_str(), v.provider_id.as_str())),
        ),
    ];

    families
        .into_iter()
        .flat_map(|(family, groups)| {
            groups
                .into_iter()
                .map(move |members| Constraint::at_most_one(family, n, &members))
        })
        .collect()
}

/// Group variable indices by key, groups in order of first appearance
fn group_by<'a, K, F>(variables: &'a [Variable], key: F) -> Vec<Vec<usize>>
where
    K: Eq + Hash,
    F: Fn(&'a Variable) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for variable in variables {
        let position = *positions.entry(key(variable)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[position].push(variable.index);
    }

    groups
}
