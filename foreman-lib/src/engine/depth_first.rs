//! Chronological depth-first search with bounds propagation.
//!
//! The searcher keeps a lower and an upper bound per variable and a trail of bound changes so
//! that backtracking is a series of pops. At every node the constraints are swept to a fixpoint;
//! a sweep either tightens bounds or detects a conflict, in which case the most recent decision
//! is revised. Optimisation is branch-and-bound: each incumbent tightens the bound on the
//! objective variable, and exhausting the tree proves the last incumbent optimal.

use log::debug;

use crate::constraints::ConstraintRepr;
use crate::constraints::PostedConstraint;
use crate::containers::KeyedVec;
use crate::engine::SearchBackend;
use crate::engine::SearchOutcome;
use crate::model::BoolVar;
use crate::model::LinearTerm;
use crate::model::Model;
use crate::model::OptimisationDirection;
use crate::model::VariableId;
use crate::results::Solution;
use crate::statistics::SolveStatistics;
use crate::termination::TerminationCondition;

/// The default sequential backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthFirstSearcher {
    statistics: SolveStatistics,
}

impl SearchBackend for DepthFirstSearcher {
    fn search(
        &mut self,
        model: &Model,
        termination: &mut dyn TerminationCondition,
    ) -> SearchOutcome {
        self.statistics = SolveStatistics::default();
        SearchState::initialise(model).run(termination, &mut self.statistics)
    }

    fn statistics(&self) -> &SolveStatistics {
        &self.statistics
    }
}

struct Conflict;

/// A bound change that can be undone.
struct TrailEntry {
    variable: VariableId,
    lower_bound: i32,
    upper_bound: i32,
}

/// A branching point together with the values that remain to be tried for its variable.
struct Decision {
    variable: VariableId,
    candidates: Vec<i32>,
    next_candidate: usize,
    trail_mark: usize,
}

struct Incumbent {
    objective_value: i32,
    values: Vec<i32>,
}

struct SearchState<'model> {
    model: &'model Model,
    lower: KeyedVec<VariableId, i32>,
    upper: KeyedVec<VariableId, i32>,
    trail: Vec<TrailEntry>,
    decisions: Vec<Decision>,
    /// Variables in branching order: booleans first, then integers, each in creation order.
    branch_order: Vec<VariableId>,
    incumbent: Option<Incumbent>,
}

impl<'model> SearchState<'model> {
    fn initialise(model: &'model Model) -> SearchState<'model> {
        let infos = model.variable_infos();
        let lower: Vec<i32> = infos.iter().map(|info| info.lower_bound).collect();
        let upper: Vec<i32> = infos.iter().map(|info| info.upper_bound).collect();

        let mut branch_order: Vec<VariableId> =
            infos.keys().filter(|id| infos[*id].is_boolean).collect();
        branch_order.extend(infos.keys().filter(|id| !infos[*id].is_boolean));

        SearchState {
            model,
            lower: lower.into(),
            upper: upper.into(),
            trail: Vec::new(),
            decisions: Vec::new(),
            branch_order,
            incumbent: None,
        }
    }

    fn run(
        mut self,
        termination: &mut dyn TerminationCondition,
        statistics: &mut SolveStatistics,
    ) -> SearchOutcome {
        loop {
            if termination.should_stop() {
                debug!("search stopped by the termination condition");
                return match self.incumbent.take() {
                    Some(incumbent) => SearchOutcome::Feasible(solution_from(incumbent.values)),
                    None => SearchOutcome::Stopped,
                };
            }

            match self.propagate(statistics) {
                Err(Conflict) => {
                    statistics.conflicts += 1;
                    if !self.backtrack(statistics) {
                        return self.exhausted();
                    }
                }
                Ok(()) => {
                    if let Some(variable) = self.next_unfixed() {
                        self.branch(variable, statistics);
                    } else if let Some((_, objective)) = self.model.objective() {
                        self.verify_leaf();

                        let objective_value = self.lower[objective.id];
                        debug!("incumbent solution with objective value {objective_value}");
                        self.incumbent = Some(Incumbent {
                            objective_value,
                            values: self.assignment(),
                        });

                        if !self.backtrack(statistics) {
                            return self.exhausted();
                        }
                    } else {
                        self.verify_leaf();
                        return SearchOutcome::Optimal(solution_from(self.assignment()));
                    }
                }
            }
        }
    }

    /// The conclusion once the tree is exhausted: the incumbent is optimal, or there is none and
    /// the model is infeasible.
    fn exhausted(&mut self) -> SearchOutcome {
        match self.incumbent.take() {
            Some(incumbent) => SearchOutcome::Optimal(solution_from(incumbent.values)),
            None => SearchOutcome::Infeasible,
        }
    }

    fn assignment(&self) -> Vec<i32> {
        debug_assert!(self
            .branch_order
            .iter()
            .all(|&id| self.lower[id] == self.upper[id]));
        self.lower.iter().copied().collect()
    }

    fn next_unfixed(&self) -> Option<VariableId> {
        self.branch_order
            .iter()
            .copied()
            .find(|&id| self.lower[id] < self.upper[id])
    }

    fn branch(&mut self, variable: VariableId, statistics: &mut SolveStatistics) {
        let candidates = self.candidate_values(variable);
        debug_assert!(!candidates.is_empty());

        let decision = Decision {
            variable,
            candidates,
            next_candidate: 1,
            trail_mark: self.trail.len(),
        };

        statistics.decisions += 1;
        self.assign(variable, decision.candidates[0]);
        self.decisions.push(decision);
        statistics.peak_search_depth =
            statistics.peak_search_depth.max(self.decisions.len() as u64);
    }

    /// The values to try for a variable, most promising first: the hinted value if there is one,
    /// then the rest of the current domain by increasing distance from zero.
    fn candidate_values(&self, variable: VariableId) -> Vec<i32> {
        let mut values: Vec<i32> = (self.lower[variable]..=self.upper[variable]).collect();
        values.sort_by_key(|&value| (value.abs(), value));

        if let Some(hint) = self.model.variable_infos()[variable].hint {
            if let Some(position) = values.iter().position(|&value| value == hint) {
                values[..=position].rotate_right(1);
            }
        }

        values
    }

    /// Revise the most recent decision that still has untried values. Returns false when the
    /// tree is exhausted.
    fn backtrack(&mut self, statistics: &mut SolveStatistics) -> bool {
        while let Some(mut decision) = self.decisions.pop() {
            self.restore_to(decision.trail_mark);

            if decision.next_candidate < decision.candidates.len() {
                let value = decision.candidates[decision.next_candidate];
                decision.next_candidate += 1;

                statistics.decisions += 1;
                self.assign(decision.variable, value);
                self.decisions.push(decision);
                return true;
            }
        }

        false
    }

    fn restore_to(&mut self, trail_mark: usize) {
        while self.trail.len() > trail_mark {
            let entry = self
                .trail
                .pop()
                .expect("the trail is longer than the mark");
            self.lower[entry.variable] = entry.lower_bound;
            self.upper[entry.variable] = entry.upper_bound;
        }
    }

    fn assign(&mut self, variable: VariableId, value: i32) {
        debug_assert!(self.lower[variable] <= value && value <= self.upper[variable]);
        self.trail.push(TrailEntry {
            variable,
            lower_bound: self.lower[variable],
            upper_bound: self.upper[variable],
        });
        self.lower[variable] = value;
        self.upper[variable] = value;
    }

    /// Raise the lower bound of a variable. Returns whether the bound changed, or a conflict if
    /// the domain would empty.
    fn tighten_lower(
        &mut self,
        variable: VariableId,
        bound: i32,
        statistics: &mut SolveStatistics,
    ) -> Result<bool, Conflict> {
        if bound > self.upper[variable] {
            return Err(Conflict);
        }

        if bound > self.lower[variable] {
            self.trail.push(TrailEntry {
                variable,
                lower_bound: self.lower[variable],
                upper_bound: self.upper[variable],
            });
            self.lower[variable] = bound;
            statistics.propagations += 1;
            return Ok(true);
        }

        Ok(false)
    }

    fn tighten_upper(
        &mut self,
        variable: VariableId,
        bound: i32,
        statistics: &mut SolveStatistics,
    ) -> Result<bool, Conflict> {
        if bound < self.lower[variable] {
            return Err(Conflict);
        }

        if bound < self.upper[variable] {
            self.trail.push(TrailEntry {
                variable,
                lower_bound: self.lower[variable],
                upper_bound: self.upper[variable],
            });
            self.upper[variable] = bound;
            statistics.propagations += 1;
            return Ok(true);
        }

        Ok(false)
    }

    /// Sweep all constraints until no bound changes, starting from the incumbent-derived bound
    /// on the objective so pruning survives backtracking.
    fn propagate(&mut self, statistics: &mut SolveStatistics) -> Result<(), Conflict> {
        self.prune_against_incumbent(statistics)?;

        let model = self.model;
        let mut changed = true;
        while changed {
            changed = false;

            for constraint in model.posted_constraints() {
                self.propagate_constraint(constraint, &mut changed, statistics)?;
            }
        }

        Ok(())
    }

    fn prune_against_incumbent(
        &mut self,
        statistics: &mut SolveStatistics,
    ) -> Result<(), Conflict> {
        let Some((direction, objective)) = self.model.objective() else {
            return Ok(());
        };
        let Some(incumbent_value) = self
            .incumbent
            .as_ref()
            .map(|incumbent| incumbent.objective_value)
        else {
            return Ok(());
        };

        match direction {
            OptimisationDirection::Minimise => {
                let _ = self.tighten_upper(
                    objective.id,
                    incumbent_value.saturating_sub(1),
                    statistics,
                )?;
            }
            OptimisationDirection::Maximise => {
                let _ = self.tighten_lower(
                    objective.id,
                    incumbent_value.saturating_add(1),
                    statistics,
                )?;
            }
        }

        Ok(())
    }

    /// Propagate one constraint. A conditional constraint is inert until every enforcement
    /// boolean is fixed true; a falsified enforcement boolean makes it vacuous, which to the
    /// propagator is the same thing.
    fn propagate_constraint(
        &mut self,
        constraint: &PostedConstraint,
        changed: &mut bool,
        statistics: &mut SolveStatistics,
    ) -> Result<(), Conflict> {
        if constraint
            .enforced_by
            .iter()
            .any(|condition| self.lower[condition.id] == 0)
        {
            return Ok(());
        }

        match &constraint.repr {
            ConstraintRepr::ExactlyOne { literals } => {
                self.propagate_exactly_one(literals, changed, statistics)
            }
            ConstraintRepr::AtMostOne { literals } => {
                self.propagate_at_most_one(literals, changed, statistics)
            }
            ConstraintRepr::LinearLessEqual { terms, rhs } => {
                self.propagate_linear(terms, *rhs, false, changed, statistics)
            }
            ConstraintRepr::LinearEqual { terms, rhs } => {
                self.propagate_linear(terms, *rhs, false, changed, statistics)?;
                self.propagate_linear(terms, *rhs, true, changed, statistics)
            }
            ConstraintRepr::AbsoluteValue { signed, absolute } => {
                self.propagate_absolute(signed.id, absolute.id, changed, statistics)
            }
        }
    }

    fn propagate_exactly_one(
        &mut self,
        literals: &[BoolVar],
        changed: &mut bool,
        statistics: &mut SolveStatistics,
    ) -> Result<(), Conflict> {
        let mut fixed_true = 0_usize;
        let mut unfixed = 0_usize;
        for literal in literals {
            if self.lower[literal.id] == 1 {
                fixed_true += 1;
            } else if self.upper[literal.id] == 1 {
                unfixed += 1;
            }
        }

        if fixed_true > 1 || (fixed_true == 0 && unfixed == 0) {
            return Err(Conflict);
        }

        if fixed_true == 1 {
            for literal in literals {
                if self.lower[literal.id] == 0 {
                    *changed |= self.tighten_upper(literal.id, 0, statistics)?;
                }
            }
        } else if fixed_true == 0 && unfixed == 1 {
            for literal in literals {
                if self.lower[literal.id] == 0 && self.upper[literal.id] == 1 {
                    *changed |= self.tighten_lower(literal.id, 1, statistics)?;
                }
            }
        }

        Ok(())
    }

    fn propagate_at_most_one(
        &mut self,
        literals: &[BoolVar],
        changed: &mut bool,
        statistics: &mut SolveStatistics,
    ) -> Result<(), Conflict> {
        let fixed_true = literals
            .iter()
            .filter(|literal| self.lower[literal.id] == 1)
            .count();

        if fixed_true > 1 {
            return Err(Conflict);
        }

        if fixed_true == 1 {
            for literal in literals {
                if self.lower[literal.id] == 0 {
                    *changed |= self.tighten_upper(literal.id, 0, statistics)?;
                }
            }
        }

        Ok(())
    }

    /// Bounds filtering for `Σ w_i x_i <= rhs`, or for the negated inequality when `negate` is
    /// set, which turns the equality constraint into two passes over the same terms.
    ///
    /// With every other term at its minimum, term `i` can use at most `slack` beyond its own
    /// minimum, which caps `x_i` at `lb_i + slack / w_i` for positive weights and floors it at
    /// `ub_i - slack / (-w_i)` for negative ones. All arithmetic is in `i64` so weighted sums of
    /// `i32` bounds cannot overflow.
    fn propagate_linear(
        &mut self,
        terms: &[LinearTerm],
        rhs: i32,
        negate: bool,
        changed: &mut bool,
        statistics: &mut SolveStatistics,
    ) -> Result<(), Conflict> {
        let sign: i64 = if negate { -1 } else { 1 };
        let rhs = sign * i64::from(rhs);

        let mut minimum_sum: i64 = 0;
        for term in terms {
            let weight = sign * i64::from(term.weight);
            minimum_sum += if weight >= 0 {
                weight * i64::from(self.lower[term.variable])
            } else {
                weight * i64::from(self.upper[term.variable])
            };
        }

        let slack = rhs - minimum_sum;
        if slack < 0 {
            return Err(Conflict);
        }

        for term in terms {
            let weight = sign * i64::from(term.weight);

            if weight > 0 {
                let maximum_value = i64::from(self.lower[term.variable]) + slack / weight;
                if maximum_value < i64::from(self.upper[term.variable]) {
                    *changed |= self.tighten_upper(term.variable, maximum_value as i32, statistics)?;
                }
            } else if weight < 0 {
                let minimum_value = i64::from(self.upper[term.variable]) - slack / (-weight);
                if minimum_value > i64::from(self.lower[term.variable]) {
                    *changed |= self.tighten_lower(term.variable, minimum_value as i32, statistics)?;
                }
            }
        }

        Ok(())
    }

    fn propagate_absolute(
        &mut self,
        signed: VariableId,
        absolute: VariableId,
        changed: &mut bool,
        statistics: &mut SolveStatistics,
    ) -> Result<(), Conflict> {
        let signed_lower = self.lower[signed];
        let signed_upper = self.upper[signed];

        let magnitude_upper = signed_lower
            .saturating_abs()
            .max(signed_upper.saturating_abs());
        *changed |= self.tighten_upper(absolute, magnitude_upper, statistics)?;

        let magnitude_lower = if signed_lower > 0 {
            signed_lower
        } else if signed_upper < 0 {
            signed_upper.saturating_neg()
        } else {
            0
        };
        *changed |= self.tighten_lower(absolute, magnitude_lower, statistics)?;

        // The magnitude bound confines the signed variable to [-ub, ub].
        *changed |= self.tighten_lower(signed, -self.upper[absolute], statistics)?;
        *changed |= self.tighten_upper(signed, self.upper[absolute], statistics)?;

        if self.lower[signed] >= 0 {
            // Sign known non-negative: the two variables coincide.
            *changed |= self.tighten_lower(signed, self.lower[absolute], statistics)?;
            *changed |= self.tighten_upper(absolute, self.upper[signed], statistics)?;
            *changed |= self.tighten_lower(absolute, self.lower[signed], statistics)?;
        } else if self.upper[signed] <= 0 {
            // Sign known non-positive: the signed variable mirrors the magnitude.
            *changed |= self.tighten_upper(signed, -self.lower[absolute], statistics)?;
            *changed |= self.tighten_upper(absolute, -self.lower[signed], statistics)?;
            *changed |= self.tighten_lower(absolute, -self.upper[signed], statistics)?;
        }

        Ok(())
    }

    /// Assert that the leaf satisfies every constraint: always in debug builds, and also in
    /// release builds when the `debug-checks` feature is enabled.
    fn verify_leaf(&self) {
        if cfg!(feature = "debug-checks") {
            assert!(
                self.leaf_is_consistent(),
                "a leaf assignment violates a posted constraint"
            );
        } else {
            debug_assert!(self.leaf_is_consistent());
        }
    }

    /// Evaluates every constraint under the current full assignment.
    fn leaf_is_consistent(&self) -> bool {
        self.model.posted_constraints().iter().all(|constraint| {
            if constraint
                .enforced_by
                .iter()
                .any(|condition| self.lower[condition.id] == 0)
            {
                return true;
            }

            match &constraint.repr {
                ConstraintRepr::ExactlyOne { literals } => {
                    literals
                        .iter()
                        .filter(|literal| self.lower[literal.id] == 1)
                        .count()
                        == 1
                }
                ConstraintRepr::AtMostOne { literals } => {
                    literals
                        .iter()
                        .filter(|literal| self.lower[literal.id] == 1)
                        .count()
                        <= 1
                }
                ConstraintRepr::LinearLessEqual { terms, rhs } => {
                    evaluate_linear(terms, &self.lower) <= i64::from(*rhs)
                }
                ConstraintRepr::LinearEqual { terms, rhs } => {
                    evaluate_linear(terms, &self.lower) == i64::from(*rhs)
                }
                ConstraintRepr::AbsoluteValue { signed, absolute } => {
                    i64::from(self.lower[absolute.id]) == i64::from(self.lower[signed.id]).abs()
                }
            }
        })
    }
}

fn evaluate_linear(terms: &[LinearTerm], values: &KeyedVec<VariableId, i32>) -> i64 {
    terms
        .iter()
        .map(|term| i64::from(term.weight) * i64::from(values[term.variable]))
        .sum()
}

fn solution_from(values: Vec<i32>) -> Solution {
    Solution::new(values.into())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::constraints;
    use crate::termination::Indefinite;
    use crate::termination::TimeBudget;

    fn search(model: &Model) -> SearchOutcome {
        DepthFirstSearcher::default().search(model, &mut Indefinite)
    }

    fn expect_optimal(outcome: SearchOutcome) -> Solution {
        match outcome {
            SearchOutcome::Optimal(solution) => solution,
            other => panic!("expected an optimal outcome, got {other:?}"),
        }
    }

    #[test]
    fn exactly_one_is_satisfied_by_a_single_true_literal() {
        let mut model = Model::default();
        let literals: Vec<_> = (0..3).map(|_| model.new_boolean()).collect();
        model
            .add_constraint(constraints::exactly_one(literals.clone()))
            .post()
            .unwrap();

        let solution = expect_optimal(search(&model));
        let assigned = literals
            .iter()
            .filter(|&&literal| solution.get_boolean_value(literal))
            .count();
        assert_eq!(assigned, 1);
    }

    #[test]
    fn exactly_one_over_falsified_literals_is_infeasible() {
        let mut model = Model::default();
        let a = model.new_boolean();
        let b = model.new_boolean();
        model.fix_boolean(a, false).unwrap();
        model.fix_boolean(b, false).unwrap();
        model
            .add_constraint(constraints::exactly_one([a, b]))
            .post()
            .unwrap();

        assert!(matches!(search(&model), SearchOutcome::Infeasible));
    }

    #[test]
    fn at_most_one_permits_the_empty_selection() {
        let mut model = Model::default();
        let a = model.new_boolean();
        let b = model.new_boolean();
        model
            .add_constraint(constraints::at_most_one([a, b]))
            .post()
            .unwrap();

        let solution = expect_optimal(search(&model));
        let assigned = [a, b]
            .iter()
            .filter(|&&literal| solution.get_boolean_value(literal))
            .count();
        assert!(assigned <= 1);
    }

    #[test]
    fn linear_equality_fixes_the_remaining_variable() {
        let mut model = Model::default();
        let x = model.new_bounded_integer(2, 2);
        let y = model.new_bounded_integer(0, 10);
        model
            .add_constraint(constraints::equals([x.scaled(1), y.scaled(1)], 5))
            .post()
            .unwrap();

        let solution = expect_optimal(search(&model));
        assert_eq!(solution.get_integer_value(y), 3);
    }

    #[test]
    fn absolute_value_tracks_a_negative_signed_variable() {
        let mut model = Model::default();
        let signed = model.new_bounded_integer(-4, -4);
        let magnitude = model.new_bounded_integer(0, 10);
        model
            .add_constraint(constraints::absolute(signed, magnitude))
            .post()
            .unwrap();

        let solution = expect_optimal(search(&model));
        assert_eq!(solution.get_integer_value(magnitude), 4);
    }

    #[test]
    fn a_conditional_constraint_is_inert_while_its_condition_is_false() {
        let mut model = Model::default();
        let condition = model.new_boolean();
        model.fix_boolean(condition, false).unwrap();
        let x = model.new_bounded_integer(0, 5);
        model
            .add_constraint(constraints::equals([x.scaled(1)], 4))
            .implied_by([condition])
            .unwrap();
        model.minimise(x);

        let solution = expect_optimal(search(&model));
        assert_eq!(solution.get_integer_value(x), 0);
    }

    #[test]
    fn a_conditional_constraint_binds_once_its_condition_is_true() {
        let mut model = Model::default();
        let condition = model.new_boolean();
        model.fix_boolean(condition, true).unwrap();
        let x = model.new_bounded_integer(0, 5);
        model
            .add_constraint(constraints::equals([x.scaled(1)], 4))
            .implied_by([condition])
            .unwrap();
        model.minimise(x);

        let solution = expect_optimal(search(&model));
        assert_eq!(solution.get_integer_value(x), 4);
    }

    #[test]
    fn minimisation_proves_the_smallest_selection_optimal() {
        let mut model = Model::default();
        let literals: Vec<_> = (0..3).map(|_| model.new_boolean()).collect();
        model
            .add_constraint(constraints::exactly_one(literals.clone()))
            .post()
            .unwrap();

        let total = model.new_bounded_integer(0, 3);
        let mut terms: Vec<_> = literals.iter().map(|literal| literal.scaled(1)).collect();
        terms.push(total.scaled(-1));
        model.add_constraint(constraints::equals(terms, 0)).post().unwrap();
        model.minimise(total);

        let solution = expect_optimal(search(&model));
        assert_eq!(solution.get_integer_value(total), 1);
    }

    #[test]
    fn maximisation_saturates_an_at_most_one_group() {
        let mut model = Model::default();
        let a = model.new_boolean();
        let b = model.new_boolean();
        model
            .add_constraint(constraints::at_most_one([a, b]))
            .post()
            .unwrap();

        let total = model.new_bounded_integer(0, 2);
        model
            .add_constraint(constraints::equals(
                [a.scaled(1), b.scaled(1), total.scaled(-1)],
                0,
            ))
            .post()
            .unwrap();
        model.maximise(total);

        let solution = expect_optimal(search(&model));
        assert_eq!(solution.get_integer_value(total), 1);
    }

    #[test]
    fn contradicting_inequalities_are_infeasible() {
        let mut model = Model::default();
        let x = model.new_bounded_integer(0, 5);
        model
            .add_constraint(constraints::less_than_or_equals([x.scaled(1)], 1))
            .post()
            .unwrap();
        model
            .add_constraint(constraints::greater_than_or_equals([x.scaled(1)], 3))
            .post()
            .unwrap();

        assert!(matches!(search(&model), SearchOutcome::Infeasible));
    }

    #[test]
    fn an_exhausted_time_budget_stops_the_search() {
        let mut model = Model::default();
        let _ = model.new_boolean();

        let outcome = DepthFirstSearcher::default()
            .search(&model, &mut TimeBudget::starting_now(Duration::from_secs(0)));

        assert!(matches!(outcome, SearchOutcome::Stopped));
    }

    #[test]
    fn a_hint_steers_the_first_solution() {
        let mut model = Model::default();
        let a = model.new_boolean();
        model.add_hint(a, true);

        let solution = expect_optimal(search(&model));
        assert!(solution.get_boolean_value(a));
    }
}
