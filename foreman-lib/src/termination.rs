//! Conditions under which the search is told to give up. The solver polls its
//! [`TerminationCondition`] at every node and stops gracefully when it triggers, reporting the
//! best solution found so far.

use std::time::Duration;
use std::time::Instant;

/// A condition which, when triggered, causes the solver to stop searching.
pub trait TerminationCondition {
    /// Returns `true` when the solver should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(condition) => condition.should_stop(),
            None => false,
        }
    }
}

/// A [`TerminationCondition`] which triggers when a wall-clock budget is exhausted.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    started_at: Instant,
    budget: Duration,
}

impl TimeBudget {
    /// Give the solver a time budget, starting now.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            started_at: Instant::now(),
            budget,
        }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        self.started_at.elapsed() >= self.budget
    }
}

/// A [`TerminationCondition`] which never triggers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// A [`TerminationCondition`] which triggers when either of its components triggers.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<T1, T2> {
    first: T1,
    second: T2,
}

impl<T1, T2> Combinator<T1, T2> {
    pub fn new(first: T1, second: T2) -> Self {
        Combinator { first, second }
    }
}

impl<T1, T2> TerminationCondition for Combinator<T1, T2>
where
    T1: TerminationCondition,
    T2: TerminationCondition,
{
    fn should_stop(&mut self) -> bool {
        self.first.should_stop() || self.second.should_stop()
    }
}
