//! The solve entry point and the default search backend.
//!
//! A [`Solver`] owns a [`SearchBackend`] and the [`SolverOptions`] from which it builds the
//! termination condition for each solve. The backend is exchangeable; the model-formulation side
//! only ever talks to [`Solver::solve`].

mod depth_first;

pub use depth_first::DepthFirstSearcher;

use std::num::NonZeroUsize;
use std::time::Duration;
use std::time::Instant;

use log::debug;
use log::info;

use crate::model::Model;
use crate::results::Solution;
use crate::results::SolveResult;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::SolveStatistics;
use crate::termination::TerminationCondition;
use crate::termination::TimeBudget;

/// Options controlling how a [`Solver`] runs its backend.
#[derive(Clone, Copy, Debug)]
pub struct SolverOptions {
    /// Wall-clock budget for the search; `None` searches until exhaustion.
    pub time_limit: Option<Duration>,
    /// Number of worker threads the backend may use. Backends are free to stay sequential, in
    /// which case the hint is only recorded.
    pub parallelism_hint: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            time_limit: Some(Duration::from_secs(200)),
            parallelism_hint: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

/// A search backend consumes a [`Model`] and looks for solutions until it reaches a conclusion
/// or its termination condition triggers.
pub trait SearchBackend {
    /// Search the model, polling `termination` at every node.
    fn search(
        &mut self,
        model: &Model,
        termination: &mut dyn TerminationCondition,
    ) -> SearchOutcome;

    /// The counters collected during the most recent search.
    fn statistics(&self) -> &SolveStatistics;
}

/// What a [`SearchBackend`] concluded.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The search space is exhausted; the reported solution is optimal.
    Optimal(Solution),
    /// The termination condition triggered while an incumbent was in hand.
    Feasible(Solution),
    /// The search space is exhausted and holds no solution.
    Infeasible,
    /// The termination condition triggered before any solution was found.
    Stopped,
}

/// The solve entry point; blocks for the duration of the search.
#[derive(Debug, Default)]
pub struct Solver<Backend = DepthFirstSearcher> {
    backend: Backend,
    options: SolverOptions,
}

impl Solver {
    /// A solver running the default backend with the given options.
    pub fn with_options(options: SolverOptions) -> Solver {
        Solver {
            backend: DepthFirstSearcher::default(),
            options,
        }
    }
}

impl<Backend: SearchBackend> Solver<Backend> {
    /// A solver running a custom backend.
    pub fn with_backend(backend: Backend, options: SolverOptions) -> Solver<Backend> {
        Solver { backend, options }
    }

    /// Solve the model. Returns when the search reaches a conclusion or the time budget runs
    /// out, whichever comes first.
    pub fn solve(&mut self, model: &Model) -> SolveResult {
        info!(
            "solving a model with {} variables and {} constraints",
            model.number_of_variables(),
            model.number_of_constraints()
        );
        debug!("parallelism hint: {} threads", self.options.parallelism_hint);

        let started = Instant::now();
        let mut termination = self.options.time_limit.map(TimeBudget::starting_now);
        let outcome = self.backend.search(model, &mut termination);
        let elapsed = started.elapsed();

        debug!("search finished after {:.3}s", elapsed.as_secs_f64());

        if should_log_statistics() {
            self.backend.statistics().log();
            log_statistic("solveTimeInSeconds", elapsed.as_secs_f64());
            if let (Some((_, objective)), Some(solution)) =
                (model.objective(), outcome_solution(&outcome))
            {
                log_statistic("objective", solution.get_integer_value(objective));
            }
            log_statistic_postfix();
        }

        match outcome {
            SearchOutcome::Optimal(solution) => SolveResult::Optimal(solution),
            SearchOutcome::Feasible(solution) => SolveResult::Feasible(solution),
            SearchOutcome::Infeasible => SolveResult::Infeasible,
            SearchOutcome::Stopped => {
                if self.options.time_limit.is_some() {
                    SolveResult::Timeout
                } else {
                    SolveResult::Unknown
                }
            }
        }
    }
}

fn outcome_solution(outcome: &SearchOutcome) -> Option<&Solution> {
    match outcome {
        SearchOutcome::Optimal(solution) | SearchOutcome::Feasible(solution) => Some(solution),
        SearchOutcome::Infeasible | SearchOutcome::Stopped => None,
    }
}
