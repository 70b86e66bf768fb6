//! # Foreman
//! Foreman formulates multi-shift workforce-and-equipment rostering problems as boolean/integer
//! constraint models and solves them with a small branch-and-bound backend.
//!
//! An instance describes a factory: production lines composed of stages, workers with per-stage
//! experience and per-shift availability, and equipment items providing the functions lines
//! require. A solve produces, for every shift, exactly one eligible worker per stage, together
//! with an equipment allocation meeting every line's functional requirements, while minimising a
//! configurable weighted objective (productivity balance, team stability, delivered
//! productivity, salary cost, newcomer participation).
//!
//! The pipeline: [`dataset`] validates the raw instance tables, [`formulation`] builds a
//! [`Model`] from them (variables, hard constraints, objective), [`engine`] searches the model,
//! and the solution is projected back into a domain-level [`Schedule`].
//!
//! ```rust
//! use foreman_lib::dataset::Dataset;
//! use foreman_lib::dataset::DatasetTables;
//! use foreman_lib::dataset::ShiftId;
//! use foreman_lib::dataset::StageId;
//! use foreman_lib::engine::Solver;
//! use foreman_lib::formulation::formulate;
//! use foreman_lib::formulation::FormulationOptions;
//!
//! // Two shifts, one line with a single stage, two interchangeable workers.
//! let mut tables = DatasetTables::new(2, 1, 1, 2, 0, 0);
//! tables.line_stage[0][0] = 1;
//!
//! let dataset = Dataset::populate(tables)?;
//! let formulated = formulate(&dataset, FormulationOptions::default())?;
//!
//! let mut solver: Solver = Solver::default();
//! let result = solver.solve(formulated.model());
//! let schedule = formulated.extract_schedule(result.solution().unwrap());
//!
//! assert!(schedule.worker_for(ShiftId::new(0), StageId::new(0)).is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod constraints;
pub mod containers;
pub mod dataset;
pub mod engine;
pub mod formulation;
pub mod model;
pub mod results;
pub mod schedule;
pub mod statistics;
pub mod termination;

pub use crate::dataset::Dataset;
pub use crate::engine::Solver;
pub use crate::formulation::formulate;
pub use crate::model::Model;
pub use crate::results::SolveResult;
pub use crate::schedule::Schedule;
