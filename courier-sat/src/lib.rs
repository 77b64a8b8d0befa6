//! # courier-sat
//! Minimum-makespan routing for a fleet of capacitated couriers, solved through a boolean
//! satisfiability engine.
//!
//! Every courier starts at the origin, delivers a set of items and returns; the goal is to
//! minimise the longest distance travelled by any courier. The problem is expressed over
//! propositions only:
//! - [`encoders::BitVector`]s represent unsigned integers (loads, distances, the objective) as
//!   sequences of propositions, with addition, multiplication by a boolean and comparisons
//!   expressed as [`formula::Formula`]s.
//! - [`encoders::cardinality`] builds at-most/at-least/exactly-k constraints.
//! - [`routing::RoutingModelBuilder`] asserts the routing constraints into a
//!   [`context::SolverContext`], which decides them with the in-crate CDCL engine
//!   ([`engine::SatSolver`]).
//! - [`optimisation::OptimisationSolver`] repeatedly checks the context and tightens the bound on
//!   the objective, either linearly or by binary search.
//!
//! # Example
//! ```rust
//! use courier_sat::basic_types::Stopwatch;
//! use courier_sat::context::CdclContext;
//! use courier_sat::optimisation::OptimisationSolver;
//! use courier_sat::optimisation::OptimisationStrategy;
//! use courier_sat::optimisation::DEFAULT_TIME_LIMIT;
//! use courier_sat::routing::RoutingInstance;
//! use courier_sat::routing::RoutingModelBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // one courier, three items; the origin is the last stop
//! let instance = RoutingInstance::new(
//!     vec![10],
//!     vec![1, 1, 1],
//!     vec![
//!         vec![0, 1, 2, 1],
//!         vec![1, 0, 1, 2],
//!         vec![2, 1, 0, 1],
//!         vec![1, 2, 1, 0],
//!     ],
//! )?;
//!
//! let process_time = Stopwatch::starting_now();
//! let mut context = CdclContext::default();
//! let model = RoutingModelBuilder::new(&instance, &mut context).build();
//!
//! let report = OptimisationSolver::new(
//!     &mut context,
//!     &model,
//!     &instance,
//!     DEFAULT_TIME_LIMIT,
//!     process_time,
//! )
//! .solve(OptimisationStrategy::BinarySearch)?;
//!
//! assert!(report.result.is_optimal());
//! assert_eq!(report.result.objective(), Some(4));
//! # Ok(())
//! # }
//! ```

pub mod asserts;
pub mod basic_types;
pub(crate) mod containers;
pub mod context;
pub mod encoders;
pub mod engine;
pub mod formula;
pub mod optimisation;
pub mod routing;
