//! Planning engines for the U-Engine ecosystem.
//!
//! Two independent, stateless engines:
//!
//! - **Rhythmic delivery planning** ([`delivery`]): choose per-period
//!   deliveries into an inventory buffer so the level stays within
//!   `[minV, maxV]` while deliveries stay as uniform as possible.
//! - **Project scheduling** ([`scheduler`]): assign integer start times to
//!   precedence-linked jobs with release dates and renewable resource
//!   demands (RCPSP), minimizing the makespan heuristically.
//!
//! # Modules
//!
//! - **`models`**: Problem and result types: `DeliveryProblem`,
//!   `DeliveryPlan`, `Job`, `SchedulingProblem`, `Schedule`
//! - **`delivery`**: Uniform (projected gradient) and direct (greedy) solvers
//! - **`dispatching`**: Priority rules and the rule engine ordering jobs
//! - **`scheduler`**: Serial and sampling schedulers, schedule KPIs
//! - **`validation`**: Input integrity checks (index ranges, DAG cycles)
//! - **`error`**: Error types of both engines
//!
//! # References
//!
//! - Silver, Pyke & Thomas (2017), "Inventory and Production Management in
//!   Supply Chains"
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod delivery;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;
