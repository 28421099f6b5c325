//! Rhythmic delivery planning.
//!
//! Plans deliveries into an inventory buffer that drains by a known demand
//! sequence and must stay within safety bounds.
//!
//! # Solvers
//!
//! - [`solve_uniform`]: iterative projected gradient; finds the most
//!   uniform feasible sequence around the target rate `Mp`.
//! - [`solve_direct`]: greedy; tops the buffer up to `minV` only when
//!   needed. Cheap feasibility baseline.
//!
//! Both are pure functions: validate the input, compute, return a fresh
//! result. Infeasibility is reported through `ok`, never as an error.
//!
//! # Usage
//!
//! ```
//! use u_plan::delivery::{solve_direct, solve_uniform};
//!
//! let p = [1.0, 1.0, 1.0];
//! let uniform = solve_uniform(&p, 2.0, 0.0, 5.0, 1000, 1e-6).unwrap();
//! let direct = solve_direct(&p, 2.0, 0.0, 5.0).unwrap();
//! assert!(uniform.ok && direct.ok);
//! assert_eq!(uniform.plan.v.len(), p.len() + 1);
//! ```

mod config;
mod direct;
mod uniform;

pub use config::UniformConfig;
pub use direct::{solve_direct, solve_direct_for};
pub use uniform::{solve_uniform, solve_uniform_with};
