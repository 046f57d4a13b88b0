//! Pure policy evaluation (no IO).
//!
//! Input: a compiled [`policy::Policy`] (or a built-in heuristic) and a
//! collection of cryptographic assets constructed elsewhere.
//! Output: per-asset findings + one worst-case assessment.

#![forbid(unsafe_code)]

pub mod builtin;
pub mod matcher;
pub mod policy;
pub mod registry;
pub mod specificity;

mod engine;
mod evaluator;

pub use engine::PolicyEvaluator;
pub use evaluator::Evaluator;
pub use registry::PolicyRegistry;
