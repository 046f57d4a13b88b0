//! Policy document parsing and compilation.
//!
//! This crate is intentionally IO-free: it parses and compiles policy
//! documents provided as strings. Parsing is permissive (the serde model
//! tolerates unknown and missing fields); compilation is strict and rejects
//! documents that cannot produce a usable policy, so no partial policy ever
//! reaches a registry.

#![forbid(unsafe_code)]

mod compile;
mod model;

pub use model::{AssessmentLevelDoc, LevelDoc, NumberOrText, PolicyDocV1, RuleDoc};

/// Parse a policy document into the permissive typed model.
pub fn parse_policy_toml(input: &str) -> anyhow::Result<PolicyDocV1> {
    let doc: PolicyDocV1 = toml::from_str(input)?;
    Ok(doc)
}

/// Compile a parsed document into an immutable [`Policy`](cbomguard_domain::policy::Policy).
pub fn compile_policy(doc: PolicyDocV1) -> anyhow::Result<cbomguard_domain::policy::Policy> {
    compile::compile(doc)
}

/// Parse and compile in one step.
pub fn load_policy(input: &str) -> anyhow::Result<cbomguard_domain::policy::Policy> {
    compile_policy(parse_policy_toml(input)?)
}
