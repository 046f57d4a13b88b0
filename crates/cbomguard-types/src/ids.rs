//! Stable identifiers for built-in policies.
//!
//! Policy ids are short snake_case strings; they double as the registry keys
//! and as the `policyIdentifier` callers pass to `evaluate`.

pub const POLICY_QUANTUM_SAFE: &str = "quantum_safe";
pub const POLICY_NIST_SP_800_131A: &str = "nist_sp_800_131_ar3";

/// Ids that can never be removed from a registry.
pub const BUILTIN_POLICY_IDS: &[&str] = &[POLICY_QUANTUM_SAFE, POLICY_NIST_SP_800_131A];
