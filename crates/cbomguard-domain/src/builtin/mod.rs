//! Built-in, non-declarative policies: fixed heuristics behind the same
//! [`Evaluator`](crate::Evaluator) contract as the generic rule engine.

mod nist_sp_800_131a;
mod quantum_safe;

pub use nist_sp_800_131a::NistSp800131AEvaluator;
pub use quantum_safe::QuantumSafeEvaluator;

use cbomguard_types::{AssessmentLevel, Finding};

/// Worst assessment over the fixed Compliant/Not Compliant pair the built-in
/// catalogs map onto; empty findings fall back to `fallback`.
fn worst_assessment(findings: &[Finding], fallback: AssessmentLevel) -> AssessmentLevel {
    findings
        .iter()
        .map(|f| {
            if f.level.assessment_id <= AssessmentLevel::compliant().id {
                AssessmentLevel::compliant()
            } else {
                AssessmentLevel::not_compliant()
            }
        })
        .max_by_key(|a| a.id)
        .unwrap_or(fallback)
}
