use cbomguard_types::{AssessmentLevel, CheckResult, ComplianceLevel, CryptographicAsset};

/// A named compliance policy that can judge a collection of assets.
///
/// Implementations are stateless per call: `evaluate` is a pure function of
/// (policy, assets), so one instance may serve concurrent callers.
pub trait Evaluator: Send + Sync {
    /// Human-readable display name, used in registry listings.
    fn name(&self) -> &str;

    fn compliance_levels(&self) -> Vec<ComplianceLevel>;

    fn default_level(&self) -> ComplianceLevel;

    fn default_assessment(&self) -> AssessmentLevel;

    /// Evaluate every asset, in input order. When `policy_id` does not name
    /// this evaluator the result is empty with `error = true` rather than a
    /// failure.
    fn evaluate(&self, policy_id: &str, assets: &[CryptographicAsset]) -> CheckResult;
}
