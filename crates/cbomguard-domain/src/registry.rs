//! Named evaluator lookup with a guaranteed default.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use cbomguard_types::{ids, PolicyInfo};

use crate::builtin::{NistSp800131AEvaluator, QuantumSafeEvaluator};
use crate::evaluator::Evaluator;

/// Maps policy identifiers to evaluators.
///
/// Lookups never fail: an unknown identifier resolves to the default
/// evaluator (`quantum_safe`). Built-in entries cannot be removed, so the
/// default is always present.
pub struct PolicyRegistry {
    evaluators: RwLock<BTreeMap<String, Arc<dyn Evaluator>>>,
    default_id: String,
}

impl PolicyRegistry {
    /// A registry preloaded with the built-in evaluators.
    pub fn new() -> Self {
        let mut evaluators: BTreeMap<String, Arc<dyn Evaluator>> = BTreeMap::new();
        evaluators.insert(
            ids::POLICY_QUANTUM_SAFE.to_string(),
            Arc::new(QuantumSafeEvaluator::new()),
        );
        evaluators.insert(
            ids::POLICY_NIST_SP_800_131A.to_string(),
            Arc::new(NistSp800131AEvaluator::new()),
        );
        PolicyRegistry {
            evaluators: RwLock::new(evaluators),
            default_id: ids::POLICY_QUANTUM_SAFE.to_string(),
        }
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// The evaluator for `policy_id`, or the default evaluator when the
    /// identifier is unknown.
    pub fn get(&self, policy_id: &str) -> Arc<dyn Evaluator> {
        let evaluators = self
            .evaluators
            .read()
            .expect("policy registry lock poisoned");
        evaluators
            .get(policy_id)
            .or_else(|| evaluators.get(&self.default_id))
            .cloned()
            .expect("default evaluator is always registered")
    }

    /// Registers (or replaces) the evaluator for `policy_id`.
    pub fn register(&self, policy_id: impl Into<String>, evaluator: Arc<dyn Evaluator>) {
        self.evaluators
            .write()
            .expect("policy registry lock poisoned")
            .insert(policy_id.into(), evaluator);
    }

    /// Removes a registered evaluator. Returns `false` for built-in
    /// identifiers and for identifiers that were never registered.
    pub fn remove(&self, policy_id: &str) -> bool {
        if ids::BUILTIN_POLICY_IDS.contains(&policy_id) {
            return false;
        }
        self.evaluators
            .write()
            .expect("policy registry lock poisoned")
            .remove(policy_id)
            .is_some()
    }

    /// All registered policies, sorted by identifier.
    pub fn list(&self) -> Vec<PolicyInfo> {
        self.evaluators
            .read()
            .expect("policy registry lock poisoned")
            .iter()
            .map(|(id, evaluator)| PolicyInfo {
                id: id.clone(),
                label: evaluator.name().to_string(),
            })
            .collect()
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbomguard_types::{AssessmentLevel, CheckResult, ComplianceLevel, CryptographicAsset};

    struct StubEvaluator;

    impl Evaluator for StubEvaluator {
        fn name(&self) -> &str {
            "Stub"
        }

        fn compliance_levels(&self) -> Vec<ComplianceLevel> {
            Vec::new()
        }

        fn default_level(&self) -> ComplianceLevel {
            ComplianceLevel {
                id: 1,
                label: "Stub".to_string(),
                description: None,
                color: "gray".to_string(),
                icon: cbomguard_types::ComplianceIcon::Unknown,
                assessment_id: 1,
            }
        }

        fn default_assessment(&self) -> AssessmentLevel {
            AssessmentLevel::compliant()
        }

        fn evaluate(&self, _policy_id: &str, _assets: &[CryptographicAsset]) -> CheckResult {
            CheckResult {
                findings: Vec::new(),
                error: false,
                assessment: AssessmentLevel::compliant(),
            }
        }
    }

    #[test]
    fn new_registry_contains_both_builtins() {
        let registry = PolicyRegistry::new();
        let listed: Vec<String> = registry.list().into_iter().map(|p| p.id).collect();
        assert_eq!(
            listed,
            vec![
                ids::POLICY_NIST_SP_800_131A.to_string(),
                ids::POLICY_QUANTUM_SAFE.to_string(),
            ]
        );
    }

    #[test]
    fn unknown_identifier_falls_back_to_default() {
        let registry = PolicyRegistry::new();
        let evaluator = registry.get("no-such-policy");
        assert_eq!(evaluator.name(), "Basic Quantum Safe Compliance");
    }

    #[test]
    fn builtins_cannot_be_removed() {
        let registry = PolicyRegistry::new();
        assert!(!registry.remove(ids::POLICY_QUANTUM_SAFE));
        assert!(!registry.remove(ids::POLICY_NIST_SP_800_131A));
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn registered_evaluator_is_listed_and_removable() {
        let registry = PolicyRegistry::new();
        registry.register("custom", Arc::new(StubEvaluator));
        assert_eq!(registry.get("custom").name(), "Stub");
        assert_eq!(registry.list().len(), 3);
        assert!(registry.remove("custom"));
        assert!(!registry.remove("custom"));
        // After removal the lookup falls back to the default again.
        assert_eq!(registry.get("custom").name(), "Basic Quantum Safe Compliance");
    }
}
