//! Generic rule-driven evaluation: structural matching, specificity
//! resolution, and worst-case aggregation over one compiled policy.

use crate::evaluator::Evaluator;
use crate::matcher::{matches_opt_num, matches_opt_set, matches_opt_str};
use crate::policy::{
    AlgorithmPredicates, CertificatePredicates, Policy, ProtocolPredicates,
    RelatedCryptoMaterialPredicates, Rule, RulePredicates,
};
use crate::specificity;
use cbomguard_types::{
    AlgorithmProperties, AssessmentLevel, AssetProperties, CertificateProperties, CheckResult,
    ComplianceLevel, CryptographicAsset, Finding, ProtocolProperties,
    RelatedCryptoMaterialProperties,
};

/// Evaluator backed by a declarative, compiled [`Policy`].
#[derive(Clone, Debug)]
pub struct PolicyEvaluator {
    policy: Policy,
}

impl PolicyEvaluator {
    pub fn new(policy: Policy) -> Self {
        PolicyEvaluator { policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn policy_id(&self) -> &str {
        &self.policy.id
    }

    fn evaluate_asset(&self, asset: &CryptographicAsset) -> Finding {
        let Some(properties) = asset.typed_properties() else {
            return Finding {
                asset_identifier: asset.identifier.clone(),
                level: self.policy.unknown_level(),
                message: format!(
                    "asset carries no {} properties; rules cannot be matched",
                    asset.asset_type.as_str()
                ),
            };
        };

        let candidates: Vec<&Rule> = self
            .policy
            .rules
            .iter()
            .filter(|rule| rule_matches(rule, asset, properties))
            .collect();

        match specificity::resolve(&candidates) {
            Some(rule) => {
                let level = self.policy.level(rule.level_id).cloned().unwrap_or_else(|| {
                    tracing::warn!(
                        policy = %self.policy.id,
                        level = rule.level_id,
                        "rule targets an undefined compliance level; using policy default"
                    );
                    self.policy.default_level()
                });
                Finding {
                    asset_identifier: asset.identifier.clone(),
                    level,
                    message: rule.description.clone(),
                }
            }
            None => Finding {
                asset_identifier: asset.identifier.clone(),
                level: self.policy.default_level(),
                message: format!(
                    "no rule matched for asset type {}",
                    asset.asset_type.as_str()
                ),
            },
        }
    }

    fn aggregate(&self, findings: &[Finding]) -> AssessmentLevel {
        let mut worst: Option<AssessmentLevel> = None;
        for finding in findings {
            let assessment = match self.policy.assessment(finding.level.assessment_id) {
                Some(a) => a.clone(),
                None => {
                    tracing::warn!(
                        policy = %self.policy.id,
                        level = finding.level.id,
                        assessment = finding.level.assessment_id,
                        "compliance level maps to an undefined assessment level; using policy default"
                    );
                    self.policy.default_assessment()
                }
            };
            let is_worse = worst.as_ref().is_none_or(|w| assessment.id > w.id);
            if is_worse {
                worst = Some(assessment);
            }
        }
        worst.unwrap_or_else(|| self.policy.default_assessment())
    }
}

impl Evaluator for PolicyEvaluator {
    fn name(&self) -> &str {
        &self.policy.name
    }

    fn compliance_levels(&self) -> Vec<ComplianceLevel> {
        self.policy.levels.clone()
    }

    fn default_level(&self) -> ComplianceLevel {
        self.policy.default_level()
    }

    fn default_assessment(&self) -> AssessmentLevel {
        self.policy.default_assessment()
    }

    fn evaluate(&self, policy_id: &str, assets: &[CryptographicAsset]) -> CheckResult {
        if policy_id != self.policy.id {
            return CheckResult::mismatch(self.policy.default_assessment());
        }

        let findings: Vec<Finding> = assets
            .iter()
            .map(|asset| self.evaluate_asset(asset))
            .collect();
        let assessment = self.aggregate(&findings);

        CheckResult {
            findings,
            error: false,
            assessment,
        }
    }
}

/// Structural match of one rule against one asset of the same type.
pub fn rule_matches(
    rule: &Rule,
    asset: &CryptographicAsset,
    properties: &AssetProperties,
) -> bool {
    if rule.asset_type() != asset.asset_type {
        return false;
    }
    if !matches_opt_str(rule.oid.as_ref(), asset.oid.as_deref()) {
        return false;
    }
    if !matches_opt_str(rule.name.as_ref(), asset.name.as_deref()) {
        return false;
    }

    match (&rule.predicates, properties) {
        (RulePredicates::Algorithm(p), AssetProperties::Algorithm(a)) => algorithm_matches(p, a),
        (RulePredicates::Certificate(p), AssetProperties::Certificate(c)) => {
            certificate_matches(p, c)
        }
        (RulePredicates::Protocol(p), AssetProperties::Protocol(proto)) => {
            protocol_matches(p, proto)
        }
        (RulePredicates::RelatedCryptoMaterial(p), AssetProperties::RelatedCryptoMaterial(m)) => {
            material_matches(p, m)
        }
        _ => false,
    }
}

fn algorithm_matches(rule: &AlgorithmPredicates, asset: &AlgorithmProperties) -> bool {
    matches_opt_str(
        rule.primitive.as_ref(),
        asset.primitive.map(|p| p.as_str()),
    ) && matches_opt_str(
        rule.parameter_set_identifier.as_ref(),
        asset.parameter_set_identifier.as_deref(),
    ) && matches_opt_str(rule.curve.as_ref(), asset.curve.as_deref())
        && matches_opt_str(
            rule.execution_environment.as_ref(),
            asset.execution_environment.as_deref(),
        )
        && matches_opt_str(
            rule.implementation_platform.as_ref(),
            asset.implementation_platform.as_deref(),
        )
        && matches_opt_set(
            rule.certification_level.as_ref(),
            asset
                .certification_level
                .as_ref()
                .map(|v| v.iter().map(String::as_str)),
        )
        && matches_opt_str(rule.mode.as_ref(), asset.mode.as_deref())
        && matches_opt_str(rule.padding.as_ref(), asset.padding.as_deref())
        && matches_opt_set(
            rule.crypto_functions.as_ref(),
            asset
                .crypto_functions
                .as_ref()
                .map(|v| v.iter().map(String::as_str)),
        )
        && matches_opt_num(
            rule.classical_security_level.as_ref(),
            asset.classical_security_level.map(f64::from),
        )
        && matches_opt_num(
            rule.nist_quantum_security_level.as_ref(),
            asset.nist_quantum_security_level.map(f64::from),
        )
}

fn certificate_matches(rule: &CertificatePredicates, asset: &CertificateProperties) -> bool {
    matches_opt_str(rule.subject_name.as_ref(), asset.subject_name.as_deref())
        && matches_opt_str(rule.issuer_name.as_ref(), asset.issuer_name.as_deref())
        && matches_opt_str(
            rule.not_valid_before.as_ref(),
            asset.not_valid_before.as_deref(),
        )
        && matches_opt_str(
            rule.not_valid_after.as_ref(),
            asset.not_valid_after.as_deref(),
        )
        && matches_opt_str(
            rule.signature_algorithm_ref.as_ref(),
            asset.signature_algorithm_ref.as_deref(),
        )
        && matches_opt_str(
            rule.subject_public_key_ref.as_ref(),
            asset.subject_public_key_ref.as_deref(),
        )
        && matches_opt_str(
            rule.certificate_format.as_ref(),
            asset.certificate_format.as_deref(),
        )
        && matches_opt_str(
            rule.certificate_extension.as_ref(),
            asset.certificate_extension.as_deref(),
        )
}

fn protocol_matches(rule: &ProtocolPredicates, asset: &ProtocolProperties) -> bool {
    if !matches_opt_str(rule.protocol_type.as_ref(), asset.protocol_type.as_deref()) {
        return false;
    }
    if !matches_opt_str(rule.version.as_ref(), asset.version.as_deref()) {
        return false;
    }
    if !matches_opt_set(
        rule.cipher_suites.as_ref(),
        asset
            .cipher_suites
            .as_ref()
            .map(|suites| suites.iter().map(|s| s.name.as_str())),
    ) {
        return false;
    }

    // Transform maps: every transform type the rule names must exist on the
    // asset with at least the rule's references.
    if let Some(required) = &rule.ikev2_transform_types {
        let Some(declared) = &asset.ikev2_transform_types else {
            return false;
        };
        for (transform_type, required_refs) in required {
            let Some(asset_refs) = declared.get(transform_type) else {
                return false;
            };
            if !required_refs.iter().all(|r| asset_refs.contains(r)) {
                return false;
            }
        }
    }
    true
}

fn material_matches(
    rule: &RelatedCryptoMaterialPredicates,
    asset: &RelatedCryptoMaterialProperties,
) -> bool {
    matches_opt_str(rule.material_type.as_ref(), asset.material_type.as_deref())
        && matches_opt_str(rule.id.as_ref(), asset.id.as_deref())
        && matches_opt_str(rule.state.as_ref(), asset.state.as_deref())
        && matches_opt_str(rule.algorithm_ref.as_ref(), asset.algorithm_ref.as_deref())
        && matches_opt_str(rule.creation_date.as_ref(), asset.creation_date.as_deref())
        && matches_opt_str(
            rule.activation_date.as_ref(),
            asset.activation_date.as_deref(),
        )
        && matches_opt_str(rule.update_date.as_ref(), asset.update_date.as_deref())
        && matches_opt_str(
            rule.expiration_date.as_ref(),
            asset.expiration_date.as_deref(),
        )
        && matches_opt_str(rule.value.as_ref(), asset.value.as_deref())
        && matches_opt_num(rule.size.as_ref(), asset.size.map(f64::from))
        && matches_opt_str(rule.format.as_ref(), asset.format.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{Predicate, RangeExpr};
    use cbomguard_types::catalog::default_assessment_catalog;
    use cbomguard_types::{AssetType, CipherSuite, ComplianceIcon, Primitive};
    use std::collections::BTreeMap;

    fn level(id: i32, label: &str, assessment_id: i32) -> ComplianceLevel {
        ComplianceLevel {
            id,
            label: label.to_string(),
            description: None,
            color: "green".to_string(),
            icon: ComplianceIcon::Checkmark,
            assessment_id,
        }
    }

    fn test_policy(rules: Vec<Rule>) -> Policy {
        Policy {
            id: "test_policy".to_string(),
            name: "Test Policy".to_string(),
            default_level_id: 1,
            levels: vec![
                level(1, "Acceptable", 1),
                level(2, "Unknown", 2),
                level(3, "Disallowed", 2),
            ],
            assessment_levels: default_assessment_catalog(),
            rules,
        }
    }

    fn algorithm_asset(identifier: &str, props: AlgorithmProperties) -> CryptographicAsset {
        CryptographicAsset {
            identifier: identifier.to_string(),
            asset_type: AssetType::Algorithm,
            name: None,
            oid: None,
            properties: Some(AssetProperties::Algorithm(props)),
        }
    }

    fn material_rule(description: &str, level_id: i32, size: Option<Predicate>) -> Rule {
        Rule {
            name: None,
            description: description.to_string(),
            level_id,
            oid: None,
            predicates: RulePredicates::RelatedCryptoMaterial(
                RelatedCryptoMaterialPredicates {
                    size,
                    ..Default::default()
                },
            ),
        }
    }

    fn material_asset(identifier: &str, size: i32) -> CryptographicAsset {
        CryptographicAsset {
            identifier: identifier.to_string(),
            asset_type: AssetType::RelatedCryptoMaterial,
            name: None,
            oid: None,
            properties: Some(AssetProperties::RelatedCryptoMaterial(
                RelatedCryptoMaterialProperties {
                    size: Some(size),
                    ..Default::default()
                },
            )),
        }
    }

    #[test]
    fn empty_rule_matches_every_asset_of_its_type() {
        let rule = Rule {
            name: None,
            description: "catch-all".to_string(),
            level_id: 3,
            oid: None,
            predicates: RulePredicates::Algorithm(AlgorithmPredicates::default()),
        };
        let asset = algorithm_asset("anything", AlgorithmProperties::default());
        let props = asset.typed_properties().expect("properties");
        assert!(rule_matches(&rule, &asset, props));

        let other_type = material_asset("key", 128);
        let props = other_type.typed_properties().expect("properties");
        assert!(!rule_matches(&rule, &other_type, props));
    }

    #[test]
    fn size_range_rule_matches_half_open_interval() {
        let rule = material_rule(
            "key material between 128 and 512 bits",
            3,
            Some(Predicate::Range(
                RangeExpr::parse(">=128 <512").expect("valid range"),
            )),
        );
        let policy = test_policy(vec![rule]);
        let evaluator = PolicyEvaluator::new(policy);

        let result = evaluator.evaluate("test_policy", &[material_asset("key-256", 256)]);
        assert_eq!(result.findings[0].level.id, 3);
        assert_eq!(
            result.findings[0].message,
            "key material between 128 and 512 bits"
        );

        let result = evaluator.evaluate("test_policy", &[material_asset("key-600", 600)]);
        assert_eq!(result.findings[0].level.id, 1);
        assert_eq!(
            result.findings[0].message,
            "no rule matched for asset type related-crypto-material"
        );
    }

    #[test]
    fn identifier_mismatch_sets_error_flag() {
        let evaluator = PolicyEvaluator::new(test_policy(Vec::new()));
        let result = evaluator.evaluate("some_other_policy", &[material_asset("key", 128)]);
        assert!(result.error);
        assert!(result.findings.is_empty());
        assert_eq!(result.assessment.id, 2);
    }

    #[test]
    fn missing_properties_fall_back_to_unknown_level() {
        let evaluator = PolicyEvaluator::new(test_policy(Vec::new()));
        let asset = CryptographicAsset {
            identifier: "bare".to_string(),
            asset_type: AssetType::Algorithm,
            name: None,
            oid: None,
            properties: None,
        };
        let result = evaluator.evaluate("test_policy", &[asset]);
        assert_eq!(result.findings[0].level.label, "Unknown");
        assert!(result.findings[0].message.contains("algorithm"));
    }

    #[test]
    fn aggregate_takes_worst_assessment_across_findings() {
        let benign = material_rule("fine", 1, None);
        let evaluator = PolicyEvaluator::new(test_policy(vec![benign]));

        // Two assets: one matches the benign rule (assessment 1), one has no
        // properties and lands on Unknown (assessment 2).
        let bare = CryptographicAsset {
            identifier: "bare".to_string(),
            asset_type: AssetType::Certificate,
            name: None,
            oid: None,
            properties: None,
        };
        let result =
            evaluator.evaluate("test_policy", &[material_asset("key", 128), bare]);
        assert!(!result.error);
        assert_eq!(result.findings.len(), 2);
        assert_eq!(result.assessment.id, 2);
    }

    #[test]
    fn unmapped_assessment_falls_back_to_policy_default() {
        let mut policy = test_policy(vec![material_rule("odd mapping", 1, None)]);
        // Point the Acceptable level at an assessment id the catalog lacks.
        policy.levels[0].assessment_id = 42;
        let evaluator = PolicyEvaluator::new(policy);

        let result = evaluator.evaluate("test_policy", &[material_asset("key", 128)]);
        assert!(!result.error);
        assert_eq!(result.assessment.id, 2);
    }

    #[test]
    fn name_and_oid_filters_gate_the_rule() {
        let rule = Rule {
            name: Some(Predicate::Text("AES".to_string())),
            description: "named rule".to_string(),
            level_id: 3,
            oid: Some(Predicate::Text("2.16.840.1.101.3.4.1".to_string())),
            predicates: RulePredicates::Algorithm(AlgorithmPredicates::default()),
        };

        let mut asset = algorithm_asset("aes", AlgorithmProperties::default());
        asset.name = Some("aes".to_string());
        asset.oid = Some("2.16.840.1.101.3.4.1".to_string());
        let props = asset.typed_properties().expect("properties").clone();
        assert!(rule_matches(&rule, &asset, &props));

        asset.oid = Some("1.2.3.4".to_string());
        assert!(!rule_matches(&rule, &asset, &props));

        asset.oid = None;
        assert!(!rule_matches(&rule, &asset, &props));
    }

    #[test]
    fn primitive_predicate_compares_symbolic_names() {
        let rule = Rule {
            name: None,
            description: "kem rule".to_string(),
            level_id: 1,
            oid: None,
            predicates: RulePredicates::Algorithm(AlgorithmPredicates {
                primitive: Some(Predicate::Text("KEM".to_string())),
                ..Default::default()
            }),
        };
        let asset = algorithm_asset(
            "ml-kem-768",
            AlgorithmProperties {
                primitive: Some(Primitive::Kem),
                ..Default::default()
            },
        );
        let props = asset.typed_properties().expect("properties");
        assert!(rule_matches(&rule, &asset, props));
    }

    #[test]
    fn cipher_suite_intersection_and_transform_superset() {
        let mut required = BTreeMap::new();
        required.insert("encr".to_string(), vec!["aes-128-ref".to_string()]);
        let rule = Rule {
            name: None,
            description: "protocol rule".to_string(),
            level_id: 1,
            oid: None,
            predicates: RulePredicates::Protocol(ProtocolPredicates {
                cipher_suites: Some(Predicate::AnyOf(vec![
                    "TLS_AES_128_GCM_SHA256".to_string(),
                ])),
                ikev2_transform_types: Some(required),
                ..Default::default()
            }),
        };

        let mut declared = BTreeMap::new();
        declared.insert(
            "encr".to_string(),
            vec!["aes-128-ref".to_string(), "aes-256-ref".to_string()],
        );
        let asset = CryptographicAsset {
            identifier: "ike".to_string(),
            asset_type: AssetType::Protocol,
            name: None,
            oid: None,
            properties: Some(AssetProperties::Protocol(ProtocolProperties {
                cipher_suites: Some(vec![
                    CipherSuite {
                        name: "tls_aes_128_gcm_sha256".to_string(),
                    },
                    CipherSuite {
                        name: "TLS_CHACHA20_POLY1305_SHA256".to_string(),
                    },
                ]),
                ikev2_transform_types: Some(declared),
                ..Default::default()
            })),
        };
        let props = asset.typed_properties().expect("properties");
        assert!(rule_matches(&rule, &asset, props));

        // Missing transform type on the asset rejects the rule.
        let mut sparse = asset.clone();
        if let Some(AssetProperties::Protocol(p)) = sparse.properties.as_mut() {
            p.ikev2_transform_types = Some(BTreeMap::new());
        }
        let props = sparse.typed_properties().expect("properties");
        assert!(!rule_matches(&rule, &sparse, props));
    }

    #[test]
    fn more_specific_rule_beats_broad_rule_at_evaluation() {
        let broad = Rule {
            name: None,
            description: "all algorithms".to_string(),
            level_id: 3,
            oid: None,
            predicates: RulePredicates::Algorithm(AlgorithmPredicates::default()),
        };
        let narrow = Rule {
            name: None,
            description: "approved kem".to_string(),
            level_id: 1,
            oid: None,
            predicates: RulePredicates::Algorithm(AlgorithmPredicates {
                primitive: Some(Predicate::Text("kem".to_string())),
                nist_quantum_security_level: Some(Predicate::Range(
                    RangeExpr::parse(">=1").expect("valid range"),
                )),
                ..Default::default()
            }),
        };
        let evaluator = PolicyEvaluator::new(test_policy(vec![broad, narrow]));

        let asset = algorithm_asset(
            "ml-kem-768",
            AlgorithmProperties {
                primitive: Some(Primitive::Kem),
                nist_quantum_security_level: Some(3),
                ..Default::default()
            },
        );
        let result = evaluator.evaluate("test_policy", &[asset]);
        assert_eq!(result.findings[0].message, "approved kem");
        assert_eq!(result.assessment.id, 1);
    }
}
