//! Quantum-safety whitelist heuristic.
//!
//! Only asymmetric primitives are assessed; symmetric ones are out of scope
//! for this categorization and land on Not Applicable.

use crate::builtin::worst_assessment;
use crate::evaluator::Evaluator;
use cbomguard_types::{
    ids, AssessmentLevel, AssetProperties, CheckResult, ComplianceIcon, ComplianceLevel,
    CryptographicAsset, Finding, Primitive,
};

const ASYMMETRIC_PRIMITIVES: &[Primitive] = &[
    Primitive::Signature,
    Primitive::KeyAgree,
    Primitive::Kem,
    Primitive::Pke,
];

const UNKNOWN_PRIMITIVES: &[Primitive] = &[Primitive::Unknown, Primitive::Other];

/// Quantum-safe algorithm family names; checked as lowercase substrings of
/// the asset name, first match wins in list order.
const WHITELIST_NAMES: &[&str] = &[
    "ml-kem", "ml-dsa", "slh-dsa", "pqxdh", "bike", "mceliece", "frodokem", "hqc", "kyber",
    "ntru", "crystals", "falcon", "mayo", "sphincs", "xmss", "lms",
];

/// OIDs of known quantum-safe algorithms (ML-DSA, Falcon, SPHINCS+, XMSS).
const WHITELIST_OIDS: &[&str] = &[
    "1.3.6.1.4.1.2.267.12.4.4",
    "1.3.6.1.4.1.2.267.12.6.5",
    "1.3.6.1.4.1.2.267.12.8.7",
    "1.3.9999.6.4.16",
    "1.3.9999.6.7.16",
    "1.3.9999.6.4.13",
    "1.3.9999.6.7.13",
    "1.3.9999.6.5.12",
    "1.3.9999.6.8.12",
    "1.3.9999.6.5.10",
    "1.3.9999.6.8.10",
    "1.3.9999.6.6.12",
    "1.3.9999.6.9.12",
    "1.3.9999.6.6.10",
    "1.3.9999.6.9.10",
    "1.3.6.1.4.1.22554.5.6.1",
    "1.3.6.1.4.1.22554.5.6.2",
    "1.3.6.1.4.1.22554.5.6.3",
];

const LEVEL_NOT_QUANTUM_SAFE: i32 = 1;
const LEVEL_UNKNOWN: i32 = 2;
const LEVEL_QUANTUM_SAFE: i32 = 3;
const LEVEL_NOT_APPLICABLE: i32 = 4;

pub struct QuantumSafeEvaluator {
    levels: Vec<ComplianceLevel>,
}

impl Default for QuantumSafeEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumSafeEvaluator {
    pub fn new() -> Self {
        let compliant = AssessmentLevel::compliant().id;
        let not_compliant = AssessmentLevel::not_compliant().id;
        QuantumSafeEvaluator {
            levels: vec![
                ComplianceLevel {
                    id: LEVEL_NOT_QUANTUM_SAFE,
                    label: "Not Quantum Safe".to_string(),
                    description: None,
                    color: "#fac532".to_string(),
                    icon: ComplianceIcon::Warning,
                    assessment_id: not_compliant,
                },
                ComplianceLevel {
                    id: LEVEL_UNKNOWN,
                    label: "Unknown".to_string(),
                    description: Some("Unknown Compliance".to_string()),
                    color: "#17a9d1".to_string(),
                    icon: ComplianceIcon::Unknown,
                    assessment_id: not_compliant,
                },
                ComplianceLevel {
                    id: LEVEL_QUANTUM_SAFE,
                    label: "Quantum Safe".to_string(),
                    description: None,
                    color: "green".to_string(),
                    icon: ComplianceIcon::CheckmarkSecure,
                    assessment_id: compliant,
                },
                ComplianceLevel {
                    id: LEVEL_NOT_APPLICABLE,
                    label: "Not Applicable".to_string(),
                    description: Some(
                        "Not Applicable: only asymmetric algorithms are categorized".to_string(),
                    ),
                    color: "gray".to_string(),
                    icon: ComplianceIcon::NotApplicable,
                    assessment_id: compliant,
                },
            ],
        }
    }

    fn level(&self, id: i32) -> ComplianceLevel {
        self.levels
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .unwrap_or_else(|| self.levels[1].clone())
    }

    fn finding(&self, asset: &CryptographicAsset, level_id: i32, message: &str) -> Finding {
        Finding {
            asset_identifier: asset.identifier.clone(),
            level: self.level(level_id),
            message: message.to_string(),
        }
    }

    fn evaluate_asset(&self, asset: &CryptographicAsset) -> Finding {
        let Some(AssetProperties::Algorithm(algorithm)) = asset.typed_properties() else {
            return self.finding(
                asset,
                LEVEL_UNKNOWN,
                "the asset carries no algorithm properties, which does not allow further categorization",
            );
        };

        if algorithm.nist_quantum_security_level.unwrap_or(0) > 0 {
            return self.finding(
                asset,
                LEVEL_QUANTUM_SAFE,
                "the field 'nistQuantumSecurityLevel' was set with a strictly positive value",
            );
        }

        let Some(primitive) = algorithm.primitive else {
            return self.finding(
                asset,
                LEVEL_UNKNOWN,
                "the asset primitive was not set, which does not allow further categorization",
            );
        };

        let asymmetric = ASYMMETRIC_PRIMITIVES.contains(&primitive);
        let unclear = UNKNOWN_PRIMITIVES.contains(&primitive);
        if !asymmetric && !unclear {
            return self.finding(
                asset,
                LEVEL_NOT_APPLICABLE,
                "the asset has a symmetric primitive, so the quantum-safe categorization is not applicable",
            );
        }

        if let Some(oid) = asset.oid.as_deref() {
            if WHITELIST_OIDS.contains(&oid) {
                return self.finding(
                    asset,
                    LEVEL_QUANTUM_SAFE,
                    "the OID of the asset is part of the quantum-safe OID whitelist",
                );
            }
        }

        if let Some(name) = asset.name.as_deref() {
            let lower = name.to_lowercase();
            for family in WHITELIST_NAMES {
                if lower.contains(family) {
                    return Finding {
                        asset_identifier: asset.identifier.clone(),
                        level: self.level(LEVEL_QUANTUM_SAFE),
                        message: format!(
                            "the name of the asset contains '{family}', which is part of the quantum-safe whitelist of component names"
                        ),
                    };
                }
            }
        }

        if asymmetric {
            self.finding(
                asset,
                LEVEL_NOT_QUANTUM_SAFE,
                "the asset has an asymmetric primitive and does not match the quantum-safe whitelists of OIDs and names",
            )
        } else {
            self.finding(
                asset,
                LEVEL_UNKNOWN,
                "the asset primitive is unclear and does not allow further categorization",
            )
        }
    }
}

impl Evaluator for QuantumSafeEvaluator {
    fn name(&self) -> &str {
        "Basic Quantum Safe Compliance"
    }

    fn compliance_levels(&self) -> Vec<ComplianceLevel> {
        self.levels.clone()
    }

    fn default_level(&self) -> ComplianceLevel {
        self.level(LEVEL_UNKNOWN)
    }

    fn default_assessment(&self) -> AssessmentLevel {
        AssessmentLevel::not_compliant()
    }

    fn evaluate(&self, policy_id: &str, assets: &[CryptographicAsset]) -> CheckResult {
        if policy_id != ids::POLICY_QUANTUM_SAFE {
            return CheckResult::mismatch(self.default_assessment());
        }

        let findings: Vec<Finding> = assets
            .iter()
            .map(|asset| self.evaluate_asset(asset))
            .collect();
        let assessment = worst_assessment(&findings, self.default_assessment());

        CheckResult {
            findings,
            error: false,
            assessment,
        }
    }
}
