//! NIST SP 800-131A Rev. 3 fixed-guideline heuristic.
//!
//! An ordered rule table evaluated top to bottom, first match wins: name
//! substrings first, then cipher-mode substrings.

use crate::builtin::worst_assessment;
use crate::evaluator::Evaluator;
use cbomguard_types::{
    ids, AssessmentLevel, AssetProperties, CheckResult, ComplianceIcon, ComplianceLevel,
    CryptographicAsset, Finding,
};

const LEVEL_DISALLOWED: i32 = 1;
const LEVEL_DEPRECATED: i32 = 2;
const LEVEL_ACCEPTABLE: i32 = 3;
const LEVEL_LEGACY_USE: i32 = 4;
const LEVEL_UNKNOWN: i32 = 5;

/// Mode substring -> (level, message), evaluated in order.
const MODE_RULES: &[(&str, i32, &str)] = &[
    (
        "ecb",
        LEVEL_LEGACY_USE,
        "ECB mode is disallowed for encryption but allowed as legacy use for decryption",
    ),
    ("cbc", LEVEL_ACCEPTABLE, "CBC mode is acceptable"),
    ("cfb", LEVEL_ACCEPTABLE, "CFB mode is acceptable"),
    ("ctr", LEVEL_ACCEPTABLE, "CTR mode is acceptable"),
    ("ofb", LEVEL_ACCEPTABLE, "OFB mode is acceptable"),
    ("ccm", LEVEL_ACCEPTABLE, "CCM mode is acceptable"),
    ("gcm", LEVEL_ACCEPTABLE, "GCM mode is acceptable"),
    ("xts", LEVEL_ACCEPTABLE, "XTS-AES mode is acceptable"),
    ("ff3", LEVEL_DISALLOWED, "FF3 mode is disallowed"),
];

pub struct NistSp800131AEvaluator {
    levels: Vec<ComplianceLevel>,
}

impl Default for NistSp800131AEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl NistSp800131AEvaluator {
    pub fn new() -> Self {
        let compliant = AssessmentLevel::compliant().id;
        let not_compliant = AssessmentLevel::not_compliant().id;
        NistSp800131AEvaluator {
            levels: vec![
                ComplianceLevel {
                    id: LEVEL_DISALLOWED,
                    label: "Disallowed".to_string(),
                    description: None,
                    color: "#dc3545".to_string(),
                    icon: ComplianceIcon::Error,
                    assessment_id: not_compliant,
                },
                ComplianceLevel {
                    id: LEVEL_DEPRECATED,
                    label: "Deprecated".to_string(),
                    description: Some("Use is discouraged and may be disallowed soon".to_string()),
                    color: "#ffc107".to_string(),
                    icon: ComplianceIcon::Warning,
                    assessment_id: not_compliant,
                },
                ComplianceLevel {
                    id: LEVEL_ACCEPTABLE,
                    label: "Acceptable".to_string(),
                    description: None,
                    color: "green".to_string(),
                    icon: ComplianceIcon::CheckmarkSecure,
                    assessment_id: compliant,
                },
                ComplianceLevel {
                    id: LEVEL_LEGACY_USE,
                    label: "Legacy Use".to_string(),
                    description: Some(
                        "Only allowed to decrypt/verify previously protected data".to_string(),
                    ),
                    color: "gray".to_string(),
                    icon: ComplianceIcon::NotApplicable,
                    assessment_id: compliant,
                },
                ComplianceLevel {
                    id: LEVEL_UNKNOWN,
                    label: "Unknown".to_string(),
                    description: Some("Could not determine compliance status".to_string()),
                    color: "#17a9d1".to_string(),
                    icon: ComplianceIcon::Unknown,
                    assessment_id: not_compliant,
                },
            ],
        }
    }

    fn level(&self, id: i32) -> ComplianceLevel {
        self.levels
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .unwrap_or_else(|| self.levels[self.levels.len() - 1].clone())
    }

    fn finding(&self, asset: &CryptographicAsset, level_id: i32, message: &str) -> Finding {
        Finding {
            asset_identifier: asset.identifier.clone(),
            level: self.level(level_id),
            message: message.to_string(),
        }
    }

    fn evaluate_asset(&self, asset: &CryptographicAsset) -> Finding {
        let name = asset.name.as_deref().unwrap_or("").to_lowercase();
        let mode = match asset.typed_properties() {
            Some(AssetProperties::Algorithm(a)) => {
                a.mode.as_deref().unwrap_or("").to_lowercase()
            }
            _ => String::new(),
        };

        // SHA-1 and SHA-224 are deprecated (disallowed after 2030).
        if name.contains("sha1") {
            return self.finding(
                asset,
                LEVEL_DEPRECATED,
                "SHA-1 is deprecated and disallowed after 2030",
            );
        }
        if name.contains("sha224") {
            return self.finding(
                asset,
                LEVEL_DEPRECATED,
                "SHA-224 is deprecated and disallowed after 2030",
            );
        }

        if name.contains("aes") {
            return self.finding(
                asset,
                LEVEL_ACCEPTABLE,
                "AES is acceptable at all key sizes (128+)",
            );
        }

        if name.contains("tdea") || name.contains("3des") || name.contains("triple des") {
            return self.finding(asset, LEVEL_DISALLOWED, "TDEA is disallowed");
        }

        for (needle, level_id, message) in MODE_RULES {
            if mode.contains(needle) {
                return self.finding(asset, *level_id, message);
            }
        }

        self.finding(asset, LEVEL_UNKNOWN, "Could not categorize this asset")
    }
}

impl Evaluator for NistSp800131AEvaluator {
    fn name(&self) -> &str {
        "NIST SP 800-131A Rev. 3 Compliance"
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
        if policy_id != ids::POLICY_NIST_SP_800_131A {
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
