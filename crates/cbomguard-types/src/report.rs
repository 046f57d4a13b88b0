use crate::catalog::{AssessmentLevel, ComplianceLevel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for cbomguard report envelopes.
pub const SCHEMA_REPORT_V1: &str = "cbomguard.report.v1";

/// One evaluated asset: which level it landed on and why.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub asset_identifier: String,
    pub level: ComplianceLevel,
    pub message: String,
}

/// Aggregate outcome of evaluating one inventory against one policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Findings in input asset order.
    pub findings: Vec<Finding>,

    /// Set when the invoked evaluator does not correspond to the supplied
    /// policy identifier; findings are empty in that case.
    pub error: bool,

    /// Worst assessment across all findings.
    pub assessment: AssessmentLevel,
}

impl CheckResult {
    pub fn mismatch(assessment: AssessmentLevel) -> Self {
        CheckResult {
            findings: Vec::new(),
            error: true,
            assessment,
        }
    }
}

/// Registry discovery entry: policy id plus its display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyInfo {
    pub id: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Outer envelope emitted by the CLI; the core only defines the shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub policy: PolicyInfo,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    #[serde(flatten)]
    pub result: CheckResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComplianceIcon;

    #[test]
    fn mismatch_result_has_no_findings() {
        let result = CheckResult::mismatch(AssessmentLevel::not_compliant());
        assert!(result.error);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn envelope_serializes_result_inline() {
        let envelope = ReportEnvelope {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "cbomguard".to_string(),
                version: "0.1.0".to_string(),
            },
            policy: PolicyInfo {
                id: "quantum_safe".to_string(),
                label: "Basic Quantum Safe".to_string(),
            },
            started_at: OffsetDateTime::UNIX_EPOCH,
            finished_at: OffsetDateTime::UNIX_EPOCH,
            result: CheckResult {
                findings: vec![Finding {
                    asset_identifier: "rsa-2048".to_string(),
                    level: ComplianceLevel {
                        id: 1,
                        label: "Not Quantum Safe".to_string(),
                        description: None,
                        color: "#fac532".to_string(),
                        icon: ComplianceIcon::Warning,
                        assessment_id: 2,
                    },
                    message: "asymmetric primitive without whitelist match".to_string(),
                }],
                error: false,
                assessment: AssessmentLevel::not_compliant(),
            },
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&envelope).expect("serialize"))
                .expect("reparse");
        assert_eq!(json["schema"], SCHEMA_REPORT_V1);
        // `result` is flattened: findings sit at the top level of the envelope.
        assert_eq!(json["findings"][0]["assetIdentifier"], "rsa-2048");
        assert_eq!(json["assessment"]["id"], 2);
    }
}
