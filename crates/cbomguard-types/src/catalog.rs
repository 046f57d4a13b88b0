use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Icon shown next to a compliance level in presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceIcon {
    Checkmark,
    CheckmarkSecure,
    Warning,
    Error,
    NotApplicable,
    Unknown,
    Test,
}

/// A named outcome bucket a policy can assign to an asset.
///
/// `id` is unique within one policy; a numerically higher id is defined as
/// worse, which is what the specificity tie-break relies on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceLevel {
    pub id: i32,
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hex string or CSS color name.
    pub color: String,

    pub icon: ComplianceIcon,

    /// Foreign key into the policy's assessment catalog.
    pub assessment_id: i32,
}

/// An ordered risk tier; higher id = worse. Worst across a set = max by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssessmentLevel {
    pub id: i32,
    pub label: String,
}

impl AssessmentLevel {
    pub fn compliant() -> Self {
        AssessmentLevel {
            id: 1,
            label: "Compliant".to_string(),
        }
    }

    pub fn not_compliant() -> Self {
        AssessmentLevel {
            id: 2,
            label: "Not Compliant".to_string(),
        }
    }
}

/// The two-tier catalog used when a policy does not declare its own.
pub fn default_assessment_catalog() -> Vec<AssessmentLevel> {
    vec![
        AssessmentLevel::compliant(),
        AssessmentLevel::not_compliant(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_ordered_worst_last() {
        let catalog = default_assessment_catalog();
        assert_eq!(catalog.len(), 2);
        assert!(catalog[0].id < catalog[1].id);
        assert_eq!(catalog[1].label, "Not Compliant");
    }

    #[test]
    fn icon_uses_kebab_case_symbols() {
        let json = serde_json::to_string(&ComplianceIcon::CheckmarkSecure).expect("serialize");
        assert_eq!(json, "\"checkmark-secure\"");
        let icon: ComplianceIcon = serde_json::from_str("\"not-applicable\"").expect("parse");
        assert_eq!(icon, ComplianceIcon::NotApplicable);
    }
}
