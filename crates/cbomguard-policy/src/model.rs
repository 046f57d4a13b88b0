use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Policy document schema v1.
///
/// This is a *user-facing* document model: it is intentionally permissive so
/// forward-compat is easy. Strictness lives in `compile`, which rejects
/// missing required fields and unrecognized symbols.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyDocV1 {
    /// Optional schema string for tooling (`cbomguard.policy.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Id of the compliance level assets fall back to when no rule matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_level: Option<i64>,

    /// Severity tiers levels map onto. When omitted, the fixed
    /// Compliant/Not Compliant pair is used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assessment_levels: Vec<AssessmentLevelDoc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<LevelDoc>>,

    #[serde(default, rename = "rule", skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDoc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssessmentLevelDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LevelDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hex string or CSS color name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Id of the assessment tier this level rolls up into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_level: Option<i64>,

    /// Legacy spelling: `true` maps to Not Compliant, `false` to Compliant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_uncompliant: Option<bool>,
}

/// A scalar predicate value: a literal number, or a string that may carry a
/// range expression (`">=128 <512"`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

/// One declarative rule. Which fields are meaningful depends on
/// `asset_type`; fields belonging to other asset types are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Target compliance level id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,

    /// Optional identity filters against the asset name and oid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid: Option<String>,

    // -- algorithm --
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitive: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_set_identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_environment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_platform: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certification_level: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crypto_functions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classical_security_level: Option<NumberOrText>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nist_quantum_security_level: Option<NumberOrText>,

    // -- certificate --
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_valid_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_valid_after: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_public_key_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_extension: Option<String>,

    // -- protocol / related-crypto-material (shared key) --
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    // -- protocol --
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cipher_suites: Vec<String>,

    /// IKEv2 transform-type name -> required reference subset.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ikev2_transform_types: BTreeMap<String, Vec<String>>,

    // -- related-crypto-material --
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<NumberOrText>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}
