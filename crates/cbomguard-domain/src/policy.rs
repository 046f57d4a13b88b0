//! Compiled policy model: immutable after construction.

use crate::matcher::Predicate;
use cbomguard_types::{AssessmentLevel, AssetType, ComplianceIcon, ComplianceLevel};
use std::collections::BTreeMap;

/// A declarative policy compiled into matchable form.
///
/// Built once (see `cbomguard-policy`) and treated as read-only afterwards,
/// so concurrent evaluation needs no locking.
#[derive(Clone, Debug)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub default_level_id: i32,
    pub levels: Vec<ComplianceLevel>,
    pub assessment_levels: Vec<AssessmentLevel>,
    /// Stable order for deterministic iteration; resolution is
    /// specificity-based, so order never affects outcomes.
    pub rules: Vec<Rule>,
}

impl Policy {
    pub fn level(&self, id: i32) -> Option<&ComplianceLevel> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// The designated default level; an unresolvable default falls back to
    /// the catalog-independent unknown level.
    pub fn default_level(&self) -> ComplianceLevel {
        self.level(self.default_level_id)
            .cloned()
            .unwrap_or_else(unknown_fallback_level)
    }

    /// The level assets land on when their property bag is missing: the
    /// level labelled "unknown" if the policy defines one, else the default.
    pub fn unknown_level(&self) -> ComplianceLevel {
        self.levels
            .iter()
            .find(|l| l.label.eq_ignore_ascii_case("unknown"))
            .cloned()
            .unwrap_or_else(|| self.default_level())
    }

    pub fn assessment(&self, id: i32) -> Option<&AssessmentLevel> {
        self.assessment_levels.iter().find(|a| a.id == id)
    }

    /// Fallback assessment for findings whose level maps to no catalog
    /// entry: the worst declared tier (fail closed).
    pub fn default_assessment(&self) -> AssessmentLevel {
        self.assessment_levels
            .iter()
            .max_by_key(|a| a.id)
            .cloned()
            .unwrap_or_else(AssessmentLevel::not_compliant)
    }
}

fn unknown_fallback_level() -> ComplianceLevel {
    ComplianceLevel {
        id: 0,
        label: "unknown".to_string(),
        description: None,
        color: "#17a9d1".to_string(),
        icon: ComplianceIcon::Unknown,
        assessment_id: AssessmentLevel::not_compliant().id,
    }
}

/// One immutable policy rule: identity filters plus a per-type predicate bag.
#[derive(Clone, Debug)]
pub struct Rule {
    /// Optional identity filter against the asset display name.
    pub name: Option<Predicate>,
    pub description: String,
    /// Target compliance level; unresolved ids fall back to the default.
    pub level_id: i32,
    pub oid: Option<Predicate>,
    pub predicates: RulePredicates,
}

impl Rule {
    pub fn asset_type(&self) -> AssetType {
        self.predicates.asset_type()
    }

    /// Specificity: one point per constrained predicate (a collection
    /// predicate counts once), plus one for the asset-type marker and one
    /// each for set name/oid filters.
    pub fn specificity(&self) -> u32 {
        1 + u32::from(self.name.is_some())
            + u32::from(self.oid.is_some())
            + self.predicates.constrained_points()
    }
}

/// Per-asset-type predicate bag, mirroring the asset property bags.
#[derive(Clone, Debug)]
pub enum RulePredicates {
    Algorithm(AlgorithmPredicates),
    Certificate(CertificatePredicates),
    Protocol(ProtocolPredicates),
    RelatedCryptoMaterial(RelatedCryptoMaterialPredicates),
}

impl RulePredicates {
    pub fn asset_type(&self) -> AssetType {
        match self {
            RulePredicates::Algorithm(_) => AssetType::Algorithm,
            RulePredicates::Certificate(_) => AssetType::Certificate,
            RulePredicates::Protocol(_) => AssetType::Protocol,
            RulePredicates::RelatedCryptoMaterial(_) => AssetType::RelatedCryptoMaterial,
        }
    }

    fn constrained_points(&self) -> u32 {
        match self {
            RulePredicates::Algorithm(p) => p.constrained_points(),
            RulePredicates::Certificate(p) => p.constrained_points(),
            RulePredicates::Protocol(p) => p.constrained_points(),
            RulePredicates::RelatedCryptoMaterial(p) => p.constrained_points(),
        }
    }
}

fn point(set: bool) -> u32 {
    u32::from(set)
}

#[derive(Clone, Debug, Default)]
pub struct AlgorithmPredicates {
    pub primitive: Option<Predicate>,
    pub parameter_set_identifier: Option<Predicate>,
    pub curve: Option<Predicate>,
    pub execution_environment: Option<Predicate>,
    pub implementation_platform: Option<Predicate>,
    pub certification_level: Option<Predicate>,
    pub mode: Option<Predicate>,
    pub padding: Option<Predicate>,
    pub crypto_functions: Option<Predicate>,
    pub classical_security_level: Option<Predicate>,
    pub nist_quantum_security_level: Option<Predicate>,
}

impl AlgorithmPredicates {
    fn constrained_points(&self) -> u32 {
        point(self.primitive.is_some())
            + point(self.parameter_set_identifier.is_some())
            + point(self.curve.is_some())
            + point(self.execution_environment.is_some())
            + point(self.implementation_platform.is_some())
            + point(self.certification_level.is_some())
            + point(self.mode.is_some())
            + point(self.padding.is_some())
            + point(self.crypto_functions.is_some())
            + point(self.classical_security_level.is_some())
            + point(self.nist_quantum_security_level.is_some())
    }
}

#[derive(Clone, Debug, Default)]
pub struct CertificatePredicates {
    pub subject_name: Option<Predicate>,
    pub issuer_name: Option<Predicate>,
    pub not_valid_before: Option<Predicate>,
    pub not_valid_after: Option<Predicate>,
    pub signature_algorithm_ref: Option<Predicate>,
    pub subject_public_key_ref: Option<Predicate>,
    pub certificate_format: Option<Predicate>,
    pub certificate_extension: Option<Predicate>,
}

impl CertificatePredicates {
    fn constrained_points(&self) -> u32 {
        point(self.subject_name.is_some())
            + point(self.issuer_name.is_some())
            + point(self.not_valid_before.is_some())
            + point(self.not_valid_after.is_some())
            + point(self.signature_algorithm_ref.is_some())
            + point(self.subject_public_key_ref.is_some())
            + point(self.certificate_format.is_some())
            + point(self.certificate_extension.is_some())
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProtocolPredicates {
    pub protocol_type: Option<Predicate>,
    pub version: Option<Predicate>,
    pub cipher_suites: Option<Predicate>,
    /// Transform-type name -> required reference subset.
    pub ikev2_transform_types: Option<BTreeMap<String, Vec<String>>>,
}

impl ProtocolPredicates {
    fn constrained_points(&self) -> u32 {
        point(self.protocol_type.is_some())
            + point(self.version.is_some())
            + point(self.cipher_suites.is_some())
            + point(self.ikev2_transform_types.is_some())
    }
}

#[derive(Clone, Debug, Default)]
pub struct RelatedCryptoMaterialPredicates {
    pub material_type: Option<Predicate>,
    pub id: Option<Predicate>,
    pub state: Option<Predicate>,
    pub algorithm_ref: Option<Predicate>,
    pub creation_date: Option<Predicate>,
    pub activation_date: Option<Predicate>,
    pub update_date: Option<Predicate>,
    pub expiration_date: Option<Predicate>,
    pub value: Option<Predicate>,
    pub size: Option<Predicate>,
    pub format: Option<Predicate>,
}

impl RelatedCryptoMaterialPredicates {
    fn constrained_points(&self) -> u32 {
        point(self.material_type.is_some())
            + point(self.id.is_some())
            + point(self.state.is_some())
            + point(self.algorithm_ref.is_some())
            + point(self.creation_date.is_some())
            + point(self.activation_date.is_some())
            + point(self.update_date.is_some())
            + point(self.expiration_date.is_some())
            + point(self.value.is_some())
            + point(self.size.is_some())
            + point(self.format.is_some())
    }
}
