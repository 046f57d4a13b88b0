use anyhow::Context;

use cbomguard_domain::matcher::{contains_range_symbols, Predicate, RangeExpr};
use cbomguard_domain::policy::{
    AlgorithmPredicates, CertificatePredicates, Policy, ProtocolPredicates,
    RelatedCryptoMaterialPredicates, Rule, RulePredicates,
};
use cbomguard_types::{
    catalog::default_assessment_catalog, AssessmentLevel, AssetType, ComplianceIcon,
    ComplianceLevel, Primitive,
};

use crate::model::{LevelDoc, NumberOrText, PolicyDocV1, RuleDoc};

pub fn compile(doc: PolicyDocV1) -> anyhow::Result<Policy> {
    let id = doc.id.context("policy is missing required field `id`")?;
    let name = doc
        .name
        .context("policy is missing required field `name`")?;
    let default_level_id = doc
        .default_level
        .context("policy is missing required field `default_level`")?;

    let level_docs = doc
        .levels
        .context("policy is missing required array `levels`")?;
    if level_docs.is_empty() {
        anyhow::bail!("policy declares an empty `levels` array");
    }

    let assessment_levels = if doc.assessment_levels.is_empty() {
        default_assessment_catalog()
    } else {
        doc.assessment_levels
            .into_iter()
            .enumerate()
            .map(|(i, a)| {
                Ok(AssessmentLevel {
                    id: a
                        .id
                        .with_context(|| format!("assessment level #{i} is missing `id`"))?
                        as i32,
                    label: a
                        .label
                        .with_context(|| format!("assessment level #{i} is missing `label`"))?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    let levels = level_docs
        .into_iter()
        .enumerate()
        .map(|(i, l)| compile_level(l).with_context(|| format!("invalid level #{i}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let rules = doc
        .rules
        .into_iter()
        .enumerate()
        .map(|(i, r)| compile_rule(r).with_context(|| format!("invalid rule #{i}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Policy {
        id,
        name,
        default_level_id: default_level_id as i32,
        levels,
        assessment_levels,
        rules,
    })
}

fn compile_level(doc: LevelDoc) -> anyhow::Result<ComplianceLevel> {
    let assessment_id = match (doc.assessment_level, doc.is_uncompliant) {
        (Some(id), _) => id as i32,
        (None, Some(true)) => AssessmentLevel::not_compliant().id,
        (None, Some(false)) => AssessmentLevel::compliant().id,
        (None, None) => {
            anyhow::bail!("level needs either `assessment_level` or `is_uncompliant`")
        }
    };

    Ok(ComplianceLevel {
        id: doc.id.context("level is missing `id`")? as i32,
        label: doc.label.context("level is missing `label`")?,
        description: doc.description,
        color: doc.color.context("level is missing `color`")?,
        icon: parse_icon(&doc.icon.context("level is missing `icon`")?)?,
        assessment_id,
    })
}

fn compile_rule(doc: RuleDoc) -> anyhow::Result<Rule> {
    let description = doc
        .description
        .clone()
        .context("rule is missing required field `description`")?;
    let level_id = doc
        .level
        .context("rule is missing required field `level`")?;
    let asset_type = parse_asset_type(
        &doc.asset_type
            .clone()
            .context("rule is missing required field `asset_type`")?,
    )?;

    let name = doc.name.as_deref().map(text_predicate);
    let oid = doc.oid.as_deref().map(text_predicate);

    let predicates = match asset_type {
        AssetType::Algorithm => RulePredicates::Algorithm(algorithm_predicates(&doc)?),
        AssetType::Certificate => RulePredicates::Certificate(certificate_predicates(&doc)),
        AssetType::Protocol => RulePredicates::Protocol(protocol_predicates(&doc)),
        AssetType::RelatedCryptoMaterial => {
            RulePredicates::RelatedCryptoMaterial(material_predicates(&doc))
        }
    };

    Ok(Rule {
        name,
        description,
        level_id: level_id as i32,
        oid,
        predicates,
    })
}

fn algorithm_predicates(doc: &RuleDoc) -> anyhow::Result<AlgorithmPredicates> {
    let primitive = doc
        .primitive
        .as_deref()
        .map(parse_primitive)
        .transpose()?
        .map(|p| Predicate::Text(p.as_str().to_string()));

    Ok(AlgorithmPredicates {
        primitive,
        parameter_set_identifier: doc.parameter_set_identifier.as_deref().map(text_predicate),
        curve: doc.curve.as_deref().map(text_predicate),
        execution_environment: doc.execution_environment.as_deref().map(text_predicate),
        implementation_platform: doc.implementation_platform.as_deref().map(text_predicate),
        certification_level: set_predicate(&doc.certification_level),
        mode: doc.mode.as_deref().map(text_predicate),
        padding: doc.padding.as_deref().map(text_predicate),
        crypto_functions: set_predicate(&doc.crypto_functions),
        classical_security_level: doc.classical_security_level.as_ref().map(number_predicate),
        nist_quantum_security_level: doc
            .nist_quantum_security_level
            .as_ref()
            .map(number_predicate),
    })
}

fn certificate_predicates(doc: &RuleDoc) -> CertificatePredicates {
    CertificatePredicates {
        subject_name: doc.subject_name.as_deref().map(text_predicate),
        issuer_name: doc.issuer_name.as_deref().map(text_predicate),
        not_valid_before: doc.not_valid_before.as_deref().map(text_predicate),
        not_valid_after: doc.not_valid_after.as_deref().map(text_predicate),
        signature_algorithm_ref: doc.signature_algorithm_ref.as_deref().map(text_predicate),
        subject_public_key_ref: doc.subject_public_key_ref.as_deref().map(text_predicate),
        certificate_format: doc.certificate_format.as_deref().map(text_predicate),
        certificate_extension: doc.certificate_extension.as_deref().map(text_predicate),
    }
}

fn protocol_predicates(doc: &RuleDoc) -> ProtocolPredicates {
    let ikev2_transform_types = if doc.ikev2_transform_types.is_empty() {
        None
    } else {
        Some(doc.ikev2_transform_types.clone())
    };

    ProtocolPredicates {
        protocol_type: doc.type_name.as_deref().map(text_predicate),
        version: doc.version.as_deref().map(text_predicate),
        cipher_suites: set_predicate(&doc.cipher_suites),
        ikev2_transform_types,
    }
}

fn material_predicates(doc: &RuleDoc) -> RelatedCryptoMaterialPredicates {
    RelatedCryptoMaterialPredicates {
        material_type: doc.type_name.as_deref().map(text_predicate),
        id: doc.id.as_deref().map(text_predicate),
        state: doc.state.as_deref().map(text_predicate),
        algorithm_ref: doc.algorithm_ref.as_deref().map(text_predicate),
        creation_date: doc.creation_date.as_deref().map(text_predicate),
        activation_date: doc.activation_date.as_deref().map(text_predicate),
        update_date: doc.update_date.as_deref().map(text_predicate),
        expiration_date: doc.expiration_date.as_deref().map(text_predicate),
        value: doc.value.as_deref().map(text_predicate),
        size: doc.size.as_ref().map(number_predicate),
        format: doc.format.as_deref().map(text_predicate),
    }
}

/// Range expressions take precedence; a malformed one degrades to literal
/// case-insensitive comparison rather than failing the document.
fn text_predicate(value: &str) -> Predicate {
    if contains_range_symbols(value) {
        if let Some(range) = RangeExpr::parse(value) {
            return Predicate::Range(range);
        }
    }
    Predicate::Text(value.to_string())
}

fn number_predicate(value: &NumberOrText) -> Predicate {
    match value {
        NumberOrText::Int(n) => Predicate::Number(*n as f64),
        NumberOrText::Float(n) => Predicate::Number(*n),
        NumberOrText::Text(s) => text_predicate(s),
    }
}

fn set_predicate(values: &[String]) -> Option<Predicate> {
    if values.is_empty() {
        None
    } else {
        Some(Predicate::AnyOf(values.to_vec()))
    }
}

fn parse_asset_type(v: &str) -> anyhow::Result<AssetType> {
    match normalize_symbol(v).as_str() {
        "algorithm" => Ok(AssetType::Algorithm),
        "certificate" => Ok(AssetType::Certificate),
        "protocol" => Ok(AssetType::Protocol),
        "related-crypto-material" => Ok(AssetType::RelatedCryptoMaterial),
        other => anyhow::bail!(
            "unknown asset_type: {other} (expected algorithm|certificate|protocol|related-crypto-material)"
        ),
    }
}

fn parse_icon(v: &str) -> anyhow::Result<ComplianceIcon> {
    match normalize_symbol(v).as_str() {
        "checkmark" => Ok(ComplianceIcon::Checkmark),
        "checkmark-secure" => Ok(ComplianceIcon::CheckmarkSecure),
        "warning" => Ok(ComplianceIcon::Warning),
        "error" => Ok(ComplianceIcon::Error),
        "not-applicable" => Ok(ComplianceIcon::NotApplicable),
        "unknown" => Ok(ComplianceIcon::Unknown),
        "test" => Ok(ComplianceIcon::Test),
        other => anyhow::bail!("unknown icon: {other}"),
    }
}

fn parse_primitive(v: &str) -> anyhow::Result<Primitive> {
    match normalize_symbol(v).as_str() {
        "drbg" => Ok(Primitive::Drbg),
        "mac" => Ok(Primitive::Mac),
        "block-cipher" => Ok(Primitive::BlockCipher),
        "stream-cipher" => Ok(Primitive::StreamCipher),
        "signature" => Ok(Primitive::Signature),
        "hash" => Ok(Primitive::Hash),
        "pke" => Ok(Primitive::Pke),
        "xof" => Ok(Primitive::Xof),
        "kdf" => Ok(Primitive::Kdf),
        "key-agree" => Ok(Primitive::KeyAgree),
        "kem" => Ok(Primitive::Kem),
        "ae" => Ok(Primitive::Ae),
        "combiner" => Ok(Primitive::Combiner),
        "other" => Ok(Primitive::Other),
        "unknown" => Ok(Primitive::Unknown),
        other => anyhow::bail!("unknown primitive: {other}"),
    }
}

/// Symbols accept either snake_case or kebab-case, in any letter case.
fn normalize_symbol(v: &str) -> String {
    v.trim().to_lowercase().replace('_', "-")
}
