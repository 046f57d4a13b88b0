use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four categories of cryptographic assets an inventory can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AssetType {
    Algorithm,
    Certificate,
    Protocol,
    RelatedCryptoMaterial,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Algorithm => "algorithm",
            AssetType::Certificate => "certificate",
            AssetType::Protocol => "protocol",
            AssetType::RelatedCryptoMaterial => "related-crypto-material",
        }
    }
}

/// Cryptographic primitive vocabulary (CycloneDX crypto extension).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Primitive {
    Drbg,
    Mac,
    BlockCipher,
    StreamCipher,
    Signature,
    Hash,
    Pke,
    Xof,
    Kdf,
    KeyAgree,
    Kem,
    Ae,
    Combiner,
    Other,
    Unknown,
}

impl Primitive {
    /// Symbolic name used for case-insensitive predicate comparison.
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Drbg => "drbg",
            Primitive::Mac => "mac",
            Primitive::BlockCipher => "block-cipher",
            Primitive::StreamCipher => "stream-cipher",
            Primitive::Signature => "signature",
            Primitive::Hash => "hash",
            Primitive::Pke => "pke",
            Primitive::Xof => "xof",
            Primitive::Kdf => "kdf",
            Primitive::KeyAgree => "key-agree",
            Primitive::Kem => "kem",
            Primitive::Ae => "ae",
            Primitive::Combiner => "combiner",
            Primitive::Other => "other",
            Primitive::Unknown => "unknown",
        }
    }
}

/// One asset drawn from a cryptography inventory.
///
/// Produced entirely by an external inventory extractor; the engine only
/// reads it. `properties` may be absent or disagree with `asset_type`, in
/// which case evaluation falls back to the policy's unknown level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CryptographicAsset {
    /// Stable key used in findings and reports.
    pub identifier: String,

    pub asset_type: AssetType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Dotted object identifier, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<AssetProperties>,
}

impl CryptographicAsset {
    /// The property bag, but only when it matches the declared asset type.
    pub fn typed_properties(&self) -> Option<&AssetProperties> {
        let props = self.properties.as_ref()?;
        (props.asset_type() == self.asset_type).then_some(props)
    }
}

/// Type-tagged property bag; exactly one variant, matching the asset type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AssetProperties {
    Algorithm(AlgorithmProperties),
    Certificate(CertificateProperties),
    Protocol(ProtocolProperties),
    RelatedCryptoMaterial(RelatedCryptoMaterialProperties),
}

impl AssetProperties {
    pub fn asset_type(&self) -> AssetType {
        match self {
            AssetProperties::Algorithm(_) => AssetType::Algorithm,
            AssetProperties::Certificate(_) => AssetType::Certificate,
            AssetProperties::Protocol(_) => AssetType::Protocol,
            AssetProperties::RelatedCryptoMaterial(_) => AssetType::RelatedCryptoMaterial,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitive: Option<Primitive>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_set_identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_environment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_platform: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification_level: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_functions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classical_security_level: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nist_quantum_security_level: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateProperties {
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
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CipherSuite {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolProperties {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub protocol_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cipher_suites: Option<Vec<CipherSuite>>,

    /// IKEv2 transform-type name -> referenced asset identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ikev2_transform_types: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatedCryptoMaterialProperties {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,

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
    pub size: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}
