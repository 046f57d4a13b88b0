//! Stable DTOs and IDs used across the cbomguard workspace.
//!
//! This crate is intentionally boring:
//! - the cryptographic asset model consumed by the evaluation engine
//! - compliance/assessment level catalogs
//! - finding and report envelope types
//! - stable policy identifier strings

#![forbid(unsafe_code)]

pub mod asset;
pub mod catalog;
pub mod ids;
pub mod report;

pub use asset::{
    AlgorithmProperties, AssetProperties, AssetType, CertificateProperties, CipherSuite,
    CryptographicAsset, Primitive, ProtocolProperties, RelatedCryptoMaterialProperties,
};
pub use catalog::{AssessmentLevel, ComplianceIcon, ComplianceLevel};
pub use report::{
    CheckResult, Finding, PolicyInfo, ReportEnvelope, ToolMeta, SCHEMA_REPORT_V1,
};
