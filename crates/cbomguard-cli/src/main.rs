//! CLI entry point for cbomguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and
//! exit codes. Evaluation logic lives in the `cbomguard-domain` and
//! `cbomguard-policy` crates.

use std::sync::Arc;

use anyhow::Context;
use camino::Utf8PathBuf;
use cbomguard_domain::{Evaluator, PolicyEvaluator, PolicyRegistry};
use cbomguard_types::{
    ids, AssessmentLevel, CryptographicAsset, PolicyInfo, ReportEnvelope, ToolMeta,
    SCHEMA_REPORT_V1,
};
use clap::{Parser, Subcommand};
use time::OffsetDateTime;

#[derive(Parser, Debug)]
#[command(
    name = "cbomguard",
    version,
    about = "Compliance policy checks for cryptographic asset inventories"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and compile a policy document, reporting any errors.
    Validate {
        /// Path to the policy TOML document.
        #[arg(long)]
        policy: Utf8PathBuf,
    },

    /// Evaluate an asset inventory against a policy.
    Evaluate {
        /// Built-in policy identifier or path to a policy TOML document.
        #[arg(long, default_value = ids::POLICY_QUANTUM_SAFE)]
        policy: String,

        /// Path to the asset inventory (JSON array of assets).
        #[arg(long)]
        assets: Utf8PathBuf,

        /// Where to write the JSON report (defaults to stdout).
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,
    },

    /// List the built-in policies.
    Policies,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Validate { policy } => cmd_validate(&policy),
        Commands::Evaluate {
            policy,
            assets,
            report_out,
        } => cmd_evaluate(&policy, &assets, report_out),
        Commands::Policies => cmd_policies(),
    }
}

fn cmd_validate(policy_path: &Utf8PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(policy_path)
        .with_context(|| format!("read policy: {policy_path}"))?;

    match cbomguard_policy::load_policy(&text) {
        Ok(policy) => {
            println!(
                "policy `{}` is valid: {} levels, {} rules",
                policy.id,
                policy.levels.len(),
                policy.rules.len()
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("cbomguard: invalid policy {policy_path}: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_evaluate(
    policy_arg: &str,
    assets_path: &Utf8PathBuf,
    report_out: Option<Utf8PathBuf>,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let assets_text = std::fs::read_to_string(assets_path)
            .with_context(|| format!("read assets: {assets_path}"))?;
        let assets: Vec<CryptographicAsset> =
            serde_json::from_str(&assets_text).context("parse asset inventory")?;

        let (policy_id, evaluator) = resolve_evaluator(policy_arg)?;

        let started_at = OffsetDateTime::now_utc();
        let result = evaluator.evaluate(&policy_id, &assets);
        let finished_at = OffsetDateTime::now_utc();

        if result.error {
            anyhow::bail!("evaluator does not accept policy identifier `{policy_id}`");
        }

        let exit_code = if result.assessment.id > AssessmentLevel::compliant().id {
            2
        } else {
            0
        };

        let envelope = ReportEnvelope {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "cbomguard".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            policy: PolicyInfo {
                id: policy_id,
                label: evaluator.name().to_string(),
            },
            started_at,
            finished_at,
            result,
        };

        let json = serde_json::to_string_pretty(&envelope).context("serialize report")?;
        match report_out {
            Some(path) => write_text_file(&path, &json).context("write report json")?,
            None => println!("{json}"),
        }

        Ok(exit_code)
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("cbomguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// A built-in identifier resolves through the registry; anything else is
/// treated as a path to a policy document.
fn resolve_evaluator(policy_arg: &str) -> anyhow::Result<(String, Arc<dyn Evaluator>)> {
    if ids::BUILTIN_POLICY_IDS.contains(&policy_arg) {
        let registry = PolicyRegistry::new();
        return Ok((policy_arg.to_string(), registry.get(policy_arg)));
    }

    let text = std::fs::read_to_string(policy_arg)
        .with_context(|| format!("read policy: {policy_arg}"))?;
    let policy = cbomguard_policy::load_policy(&text)
        .with_context(|| format!("load policy: {policy_arg}"))?;
    let id = policy.id.clone();
    Ok((id, Arc::new(PolicyEvaluator::new(policy))))
}

fn cmd_policies() -> anyhow::Result<()> {
    let registry = PolicyRegistry::new();
    for info in registry.list() {
        println!("{}\t{}", info.id, info.label);
    }
    Ok(())
}

fn write_text_file(path: &camino::Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write report: {path}"))?;
    Ok(())
}
