//! `tasktrack-policy`: load the configured access policy and print it.
//!
//! Fails with a non-zero exit when the policy document is invalid, so it
//! doubles as a config check in deploy pipelines.

use anyhow::Context;

use tasktrack_infra::EngineConfig;

fn main() -> anyhow::Result<()> {
    tasktrack_observability::init();

    let config = EngineConfig::from_env().context("failed to load engine configuration")?;

    let mut operations: Vec<_> = config.operations.operations().collect();
    operations.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
    let operations: serde_json::Map<String, serde_json::Value> = operations
        .into_iter()
        .map(|(id, requirements)| serde_json::to_value(requirements).map(|v| (id.to_string(), v)))
        .collect::<Result<_, serde_json::Error>>()?;

    let report = serde_json::json!({
        "policy": config.policy.summary(),
        "operations": operations,
        "auditPageSize": config.audit_page_size,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    tracing::info!(operations = config.operations.len(), "policy check passed");
    Ok(())
}
