use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::{Finding, FindingsReport, ReportSummary, ValidatedSpec};

/// Typed deserialization at the trust boundary. The artifact is assumed to
/// have been validated upstream; a parse failure here is a malformed-input
/// fault, not a recoverable condition.
pub fn parse_artifact(bytes: &[u8]) -> Result<ValidatedSpec> {
    serde_json::from_slice(bytes).context("failed to parse validated specification artifact")
}

pub fn parse_artifact_value(value: serde_json::Value) -> Result<ValidatedSpec> {
    serde_json::from_value(value).context("failed to parse validated specification artifact")
}

/// Flattens a validated specification into display-ready findings.
///
/// Order is a contract: categories in `qa_categories` sequence order, results
/// in the document order of the per-category map. A category whose results
/// map is present but empty contributes nothing; a category missing from
/// `results` entirely aborts the extraction.
pub fn findings(spec: &ValidatedSpec) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();
    for category in &spec.body.spec.qa_categories {
        let Some(results) = spec.body.results.get(&category.name) else {
            bail!("no results entry for QA category: {}", category.name);
        };
        for record in results.values() {
            findings.push(Finding {
                status: record.result_type.clone(),
                qa_category: category.name.clone(),
                measurement: record.metadata.measurement_type.clone(),
                evidence_id: record.metadata.identifier.name.clone(),
                message: record.message.clone(),
            });
        }
    }
    Ok(findings)
}

pub fn summarize(findings: &[Finding]) -> ReportSummary {
    let mut by_status: IndexMap<String, usize> = IndexMap::new();
    for finding in findings {
        *by_status.entry(finding.status.clone()).or_insert(0) += 1;
    }
    ReportSummary {
        total: findings.len(),
        by_status,
    }
}

pub fn report(spec: &ValidatedSpec) -> Result<FindingsReport> {
    let findings = findings(spec)?;
    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    Ok(FindingsReport {
        schema_version: "1.0".to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at,
        summary: summarize(&findings),
        findings,
    })
}
