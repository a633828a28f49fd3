use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::Finding;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    /// Counts keyed by the literal status value, in first-seen order.
    pub by_status: IndexMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingsReport {
    pub schema_version: String,
    pub tool_version: String,
    pub generated_at: String,
    pub summary: ReportSummary,
    pub findings: Vec<Finding>,
}
