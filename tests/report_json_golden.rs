use indexmap::IndexMap;

use speclens::core::{Finding, FindingsReport, ReportSummary};

#[test]
fn report_json_matches_golden() {
    let mut by_status = IndexMap::new();
    by_status.insert("Success".to_string(), 1);
    by_status.insert("Failure".to_string(), 1);

    let report = FindingsReport {
        schema_version: "1.0".to_string(),
        tool_version: "0.1.0".to_string(),
        generated_at: "2026-01-01T00:00:00Z".to_string(),
        summary: ReportSummary {
            total: 2,
            by_status,
        },
        findings: vec![
            Finding {
                status: "Success".to_string(),
                qa_category: "accuracy".to_string(),
                measurement: "Accuracy".to_string(),
                evidence_id: "accuracy-1".to_string(),
                message: "accuracy above threshold".to_string(),
            },
            Finding {
                status: "Failure".to_string(),
                qa_category: "robustness".to_string(),
                measurement: "RobustnessScore".to_string(),
                evidence_id: "robustness-1".to_string(),
                message: "fails under occlusion".to_string(),
            },
        ],
    };

    let actual = serde_json::to_value(&report).expect("serialize report");
    let expected: serde_json::Value =
        serde_json::from_str(include_str!("golden/report.json")).expect("parse golden json");

    assert_eq!(actual, expected);
}
