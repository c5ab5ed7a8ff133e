// fhir-fuzzing/src/reporters/mod.rs
//! Rendering of the mutation log for external report sinks
//!
//! The engine itself performs no I/O; these functions turn the per-session
//! operation log into strings a test layer can attach to its report.

use crate::context::FuzzOperationResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate view over one session's mutation log
#[derive(Debug, Serialize)]
pub struct MutationSummary {
    pub total_operations: usize,
    pub noop_operations: usize,
    pub operations_per_field: BTreeMap<String, usize>,
}

/// Summarize a mutation log
pub fn summarize(log: &[FuzzOperationResult]) -> MutationSummary {
    let mut operations_per_field = BTreeMap::new();
    let mut noop_operations = 0;

    for op in log {
        *operations_per_field.entry(op.field.clone()).or_insert(0) += 1;
        if op.is_noop() {
            noop_operations += 1;
        }
    }

    MutationSummary {
        total_operations: log.len(),
        noop_operations,
        operations_per_field,
    }
}

/// Render the log as human-readable lines, one per operation, in
/// invocation order
pub fn render_text(log: &[FuzzOperationResult]) -> String {
    let mut out = String::new();
    for op in log {
        out.push_str(&op.to_string());
        out.push('\n');
    }
    out
}

/// Render the log as a JSON array for machine-readable attachments
pub fn render_json(log: &[FuzzOperationResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(log)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> Vec<FuzzOperationResult> {
        vec![
            FuzzOperationResult::new("Patient.id", "None", "Some(\"abc\")"),
            FuzzOperationResult::new("Patient.gender", "Some(Male)", "Some(Female)"),
            FuzzOperationResult::new("Patient.meta", "None", "None"),
            FuzzOperationResult::new("Patient.id", "Some(\"abc\")", "None"),
        ]
    }

    #[test]
    fn test_summarize_counts_fields_and_noops() {
        let summary = summarize(&sample_log());
        assert_eq!(summary.total_operations, 4);
        assert_eq!(summary.noop_operations, 1);
        assert_eq!(summary.operations_per_field["Patient.id"], 2);
    }

    #[test]
    fn test_render_text_preserves_order() {
        let text = render_text(&sample_log());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Patient.id:"));
        assert!(lines[1].starts_with("Patient.gender:"));
    }

    #[test]
    fn test_render_json_is_valid() {
        let json = render_json(&sample_log()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 4);
    }
}
