//! Audit trail models.
//!
//! Every settlement and salary-slip calculation records the rules it applied
//! as a sequence of [`AuditStep`]s, so a payroll officer can trace each
//! figure back to the statute it came from.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute or rule behind this step.
    pub statute_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a calculation.
///
/// Traces carry no timing information, so identical inputs always produce
/// identical traces.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert_eq!(trace.next_step_number(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns the step number the next recorded step should use.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    /// Appends a step.
    pub fn push(&mut self, step: AuditStep) {
        self.steps.push(step);
    }

    /// Appends a warning.
    pub fn warn(&mut self, warning: AuditWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if a warning with the given code was recorded.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_step(step_number: u32) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: "provident_fund".to_string(),
            rule_name: "Provident Fund".to_string(),
            statute_ref: "EPF Act 1952, s.6".to_string(),
            input: serde_json::json!({"basic_salary": "30000"}),
            output: serde_json::json!({"amount": "3600"}),
            reasoning: "12% of 30000 = 3600".to_string(),
        }
    }

    #[test]
    fn test_next_step_number_follows_pushed_steps() {
        let mut trace = AuditTrace::default();
        trace.push(create_step(1));
        trace.push(create_step(2));
        assert_eq!(trace.next_step_number(), 3);
    }

    #[test]
    fn test_has_warning_matches_code() {
        let mut trace = AuditTrace::default();
        trace.warn(AuditWarning::new(
            "NOTICE_SHORTFALL",
            "10 days short",
            "medium",
        ));

        assert!(trace.has_warning("NOTICE_SHORTFALL"));
        assert!(!trace.has_warning("NEGATIVE_SETTLEMENT"));
    }

    #[test]
    fn test_audit_step_serialization() {
        let json = serde_json::to_string(&create_step(1)).unwrap();
        assert!(json.contains("\"rule_id\":\"provident_fund\""));
        assert!(json.contains("\"statute_ref\":\"EPF Act 1952, s.6\""));
    }
}
