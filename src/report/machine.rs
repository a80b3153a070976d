//! The machine-readable rendering: a `step -> user` mapping with 1-based
//! indices, serialized with `serde`/`serde_json` rather than a
//! hand-rolled writer.

use serde::Serialize;

use crate::instance::Assignment;
use crate::solve::{Outcome, Tri};

/// A `serde`-derived, 1-based rendering of a solve [Outcome] suitable for
/// writing to a result file as JSON.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status")]
pub enum MachineResult {
    #[serde(rename = "SAT")]
    Sat {
        solve_ms: u128,
        unique: MachineTri,
        /// `assignment[i] = u` means step `i+1` was assigned `u+1`.
        assignment: Vec<StepAssignment>,
        violations: Vec<String>,
    },
    #[serde(rename = "UNSAT")]
    Unsat {
        solve_ms: u128,
        reason: String,
        conflicts: Vec<String>,
    },
    #[serde(rename = "ERROR")]
    Error { solve_ms: u128, message: String },
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct StepAssignment {
    pub step: usize,
    pub user: usize,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineTri {
    True,
    False,
    Unknown,
}

impl From<Tri> for MachineTri {
    fn from(tri: Tri) -> Self {
        match tri {
            Tri::True => MachineTri::True,
            Tri::False => MachineTri::False,
            Tri::Unknown => MachineTri::Unknown,
        }
    }
}

fn one_based(assignment: &Assignment) -> Vec<StepAssignment> {
    assignment
        .iter()
        .map(|(step, user)| StepAssignment { step: step + 1, user: user + 1 })
        .collect()
}

impl MachineResult {
    /// Builds the machine-readable rendering of a solve [Outcome].
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Sat { assignment, solve_ms, unique, violations } => MachineResult::Sat {
                solve_ms: *solve_ms,
                unique: (*unique).into(),
                assignment: one_based(assignment),
                violations: violations.iter().map(ToString::to_string).collect(),
            },
            Outcome::Unsat { solve_ms, reason, conflicts } => MachineResult::Unsat {
                solve_ms: *solve_ms,
                reason: reason.clone(),
                conflicts: conflicts.iter().map(|c| c.kind.to_string()).collect(),
            },
            Outcome::Error { solve_ms, message } => MachineResult::Error {
                solve_ms: *solve_ms,
                message: message.clone(),
            },
        }
    }

    /// Serializes to a pretty-printed JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Assignment;

    #[test]
    fn renders_one_based_indices() {
        let outcome = Outcome::Sat {
            assignment: Assignment::from_vec(vec![0, 1]),
            solve_ms: 5,
            unique: Tri::True,
            violations: Vec::new(),
        };
        let machine = MachineResult::from_outcome(&outcome);
        let json = machine.to_json().unwrap();
        assert!(json.contains("\"step\": 1"));
        assert!(json.contains("\"user\": 1"));
        assert!(json.contains("\"step\": 2"));
        assert!(json.contains("\"user\": 2"));
        assert!(json.contains("\"SAT\""));
    }

    #[test]
    fn renders_unsat_reason_and_conflicts() {
        let outcome = Outcome::Unsat {
            solve_ms: 1,
            reason: "no user authorized for step 1".to_string(),
            conflicts: Vec::new(),
        };
        let json = MachineResult::from_outcome(&outcome).to_json().unwrap();
        assert!(json.contains("\"UNSAT\""));
        assert!(json.contains("no user authorized"));
    }
}
