//! The human-readable rendering: a status line, the per-step and
//! per-user blocks for `Sat`, and the analysis appendix every result
//! carries.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::config::ActiveConstraints;
use crate::instance::{ConstraintFamily, ConstraintKind, Instance};
use crate::solve::Outcome;

/// Renders `outcome` as a text record. `quiet` suppresses the
/// analysis appendix, leaving only the status line and the
/// assignment/reason (the CLI's `--quiet` flag).
pub fn render_text(instance: &Instance, outcome: &Outcome, active: &ActiveConstraints, solver_tag: &str, quiet: bool) -> String {
    let mut out = String::new();

    match outcome {
        Outcome::Sat { assignment, solve_ms, unique, violations } => {
            let _ = writeln!(out, "SAT  solver={solver_tag} time_ms={solve_ms} unique={unique}");
            for (step, user) in assignment.iter() {
                let _ = writeln!(out, "Step {}: User {}", step + 1, user + 1);
            }
            out.push('\n');
            let _ = writeln!(out, "Per-user distribution:");
            render_distribution(&mut out, instance, assignment);
            if !violations.is_empty() {
                out.push('\n');
                let _ = writeln!(out, "Violations (should be empty for a trustworthy SAT):");
                for v in violations {
                    let _ = writeln!(out, "  - {v}");
                }
            }
        }
        Outcome::Unsat { solve_ms, reason, conflicts } => {
            let _ = writeln!(out, "UNSAT  solver={solver_tag} time_ms={solve_ms}");
            let _ = writeln!(out, "{reason}");
            if !conflicts.is_empty() {
                out.push('\n');
                let _ = writeln!(out, "Conflicts:");
                for c in conflicts {
                    let _ = writeln!(out, "  - {}{}", if c.hard { "" } else { "(soft) " }, c.kind);
                }
            }
        }
        Outcome::Error { solve_ms, message } => {
            let _ = writeln!(out, "ERROR  solver={solver_tag} time_ms={solve_ms}");
            let _ = writeln!(out, "{message}");
        }
    }

    if !quiet {
        out.push('\n');
        render_appendix(&mut out, instance, active);
    }

    out
}

fn render_distribution(out: &mut String, instance: &Instance, assignment: &crate::instance::Assignment) {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for (_, user) in assignment.iter() {
        *counts.entry(user).or_insert(0) += 1;
    }
    for user in 0..instance.num_users() {
        let count = counts.get(&user).copied().unwrap_or(0);
        if count > 0 {
            let _ = writeln!(out, "  User {}: {} step(s)", user + 1, count);
        }
    }
}

fn render_appendix(out: &mut String, instance: &Instance, active: &ActiveConstraints) {
    let _ = writeln!(out, "--- Analysis appendix ---");
    let _ = writeln!(out, "Authorization counts per step:");
    for step in 0..instance.num_steps() {
        let _ = writeln!(out, "  Step {}: {} authorized user(s)", step + 1, instance.authorized_user_count(step));
    }
    let _ = writeln!(out, "Authorization counts per user:");
    for user in 0..instance.num_users() {
        let _ = writeln!(out, "  User {}: {} authorized step(s)", user + 1, instance.authorized_steps(user).len());
    }

    out.push('\n');
    let _ = writeln!(out, "Constraints:");
    for family in ConstraintFamily::ENCODING_ORDER {
        for c in instance.constraints_of(family) {
            let active_marker = if active.is_active(family) { "" } else { " (inactive)" };
            let _ = writeln!(out, "  {} {}: {}{}", family, c.id, describe(&c.kind), active_marker);
        }
    }
}

/// Names the users participating in one constraint, for the appendix's
/// "every constraint with participating users" requirement.
fn describe(kind: &ConstraintKind) -> String {
    let users = |users: &[usize]| users.iter().map(|u| format!("u{}", u + 1)).collect::<Vec<_>>().join(",");
    let steps = |steps: &[usize]| steps.iter().map(|s| format!("s{}", s + 1)).collect::<Vec<_>>().join(",");

    match kind {
        ConstraintKind::SeparationOfDuty { s1, s2 } => format!("s{} != s{}", s1 + 1, s2 + 1),
        ConstraintKind::BindingOfDuty { s1, s2 } => format!("s{} == s{}", s1 + 1, s2 + 1),
        ConstraintKind::AtMostK { k, steps: sc } => format!("at most {k} of {{{}}} per user", steps(sc)),
        ConstraintKind::OneTeam { steps: sc, teams } => {
            let teams_str = teams.iter().map(|t| format!("({})", users(t))).collect::<Vec<_>>().join(" ");
            format!("{{{}}} in one of {teams_str}", steps(sc))
        }
        ConstraintKind::WangLi { steps: sc, departments } => {
            let deps_str = departments.iter().map(|t| format!("({})", users(t))).collect::<Vec<_>>().join(" ");
            format!("{{{}}} in one of {deps_str}", steps(sc))
        }
        ConstraintKind::SuperUserAtLeast { steps: sc, h, supers } => {
            format!("if <= {h} distinct users over {{{}}}, one must be in ({})", steps(sc), users(supers))
        }
        ConstraintKind::AssignmentDependent { s1, s2, source, target } => format!(
            "s{} in ({}) => s{} in ({})",
            s1 + 1,
            users(source),
            s2 + 1,
            users(target)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Assignment;
    use crate::solve::Tri;

    #[test]
    fn renders_a_sat_status_line_and_assignment() {
        let instance = Instance::new(vec![vec![true, true], vec![true, true]], Vec::new());
        let outcome = Outcome::Sat {
            assignment: Assignment::from_vec(vec![0, 1]),
            solve_ms: 3,
            unique: Tri::False,
            violations: Vec::new(),
        };
        let text = render_text(&instance, &outcome, &ActiveConstraints::all(), "backtracking", false);
        assert!(text.starts_with("SAT"));
        assert!(text.contains("Step 1: User 1"));
        assert!(text.contains("Step 2: User 2"));
        assert!(text.contains("Analysis appendix"));
    }

    #[test]
    fn quiet_mode_drops_the_appendix() {
        let instance = Instance::new(vec![vec![true]], Vec::new());
        let outcome = Outcome::Sat {
            assignment: Assignment::from_vec(vec![0]),
            solve_ms: 1,
            unique: Tri::True,
            violations: Vec::new(),
        };
        let text = render_text(&instance, &outcome, &ActiveConstraints::all(), "backtracking", true);
        assert!(!text.contains("Analysis appendix"));
    }

    #[test]
    fn renders_an_unsat_reason() {
        let instance = Instance::new(vec![vec![false]], Vec::new());
        let outcome = Outcome::Unsat {
            solve_ms: 1,
            reason: "no user authorized for step 1".to_string(),
            conflicts: Vec::new(),
        };
        let text = render_text(&instance, &outcome, &ActiveConstraints::all(), "backtracking", false);
        assert!(text.starts_with("UNSAT"));
        assert!(text.contains("no user authorized for step 1"));
    }
}
