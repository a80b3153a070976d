/*!
The constraint library (C4): for each of the eight families, the
*feasibility / encode / verify* capability.

[Constraint] is a tagged sum rather than one class per family — per the
design note this crate follows, there is one dispatch table keyed by the
family tag, implemented here as a single `impl` block matching on
[ConstraintKind]. [ConstraintCapability] is still defined as a trait so
call sites (and any future back-end) share one interface rather than
calling three inherent methods by convention alone.

This reference back-end has no persistent clause database to add
relations to, so `encode` here only re-validates that a constraint's
scope lies within the variable manager's bounds; the propagation state
itself ([solve]) reads [ConstraintKind] directly rather than consuming a
separate encoded artifact. A back-end targeting a real CNF or
pseudo-boolean solver would give `encode` a non-trivial body without
touching `feasibility` or `verify`.
*/

use std::collections::BTreeSet;

use crate::instance::{Assignment, Constraint, ConstraintFamily, ConstraintId, ConstraintKind};
use crate::vars::VariableManager;

/// One constraint's post-hoc violation, found by [ConstraintCapability::verify].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violation {
    pub constraint: ConstraintId,
    pub family: ConstraintFamily,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.family, self.constraint, self.message)
    }
}

/// The three-operation contract every constraint family implements.
pub trait ConstraintCapability {
    /// Structural self-checks independent of any instance or assignment
    /// (e.g. `k >= 1`, a non-empty team list). Parsing already enforces
    /// most of these; this exists for constraints built directly (as
    /// tests and embedders may do) without going through [parse](crate::parse).
    fn feasibility(&self) -> Result<(), Vec<String>>;

    /// Validates that this constraint's scope lies within `vars`' bounds.
    fn encode(&self, vars: &VariableManager) -> Result<(), String>;

    /// Re-evaluates this constraint against a complete `assignment`,
    /// independent of however it was encoded during search.
    fn verify(&self, assignment: &Assignment) -> Vec<Violation>;
}

impl ConstraintCapability for Constraint {
    fn feasibility(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        match &self.kind {
            ConstraintKind::SeparationOfDuty { s1, s2 } | ConstraintKind::BindingOfDuty { s1, s2 } => {
                if s1 == s2 {
                    errors.push(format!("steps s{} and s{} must differ", s1 + 1, s2 + 1));
                }
            }
            ConstraintKind::AtMostK { k, steps } => {
                if *k == 0 {
                    errors.push("k must be at least 1".to_string());
                }
                if steps.len() < 2 {
                    errors.push("at-most-k needs at least two steps".to_string());
                }
            }
            ConstraintKind::OneTeam { steps, teams } | ConstraintKind::WangLi { steps, departments: teams } => {
                if steps.is_empty() {
                    errors.push("team constraint needs at least one step".to_string());
                }
                if teams.is_empty() {
                    errors.push("team constraint needs at least one team".to_string());
                }
                if teams.iter().any(Vec::is_empty) {
                    errors.push("a team in this constraint is empty".to_string());
                }
            }
            ConstraintKind::SuperUserAtLeast { steps, supers, .. } => {
                if steps.is_empty() {
                    errors.push("super-user-at-least needs at least one step".to_string());
                }
                if supers.is_empty() {
                    errors.push("super-user-at-least needs at least one super user".to_string());
                }
            }
            ConstraintKind::AssignmentDependent { s1, s2, source, target } => {
                if s1 == s2 {
                    errors.push(format!("steps s{} and s{} must differ", s1 + 1, s2 + 1));
                }
                if source.is_empty() {
                    errors.push("assignment-dependent needs a non-empty source set".to_string());
                }
                if target.is_empty() {
                    errors.push("assignment-dependent needs a non-empty target set".to_string());
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn encode(&self, vars: &VariableManager) -> Result<(), String> {
        let out_of_range = self
            .kind
            .scope()
            .into_iter()
            .find(|&step| vars.step_vars(step).is_empty());
        match out_of_range {
            Some(step) => Err(format!("step s{} has no variables to encode against", step + 1)),
            None => Ok(()),
        }
    }

    fn verify(&self, assignment: &Assignment) -> Vec<Violation> {
        let family = self.kind.family();
        let violation = |message: String| {
            vec![Violation {
                constraint: self.id,
                family,
                message,
            }]
        };

        match &self.kind {
            ConstraintKind::SeparationOfDuty { s1, s2 } => {
                if assignment.user_of(*s1) == assignment.user_of(*s2) {
                    violation(format!(
                        "s{} and s{} were both assigned to u{}",
                        s1 + 1,
                        s2 + 1,
                        assignment.user_of(*s1) + 1
                    ))
                } else {
                    Vec::new()
                }
            }

            ConstraintKind::BindingOfDuty { s1, s2 } => {
                if assignment.user_of(*s1) != assignment.user_of(*s2) {
                    violation(format!(
                        "s{} (u{}) and s{} (u{}) were assigned to different users",
                        s1 + 1,
                        assignment.user_of(*s1) + 1,
                        s2 + 1,
                        assignment.user_of(*s2) + 1
                    ))
                } else {
                    Vec::new()
                }
            }

            ConstraintKind::AtMostK { k, steps } => {
                let mut counts = std::collections::BTreeMap::new();
                for &s in steps {
                    *counts.entry(assignment.user_of(s)).or_insert(0usize) += 1;
                }
                counts
                    .into_iter()
                    .filter(|&(_, count)| count > *k)
                    .map(|(user, count)| Violation {
                        constraint: self.id,
                        family,
                        message: format!("u{} was assigned {count} of these steps (k={k})", user + 1),
                    })
                    .collect()
            }

            ConstraintKind::OneTeam { steps, teams } => verify_team_coverage(self.id, family, steps, teams, assignment),
            ConstraintKind::WangLi { steps, departments } => {
                verify_team_coverage(self.id, family, steps, departments, assignment)
            }

            ConstraintKind::SuperUserAtLeast { steps, h, supers } => {
                let distinct: BTreeSet<_> = assignment.distinct_users_over(steps).collect();
                if distinct.len() <= *h && !distinct.iter().any(|u| supers.contains(u)) {
                    violation(format!(
                        "only {} distinct user(s) were assigned, none a super user",
                        distinct.len()
                    ))
                } else {
                    Vec::new()
                }
            }

            ConstraintKind::AssignmentDependent { s1, s2, source, target } => {
                let u1 = assignment.user_of(*s1);
                let u2 = assignment.user_of(*s2);
                if source.contains(&u1) && !target.contains(&u2) {
                    violation(format!(
                        "s{} was assigned u{} (in source) but s{} was assigned u{} (not in target)",
                        s1 + 1,
                        u1 + 1,
                        s2 + 1,
                        u2 + 1
                    ))
                } else {
                    Vec::new()
                }
            }
        }
    }
}

fn verify_team_coverage(
    constraint: ConstraintId,
    family: ConstraintFamily,
    steps: &[crate::instance::Step],
    groups: &[Vec<crate::instance::User>],
    assignment: &Assignment,
) -> Vec<Violation> {
    let covering_group = groups
        .iter()
        .position(|group| steps.iter().all(|&s| group.contains(&assignment.user_of(s))));

    match covering_group {
        Some(_) => Vec::new(),
        None => vec![Violation {
            constraint,
            family,
            message: "no single team/department covers every assignee of these steps".to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ConstraintKind;

    #[test]
    fn sod_violation_names_the_shared_user() {
        let c = Constraint::new(ConstraintId(0), ConstraintKind::SeparationOfDuty { s1: 0, s2: 1 });
        let assignment = Assignment::from_vec(vec![2, 2]);
        let violations = c.verify(&assignment);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("u3"));
    }

    #[test]
    fn bod_is_satisfied_when_assignees_match() {
        let c = Constraint::new(ConstraintId(0), ConstraintKind::BindingOfDuty { s1: 0, s2: 1 });
        let assignment = Assignment::from_vec(vec![1, 1]);
        assert!(c.verify(&assignment).is_empty());
    }

    #[test]
    fn at_most_k_flags_the_offending_user() {
        let c = Constraint::new(
            ConstraintId(0),
            ConstraintKind::AtMostK { k: 1, steps: vec![0, 1, 2] },
        );
        let assignment = Assignment::from_vec(vec![0, 0, 1]);
        let violations = c.verify(&assignment);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("u1"));
    }

    #[test]
    fn one_team_requires_a_single_covering_team() {
        let c = Constraint::new(
            ConstraintId(0),
            ConstraintKind::OneTeam {
                steps: vec![0, 1],
                teams: vec![vec![0, 1], vec![2]],
            },
        );
        let mixed = Assignment::from_vec(vec![0, 2]);
        assert_eq!(c.verify(&mixed).len(), 1);

        let consistent = Assignment::from_vec(vec![0, 1]);
        assert!(c.verify(&consistent).is_empty());
    }

    #[test]
    fn feasibility_rejects_a_degenerate_at_most_k() {
        let c = Constraint::new(ConstraintId(0), ConstraintKind::AtMostK { k: 0, steps: vec![0] });
        assert!(c.feasibility().is_err());
    }
}
