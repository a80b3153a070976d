/*!
The feasibility analyzer (C3): static, polynomial-time checks run before
any search begins.

Each check inspects one constraint (or the authorization matrix alone) and
never looks at another constraint's encoding — the checks are independent
and their results are simply concatenated into one [Conflict] list.
Reported conflicts are advisory where a family's sufficiency test can be
pessimistic (see [ConflictKind::AtMostKInsufficient],
[ConflictKind::TeamCoverageGap]) and load-bearing where the test is exact
(every other variant): a `hard` conflict guarantees the instance is
unsatisfiable regardless of what the back-end finds, a soft one only
raises suspicion.
*/

use std::collections::BTreeSet;

use crate::config::ActiveConstraints;
use crate::instance::{ConstraintFamily, ConstraintId, ConstraintKind, Instance, Step};

/// One statically-detected reason an instance may be unsatisfiable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConflictKind {
    /// `step` has no authorized user at all.
    NoAuthorizedUser { step: Step },

    /// The Binding-of-Duty pair `(s1, s2)` of `constraint` shares no
    /// authorized user.
    BodAuthorizationGap {
        constraint: ConstraintId,
        s1: Step,
        s2: Step,
    },

    /// `bod` and `sod` constrain the exact same pair of steps, one forcing
    /// equal assignees and the other forcing distinct ones.
    BodSodOverlap { bod: ConstraintId, sod: ConstraintId },

    /// The Separation-of-Duty pair `(s1, s2)` of `constraint` has fewer
    /// than two authorized users between them.
    SodImpossible {
        constraint: ConstraintId,
        s1: Step,
        s2: Step,
    },

    /// `constraint`'s union of authorized users over its steps is too
    /// small to respect the per-user cap `k` across `step_count` steps.
    AtMostKInsufficient {
        constraint: ConstraintId,
        union_size: usize,
        k: usize,
        step_count: usize,
    },

    /// `step` has more than `h` authorized users yet no super user
    /// authorized for it, so the forced-super-user fallback of
    /// `constraint` can never trigger there.
    SualCoverageGap { constraint: ConstraintId, step: Step },

    /// No team/department of `constraint` authorizes any user for `step`.
    TeamCoverageGap { constraint: ConstraintId, step: Step },
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAuthorizedUser { step } => {
                write!(f, "no user is authorized for step {}", step + 1)
            }
            Self::BodAuthorizationGap { constraint, s1, s2 } => write!(
                f,
                "no user authorized for both s{} and s{} ({constraint})",
                s1 + 1,
                s2 + 1
            ),
            Self::BodSodOverlap { bod, sod } => write!(
                f,
                "binding-of-duty {bod} and separation-of-duty {sod} constrain the same pair of steps"
            ),
            Self::SodImpossible { constraint, s1, s2 } => write!(
                f,
                "s{} and s{} have fewer than two authorized users between them ({constraint})",
                s1 + 1,
                s2 + 1
            ),
            Self::AtMostKInsufficient {
                constraint,
                union_size,
                k,
                step_count,
            } => write!(
                f,
                "at-most-k {constraint}: {union_size} authorized user(s) cannot cover {step_count} step(s) at k={k}"
            ),
            Self::SualCoverageGap { constraint, step } => write!(
                f,
                "super-user-at-least {constraint}: step {} has no super user authorized and more than h users",
                step + 1
            ),
            Self::TeamCoverageGap { constraint, step } => write!(
                f,
                "{constraint}: no team authorizes any user for step {}",
                step + 1
            ),
        }
    }
}

/// One statically-detected conflict, with whether it is provably fatal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub hard: bool,
}

impl Conflict {
    fn hard(kind: ConflictKind) -> Self {
        Conflict { kind, hard: true }
    }

    fn soft(kind: ConflictKind) -> Self {
        Conflict { kind, hard: false }
    }
}

/// Runs every static check against `instance`, restricted to the families
/// `active` turns on. Returns whether the instance is feasible as far as
/// these checks can tell, and the full conflict list (empty iff `true`
/// only when no soft conflicts were raised either — callers should inspect
/// the list even when the bool is `true`, since a soft conflict alone does
/// not flip it to `false`).
pub fn analyze(instance: &Instance, active: &ActiveConstraints) -> (bool, Vec<Conflict>) {
    let mut conflicts = Vec::new();

    if active.authorization {
        check_authorization_gaps(instance, &mut conflicts);
    }
    if active.binding_of_duty {
        check_bod_authorization(instance, &mut conflicts);
    }
    if active.binding_of_duty && active.separation_of_duty {
        check_bod_sod_overlap(instance, &mut conflicts);
    }
    if active.separation_of_duty {
        check_sod_impossibility(instance, &mut conflicts);
    }
    if active.at_most_k {
        check_at_most_k_sufficiency(instance, &mut conflicts);
    }
    if active.super_user_at_least {
        check_sual_coverage(instance, &mut conflicts);
    }
    if active.one_team {
        check_team_coverage(instance, ConstraintFamily::OneTeam, &mut conflicts);
    }
    if active.wang_li {
        check_team_coverage(instance, ConstraintFamily::WangLi, &mut conflicts);
    }

    let feasible = !conflicts.iter().any(|c| c.hard);
    if !feasible {
        log::trace!(target: crate::logging::targets::ANALYSIS, "found {} conflict(s), at least one hard", conflicts.len());
    }
    (feasible, conflicts)
}

fn check_authorization_gaps(instance: &Instance, out: &mut Vec<Conflict>) {
    for step in 0..instance.num_steps() {
        if instance.authorized_user_count(step) == 0 {
            out.push(Conflict::hard(ConflictKind::NoAuthorizedUser { step }));
        }
    }
}

fn check_bod_authorization(instance: &Instance, out: &mut Vec<Conflict>) {
    for c in instance.constraints_of(ConstraintFamily::BindingOfDuty) {
        let ConstraintKind::BindingOfDuty { s1, s2 } = c.kind else {
            unreachable!("family filter guarantees the variant")
        };
        let common = instance
            .authorized_users(s1)
            .any(|u| instance.is_authorized(s2, u));
        if !common {
            out.push(Conflict::hard(ConflictKind::BodAuthorizationGap {
                constraint: c.id,
                s1,
                s2,
            }));
        }
    }
}

fn check_bod_sod_overlap(instance: &Instance, out: &mut Vec<Conflict>) {
    for bod in instance.constraints_of(ConstraintFamily::BindingOfDuty) {
        let ConstraintKind::BindingOfDuty { s1: b1, s2: b2 } = bod.kind else {
            unreachable!("family filter guarantees the variant")
        };
        for sod in instance.constraints_of(ConstraintFamily::SeparationOfDuty) {
            let ConstraintKind::SeparationOfDuty { s1: d1, s2: d2 } = sod.kind else {
                unreachable!("family filter guarantees the variant")
            };
            let same_pair = (b1 == d1 && b2 == d2) || (b1 == d2 && b2 == d1);
            if same_pair {
                out.push(Conflict::hard(ConflictKind::BodSodOverlap {
                    bod: bod.id,
                    sod: sod.id,
                }));
            }
        }
    }
}

fn check_sod_impossibility(instance: &Instance, out: &mut Vec<Conflict>) {
    for c in instance.constraints_of(ConstraintFamily::SeparationOfDuty) {
        let ConstraintKind::SeparationOfDuty { s1, s2 } = c.kind else {
            unreachable!("family filter guarantees the variant")
        };
        let union: BTreeSet<_> = instance
            .authorized_users(s1)
            .chain(instance.authorized_users(s2))
            .collect();
        if union.len() < 2 {
            out.push(Conflict::hard(ConflictKind::SodImpossible {
                constraint: c.id,
                s1,
                s2,
            }));
        }
    }
}

fn check_at_most_k_sufficiency(instance: &Instance, out: &mut Vec<Conflict>) {
    for c in instance.constraints_of(ConstraintFamily::AtMostK) {
        let ConstraintKind::AtMostK { k, ref steps } = c.kind else {
            unreachable!("family filter guarantees the variant")
        };
        let union: BTreeSet<_> = steps.iter().flat_map(|&s| instance.authorized_users(s)).collect();
        if union.len() * k < steps.len() {
            out.push(Conflict::soft(ConflictKind::AtMostKInsufficient {
                constraint: c.id,
                union_size: union.len(),
                k,
                step_count: steps.len(),
            }));
        }
    }
}

fn check_sual_coverage(instance: &Instance, out: &mut Vec<Conflict>) {
    for c in instance.constraints_of(ConstraintFamily::SuperUserAtLeast) {
        let ConstraintKind::SuperUserAtLeast { ref steps, h, ref supers } = c.kind else {
            unreachable!("family filter guarantees the variant")
        };
        for &step in steps {
            let more_than_h = instance.authorized_user_count(step) > h;
            let has_super = supers.iter().any(|&u| instance.is_authorized(step, u));
            if !more_than_h && !has_super {
                out.push(Conflict::hard(ConflictKind::SualCoverageGap {
                    constraint: c.id,
                    step,
                }));
            }
        }
    }
}

fn check_team_coverage(instance: &Instance, family: ConstraintFamily, out: &mut Vec<Conflict>) {
    for c in instance.constraints_of(family) {
        let (steps, groups) = match &c.kind {
            ConstraintKind::OneTeam { steps, teams } => (steps, teams),
            ConstraintKind::WangLi { steps, departments } => (steps, departments),
            _ => unreachable!("family filter guarantees the variant"),
        };
        for &step in steps {
            let covered = groups
                .iter()
                .any(|group| group.iter().any(|&u| instance.is_authorized(step, u)));
            if !covered {
                out.push(Conflict::soft(ConflictKind::TeamCoverageGap {
                    constraint: c.id,
                    step,
                }));
            }
        }
    }
}
