/*!
The Solver Interface (C6): `build -> solve -> extract assignment -> test
uniqueness -> report`, realized as a [Context] — a struct gathering a
config and an owned instance, moving through an explicit state machine as
a solve progresses rather than leaving "has this been built yet" as an
implicit precondition on `solve`.

A [Context] is the only collaborator callers are expected to construct
directly; it owns the [Instance], builds a [vars::VariableManager] and
runs [analysis::analyze] during [Context::build], invokes the [solve]
back-end, and always runs the result through [verify] before handing it
back — turning a back-end bug into an [InternalError](crate::types::err::InternalError)
rather than a silently wrong `Sat`.
*/

use std::time::Instant;

use crate::analysis::{self, Conflict};
use crate::config::Config;
use crate::constraints::ConstraintCapability;
use crate::instance::{Assignment, ConstraintId, Instance};
use crate::solve::{self, SearchOutcome, Tri};
use crate::vars::VariableManager;
use crate::verify;

/// Where a [Context] is in its lifecycle. A solve only ever moves forward
/// through this chain; a fresh [Context::build]/[Context::solve] call on an
/// already-decided context re-runs from [ContextState::Built] rather than
/// mutating history.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContextState {
    /// Constructed, not yet built.
    Configuration,
    /// [Context::build] has run; [Context::build_report] is available.
    Built,
    /// A [Context::solve] call is in progress (never observed by a caller;
    /// recorded for symmetry with the other states).
    Solving,
    Satisfiable,
    Unsatisfiable,
    Error,
}

/// The result of [Context::build]: either the back-end is worth invoking,
/// or every reason (from the analyzer, C3, and from each active
/// constraint's own structural [feasibility](ConstraintCapability::feasibility)
/// check, C4) it already knows the instance cannot be solved.
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    pub ready: bool,
    pub conflicts: Vec<Conflict>,
    pub feasibility_errors: Vec<(ConstraintId, String)>,
}

impl BuildReport {
    /// One reason string: the first sentence names the triggering rule,
    /// remaining lines enumerate every other conflict/error found.
    fn reason(&self) -> String {
        let mut lines = Vec::new();
        if let Some(first) = self.conflicts.iter().find(|c| c.hard) {
            lines.push(format!("static infeasibility: {}.", first.kind));
        } else if let Some((id, msg)) = self.feasibility_errors.first() {
            lines.push(format!("static infeasibility: {id}: {msg}."));
        } else {
            lines.push("static infeasibility.".to_string());
        }
        for c in &self.conflicts {
            lines.push(format!("  - {}{}", if c.hard { "" } else { "(soft) " }, c.kind));
        }
        for (id, msg) in &self.feasibility_errors {
            lines.push(format!("  - {id}: {msg}"));
        }
        lines.join("\n")
    }
}

/// The Solver Interface.
pub struct Context {
    instance: Instance,
    config: Config,
    state: ContextState,
    build_report: Option<BuildReport>,
}

impl Context {
    /// Constructs a context around an owned instance and configuration.
    /// Nothing is computed yet — call [Context::build] or [Context::solve]
    /// (which builds implicitly if needed).
    pub fn new(instance: Instance, config: Config) -> Self {
        Context {
            instance,
            config,
            state: ContextState::Configuration,
            build_report: None,
        }
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Runs the static analyzer (C3), assembles the variable manager (C5),
    /// and runs every active constraint's structural feasibility check and
    /// `encode` scope check (C4) against it, aggregating all three into a
    /// [BuildReport]. Idempotent: calling twice just re-runs the checks.
    pub fn build(&mut self) -> &BuildReport {
        let (analyzer_ok, conflicts) = analysis::analyze(&self.instance, &self.config.active);

        let vars = VariableManager::create(&self.instance);

        let mut feasibility_errors = Vec::new();
        for c in self.instance.constraints() {
            if !self.config.active.is_active(c.kind.family()) {
                continue;
            }
            if let Err(errors) = c.feasibility() {
                for message in errors {
                    feasibility_errors.push((c.id, message));
                }
            }
            if let Err(message) = c.encode(&vars) {
                feasibility_errors.push((c.id, message));
            }
        }

        let ready = analyzer_ok && feasibility_errors.is_empty();
        if ready {
            log::trace!(target: crate::logging::targets::CONTEXT, "build ready, no static infeasibility found");
        } else {
            log::info!(target: crate::logging::targets::CONTEXT, "build not ready: {} conflict(s), {} feasibility error(s)", conflicts.len(), feasibility_errors.len());
        }
        self.build_report = Some(BuildReport {
            ready,
            conflicts,
            feasibility_errors,
        });
        self.state = ContextState::Built;
        self.build_report.as_ref().expect("just assigned")
    }

    /// The most recent [BuildReport], if [Context::build] has run.
    pub fn build_report(&self) -> Option<&BuildReport> {
        self.build_report.as_ref()
    }

    fn deadline_from_now(&self) -> Option<Instant> {
        self.config.has_deadline().then(|| Instant::now() + self.config.deadline)
    }

    /// Runs the full Solver Interface: build (if not already done),
    /// search, verify, and — if configured — a uniqueness check. Always
    /// returns a [solve::Outcome]; never panics on a malformed or
    /// unsatisfiable instance — only a parse error escapes as a plain
    /// `Result`, everything past that point is a decision or an
    /// [ErrorKind](crate::types::err::ErrorKind) carried inside the outcome.
    pub fn solve(&mut self) -> solve::Outcome {
        let start = Instant::now();
        self.state = ContextState::Solving;

        if self.build_report.is_none() {
            self.build();
        }
        let report = self.build_report.clone().expect("just built");

        if !report.ready {
            self.state = ContextState::Unsatisfiable;
            return solve::Outcome::Unsat {
                solve_ms: start.elapsed().as_millis(),
                reason: report.reason(),
                conflicts: report.conflicts.clone(),
            };
        }

        let deadline = self.deadline_from_now();
        match solve::run(&self.instance, &self.config.active, deadline, None) {
            SearchOutcome::Sat(assignment) => self.finish_sat(assignment, deadline, start),
            SearchOutcome::Unsat(reason) => {
                self.state = ContextState::Unsatisfiable;
                solve::Outcome::Unsat {
                    solve_ms: start.elapsed().as_millis(),
                    reason,
                    conflicts: report.conflicts.clone(),
                }
            }
            SearchOutcome::TimedOut => {
                log::warn!(target: crate::logging::targets::CONTEXT, "solve deadline expired before a decision was reached");
                self.state = ContextState::Error;
                solve::Outcome::Error {
                    solve_ms: start.elapsed().as_millis(),
                    message: crate::types::err::InternalError::Timeout.to_string(),
                }
            }
        }
    }

    fn finish_sat(&mut self, assignment: Assignment, deadline: Option<Instant>, start: Instant) -> solve::Outcome {
        let violations = verify::verify(&self.instance, &assignment, &self.config.active);
        if !violations.is_empty() {
            log::warn!(target: crate::logging::targets::CONTEXT, "verifier found {} violation(s) in a candidate satisfiable result", violations.len());
            self.state = ContextState::Error;
            let first_constraint = violations.first().map(|v| v.constraint);
            return solve::Outcome::Error {
                solve_ms: start.elapsed().as_millis(),
                message: crate::types::err::InternalError::VerifierFoundViolations {
                    first_constraint,
                    count: violations.len(),
                }
                .to_string(),
            };
        }

        let unique = if self.config.check_uniqueness {
            self.check_unique_inner(&assignment, deadline)
        } else {
            Tri::Unknown
        };

        self.state = ContextState::Satisfiable;
        solve::Outcome::Sat {
            assignment,
            solve_ms: start.elapsed().as_millis(),
            unique,
            violations,
        }
    }

    fn check_unique_inner(&self, assignment: &Assignment, deadline: Option<Instant>) -> Tri {
        match solve::run(&self.instance, &self.config.active, deadline, Some(assignment)) {
            SearchOutcome::Sat(_) => Tri::False,
            SearchOutcome::Unsat(_) => Tri::True,
            SearchOutcome::TimedOut => Tri::Unknown,
        }
    }

    /// Re-runs the back-end with `first` blocked, deciding whether it was
    /// the only model. Exposed separately from [Context::solve] so a
    /// caller that already has an assignment from elsewhere (a
    /// "uniqueness round-trip" test, for instance) can ask the question
    /// directly without re-deciding satisfiability.
    pub fn check_unique(&self, first: &Assignment) -> Tri {
        self.check_unique_inner(first, self.deadline_from_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Constraint, ConstraintId, ConstraintKind};

    #[test]
    fn builds_and_reports_ready_for_a_feasible_instance() {
        let instance = Instance::new(vec![vec![true, true]], Vec::new());
        let mut ctx = Context::new(instance, Config::default());
        assert!(ctx.build().ready);
        assert_eq!(ctx.state(), ContextState::Built);
    }

    #[test]
    fn build_report_flags_a_hard_conflict() {
        let instance = Instance::new(vec![vec![false, false]], Vec::new());
        let mut ctx = Context::new(instance, Config::default());
        assert!(!ctx.build().ready);
    }

    #[test]
    fn build_runs_each_active_constraints_own_feasibility_check() {
        // k=0 fails `ConstraintCapability::feasibility` (spec.md requires
        // k >= 1) even though the analyzer's own checks have nothing to say
        // about it -- `build` must surface this as a feasibility error, not
        // just the analyzer's conflicts.
        let instance = Instance::new(
            vec![vec![true, true]; 2],
            vec![Constraint::new(ConstraintId(0), ConstraintKind::AtMostK { k: 0, steps: vec![0, 1] })],
        );
        let mut ctx = Context::new(instance, Config::default());
        let report = ctx.build();
        assert!(!report.ready);
        assert!(!report.feasibility_errors.is_empty());
    }

    #[test]
    fn solve_returns_unsat_for_a_statically_infeasible_instance() {
        let instance = Instance::new(vec![vec![false]], Vec::new());
        let mut ctx = Context::new(instance, Config::default());
        let outcome = ctx.solve();
        assert!(outcome.is_unsat());
        assert_eq!(ctx.state(), ContextState::Unsatisfiable);
    }

    #[test]
    fn solve_reaches_sat_with_empty_violations() {
        let instance = Instance::new(
            vec![vec![true, true], vec![true, true]],
            vec![Constraint::new(ConstraintId(0), ConstraintKind::BindingOfDuty { s1: 0, s2: 1 })],
        );
        let mut ctx = Context::new(instance, Config::default());
        let outcome = ctx.solve();
        match outcome {
            solve::Outcome::Sat { violations, unique, .. } => {
                assert!(violations.is_empty());
                assert_eq!(unique, Tri::False);
            }
            other => panic!("expected sat, got {other:?}"),
        }
    }

    #[test]
    fn uniqueness_round_trip_blocks_the_only_model() {
        let instance = Instance::new(vec![vec![true, false], vec![true, false]], Vec::new());
        let mut ctx = Context::new(instance, Config::default());
        let outcome = ctx.solve();
        let solve::Outcome::Sat { assignment, unique, .. } = outcome else {
            panic!("expected sat")
        };
        assert_eq!(unique, Tri::True);
        assert_eq!(ctx.check_unique(&assignment), Tri::True);
    }
}
