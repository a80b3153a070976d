//! The "universal properties" that apply regardless of which
//! constraint families an instance uses: completeness, verifier
//! consistency, and determinism.

use wsp_sat::config::Config;
use wsp_sat::context::Context;
use wsp_sat::instance::{Constraint, ConstraintId, ConstraintKind, Instance};
use wsp_sat::solve::Outcome;
use wsp_sat::verify;

fn sample_instance() -> Instance {
    Instance::new(
        vec![vec![true, true, false], vec![false, true, true], vec![true, false, true]],
        vec![
            Constraint::new(ConstraintId(0), ConstraintKind::SeparationOfDuty { s1: 0, s2: 1 }),
            Constraint::new(
                ConstraintId(1),
                ConstraintKind::AtMostK { k: 1, steps: vec![0, 1, 2] },
            ),
        ],
    )
}

#[test]
fn completeness_of_assignment() {
    let instance = sample_instance();
    let num_steps = instance.num_steps();
    let mut ctx = Context::new(instance, Config::default());
    match ctx.solve() {
        Outcome::Sat { assignment, .. } => {
            assert_eq!(assignment.len(), num_steps);
            for (step, user) in assignment.iter() {
                assert!(ctx.instance().is_authorized(step, user));
            }
        }
        other => panic!("expected sat, got {other:?}"),
    }
}

#[test]
fn verifier_consistency_on_a_solved_instance() {
    let instance = sample_instance();
    let active = Config::default().active;
    let mut ctx = Context::new(instance, Config::default());
    match ctx.solve() {
        Outcome::Sat { assignment, .. } => {
            let violations = verify::verify(ctx.instance(), &assignment, &active);
            assert!(violations.is_empty());
        }
        other => panic!("expected sat, got {other:?}"),
    }
}

#[test]
fn determinism_across_repeated_solves() {
    let first_outcome = {
        let mut ctx = Context::new(sample_instance(), Config::default());
        ctx.solve()
    };
    let second_outcome = {
        let mut ctx = Context::new(sample_instance(), Config::default());
        ctx.solve()
    };

    match (first_outcome, second_outcome) {
        (Outcome::Sat { assignment: a, .. }, Outcome::Sat { assignment: b, .. }) => {
            assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
        }
        (a, b) => panic!("expected both solves to agree on sat, got {a:?} and {b:?}"),
    }
}

#[test]
fn an_unsatisfiable_instance_reports_unsat_both_times() {
    let make = || Instance::new(vec![vec![false]], Vec::new());
    let mut first = Context::new(make(), Config::default());
    let mut second = Context::new(make(), Config::default());
    assert!(first.solve().is_unsat());
    assert!(second.solve().is_unsat());
}
