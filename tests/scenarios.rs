//! Concrete worked scenarios, each as one integration test.

use wsp_sat::config::Config;
use wsp_sat::context::Context;
use wsp_sat::instance::{Constraint, ConstraintId, ConstraintKind, Instance};
use wsp_sat::parse;
use wsp_sat::solve::{Outcome, Tri};

fn fully_authorized(num_steps: usize, num_users: usize) -> Instance {
    Instance::new(vec![vec![true; num_users]; num_steps], Vec::new())
}

#[test]
fn trivial_sat_unique_is_false_with_two_users() {
    let text = "\
#Steps: 2
#Users: 2
#Constraints: 1
Authorisations u1 s1 s2
Authorisations u2 s1 s2
Binding-of-duty s1 s2
";
    let instance = parse::parse(text).expect("valid instance");
    let mut ctx = Context::new(instance, Config::default());
    match ctx.solve() {
        Outcome::Sat { assignment, unique, .. } => {
            assert_eq!(assignment.user_of(0), assignment.user_of(1));
            assert_eq!(assignment.user_of(0), 0, "lowest authorized user wins ties");
            assert_eq!(unique, Tri::False, "u2 also satisfies the BoD pair");
        }
        other => panic!("expected sat, got {other:?}"),
    }
}

#[test]
fn bod_with_disjoint_authorization_is_unsat() {
    let instance = Instance::new(
        vec![vec![true, false], vec![false, true]],
        vec![Constraint::new(ConstraintId(0), ConstraintKind::BindingOfDuty { s1: 0, s2: 1 })],
    );
    let mut ctx = Context::new(instance, Config::default());
    match ctx.solve() {
        Outcome::Unsat { reason, .. } => {
            assert!(reason.contains("s1") && reason.contains("s2"), "reason: {reason}");
        }
        other => panic!("expected unsat, got {other:?}"),
    }
}

#[test]
fn three_way_sod_with_two_users_is_unsat() {
    let instance = Instance::new(
        vec![vec![true, true], vec![true, true], vec![true, true]],
        vec![
            Constraint::new(ConstraintId(0), ConstraintKind::SeparationOfDuty { s1: 0, s2: 1 }),
            Constraint::new(ConstraintId(1), ConstraintKind::SeparationOfDuty { s1: 1, s2: 2 }),
            Constraint::new(ConstraintId(2), ConstraintKind::SeparationOfDuty { s1: 0, s2: 2 }),
        ],
    );
    let mut ctx = Context::new(instance, Config::default());
    assert!(ctx.solve().is_unsat());
}

#[test]
fn at_most_k_tight_splits_evenly_and_is_not_unique() {
    let instance = Instance::new(
        vec![vec![true, true]; 4],
        vec![Constraint::new(
            ConstraintId(0),
            ConstraintKind::AtMostK { k: 2, steps: vec![0, 1, 2, 3] },
        )],
    );
    let mut ctx = Context::new(instance, Config::default());
    match ctx.solve() {
        Outcome::Sat { assignment, unique, .. } => {
            let mut counts = [0usize; 2];
            for (_, user) in assignment.iter() {
                counts[user] += 1;
            }
            assert_eq!(counts, [2, 2]);
            assert_eq!(unique, Tri::False);
        }
        other => panic!("expected sat, got {other:?}"),
    }
}

#[test]
fn one_team_picks_a_single_team_not_a_mix() {
    let instance = Instance::new(
        vec![vec![true, true, true], vec![true, true, true]],
        vec![Constraint::new(
            ConstraintId(0),
            ConstraintKind::OneTeam {
                steps: vec![0, 1],
                teams: vec![vec![0, 1], vec![2]],
            },
        )],
    );
    let mut ctx = Context::new(instance, Config::default());
    match ctx.solve() {
        Outcome::Sat { assignment, .. } => {
            let team1 = [0usize, 1usize];
            let users: Vec<_> = assignment.iter().map(|(_, u)| u).collect();
            let all_in_team1 = users.iter().all(|u| team1.contains(u));
            let all_in_team2 = users.iter().all(|&u| u == 2);
            assert!(all_in_team1 || all_in_team2, "mixed team assignment: {users:?}");
        }
        other => panic!("expected sat, got {other:?}"),
    }
}

#[test]
fn sual_forces_the_super_user_when_bod_collapses_to_one_distinct_user() {
    let instance = Instance::new(
        vec![vec![true, true, true]; 3],
        vec![
            Constraint::new(ConstraintId(0), ConstraintKind::BindingOfDuty { s1: 0, s2: 1 }),
            Constraint::new(ConstraintId(1), ConstraintKind::BindingOfDuty { s1: 1, s2: 2 }),
            Constraint::new(
                ConstraintId(2),
                ConstraintKind::SuperUserAtLeast { steps: vec![0, 1, 2], h: 1, supers: vec![2] },
            ),
        ],
    );
    let mut ctx = Context::new(instance, Config::default());
    match ctx.solve() {
        Outcome::Sat { assignment, unique, .. } => {
            assert!(assignment.iter().all(|(_, u)| u == 2), "expected every step on the super user");
            assert_eq!(unique, Tri::True);
        }
        other => panic!("expected sat, got {other:?}"),
    }
}

#[test]
fn a_fully_authorized_instance_with_no_constraints_is_trivially_sat() {
    let instance = fully_authorized(3, 1);
    let mut ctx = Context::new(instance, Config::default());
    assert!(ctx.solve().is_sat());
}
