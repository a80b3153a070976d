/*!
The in-memory workflow instance (C1): steps, users, the authorization
relation, and the eight constraint kinds.

An [Instance] is immutable once built — by [parse](crate::parse) — and is
shared-readable by the [analysis](crate::analysis), the
[constraints](crate::constraints) library, and the [solve](crate::solve)
back-end, none of which mutate it.
*/

pub mod assignment;
pub mod constraint;

pub use assignment::Assignment;
pub use constraint::{Constraint, ConstraintFamily, ConstraintId, ConstraintKind};

/// A step of the workflow. Steps are indexed `0..num_steps`.
pub type Step = usize;

/// A candidate assignee. Users are indexed `0..num_users`.
pub type User = usize;

/// An immutable workflow instance.
///
/// `auth` is stored step-major (`auth[step][user]`) so that "the authorized
/// set of a step" — the quantity most of the constraint library and the
/// back-end query — is a contiguous row, while [authorized_steps] answers
/// the reverse query from a precomputed column-major index built once at
/// construction.
#[derive(Clone, Debug)]
pub struct Instance {
    num_steps: usize,
    num_users: usize,
    auth: Vec<Vec<bool>>,
    authorized_steps: Vec<Vec<Step>>,
    constraints: Vec<Constraint>,
}

impl Instance {
    /// Builds an instance from a step-major authorization matrix and a list
    /// of constraints. Not part of the public parsing surface — used by
    /// [parse](crate::parse) and by tests which construct instances
    /// directly.
    pub fn new(auth: Vec<Vec<bool>>, constraints: Vec<Constraint>) -> Self {
        let num_steps = auth.len();
        let num_users = auth.first().map_or(0, Vec::len);

        let mut authorized_steps = vec![Vec::new(); num_users];
        for (step, row) in auth.iter().enumerate() {
            for (user, &authorized) in row.iter().enumerate() {
                if authorized {
                    authorized_steps[user].push(step);
                }
            }
        }

        Instance {
            num_steps,
            num_users,
            auth,
            authorized_steps,
            constraints,
        }
    }

    /// The number of steps in the workflow.
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// The number of users who may be assigned to steps.
    pub fn num_users(&self) -> usize {
        self.num_users
    }

    /// Whether `user` is authorized to perform `step`.
    pub fn is_authorized(&self, step: Step, user: User) -> bool {
        self.auth[step][user]
    }

    /// The users authorized for `step`, in ascending order.
    pub fn authorized_users(&self, step: Step) -> impl Iterator<Item = User> + '_ {
        self.auth[step]
            .iter()
            .enumerate()
            .filter_map(|(user, &ok)| ok.then_some(user))
    }

    /// The number of users authorized for `step`.
    pub fn authorized_user_count(&self, step: Step) -> usize {
        self.auth[step].iter().filter(|&&ok| ok).count()
    }

    /// The steps `user` is authorized to perform, in ascending order.
    pub fn authorized_steps(&self, user: User) -> &[Step] {
        &self.authorized_steps[user]
    }

    /// The constraints of the instance, in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The constraints of a single family, in declaration order.
    pub fn constraints_of(
        &self,
        family: ConstraintFamily,
    ) -> impl Iterator<Item = &Constraint> + '_ {
        self.constraints
            .iter()
            .filter(move |c| c.kind.family() == family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorized_steps_is_the_reverse_of_the_matrix() {
        let auth = vec![vec![true, false], vec![false, true], vec![true, true]];
        let instance = Instance::new(auth, Vec::new());

        assert_eq!(instance.authorized_steps(0), &[0, 2]);
        assert_eq!(instance.authorized_steps(1), &[1, 2]);
        assert_eq!(instance.authorized_users(2).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn a_user_with_no_authorisations_line_is_authorized_for_nothing() {
        let auth = vec![vec![true, false], vec![true, false]];
        let instance = Instance::new(auth, Vec::new());
        assert!(instance.authorized_steps(1).is_empty());
    }
}
