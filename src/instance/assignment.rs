/*!
A total assignment of users to steps — the shape a [Sat](crate::solve::Outcome::Sat)
result carries.
*/

use super::{Step, User};

/// A total function `steps -> users`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    users: Vec<User>,
}

impl Assignment {
    /// Builds an assignment from a dense `step -> user` vector.
    pub fn from_vec(users: Vec<User>) -> Self {
        Assignment { users }
    }

    /// The number of steps this assignment covers.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// The user assigned to `step`.
    pub fn user_of(&self, step: Step) -> User {
        self.users[step]
    }

    /// Iterates `(step, user)` pairs in step order.
    pub fn iter(&self) -> impl Iterator<Item = (Step, User)> + '_ {
        self.users.iter().copied().enumerate()
    }

    /// The distinct users this assignment uses, over a subset of steps.
    pub fn distinct_users_over<'a>(&'a self, steps: &'a [Step]) -> impl Iterator<Item = User> + 'a {
        let mut seen = std::collections::BTreeSet::new();
        steps.iter().filter_map(move |&s| {
            let u = self.user_of(s);
            seen.insert(u).then_some(u)
        })
    }
}
